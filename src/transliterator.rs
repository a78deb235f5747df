//! Transducer contract and chaining.

use std::borrow::Cow;
use std::rc::Rc;

use tracing::debug;

use crate::char::{build_char_stream, render, CharStream, CharUnit, Emitter};
use crate::config::ConfigError;
use crate::transliterators::jisx0201_and_alike::OverrideConflict;

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("at least one transliterator must be specified")]
    EmptyChain,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    OverrideConflict(#[from] OverrideConflict),
    #[error("transliterator already registered: {0}")]
    AlreadyRegistered(String),
}

/// A single-pass stream-to-stream rewrite.
///
/// Implementations must pass the sentinel through as the last unit, buffer
/// at most a bounded window of input, and recompute offsets from zero
/// (route output through an [`Emitter`]).
pub trait Transliterator: Send + Sync {
    /// Registry name of this transducer.
    fn name(&self) -> &str;

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a>;

    /// Convenience: build a stream from `text`, run it, render the result.
    fn transliterate_str(&self, text: &str) -> String {
        render(self.transliterate(build_char_stream(text)))
    }
}

/// Stages applied in order, each pulling lazily from the previous one.
pub struct Chain {
    stages: Vec<Box<dyn Transliterator>>,
}

impl Chain {
    pub fn new(stages: Vec<Box<dyn Transliterator>>) -> Result<Self, FactoryError> {
        if stages.is_empty() {
            return Err(FactoryError::EmptyChain);
        }
        debug!(
            stage_count = stages.len(),
            stages = ?stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "chain built"
        );
        Ok(Self { stages })
    }

    pub fn stages(&self) -> impl Iterator<Item = &dyn Transliterator> {
        self.stages.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

impl Transliterator for Chain {
    fn name(&self) -> &str {
        "chain"
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        self.stages
            .iter()
            .fold(input, |stream, stage| stage.transliterate(stream))
    }
}

/// Pipe transducers into a [`Chain`]. Fails on an empty list.
pub fn chain(stages: Vec<Box<dyn Transliterator>>) -> Result<Chain, FactoryError> {
    Chain::new(stages)
}

/// Stream adapter for unit-local rewrites: `f` returns the replacement text,
/// or `None` to pass the unit through. An empty replacement deletes the
/// unit. Never sees the sentinel.
pub(crate) struct MapUnits<'a, F> {
    input: CharStream<'a>,
    emitter: Emitter,
    f: F,
    done: bool,
}

impl<'a, F> Iterator for MapUnits<'a, F>
where
    F: FnMut(&CharUnit) -> Option<Cow<'static, str>>,
{
    type Item = Rc<CharUnit>;

    fn next(&mut self) -> Option<Rc<CharUnit>> {
        if self.done {
            return None;
        }
        loop {
            return match self.input.next() {
                Some(unit) if !unit.is_sentinel() => match (self.f)(&unit) {
                    Some(text) if text.is_empty() => continue,
                    Some(text) => Some(self.emitter.emit(text, &unit)),
                    None => Some(self.emitter.pass(unit)),
                },
                Some(sentinel) => {
                    self.done = true;
                    Some(self.emitter.pass(sentinel))
                }
                None => {
                    self.done = true;
                    Some(self.emitter.sentinel())
                }
            };
        }
    }
}

pub(crate) fn map_units<'a, F>(input: CharStream<'a>, f: F) -> CharStream<'a>
where
    F: FnMut(&CharUnit) -> Option<Cow<'static, str>> + 'a,
{
    Box::new(MapUnits {
        input,
        emitter: Emitter::new(),
        f,
        done: false,
    })
}

/// Rules for a one-unit-lookahead pairing pass.
pub(crate) trait PairRule {
    /// Whether `unit` may start a pair and must wait for its successor.
    fn holds(&self, unit: &CharUnit) -> bool;

    /// Replacement text for `first` followed by `second`, if they pair.
    fn combine(&self, first: &CharUnit, second: &CharUnit) -> Option<Cow<'static, str>>;

    /// Rewrite for a unit that did not pair; `None` passes it through.
    fn single(&self, unit: &CharUnit) -> Option<Cow<'static, str>>;
}

/// Stream adapter for [`PairRule`]s. A held unit whose successor does not
/// pair with it is flushed alone, and the successor is then considered on
/// its own (it may start a new pair).
pub(crate) struct PairUnits<'a, R: ?Sized> {
    input: CharStream<'a>,
    rule: &'a R,
    emitter: Emitter,
    held: Option<Rc<CharUnit>>,
    queued: Option<Rc<CharUnit>>,
    done: bool,
}

impl<'a, R: PairRule + ?Sized> PairUnits<'a, R> {
    fn single(&mut self, unit: Rc<CharUnit>) -> Rc<CharUnit> {
        match self.rule.single(&unit) {
            Some(text) => self.emitter.emit(text, &unit),
            None => self.emitter.pass(unit),
        }
    }

    fn finish(&mut self, end: Option<Rc<CharUnit>>) -> Rc<CharUnit> {
        self.done = true;
        let flushed = self.held.take().map(|held| self.single(held));
        let sentinel = match end {
            Some(sentinel) => self.emitter.pass(sentinel),
            None => self.emitter.sentinel(),
        };
        match flushed {
            Some(out) => {
                self.queued = Some(sentinel);
                out
            }
            None => sentinel,
        }
    }
}

impl<'a, R: PairRule + ?Sized> Iterator for PairUnits<'a, R> {
    type Item = Rc<CharUnit>;

    fn next(&mut self) -> Option<Rc<CharUnit>> {
        if let Some(unit) = self.queued.take() {
            return Some(unit);
        }
        if self.done {
            return None;
        }
        loop {
            let unit = match self.input.next() {
                Some(unit) if !unit.is_sentinel() => unit,
                end => return Some(self.finish(end)),
            };
            let Some(first) = self.held.take() else {
                if self.rule.holds(&unit) {
                    self.held = Some(unit);
                    continue;
                }
                return Some(self.single(unit));
            };
            if let Some(text) = self.rule.combine(&first, &unit) {
                return Some(self.emitter.emit(text, &first));
            }
            let out = self.single(first);
            if self.rule.holds(&unit) {
                self.held = Some(unit);
            } else {
                let next = self.single(unit);
                self.queued = Some(next);
            }
            return Some(out);
        }
    }
}

pub(crate) fn pair_units<'a, R>(input: CharStream<'a>, rule: &'a R) -> CharStream<'a>
where
    R: PairRule + ?Sized,
{
    Box::new(PairUnits {
        input,
        rule,
        emitter: Emitter::new(),
        held: None,
        queued: None,
        done: false,
    })
}

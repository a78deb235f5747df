//! Character stream model.
//!
//! Text is split into `CharUnit`s: one codepoint, or a base codepoint plus a
//! trailing variation selector. Every stream ends in exactly one sentinel
//! unit (empty text). Offsets are measured in UTF-16 code units and are
//! recomputed from zero by every stage of a chain.

use std::borrow::Cow;
use std::rc::Rc;

use crate::unicode::{is_variation_selector, utf16_len};

/// A lazily pulled stream of units. Each stage owns its upstream.
pub type CharStream<'a> = Box<dyn Iterator<Item = Rc<CharUnit>> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharUnit {
    /// Rendered text. Empty for the sentinel.
    pub text: Cow<'static, str>,
    /// Position within the current stage's output, in UTF-16 code units.
    pub offset: usize,
    /// The unit this one was derived from, if any. Read-only.
    pub source: Option<Rc<CharUnit>>,
}

impl CharUnit {
    pub fn new(text: impl Into<Cow<'static, str>>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            source: None,
        }
    }

    pub fn sentinel(offset: usize) -> Self {
        Self::new("", offset)
    }

    pub fn is_sentinel(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of a non-sentinel unit.
    pub fn text(&self) -> Option<&str> {
        if self.is_sentinel() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// Rendered width in UTF-16 code units.
    pub fn width(&self) -> usize {
        utf16_len(&self.text)
    }

    /// Walk the provenance chain to its root and report whether any hop
    /// changed the rendered text.
    pub fn is_transliterated(&self) -> bool {
        let mut cur = self;
        while let Some(src) = cur.source.as_deref() {
            if cur.text != src.text {
                return true;
            }
            cur = src;
        }
        false
    }

    /// The root of the provenance chain (the unit built from input text).
    pub fn origin(&self) -> &CharUnit {
        let mut cur = self;
        while let Some(src) = cur.source.as_deref() {
            cur = src;
        }
        cur
    }
}

/// Assigns output offsets for one stage.
///
/// Every transducer routes its output through an `Emitter` so that offsets
/// restart at zero per stage and each delta equals the previous unit's width.
#[derive(Debug, Default)]
pub struct Emitter {
    offset: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a rewritten unit derived from `source`.
    pub fn emit(&mut self, text: impl Into<Cow<'static, str>>, source: &Rc<CharUnit>) -> Rc<CharUnit> {
        let unit = CharUnit {
            text: text.into(),
            offset: self.offset,
            source: Some(Rc::clone(source)),
        };
        self.offset += unit.width();
        Rc::new(unit)
    }

    /// Emit `unit` with its text unchanged. The same allocation is reused
    /// when its offset already matches.
    pub fn pass(&mut self, unit: Rc<CharUnit>) -> Rc<CharUnit> {
        let out = if unit.offset == self.offset {
            unit
        } else {
            Rc::new(CharUnit {
                text: unit.text.clone(),
                offset: self.offset,
                source: Some(unit),
            })
        };
        self.offset += out.width();
        out
    }

    /// A fresh sentinel at the current offset, used when upstream ended
    /// without one.
    pub fn sentinel(&mut self) -> Rc<CharUnit> {
        Rc::new(CharUnit::sentinel(self.offset))
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

struct CharUnits<'a> {
    chars: std::str::Chars<'a>,
    pending: Option<char>,
    offset: usize,
    finished: bool,
}

impl CharUnits<'_> {
    fn unit(&mut self, text: String) -> Rc<CharUnit> {
        let unit = CharUnit::new(text, self.offset);
        self.offset += unit.width();
        Rc::new(unit)
    }
}

impl Iterator for CharUnits<'_> {
    type Item = Rc<CharUnit>;

    fn next(&mut self) -> Option<Rc<CharUnit>> {
        loop {
            match self.chars.next() {
                Some(c) => match self.pending.take() {
                    Some(base) if is_variation_selector(c) => {
                        let mut text = String::with_capacity(base.len_utf8() + c.len_utf8());
                        text.push(base);
                        text.push(c);
                        return Some(self.unit(text));
                    }
                    Some(base) => {
                        self.pending = Some(c);
                        return Some(self.unit(base.to_string()));
                    }
                    None => self.pending = Some(c),
                },
                None => {
                    if let Some(base) = self.pending.take() {
                        return Some(self.unit(base.to_string()));
                    }
                    if self.finished {
                        return None;
                    }
                    self.finished = true;
                    return Some(Rc::new(CharUnit::sentinel(self.offset)));
                }
            }
        }
    }
}

/// Split `text` into a sentinel-terminated unit stream.
pub fn build_char_stream(text: &str) -> CharStream<'_> {
    Box::new(CharUnits {
        chars: text.chars(),
        pending: None,
        offset: 0,
        finished: false,
    })
}

/// Concatenate unit texts up to (excluding) the sentinel.
pub fn render<I>(units: I) -> String
where
    I: IntoIterator<Item = Rc<CharUnit>>,
{
    let mut out = String::new();
    for unit in units {
        if unit.is_sentinel() {
            break;
        }
        out.push_str(&unit.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(s: &str) -> Vec<String> {
        build_char_stream(s).map(|u| u.text.to_string()).collect()
    }

    #[test]
    fn test_build_appends_sentinel() {
        assert_eq!(texts("あい"), vec!["あ", "い", ""]);
        assert_eq!(texts(""), vec![""]);
    }

    #[test]
    fn test_build_merges_variation_selectors() {
        assert_eq!(
            texts("\u{8FBB}\u{E0100}a\u{585A}\u{FE00}"),
            vec!["\u{8FBB}\u{E0100}", "a", "\u{585A}\u{FE00}", ""]
        );
    }

    #[test]
    fn test_lone_selector_is_its_own_unit() {
        assert_eq!(texts("\u{FE00}a"), vec!["\u{FE00}", "a", ""]);
        assert_eq!(
            texts("a\u{FE00}\u{FE01}"),
            vec!["a\u{FE00}", "\u{FE01}", ""]
        );
    }

    #[test]
    fn test_offsets_count_utf16_code_units() {
        let units: Vec<_> = build_char_stream("a\u{20B9F}\u{8FBB}\u{E0100}b").collect();
        let offsets: Vec<_> = units.iter().map(|u| u.offset).collect();
        // "a" = 1, U+20B9F = 2 (surrogate pair), U+8FBB + U+E0100 = 1 + 2.
        assert_eq!(offsets, vec![0, 1, 3, 6, 7]);
        let expected: usize = "a\u{20B9F}\u{8FBB}\u{E0100}b".encode_utf16().count();
        assert_eq!(units.last().unwrap().offset, expected);
    }

    #[test]
    fn test_render_stops_at_sentinel() {
        let mut units: Vec<_> = build_char_stream("ab").collect();
        units.push(Rc::new(CharUnit::new("ignored", 99)));
        assert_eq!(render(units), "ab");
    }

    #[test]
    fn test_is_transliterated_walks_to_root() {
        let root = Rc::new(CharUnit::new("か", 0));
        let mut e = Emitter::new();
        let changed = e.emit("カ", &root);
        let mut e2 = Emitter::new();
        e2.emit("x", &Rc::new(CharUnit::new("x", 0)));
        // Same text, different offset: a passthrough hop.
        let moved = e2.pass(Rc::clone(&changed));
        assert!(!root.is_transliterated());
        assert!(changed.is_transliterated());
        assert!(moved.is_transliterated());
        assert_eq!(moved.origin().text, "か");
    }

    #[test]
    fn test_pass_reuses_unit_when_offset_matches() {
        let unit = Rc::new(CharUnit::new("a", 0));
        let mut e = Emitter::new();
        let out = e.pass(Rc::clone(&unit));
        assert!(Rc::ptr_eq(&unit, &out));
        assert_eq!(e.offset(), 1);
    }
}

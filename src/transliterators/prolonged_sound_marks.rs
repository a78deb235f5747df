//! Disambiguates hyphen-like characters next to kana (カ- → カー), and
//! optionally turns prolonged sound marks after alphanumerics back into
//! hyphens (Ａー１ → Ａ－１).

use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::char::{CharStream, CharUnit, Emitter};
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::Transliterator;
use crate::unicode::single_char;

pub const NAME: &str = "prolonged-sound-marks";

const HALFWIDTH_PROLONGED_SOUND_MARK: &str = "\u{FF70}";
const FULLWIDTH_PROLONGED_SOUND_MARK: &str = "\u{30FC}";
const HALFWIDTH_HYPHEN: &str = "\u{002D}";
const FULLWIDTH_HYPHEN: &str = "\u{FF0D}";

/// Character class: a script field in the high bits plus feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CharType(u8);

impl CharType {
    const OTHER: CharType = CharType(0x00);
    const HIRAGANA: CharType = CharType(0x20);
    const KATAKANA: CharType = CharType(0x40);
    const ALPHABET: CharType = CharType(0x60);
    const DIGIT: CharType = CharType(0x80);
    const EITHER: CharType = CharType(0xA0);

    const HALFWIDTH: CharType = CharType(1 << 0);
    const VOWEL_ENDED: CharType = CharType(1 << 1);
    const HATSUON: CharType = CharType(1 << 2);
    const SOKUON: CharType = CharType(1 << 3);
    const PROLONGED_SOUND_MARK: CharType = CharType(1 << 4);

    const SCRIPT_MASK: u8 = 0xE0;

    const fn with(self, other: CharType) -> CharType {
        CharType(self.0 | other.0)
    }

    fn script(self) -> CharType {
        CharType(self.0 & Self::SCRIPT_MASK)
    }

    fn intersects(self, flags: CharType) -> bool {
        self.0 & flags.0 & !Self::SCRIPT_MASK != 0
    }

    fn is_halfwidth(self) -> bool {
        self.intersects(Self::HALFWIDTH)
    }

    fn is_alnum(self) -> bool {
        matches!(self.script(), Self::ALPHABET | Self::DIGIT)
    }

    fn classify(c: char) -> CharType {
        type T = CharType;
        match c {
            '\u{FF70}' => T::KATAKANA
                .with(T::PROLONGED_SOUND_MARK)
                .with(T::HALFWIDTH),
            '\u{30FC}' => T::EITHER.with(T::PROLONGED_SOUND_MARK),
            '\u{3063}' => T::HIRAGANA.with(T::SOKUON),
            '\u{3093}' => T::HIRAGANA.with(T::HATSUON),
            '\u{30C3}' => T::KATAKANA.with(T::SOKUON),
            '\u{30F3}' => T::KATAKANA.with(T::HATSUON),
            '\u{FF6F}' => T::KATAKANA.with(T::SOKUON).with(T::HALFWIDTH),
            '\u{FF9D}' => T::KATAKANA.with(T::HATSUON).with(T::HALFWIDTH),
            '\u{3041}'..='\u{309C}' | '\u{309F}' => T::HIRAGANA.with(T::VOWEL_ENDED),
            '\u{30A1}'..='\u{30FA}' | '\u{30FD}'..='\u{30FF}' => {
                T::KATAKANA.with(T::VOWEL_ENDED)
            }
            '\u{FF66}'..='\u{FF6F}' | '\u{FF71}'..='\u{FF9F}' => T::KATAKANA
                .with(T::VOWEL_ENDED)
                .with(T::HALFWIDTH),
            '0'..='9' => T::DIGIT.with(T::HALFWIDTH),
            '\u{FF10}'..='\u{FF19}' => T::DIGIT,
            'A'..='Z' | 'a'..='z' => T::ALPHABET.with(T::HALFWIDTH),
            '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' => T::ALPHABET,
            _ => T::OTHER,
        }
    }
}

fn is_hyphen_like(c: char) -> bool {
    matches!(
        c,
        '\u{002D}'
            | '\u{2010}'
            | '\u{2014}'
            | '\u{2015}'
            | '\u{2212}'
            | '\u{FF0D}'
            | '\u{FF70}'
            | '\u{30FC}'
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProlongedSoundMarksOptions {
    /// Leave hyphens produced by an earlier stage as they are.
    pub skip_already_transliterated_chars: bool,
    /// Treat ん / ン as prolongable.
    pub allow_prolonged_hatsuon: bool,
    /// Treat っ / ッ as prolongable.
    pub allow_prolonged_sokuon: bool,
    /// Rewrite a hyphen-like run after a letter or digit to hyphens.
    pub replace_prolonged_marks_following_alnums: bool,
}

impl ProlongedSoundMarksOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(b) = r.bool("skip_already_transliterated_chars")? {
            out.skip_already_transliterated_chars = b;
        }
        if let Some(b) = r.bool("allow_prolonged_hatsuon")? {
            out.allow_prolonged_hatsuon = b;
        }
        if let Some(b) = r.bool("allow_prolonged_sokuon")? {
            out.allow_prolonged_sokuon = b;
        }
        if let Some(b) = r.bool("replace_prolonged_marks_following_alnums")? {
            out.replace_prolonged_marks_following_alnums = b;
        }
        r.finish()?;
        Ok(out)
    }
}

pub struct ProlongedSoundMarksTransliterator {
    options: ProlongedSoundMarksOptions,
    prolongables: CharType,
}

impl ProlongedSoundMarksTransliterator {
    pub fn new(options: ProlongedSoundMarksOptions) -> Self {
        let mut prolongables = CharType::VOWEL_ENDED.with(CharType::PROLONGED_SOUND_MARK);
        if options.allow_prolonged_hatsuon {
            prolongables = prolongables.with(CharType::HATSUON);
        }
        if options.allow_prolonged_sokuon {
            prolongables = prolongables.with(CharType::SOKUON);
        }
        Self {
            options,
            prolongables,
        }
    }
}

struct ProlongedSoundMarks<'a> {
    t: &'a ProlongedSoundMarksTransliterator,
    input: CharStream<'a>,
    emitter: Emitter,
    /// Class of the last character that was not hyphen-like.
    last: Option<CharType>,
    /// Hyphen-like run after an alphanumeric, awaiting its terminator.
    run: Vec<Rc<CharUnit>>,
    run_transliterated: bool,
    ready: VecDeque<Rc<CharUnit>>,
    done: bool,
}

impl ProlongedSoundMarks<'_> {
    fn process(&mut self, unit: Rc<CharUnit>) {
        let t = self.t;
        let options = &t.options;
        if !single_char(&unit.text).is_some_and(is_hyphen_like) {
            self.flush_run();
            self.last = unit.text.chars().next().map(CharType::classify);
            let out = self.emitter.pass(unit);
            self.ready.push_back(out);
            return;
        }
        if !self.run.is_empty() {
            self.run_transliterated |= unit.is_transliterated();
            self.run.push(unit);
            return;
        }
        if options.skip_already_transliterated_chars && unit.is_transliterated() {
            let out = self.emitter.pass(unit);
            self.ready.push_back(out);
            return;
        }
        let out = match self.last {
            Some(prev) if prev.intersects(t.prolongables) => {
                let mark = if prev.is_halfwidth() {
                    HALFWIDTH_PROLONGED_SOUND_MARK
                } else {
                    FULLWIDTH_PROLONGED_SOUND_MARK
                };
                if unit.text == mark {
                    self.emitter.pass(unit)
                } else {
                    self.emitter.emit(mark, &unit)
                }
            }
            Some(prev) if options.replace_prolonged_marks_following_alnums && prev.is_alnum() => {
                self.run_transliterated = false;
                self.run.push(unit);
                return;
            }
            _ => self.emitter.pass(unit),
        };
        self.ready.push_back(out);
    }

    fn flush_run(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let replace =
            !(self.t.options.skip_already_transliterated_chars && self.run_transliterated);
        let hyphen = if self.last.is_some_and(CharType::is_halfwidth) {
            HALFWIDTH_HYPHEN
        } else {
            FULLWIDTH_HYPHEN
        };
        for unit in std::mem::take(&mut self.run) {
            let out = if replace && unit.text != hyphen {
                self.emitter.emit(hyphen, &unit)
            } else {
                self.emitter.pass(unit)
            };
            self.ready.push_back(out);
        }
    }
}

impl Iterator for ProlongedSoundMarks<'_> {
    type Item = Rc<CharUnit>;

    fn next(&mut self) -> Option<Rc<CharUnit>> {
        loop {
            if let Some(unit) = self.ready.pop_front() {
                return Some(unit);
            }
            if self.done {
                return None;
            }
            match self.input.next() {
                Some(unit) if !unit.is_sentinel() => self.process(unit),
                end => {
                    self.flush_run();
                    let sentinel = match end {
                        Some(sentinel) => self.emitter.pass(sentinel),
                        None => self.emitter.sentinel(),
                    };
                    self.ready.push_back(sentinel);
                    self.done = true;
                }
            }
        }
    }
}

impl Transliterator for ProlongedSoundMarksTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        Box::new(ProlongedSoundMarks {
            t: self,
            input,
            emitter: Emitter::new(),
            last: None,
            run: Vec::new(),
            run_transliterated: false,
            ready: VecDeque::new(),
            done: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char::{build_char_stream, render};
    use serde_json::json;

    fn run(options: ProlongedSoundMarksOptions, s: &str) -> String {
        ProlongedSoundMarksTransliterator::new(options).transliterate_str(s)
    }

    fn default_run(s: &str) -> String {
        run(ProlongedSoundMarksOptions::default(), s)
    }

    fn alnum_options() -> ProlongedSoundMarksOptions {
        ProlongedSoundMarksOptions {
            replace_prolonged_marks_following_alnums: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify() {
        let t = CharType::classify('カ');
        assert_eq!(t.script(), CharType::KATAKANA);
        assert!(t.intersects(CharType::VOWEL_ENDED));
        assert!(CharType::classify('ｶ').is_halfwidth());
        assert!(CharType::classify('Ａ').is_alnum());
        assert!(CharType::classify('7').is_alnum());
        assert!(!CharType::classify('ア').is_alnum());
        assert!(CharType::classify('ん').intersects(CharType::HATSUON));
        assert!(CharType::classify('ｯ').intersects(CharType::SOKUON));
        assert_eq!(CharType::classify('漢'), CharType::OTHER);
    }

    #[test]
    fn test_after_vowel_ended_kana() {
        assert_eq!(default_run("カ-"), "カー");
        assert_eq!(default_run("か\u{2014}\u{2015}"), "かーー");
        assert_eq!(default_run("ｶ-"), "ｶｰ");
        assert_eq!(default_run("ｶー"), "ｶｰ");
        assert_eq!(default_run("カー"), "カー");
        assert_eq!(default_run("ァ\u{2212}"), "ァー");
    }

    #[test]
    fn test_other_contexts_are_unchanged() {
        assert_eq!(default_run("-カ"), "-カ");
        assert_eq!(default_run("漢-字"), "漢-字");
        assert_eq!(default_run("A-B"), "A-B");
        assert_eq!(default_run("ん-っ-"), "ん-っ-");
    }

    #[test]
    fn test_hatsuon_and_sokuon_flags() {
        let o = ProlongedSoundMarksOptions {
            allow_prolonged_hatsuon: true,
            allow_prolonged_sokuon: true,
            ..Default::default()
        };
        assert_eq!(run(o.clone(), "ん-"), "んー");
        assert_eq!(run(o.clone(), "ッ-"), "ッー");
        assert_eq!(run(o, "ﾝ-"), "ﾝｰ");
    }

    #[test]
    fn test_following_alnums() {
        assert_eq!(run(alnum_options(), "Ａー１"), "Ａ－１");
        assert_eq!(run(alnum_options(), "A\u{30FC}\u{30FC}B"), "A--B");
        assert_eq!(run(alnum_options(), "1ｰ"), "1-");
        // Kana context still wins.
        assert_eq!(run(alnum_options(), "カ-"), "カー");
        assert_eq!(default_run("Ａー１"), "Ａー１");
    }

    #[test]
    fn test_offsets_with_buffered_run() {
        let t = ProlongedSoundMarksTransliterator::new(alnum_options());
        let out: Vec<_> = t.transliterate(build_char_stream("Aーー")).collect();
        let texts: Vec<_> = out.iter().map(|u| u.text.as_ref()).collect();
        assert_eq!(texts, vec!["A", "-", "-", ""]);
        let offsets: Vec<_> = out.iter().map(|u| u.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_skip_already_transliterated() {
        let options = ProlongedSoundMarksOptions {
            skip_already_transliterated_chars: true,
            ..Default::default()
        };
        let t = ProlongedSoundMarksTransliterator::new(options);
        let units: Vec<_> = build_char_stream("カx").collect();
        let mut e = Emitter::new();
        let kana = e.pass(Rc::clone(&units[0]));
        let hyphen = e.emit("-", &units[1]);
        let sentinel = e.pass(Rc::clone(&units[2]));
        let input: CharStream<'_> = Box::new(vec![kana, hyphen, sentinel].into_iter());
        assert_eq!(render(t.transliterate(input)), "カ-");
        assert_eq!(t.transliterate_str("カ-"), "カー");
    }

    #[test]
    fn test_decode() {
        let o = ProlongedSoundMarksOptions::decode(&json!({
            "allow_prolonged_sokuon": true,
            "replace_prolonged_marks_following_alnums": true,
        }))
        .unwrap();
        assert!(o.allow_prolonged_sokuon);
        assert!(o.replace_prolonged_marks_following_alnums);
        assert!(!o.allow_prolonged_hatsuon);
    }
}

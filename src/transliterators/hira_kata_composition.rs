//! Composes a kana followed by a voiced or semi-voiced sound mark into the
//! precomposed letter (か + U+3099 → が).

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

use super::hira_kata_table::{semivoiced_pairs, voiced_pairs};
use crate::char::{CharStream, CharUnit};
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{pair_units, PairRule, Transliterator};
use crate::unicode::single_char;

pub const NAME: &str = "hira-kata-composition";

const COMBINING_VOICED: char = '\u{3099}';
const COMBINING_SEMIVOICED: char = '\u{309A}';
const SPACING_VOICED: char = '\u{309B}';
const SPACING_SEMIVOICED: char = '\u{309C}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Voiced,
    Semivoiced,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HiraKataCompositionOptions {
    /// Also compose with the spacing marks U+309B / U+309C.
    pub compose_non_combining_marks: bool,
}

impl HiraKataCompositionOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(b) = r.bool("compose_non_combining_marks")? {
            out.compose_non_combining_marks = b;
        }
        r.finish()?;
        Ok(out)
    }
}

struct Tables {
    voiced: HashMap<char, char>,
    semivoiced: HashMap<char, char>,
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        voiced: voiced_pairs().collect(),
        semivoiced: semivoiced_pairs().collect(),
    })
}

pub struct HiraKataCompositionTransliterator {
    options: HiraKataCompositionOptions,
    tables: &'static Tables,
}

impl HiraKataCompositionTransliterator {
    pub fn new(options: HiraKataCompositionOptions) -> Self {
        Self {
            options,
            tables: tables(),
        }
    }

    fn mark(&self, c: char) -> Option<Mark> {
        match c {
            COMBINING_VOICED => Some(Mark::Voiced),
            COMBINING_SEMIVOICED => Some(Mark::Semivoiced),
            SPACING_VOICED if self.options.compose_non_combining_marks => Some(Mark::Voiced),
            SPACING_SEMIVOICED if self.options.compose_non_combining_marks => {
                Some(Mark::Semivoiced)
            }
            _ => None,
        }
    }
}

impl PairRule for HiraKataCompositionTransliterator {
    fn holds(&self, unit: &CharUnit) -> bool {
        single_char(&unit.text).is_some_and(|c| {
            self.tables.voiced.contains_key(&c) || self.tables.semivoiced.contains_key(&c)
        })
    }

    fn combine(&self, first: &CharUnit, second: &CharUnit) -> Option<Cow<'static, str>> {
        let base = single_char(&first.text)?;
        let table = match self.mark(single_char(&second.text)?)? {
            Mark::Voiced => &self.tables.voiced,
            Mark::Semivoiced => &self.tables.semivoiced,
        };
        table.get(&base).map(|c| Cow::Owned(c.to_string()))
    }

    fn single(&self, _unit: &CharUnit) -> Option<Cow<'static, str>> {
        None
    }
}

impl Transliterator for HiraKataCompositionTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        pair_units(input, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char::build_char_stream;
    use serde_json::json;

    fn run(compose_non_combining_marks: bool, s: &str) -> String {
        HiraKataCompositionTransliterator::new(HiraKataCompositionOptions {
            compose_non_combining_marks,
        })
        .transliterate_str(s)
    }

    #[test]
    fn test_combining_marks() {
        assert_eq!(run(false, "か\u{3099}は\u{309A}"), "がぱ");
        assert_eq!(run(false, "カ\u{3099}ウ\u{3099}ワ\u{3099}"), "ガヴヷ");
        assert_eq!(run(false, "ゝ\u{3099}ヽ\u{3099}"), "ゞヾ");
    }

    #[test]
    fn test_spacing_marks_need_flag() {
        assert_eq!(run(false, "か\u{309B}"), "か\u{309B}");
        assert_eq!(run(true, "か\u{309B}ほ\u{309C}"), "がぽ");
    }

    #[test]
    fn test_mismatch_is_flushed() {
        // あ has no voiced form; か has no semi-voiced form.
        assert_eq!(run(false, "あ\u{3099}"), "あ\u{3099}");
        assert_eq!(run(false, "か\u{309A}"), "か\u{309A}");
        // The second kana may still pair with its own mark.
        assert_eq!(run(false, "かき\u{3099}"), "かぎ");
        assert_eq!(run(false, "か"), "か");
    }

    #[test]
    fn test_offsets_after_composition() {
        let t = HiraKataCompositionTransliterator::new(HiraKataCompositionOptions::default());
        let out: Vec<_> = t
            .transliterate(build_char_stream("か\u{3099}x"))
            .map(|u| (u.text.to_string(), u.offset))
            .collect();
        assert_eq!(
            out,
            vec![("が".to_string(), 0), ("x".to_string(), 1), (String::new(), 2)]
        );
    }

    #[test]
    fn test_decode() {
        let o = HiraKataCompositionOptions::decode(&json!({"compose_non_combining_marks": true}))
            .unwrap();
        assert!(o.compose_non_combining_marks);
        assert!(HiraKataCompositionOptions::decode(&json!({"other": true})).is_err());
    }
}

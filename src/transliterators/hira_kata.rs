//! Hiragana ↔ katakana script conversion.

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::hira_kata_table::{KANA_TABLE, SMALL_KANA_TABLE};
use crate::char::CharStream;
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{map_units, Transliterator};
use crate::unicode::single_char;

pub const NAME: &str = "hira-kata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HiraKataMode {
    #[default]
    HiraToKata,
    KataToHira,
}

impl FromStr for HiraKataMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "hira-to-kata" => Ok(HiraKataMode::HiraToKata),
            "kata-to-hira" => Ok(HiraKataMode::KataToHira),
            _ => Err(format!("unknown mode `{s}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HiraKataOptions {
    pub mode: HiraKataMode,
}

impl HiraKataOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(mode) = r.parse("mode")? {
            out.mode = mode;
        }
        r.finish()?;
        Ok(out)
    }
}

/// (hiragana, katakana) for every letter that exists in both scripts.
fn script_pairs() -> impl Iterator<Item = (char, char)> {
    KANA_TABLE
        .iter()
        .flat_map(|e| {
            [
                Some((e.hiragana, e.katakana)),
                e.hiragana_voiced.zip(e.katakana_voiced),
                e.hiragana_semivoiced.zip(e.katakana_semivoiced),
            ]
        })
        .flatten()
        .chain(SMALL_KANA_TABLE.iter().map(|(h, k, _)| (*h, *k)))
        .chain([('ゝ', 'ヽ'), ('ゞ', 'ヾ')])
}

fn table(mode: HiraKataMode) -> &'static HashMap<char, char> {
    static TABLES: [OnceLock<HashMap<char, char>>; 2] = [OnceLock::new(), OnceLock::new()];
    let slot = match mode {
        HiraKataMode::HiraToKata => 0,
        HiraKataMode::KataToHira => 1,
    };
    TABLES[slot].get_or_init(|| {
        script_pairs()
            .map(|(h, k)| match mode {
                HiraKataMode::HiraToKata => (h, k),
                HiraKataMode::KataToHira => (k, h),
            })
            .collect()
    })
}

pub struct HiraKataTransliterator {
    mode: HiraKataMode,
    table: &'static HashMap<char, char>,
}

impl HiraKataTransliterator {
    pub fn new(options: HiraKataOptions) -> Self {
        Self {
            mode: options.mode,
            table: table(options.mode),
        }
    }

    pub fn mode(&self) -> HiraKataMode {
        self.mode
    }
}

impl Transliterator for HiraKataTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        map_units(input, move |unit| {
            let c = single_char(&unit.text)?;
            self.table.get(&c).map(|m| Cow::Owned(m.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(mode: HiraKataMode, s: &str) -> String {
        HiraKataTransliterator::new(HiraKataOptions { mode }).transliterate_str(s)
    }

    #[test]
    fn test_hira_to_kata() {
        assert_eq!(run(HiraKataMode::HiraToKata, "あいうえお"), "アイウエオ");
        assert_eq!(run(HiraKataMode::HiraToKata, "がっこう、ぱん"), "ガッコウ、パン");
        assert_eq!(run(HiraKataMode::HiraToKata, "ゔぁゝゞ"), "ヴァヽヾ");
        assert_eq!(run(HiraKataMode::HiraToKata, "漢字abc"), "漢字abc");
    }

    #[test]
    fn test_kata_to_hira() {
        assert_eq!(run(HiraKataMode::KataToHira, "ヴ"), "ゔ");
        assert_eq!(run(HiraKataMode::KataToHira, "カタカナヵヶ"), "かたかなゕゖ");
        // Katakana-only letters have no hiragana counterpart.
        assert_eq!(run(HiraKataMode::KataToHira, "ヷヸヹヺ"), "ヷヸヹヺ");
        // Halfwidth katakana is left for the width transducer.
        assert_eq!(run(HiraKataMode::KataToHira, "ｶﾅ"), "ｶﾅ");
    }

    #[test]
    fn test_decorated_units_are_left_alone() {
        assert_eq!(run(HiraKataMode::HiraToKata, "か\u{FE00}"), "か\u{FE00}");
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            HiraKataOptions::decode(&json!({"mode": "kata-to-hira"})).unwrap().mode,
            HiraKataMode::KataToHira
        );
        assert_eq!(HiraKataOptions::decode(&Value::Null).unwrap().mode, HiraKataMode::HiraToKata);
        assert!(HiraKataOptions::decode(&json!({"mode": "kata"})).is_err());
    }
}

//! Hyphen and dash normalization toward a target repertoire.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::DataError;
use crate::char::CharStream;
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{map_units, Transliterator};

pub const NAME: &str = "hyphens";

const RESOURCE: &str = "hyphens.toml";

/// Target repertoire for a hyphen-like character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyphensVariant {
    Ascii,
    Jisx0201,
    #[serde(rename = "jisx0208_90")]
    Jisx0208_90,
    #[serde(rename = "jisx0208_90_windows")]
    Jisx0208_90Windows,
    Jisx0208Verbatim,
}

impl HyphensVariant {
    pub const ALL: [HyphensVariant; 5] = [
        HyphensVariant::Ascii,
        HyphensVariant::Jisx0201,
        HyphensVariant::Jisx0208_90,
        HyphensVariant::Jisx0208_90Windows,
        HyphensVariant::Jisx0208Verbatim,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HyphensVariant::Ascii => "ascii",
            HyphensVariant::Jisx0201 => "jisx0201",
            HyphensVariant::Jisx0208_90 => "jisx0208_90",
            HyphensVariant::Jisx0208_90Windows => "jisx0208_90_windows",
            HyphensVariant::Jisx0208Verbatim => "jisx0208_verbatim",
        }
    }
}

impl fmt::Display for HyphensVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HyphensVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown hyphens variant `{s}`"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HyphensRecord {
    pub code: String,
    pub ascii: Option<String>,
    pub jisx0201: Option<String>,
    pub jisx0208_90: Option<String>,
    pub jisx0208_90_windows: Option<String>,
    pub jisx0208_verbatim: Option<String>,
}

impl HyphensRecord {
    fn get(&self, variant: HyphensVariant) -> Option<&str> {
        match variant {
            HyphensVariant::Ascii => self.ascii.as_deref(),
            HyphensVariant::Jisx0201 => self.jisx0201.as_deref(),
            HyphensVariant::Jisx0208_90 => self.jisx0208_90.as_deref(),
            HyphensVariant::Jisx0208_90Windows => self.jisx0208_90_windows.as_deref(),
            HyphensVariant::Jisx0208Verbatim => self.jisx0208_verbatim.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct RecordsFile {
    records: Vec<HyphensRecord>,
}

pub(crate) fn parse_records(toml_str: &str) -> Result<Vec<HyphensRecord>, DataError> {
    let file: RecordsFile = toml::from_str(toml_str).map_err(|e| DataError::Parse {
        resource: RESOURCE,
        reason: e.to_string(),
    })?;
    if file.records.is_empty() {
        return Err(DataError::Empty { resource: RESOURCE });
    }
    Ok(file.records)
}

fn records() -> &'static [HyphensRecord] {
    static RECORDS: OnceLock<Vec<HyphensRecord>> = OnceLock::new();
    RECORDS.get_or_init(|| {
        let records = parse_records(include_str!("data/hyphens.toml"))
            .unwrap_or_else(|e| panic!("embedded table must be valid: {e}"));
        debug!(resource = RESOURCE, entries = records.len(), "table loaded");
        records
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyphensOptions {
    /// Variants tried in order; the first one with a mapping wins.
    pub precedence: Vec<HyphensVariant>,
}

impl Default for HyphensOptions {
    fn default() -> Self {
        Self {
            precedence: vec![HyphensVariant::Jisx0208_90],
        }
    }
}

impl HyphensOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(precedence) = r.parse_list("precedence")? {
            out.precedence = precedence;
        }
        r.finish()?;
        Ok(out)
    }
}

pub struct HyphensTransliterator {
    mappings: HashMap<&'static str, &'static str>,
}

impl HyphensTransliterator {
    pub fn new(options: HyphensOptions) -> Self {
        let mappings = records()
            .iter()
            .filter_map(|r| {
                options
                    .precedence
                    .iter()
                    .find_map(|v| r.get(*v))
                    .map(|to| (r.code.as_str(), to))
            })
            .collect();
        Self { mappings }
    }
}

impl Transliterator for HyphensTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        map_units(input, move |unit| {
            self.mappings
                .get(unit.text.as_ref())
                .filter(|to| **to != unit.text)
                .map(|to| Cow::Borrowed(*to))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(precedence: &[HyphensVariant], s: &str) -> String {
        HyphensTransliterator::new(HyphensOptions {
            precedence: precedence.to_vec(),
        })
        .transliterate_str(s)
    }

    #[test]
    fn test_default_targets_jisx0208_90() {
        let t = HyphensTransliterator::new(HyphensOptions::default());
        assert_eq!(t.transliterate_str("a-b"), "a\u{2212}b");
        assert_eq!(t.transliterate_str("\u{FF70}"), "\u{30FC}");
    }

    #[test]
    fn test_ascii() {
        assert_eq!(run(&[HyphensVariant::Ascii], "\u{2014}\u{2010}\u{2212}"), "---");
    }

    #[test]
    fn test_precedence_falls_back() {
        use HyphensVariant::*;
        assert_eq!(run(&[Jisx0208_90Windows, Jisx0201], "-"), "\u{FF0D}");
        // U+FF70 has no verbatim JIS X 0208 counterpart.
        assert_eq!(run(&[Jisx0208Verbatim, Ascii], "\u{FF70}"), "-");
        assert_eq!(run(&[Jisx0208Verbatim, Ascii], "\u{30FC}"), "\u{30FC}");
    }

    #[test]
    fn test_empty_precedence_is_identity() {
        assert_eq!(run(&[], "a-\u{2014}"), "a-\u{2014}");
    }

    #[test]
    fn test_variant_names() {
        for v in HyphensVariant::ALL {
            assert_eq!(v.as_str().parse::<HyphensVariant>().unwrap(), v);
            assert_eq!(serde_json::to_value(v).unwrap(), json!(v.as_str()));
        }
        assert!("jisx0208".parse::<HyphensVariant>().is_err());
    }

    #[test]
    fn test_decode() {
        let o = HyphensOptions::decode(&json!({"precedence": ["ascii", "jisx0208_90_windows"]}))
            .unwrap();
        assert_eq!(
            o.precedence,
            vec![HyphensVariant::Ascii, HyphensVariant::Jisx0208_90Windows]
        );
        assert_eq!(HyphensOptions::decode(&Value::Null).unwrap(), HyphensOptions::default());
        let err = HyphensOptions::decode(&json!({"precedence": ["nope"]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "hyphens: invalid value for `precedence`: unknown hyphens variant `nope`"
        );
    }
}

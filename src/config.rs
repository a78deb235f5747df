//! Transducer configurations.
//!
//! A config list is an ordered sequence of entries, each either a bare
//! name (`"spaces"`) or a name with an options table. Entries resolve to the
//! strongly-typed [`TransliteratorConfig`] through one hand-written decoder
//! per transducer (see `registry`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry;
use crate::transliterators::{
    CircledOrSquaredOptions, HiraKataCompositionOptions, HiraKataOptions, HyphensOptions,
    IvsSvsBaseOptions, JapaneseIterationMarksOptions, Jisx0201AndAlikeOptions,
    ProlongedSoundMarksOptions, SimpleTable,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown transliterator: {0}")]
    UnknownTransliterator(String),
    #[error("{transliterator}: unknown option `{option}`")]
    UnknownOption {
        transliterator: String,
        option: String,
    },
    #[error("{transliterator}: invalid value for `{option}`: {reason}")]
    InvalidOption {
        transliterator: String,
        option: String,
        reason: String,
    },
    #[error("{transliterator}: options must be a table")]
    NotATable { transliterator: String },
    #[error("config parse error: {0}")]
    Parse(String),
}

/// A resolved transducer configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum TransliteratorConfig {
    Simple(SimpleTable),
    CircledOrSquared(CircledOrSquaredOptions),
    Hyphens(HyphensOptions),
    IvsSvsBase(IvsSvsBaseOptions),
    Jisx0201AndAlike(Jisx0201AndAlikeOptions),
    HiraKata(HiraKataOptions),
    HiraKataComposition(HiraKataCompositionOptions),
    JapaneseIterationMarks(JapaneseIterationMarksOptions),
    ProlongedSoundMarks(ProlongedSoundMarksOptions),
    /// A transducer added through [`registry::register`].
    Custom { name: String, options: Value },
}

impl TransliteratorConfig {
    pub fn name(&self) -> &str {
        use crate::transliterators::{
            circled_or_squared, hira_kata, hira_kata_composition, hyphens, ivs_svs_base,
            japanese_iteration_marks, jisx0201_and_alike, prolonged_sound_marks,
        };
        match self {
            TransliteratorConfig::Simple(t) => t.name(),
            TransliteratorConfig::CircledOrSquared(_) => circled_or_squared::NAME,
            TransliteratorConfig::Hyphens(_) => hyphens::NAME,
            TransliteratorConfig::IvsSvsBase(_) => ivs_svs_base::NAME,
            TransliteratorConfig::Jisx0201AndAlike(_) => jisx0201_and_alike::NAME,
            TransliteratorConfig::HiraKata(_) => hira_kata::NAME,
            TransliteratorConfig::HiraKataComposition(_) => hira_kata_composition::NAME,
            TransliteratorConfig::JapaneseIterationMarks(_) => japanese_iteration_marks::NAME,
            TransliteratorConfig::ProlongedSoundMarks(_) => prolonged_sound_marks::NAME,
            TransliteratorConfig::Custom { name, .. } => name,
        }
    }

    /// Ordering and de-duplication compare configs by name only.
    pub fn same_name(&self, other: &TransliteratorConfig) -> bool {
        self.name() == other.name()
    }
}

/// An unresolved config-list entry as written in TOML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawConfig {
    Name(String),
    WithOptions {
        name: String,
        #[serde(default)]
        options: Value,
    },
}

static NO_OPTIONS: Value = Value::Null;

impl RawConfig {
    pub fn name(&self) -> &str {
        match self {
            RawConfig::Name(name) | RawConfig::WithOptions { name, .. } => name,
        }
    }

    pub fn options(&self) -> &Value {
        match self {
            RawConfig::Name(_) => &NO_OPTIONS,
            RawConfig::WithOptions { options, .. } => options,
        }
    }

    pub fn resolve(&self) -> Result<TransliteratorConfig, ConfigError> {
        registry::decode(self.name(), self.options())
    }
}

impl From<&str> for RawConfig {
    fn from(name: &str) -> Self {
        RawConfig::Name(name.to_string())
    }
}

/// Parse a JSON array of config entries.
pub fn parse_config_list_json(json: &str) -> Result<Vec<RawConfig>, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[derive(Deserialize)]
struct ChainFile {
    chain: Vec<RawConfig>,
}

/// Parse a TOML document holding a top-level `chain = [...]` array.
pub fn parse_config_list_toml(toml_str: &str) -> Result<Vec<RawConfig>, ConfigError> {
    let file: ChainFile = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(file.chain)
}

/// Resolve every entry, failing on the first bad one.
pub fn resolve_all(entries: &[RawConfig]) -> Result<Vec<TransliteratorConfig>, ConfigError> {
    entries.iter().map(RawConfig::resolve).collect()
}

/// Reads one transducer's options table, tracking which keys were used so
/// that leftovers are reported as unknown options.
pub(crate) struct OptionReader<'v> {
    transliterator: &'static str,
    prefix: String,
    entries: Option<&'v Map<String, Value>>,
    consumed: Vec<&'v str>,
}

impl<'v> OptionReader<'v> {
    pub fn new(transliterator: &'static str, options: &'v Value) -> Result<Self, ConfigError> {
        let entries = match options {
            Value::Null => None,
            Value::Object(map) => Some(map),
            _ => {
                return Err(ConfigError::NotATable {
                    transliterator: transliterator.to_string(),
                })
            }
        };
        Ok(Self {
            transliterator,
            prefix: String::new(),
            entries,
            consumed: Vec::new(),
        })
    }

    fn take(&mut self, key: &str) -> Option<&'v Value> {
        let (k, v) = self.entries?.get_key_value(key)?;
        self.consumed.push(k.as_str());
        Some(v)
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidOption {
            transliterator: self.transliterator.to_string(),
            option: format!("{}{}", self.prefix, key),
            reason: reason.into(),
        }
    }

    pub fn bool(&mut self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    pub fn string(&mut self, key: &str) -> Result<Option<&'v str>, ConfigError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// A string option naming one variant of `T`.
    pub fn parse<T>(&mut self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key)? {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e: T::Err| self.invalid(key, e.to_string())),
        }
    }

    /// An array of strings, each naming one variant of `T`.
    pub fn parse_list<T>(&mut self, key: &str) -> Result<Option<Vec<T>>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let items = match self.take(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.invalid(key, "expected an array of strings")),
        };
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.parse().map_err(|e: T::Err| self.invalid(key, e.to_string())),
                _ => Err(self.invalid(key, "expected an array of strings")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A nested options table, read with the same unknown-key tracking.
    pub fn table(&mut self, key: &str) -> Result<Option<OptionReader<'v>>, ConfigError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(OptionReader {
                transliterator: self.transliterator,
                prefix: format!("{}{}.", self.prefix, key),
                entries: Some(map),
                consumed: Vec::new(),
            })),
            Some(_) => Err(self.invalid(key, "expected a table")),
        }
    }

    /// Reject any key that no accessor asked for.
    pub fn finish(self) -> Result<(), ConfigError> {
        let Some(entries) = self.entries else {
            return Ok(());
        };
        match entries
            .keys()
            .find(|k| !self.consumed.contains(&k.as_str()))
        {
            Some(unknown) => Err(ConfigError::UnknownOption {
                transliterator: self.transliterator.to_string(),
                option: format!("{}{}", self.prefix, unknown),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    impl FromStr for Color {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, String> {
            match s {
                "red" => Ok(Color::Red),
                "blue" => Ok(Color::Blue),
                _ => Err(format!("unknown color `{s}`")),
            }
        }
    }

    #[test]
    fn test_reader_reads_typed_values() {
        let v = json!({"flag": true, "color": "blue", "colors": ["red", "blue"], "nested": {"x": "y"}});
        let mut r = OptionReader::new("t", &v).unwrap();
        assert_eq!(r.bool("flag").unwrap(), Some(true));
        assert_eq!(r.bool("missing").unwrap(), None);
        assert_eq!(r.parse::<Color>("color").unwrap(), Some(Color::Blue));
        assert_eq!(
            r.parse_list::<Color>("colors").unwrap(),
            Some(vec![Color::Red, Color::Blue])
        );
        let mut nested = r.table("nested").unwrap().unwrap();
        assert_eq!(nested.string("x").unwrap(), Some("y"));
        nested.finish().unwrap();
        r.finish().unwrap();
    }

    #[test]
    fn test_reader_rejects_unknown_and_mistyped() {
        let v = json!({"flag": "yes"});
        let mut r = OptionReader::new("t", &v).unwrap();
        let err = r.bool("flag").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref option, .. } if option == "flag"));

        let v = json!({"typo": true});
        let r = OptionReader::new("t", &v).unwrap();
        let err = r.finish().unwrap_err();
        assert_eq!(err.to_string(), "t: unknown option `typo`");

        let v = json!({"nested": {"bad": 1}});
        let mut r = OptionReader::new("t", &v).unwrap();
        let nested = r.table("nested").unwrap().unwrap();
        let err = nested.finish().unwrap_err();
        assert_eq!(err.to_string(), "t: unknown option `nested.bad`");

        assert!(matches!(
            OptionReader::new("t", &json!([1])),
            Err(ConfigError::NotATable { .. })
        ));
    }

    #[test]
    fn test_reader_reports_bad_variant() {
        let v = json!({"color": "green"});
        let mut r = OptionReader::new("t", &v).unwrap();
        let err = r.parse::<Color>("color").unwrap_err();
        assert_eq!(err.to_string(), "t: invalid value for `color`: unknown color `green`");
    }

    #[test]
    fn test_raw_config_shapes() {
        let list = parse_config_list_json(
            r#"["spaces", {"name": "hyphens", "options": {"precedence": ["ascii"]}}, {"name": "radicals"}]"#,
        )
        .unwrap();
        assert_eq!(list[0], RawConfig::Name("spaces".into()));
        assert_eq!(list[1].name(), "hyphens");
        assert_eq!(list[1].options()["precedence"][0], "ascii");
        assert_eq!(list[2].options(), &Value::Null);
    }

    #[test]
    fn test_parse_toml_chain() {
        let toml = r#"
chain = [
    "spaces",
    { name = "hira-kata", options = { mode = "kata-to-hira" } },
]
"#;
        let list = parse_config_list_toml(toml).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].options()["mode"], "kata-to-hira");
        let resolved = resolve_all(&list).unwrap();
        assert_eq!(resolved[0], TransliteratorConfig::Simple(SimpleTable::Spaces));
        assert_eq!(resolved[1].name(), "hira-kata");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_config_list_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(parse_config_list_toml("chain = 1"), Err(ConfigError::Parse(_))));
        let err = resolve_all(&["no-such-thing".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown transliterator: no-such-thing");
    }

    #[test]
    fn test_same_name_ignores_options() {
        let a = TransliteratorConfig::Hyphens(HyphensOptions::default());
        let b = TransliteratorConfig::Hyphens(HyphensOptions {
            precedence: vec![crate::transliterators::HyphensVariant::Ascii],
        });
        assert!(a.same_name(&b));
        assert_ne!(a, b);
    }
}

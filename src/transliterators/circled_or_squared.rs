//! Circled and squared characters (①, Ⓐ, ㊀, 🅰, 🆘 ...) rendered through a
//! per-shape template.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::DataError;
use crate::char::CharStream;
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{map_units, Transliterator};

pub const NAME: &str = "circled-or-squared";

const RESOURCE: &str = "circled_or_squared.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CircledOrSquaredRecord {
    #[serde(rename = "char")]
    pub character: String,
    pub rendering: String,
    #[serde(rename = "type")]
    pub shape: Shape,
    #[serde(default)]
    pub emoji: bool,
}

#[derive(Deserialize)]
struct RecordsFile {
    records: Vec<CircledOrSquaredRecord>,
}

pub(crate) fn parse_records(toml_str: &str) -> Result<Vec<CircledOrSquaredRecord>, DataError> {
    let file: RecordsFile = toml::from_str(toml_str).map_err(|e| DataError::Parse {
        resource: RESOURCE,
        reason: e.to_string(),
    })?;
    if file.records.is_empty() {
        return Err(DataError::Empty { resource: RESOURCE });
    }
    Ok(file.records)
}

fn records() -> &'static [CircledOrSquaredRecord] {
    static RECORDS: OnceLock<Vec<CircledOrSquaredRecord>> = OnceLock::new();
    RECORDS.get_or_init(|| {
        let records = parse_records(include_str!("data/circled_or_squared.toml"))
            .unwrap_or_else(|e| panic!("embedded table must be valid: {e}"));
        debug!(resource = RESOURCE, entries = records.len(), "table loaded");
        records
    })
}

/// Output templates. `?` is replaced by the record's rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub circle: String,
    pub square: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            circle: "(?)".to_string(),
            square: "[?]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircledOrSquaredOptions {
    pub templates: Templates,
    /// Also rewrite characters with default emoji presentation (🆘, 🈁 ...).
    pub include_emojis: bool,
}

impl Default for CircledOrSquaredOptions {
    fn default() -> Self {
        Self {
            templates: Templates::default(),
            include_emojis: true,
        }
    }
}

impl CircledOrSquaredOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(mut t) = r.table("templates")? {
            if let Some(circle) = t.string("circle")? {
                out.templates.circle = circle.to_string();
            }
            if let Some(square) = t.string("square")? {
                out.templates.square = square.to_string();
            }
            t.finish()?;
        }
        if let Some(b) = r.bool("include_emojis")? {
            out.include_emojis = b;
        }
        r.finish()?;
        Ok(out)
    }
}

pub struct CircledOrSquaredTransliterator {
    rendered: HashMap<&'static str, String>,
}

impl CircledOrSquaredTransliterator {
    pub fn new(options: CircledOrSquaredOptions) -> Self {
        let rendered = records()
            .iter()
            .filter(|r| options.include_emojis || !r.emoji)
            .map(|r| {
                let template = match r.shape {
                    Shape::Circle => &options.templates.circle,
                    Shape::Square => &options.templates.square,
                };
                (r.character.as_str(), template.replace('?', &r.rendering))
            })
            .collect();
        Self { rendered }
    }
}

impl Transliterator for CircledOrSquaredTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        map_units(input, move |unit| {
            self.rendered
                .get(unit.text.as_ref())
                .map(|s| Cow::Owned(s.clone()))
        })
    }
}

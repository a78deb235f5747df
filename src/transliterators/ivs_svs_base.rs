//! Conversion between base ideographs and their IVS/SVS-decorated forms.
//!
//! The embedded resource holds one record per line with four tab-separated
//! fields: IVS, SVS, Unijis 90 base, Unijis 2004 base. An empty field means
//! absent. Supplementary-plane characters and variation selectors are stored
//! as private-use codepoints (see [`PUA_TABLE`]) to keep the file compact.

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
use crate::unicode::split_selector;

pub const NAME: &str = "ivs-svs-base";

const RESOURCE: &str = "ivs_svs_base.txt";

const PUA_START: u32 = 0xE000;

/// U+E000 + i in the resource stands for `PUA_TABLE[i]`.
const PUA_TABLE: [char; 25] = [
    '\u{2000B}',
    '\u{20089}',
    '\u{200A2}',
    '\u{200A4}',
    '\u{201A2}',
    '\u{20213}',
    '\u{2032B}',
    '\u{20B9F}',
    '\u{2A6B2}',
    '\u{31350}',
    '\u{E0100}',
    '\u{E0101}',
    '\u{E0102}',
    '\u{E0103}',
    '\u{E0104}',
    '\u{E0105}',
    '\u{E0106}',
    '\u{E0107}',
    '\u{E0108}',
    '\u{E0109}',
    '\u{E010A}',
    '\u{E010B}',
    '\u{E010C}',
    '\u{E010D}',
    '\u{E010E}',
];

/// Which base-character assignment to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    #[serde(rename = "unijis_90")]
    Unijis90,
    #[default]
    #[serde(rename = "unijis_2004")]
    Unijis2004,
}

impl Charset {
    pub fn as_str(self) -> &'static str {
        match self {
            Charset::Unijis90 => "unijis_90",
            Charset::Unijis2004 => "unijis_2004",
        }
    }

    fn index(self) -> usize {
        match self {
            Charset::Unijis90 => 0,
            Charset::Unijis2004 => 1,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "unijis_90" => Ok(Charset::Unijis90),
            "unijis_2004" => Ok(Charset::Unijis2004),
            _ => Err(format!("unknown charset `{s}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IvsSvsBaseMode {
    /// Decorate: base (or decorated) input → IVS, or SVS when preferred.
    #[default]
    IvsOrSvs,
    /// Strip: decorated input → base for the charset.
    Base,
}

impl FromStr for IvsSvsBaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "ivs-or-svs" => Ok(IvsSvsBaseMode::IvsOrSvs),
            "base" => Ok(IvsSvsBaseMode::Base),
            _ => Err(format!("unknown mode `{s}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvsSvsRecord {
    pub ivs: String,
    pub svs: Option<String>,
    pub base90: Option<String>,
    pub base2004: Option<String>,
}

impl IvsSvsRecord {
    pub fn base(&self, charset: Charset) -> Option<&str> {
        match charset {
            Charset::Unijis90 => self.base90.as_deref(),
            Charset::Unijis2004 => self.base2004.as_deref(),
        }
    }
}

fn decode_field(field: &str, line: usize) -> Result<Option<String>, DataError> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .chars()
        .map(|c| {
            let cp = c as u32;
            if !(PUA_START..=0xF8FF).contains(&cp) {
                return Ok(c);
            }
            PUA_TABLE
                .get((cp - PUA_START) as usize)
                .copied()
                .ok_or_else(|| DataError::Malformed {
                    resource: RESOURCE,
                    line,
                    reason: format!("unmapped private-use codepoint U+{cp:04X}"),
                })
        })
        .collect::<Result<String, _>>()
        .map(Some)
}

/// Parse the tab-separated record resource.
pub(crate) fn parse_records(text: &str) -> Result<Vec<IvsSvsRecord>, DataError> {
    let mut records = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        if raw.is_empty() {
            continue;
        }
        let fields: Vec<&str> = raw.split('\t').collect();
        let [ivs, svs, base90, base2004] = fields[..] else {
            return Err(DataError::Malformed {
                resource: RESOURCE,
                line,
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        };
        let ivs = decode_field(ivs, line)?.ok_or_else(|| DataError::Malformed {
            resource: RESOURCE,
            line,
            reason: "missing IVS".to_string(),
        })?;
        records.push(IvsSvsRecord {
            ivs,
            svs: decode_field(svs, line)?,
            base90: decode_field(base90, line)?,
            base2004: decode_field(base2004, line)?,
        });
    }
    if records.is_empty() {
        return Err(DataError::Empty { resource: RESOURCE });
    }
    Ok(records)
}

pub(crate) fn records() -> &'static [IvsSvsRecord] {
    static RECORDS: OnceLock<Vec<IvsSvsRecord>> = OnceLock::new();
    RECORDS.get_or_init(|| {
        let records = parse_records(include_str!("data/ivs_svs_base.txt"))
            .unwrap_or_else(|e| panic!("embedded table must be valid: {e}"));
        debug!(resource = RESOURCE, entries = records.len(), "table loaded");
        records
    })
}

/// Per-charset lookup tables over the shared records.
struct CharsetIndex {
    /// Base, IVS or SVS → record to decorate with. Bases are first-wins.
    decorate: HashMap<&'static str, &'static IvsSvsRecord>,
    /// IVS or SVS → base for this charset.
    strip: HashMap<&'static str, &'static str>,
}

impl CharsetIndex {
    fn build(charset: Charset) -> Self {
        let mut decorate = HashMap::new();
        let mut strip = HashMap::new();
        for record in records() {
            decorate.insert(record.ivs.as_str(), record);
            if let Some(svs) = &record.svs {
                decorate.insert(svs.as_str(), record);
            }
            if let Some(base) = record.base(charset) {
                decorate.entry(base).or_insert(record);
                strip.insert(record.ivs.as_str(), base);
                if let Some(svs) = &record.svs {
                    strip.insert(svs.as_str(), base);
                }
            }
        }
        Self { decorate, strip }
    }
}

fn index(charset: Charset) -> &'static CharsetIndex {
    static INDEXES: [OnceLock<CharsetIndex>; 2] = [OnceLock::new(), OnceLock::new()];
    INDEXES[charset.index()].get_or_init(|| CharsetIndex::build(charset))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IvsSvsBaseOptions {
    pub mode: IvsSvsBaseMode,
    /// In decorate mode, emit the SVS when a record has one.
    pub prefer_svs: bool,
    pub charset: Charset,
    /// In strip mode, remove a trailing selector even when the sequence is
    /// not in the table.
    pub drop_selectors_altogether: bool,
}

impl IvsSvsBaseOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(mode) = r.parse("mode")? {
            out.mode = mode;
        }
        if let Some(b) = r.bool("prefer_svs")? {
            out.prefer_svs = b;
        }
        if let Some(charset) = r.parse("charset")? {
            out.charset = charset;
        }
        if let Some(b) = r.bool("drop_selectors_altogether")? {
            out.drop_selectors_altogether = b;
        }
        r.finish()?;
        Ok(out)
    }
}

pub struct IvsSvsBaseTransliterator {
    options: IvsSvsBaseOptions,
    index: &'static CharsetIndex,
}

impl IvsSvsBaseTransliterator {
    pub fn new(options: IvsSvsBaseOptions) -> Self {
        Self {
            index: index(options.charset),
            options,
        }
    }

    fn decorate(&self, text: &str) -> Option<&'static str> {
        let record = *self.index.decorate.get(text)?;
        match &record.svs {
            Some(svs) if self.options.prefer_svs => Some(svs),
            _ => Some(&record.ivs),
        }
    }

    fn strip<'t>(&self, text: &'t str) -> Option<Cow<'t, str>> {
        if let Some(base) = self.index.strip.get(text) {
            return Some(Cow::Borrowed(*base));
        }
        if self.options.drop_selectors_altogether {
            return split_selector(text).map(|(base, _)| Cow::Borrowed(base));
        }
        None
    }

    /// Rewrite a single unit's text, or `None` when it stays unchanged.
    pub fn convert(&self, text: &str) -> Option<String> {
        let out = match self.options.mode {
            IvsSvsBaseMode::IvsOrSvs => self.decorate(text).map(Cow::Borrowed),
            IvsSvsBaseMode::Base => self.strip(text),
        }?;
        (out != text).then(|| out.into_owned())
    }
}

impl Transliterator for IvsSvsBaseTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        map_units(input, move |unit| self.convert(&unit.text).map(Cow::Owned))
    }
}

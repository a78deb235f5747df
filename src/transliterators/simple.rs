//! Table-driven transducers. Each unit's whole text is looked up; a miss
//! passes the unit through unchanged.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::debug;

use super::DataError;
use crate::char::CharStream;
use crate::transliterator::{map_units, Transliterator};

pub(crate) type Table = HashMap<String, String>;

#[derive(Deserialize)]
struct TableFile {
    mappings: HashMap<String, String>,
}

/// Parse a `[mappings]` TOML resource into a lookup table.
pub(crate) fn parse_table_toml(resource: &'static str, toml_str: &str) -> Result<Table, DataError> {
    let file: TableFile = toml::from_str(toml_str).map_err(|e| DataError::Parse {
        resource,
        reason: e.to_string(),
    })?;
    if file.mappings.is_empty() {
        return Err(DataError::Empty { resource });
    }
    Ok(file.mappings)
}

fn load_embedded(resource: &'static str, toml_str: &str) -> Table {
    let table = parse_table_toml(resource, toml_str)
        .unwrap_or_else(|e| panic!("embedded table must be valid: {e}"));
    debug!(resource, entries = table.len(), "table loaded");
    table
}

macro_rules! embedded_table {
    ($file:literal) => {{
        static TABLE: OnceLock<Table> = OnceLock::new();
        TABLE.get_or_init(|| load_embedded($file, include_str!(concat!("data/", $file))))
    }};
}

/// The plain substitution tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleTable {
    Spaces,
    Radicals,
    MathematicalAlphanumerics,
    IdeographicAnnotations,
    RomanNumerals,
    Combined,
    /// Keyed on IVS sequences; see `ivs_svs_base`.
    KanjiOldNew,
}

impl SimpleTable {
    pub const ALL: [SimpleTable; 7] = [
        SimpleTable::Spaces,
        SimpleTable::Radicals,
        SimpleTable::MathematicalAlphanumerics,
        SimpleTable::IdeographicAnnotations,
        SimpleTable::RomanNumerals,
        SimpleTable::Combined,
        SimpleTable::KanjiOldNew,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SimpleTable::Spaces => "spaces",
            SimpleTable::Radicals => "radicals",
            SimpleTable::MathematicalAlphanumerics => "mathematical-alphanumerics",
            SimpleTable::IdeographicAnnotations => "ideographic-annotations",
            SimpleTable::RomanNumerals => "roman-numerals",
            SimpleTable::Combined => "combined",
            SimpleTable::KanjiOldNew => "kanji-old-new",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub(crate) fn table(self) -> &'static Table {
        match self {
            SimpleTable::Spaces => embedded_table!("spaces.toml"),
            SimpleTable::Radicals => embedded_table!("radicals.toml"),
            SimpleTable::MathematicalAlphanumerics => {
                embedded_table!("mathematical_alphanumerics.toml")
            }
            SimpleTable::IdeographicAnnotations => embedded_table!("ideographic_annotations.toml"),
            SimpleTable::RomanNumerals => embedded_table!("roman_numerals.toml"),
            SimpleTable::Combined => embedded_table!("combined.toml"),
            SimpleTable::KanjiOldNew => embedded_table!("kanji_old_new.toml"),
        }
    }
}

pub struct SimpleTransliterator {
    kind: SimpleTable,
    table: &'static Table,
}

impl SimpleTransliterator {
    pub fn new(kind: SimpleTable) -> Self {
        Self {
            kind,
            table: kind.table(),
        }
    }

    pub fn kind(&self) -> SimpleTable {
        self.kind
    }
}

impl Transliterator for SimpleTransliterator {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        let table = self.table;
        map_units(input, move |unit| {
            table
                .get(unit.text.as_ref())
                .map(|s| Cow::Borrowed(s.as_str()))
        })
    }
}

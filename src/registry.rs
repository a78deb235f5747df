//! Name → transducer resolution.
//!
//! Built-in transducers are listed in a literal table. Additional names can
//! be registered at runtime through [`register`]; the extension table is
//! process-wide and meant to be filled once at startup, before any chain is
//! built from those names.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::config::{ConfigError, OptionReader, RawConfig, TransliteratorConfig};
use crate::transliterator::{Chain, FactoryError, Transliterator};
use crate::transliterators::{
    CircledOrSquaredOptions, CircledOrSquaredTransliterator, HiraKataCompositionOptions,
    HiraKataCompositionTransliterator, HiraKataOptions, HiraKataTransliterator, HyphensOptions,
    HyphensTransliterator, IvsSvsBaseOptions, IvsSvsBaseTransliterator,
    JapaneseIterationMarksOptions, JapaneseIterationMarksTransliterator, Jisx0201AndAlikeOptions,
    Jisx0201AndAlikeTransliterator, ProlongedSoundMarksOptions, ProlongedSoundMarksTransliterator,
    SimpleTable, SimpleTransliterator,
};

type Decoder = fn(&Value) -> Result<TransliteratorConfig, ConfigError>;

/// Constructor for a runtime-registered transducer.
pub type Constructor = fn(&Value) -> Result<Box<dyn Transliterator>, FactoryError>;

fn simple(kind: SimpleTable, options: &Value) -> Result<TransliteratorConfig, ConfigError> {
    OptionReader::new(kind.name(), options)?.finish()?;
    Ok(TransliteratorConfig::Simple(kind))
}

static BUILTINS: &[(&str, Decoder)] = &[
    ("spaces", |v| simple(SimpleTable::Spaces, v)),
    ("radicals", |v| simple(SimpleTable::Radicals, v)),
    ("mathematical-alphanumerics", |v| {
        simple(SimpleTable::MathematicalAlphanumerics, v)
    }),
    ("ideographic-annotations", |v| {
        simple(SimpleTable::IdeographicAnnotations, v)
    }),
    ("roman-numerals", |v| simple(SimpleTable::RomanNumerals, v)),
    ("combined", |v| simple(SimpleTable::Combined, v)),
    ("kanji-old-new", |v| simple(SimpleTable::KanjiOldNew, v)),
    ("circled-or-squared", |v| {
        CircledOrSquaredOptions::decode(v).map(TransliteratorConfig::CircledOrSquared)
    }),
    ("hyphens", |v| {
        HyphensOptions::decode(v).map(TransliteratorConfig::Hyphens)
    }),
    ("ivs-svs-base", |v| {
        IvsSvsBaseOptions::decode(v).map(TransliteratorConfig::IvsSvsBase)
    }),
    ("jisx0201-and-alike", |v| {
        Jisx0201AndAlikeOptions::decode(v).map(TransliteratorConfig::Jisx0201AndAlike)
    }),
    ("hira-kata", |v| {
        HiraKataOptions::decode(v).map(TransliteratorConfig::HiraKata)
    }),
    ("hira-kata-composition", |v| {
        HiraKataCompositionOptions::decode(v).map(TransliteratorConfig::HiraKataComposition)
    }),
    ("japanese-iteration-marks", |v| {
        JapaneseIterationMarksOptions::decode(v).map(TransliteratorConfig::JapaneseIterationMarks)
    }),
    ("prolonged-sound-marks", |v| {
        ProlongedSoundMarksOptions::decode(v).map(TransliteratorConfig::ProlongedSoundMarks)
    }),
];

fn extensions() -> &'static RwLock<HashMap<String, Constructor>> {
    static EXTENSIONS: OnceLock<RwLock<HashMap<String, Constructor>>> = OnceLock::new();
    EXTENSIONS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Names of the built-in transducers, in table order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Register an additional transducer under `name`.
///
/// Built-in names cannot be shadowed and a name can be registered once.
pub fn register(name: &str, constructor: Constructor) -> Result<(), FactoryError> {
    if builtin_names().any(|n| n == name) {
        return Err(FactoryError::AlreadyRegistered(name.to_string()));
    }
    let mut ext = extensions()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if ext.contains_key(name) {
        return Err(FactoryError::AlreadyRegistered(name.to_string()));
    }
    ext.insert(name.to_string(), constructor);
    debug!(name, "transliterator registered");
    Ok(())
}

fn registered(name: &str) -> Option<Constructor> {
    extensions()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
}

/// Decode `options` for the transducer called `name`.
pub fn decode(name: &str, options: &Value) -> Result<TransliteratorConfig, ConfigError> {
    if let Some((_, decoder)) = BUILTINS.iter().find(|(n, _)| *n == name) {
        return decoder(options);
    }
    if registered(name).is_some() {
        return Ok(TransliteratorConfig::Custom {
            name: name.to_string(),
            options: options.clone(),
        });
    }
    Err(ConfigError::UnknownTransliterator(name.to_string()))
}

/// Create a transducer by name with loosely-typed options.
pub fn create(name: &str, options: &Value) -> Result<Box<dyn Transliterator>, FactoryError> {
    create_from_config(&decode(name, options)?)
}

/// Instantiate a resolved config.
pub fn create_from_config(
    config: &TransliteratorConfig,
) -> Result<Box<dyn Transliterator>, FactoryError> {
    Ok(match config {
        TransliteratorConfig::Simple(kind) => Box::new(SimpleTransliterator::new(*kind)),
        TransliteratorConfig::CircledOrSquared(o) => {
            Box::new(CircledOrSquaredTransliterator::new(o.clone()))
        }
        TransliteratorConfig::Hyphens(o) => Box::new(HyphensTransliterator::new(o.clone())),
        TransliteratorConfig::IvsSvsBase(o) => Box::new(IvsSvsBaseTransliterator::new(o.clone())),
        TransliteratorConfig::Jisx0201AndAlike(o) => {
            Box::new(Jisx0201AndAlikeTransliterator::new(o.clone())?)
        }
        TransliteratorConfig::HiraKata(o) => Box::new(HiraKataTransliterator::new(o.clone())),
        TransliteratorConfig::HiraKataComposition(o) => {
            Box::new(HiraKataCompositionTransliterator::new(o.clone()))
        }
        TransliteratorConfig::JapaneseIterationMarks(o) => {
            Box::new(JapaneseIterationMarksTransliterator::new(o.clone()))
        }
        TransliteratorConfig::ProlongedSoundMarks(o) => {
            Box::new(ProlongedSoundMarksTransliterator::new(o.clone()))
        }
        TransliteratorConfig::Custom { name, options } => {
            let constructor = registered(name)
                .ok_or_else(|| ConfigError::UnknownTransliterator(name.clone()))?;
            constructor(options)?
        }
    })
}

/// Instantiate every config and link them into a chain. Nothing is built
/// if any config fails.
pub fn build_chain(configs: &[TransliteratorConfig]) -> Result<Chain, FactoryError> {
    if configs.is_empty() {
        return Err(FactoryError::EmptyChain);
    }
    let stages = configs
        .iter()
        .map(create_from_config)
        .collect::<Result<Vec<_>, _>>()?;
    Chain::new(stages)
}

/// Resolve and instantiate raw entries (bare names or name + options).
pub fn build_chain_from_raw(entries: &[RawConfig]) -> Result<Chain, FactoryError> {
    let configs = entries
        .iter()
        .map(RawConfig::resolve)
        .collect::<Result<Vec<_>, _>>()?;
    build_chain(&configs)
}

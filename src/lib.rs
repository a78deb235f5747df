//! Streaming normalizer for Japanese text.
//!
//! Text becomes a stream of [`char::CharUnit`]s, flows through a chain of
//! transducers, and is rendered back to a string. Chains are built from an
//! explicit config list ([`make_chain`]) or from a high-level
//! [`recipe::Recipe`] ([`make_transliterator`]).

pub mod char;
pub mod config;
pub mod explain;
pub mod recipe;
pub mod registry;
pub mod settings;
pub mod trace_init;
pub mod transliterator;
pub mod transliterators;
pub mod unicode;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, RawConfig, TransliteratorConfig};
pub use recipe::{build_config_list, Recipe, RecipeError};
pub use transliterator::{chain, Chain, FactoryError, Transliterator};

/// Errors from the top-level constructors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Recipe(#[from] RecipeError),
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// Compile `recipe` and build its chain.
///
/// A recipe with every toggle off yields an empty config list, which is
/// rejected like any other empty chain.
pub fn make_transliterator(recipe: &Recipe) -> Result<Chain, Error> {
    let configs = build_config_list(recipe)?;
    Ok(registry::build_chain(&configs)?)
}

/// Build a chain from config entries (bare names or name + options).
pub fn make_chain(entries: &[RawConfig]) -> Result<Chain, FactoryError> {
    registry::build_chain_from_raw(entries)
}

/// One-shot: compile `recipe` and normalize `text`.
pub fn transliterate(recipe: &Recipe, text: &str) -> Result<String, Error> {
    Ok(make_transliterator(recipe)?.transliterate_str(text))
}

/// Build the chain described by the process-wide settings: the explicit
/// `chain` when set, the recipe otherwise.
pub fn settings_chain() -> Result<Chain, Error> {
    let s = settings::settings();
    match &s.chain {
        Some(entries) => Ok(make_chain(entries)?),
        None => make_transliterator(&s.recipe),
    }
}

/// Normalize `text` with the process-wide settings.
pub fn transliterate_with_settings(text: &str) -> Result<String, Error> {
    Ok(settings_chain()?.transliterate_str(text))
}

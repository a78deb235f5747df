//! Built-in transducers.
//!
//! Context-free ones (`simple`, `circled_or_squared`, `hyphens`) rewrite
//! each unit on its own. The rest keep a bounded window of state: one unit
//! of lookahead (`hira_kata_composition`, `jisx0201_and_alike`), one unit of
//! lookback (`japanese_iteration_marks`) or one buffered run
//! (`prolonged_sound_marks`).

pub mod circled_or_squared;
pub mod hira_kata;
pub mod hira_kata_composition;
pub(crate) mod hira_kata_table;
pub mod hyphens;
pub mod ivs_svs_base;
pub mod japanese_iteration_marks;
pub mod jisx0201_and_alike;
pub mod prolonged_sound_marks;
pub mod simple;

pub use circled_or_squared::{CircledOrSquaredOptions, CircledOrSquaredTransliterator};
pub use hira_kata::{HiraKataMode, HiraKataOptions, HiraKataTransliterator};
pub use hira_kata_composition::{HiraKataCompositionOptions, HiraKataCompositionTransliterator};
pub use hyphens::{HyphensOptions, HyphensTransliterator, HyphensVariant};
pub use ivs_svs_base::{Charset, IvsSvsBaseMode, IvsSvsBaseOptions, IvsSvsBaseTransliterator};
pub use japanese_iteration_marks::{
    JapaneseIterationMarksOptions, JapaneseIterationMarksTransliterator,
};
pub use jisx0201_and_alike::{Jisx0201AndAlikeOptions, Jisx0201AndAlikeTransliterator};
pub use prolonged_sound_marks::{ProlongedSoundMarksOptions, ProlongedSoundMarksTransliterator};
pub use simple::{SimpleTable, SimpleTransliterator};

/// Malformed embedded data. Embedded resources are checked by tests and
/// `build.rs`, so this surfaces only when a resource is edited by hand.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("{resource}: TOML parse error: {reason}")]
    Parse {
        resource: &'static str,
        reason: String,
    },
    #[error("{resource}: table is empty")]
    Empty { resource: &'static str },
    #[error("{resource}: line {line}: {reason}")]
    Malformed {
        resource: &'static str,
        line: usize,
        reason: String,
    },
}

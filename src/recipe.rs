//! Recipe → config list compiler.
//!
//! A [`Recipe`] is a flat set of toggles. [`build_config_list`] expands it
//! into an ordered list of transducer configs, applying toggles in a fixed
//! order and bracketing IVS-keyed tables with `ivs-svs-base` on both sides.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::TransliteratorConfig;
use crate::transliterators::{
    Charset, CircledOrSquaredOptions, HiraKataCompositionOptions, HiraKataMode, HiraKataOptions,
    HyphensOptions, HyphensVariant, IvsSvsBaseMode, IvsSvsBaseOptions,
    JapaneseIterationMarksOptions, Jisx0201AndAlikeOptions, ProlongedSoundMarksOptions,
    SimpleTable,
};

/// One or more toggles in a recipe contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .violations.join("; "))]
pub struct RecipeError {
    pub violations: Vec<String>,
}

/// A toggle written either as a bare boolean or as a parameter table.
#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle<P> {
    Flag(bool),
    With(P),
}

impl<P: Default> Toggle<P> {
    fn into_params(self) -> Option<P> {
        match self {
            Toggle::Flag(false) => None,
            Toggle::Flag(true) => Some(P::default()),
            Toggle::With(p) => Some(p),
        }
    }
}

macro_rules! toggle_options {
    (
        $(#[$meta:meta])*
        $name:ident, $params:ident { $($field:ident: $ty:ty = $default:expr),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub enum $name {
            #[default]
            No,
            Yes { $($field: $ty),* },
        }

        #[derive(Deserialize)]
        #[serde(default, deny_unknown_fields)]
        struct $params {
            $($field: $ty),*
        }

        impl Default for $params {
            fn default() -> Self {
                Self { $($field: $default),* }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match Toggle::<$params>::deserialize(deserializer)?.into_params() {
                    None => $name::No,
                    Some($params { $($field),* }) => $name::Yes { $($field),* },
                })
            }
        }
    };
}

toggle_options!(
    /// Widen halfwidth text (`to_fullwidth = true` or
    /// `to_fullwidth = { u005c_as_yen_sign = true }`).
    ToFullwidthOptions,
    ToFullwidthParams { u005c_as_yen_sign: bool = false }
);

toggle_options!(
    /// Narrow fullwidth text; `hankaku_kana` also narrows katakana.
    ToHalfwidthOptions,
    ToHalfwidthParams { hankaku_kana: bool = false }
);

toggle_options!(
    RemoveIvsSvsOptions,
    RemoveIvsSvsParams { drop_all_selectors: bool = false }
);

toggle_options!(
    ReplaceCircledOrSquaredCharactersOptions,
    ReplaceCircledOrSquaredCharactersParams { exclude_emojis: bool = false }
);

toggle_options!(
    ReplaceHyphensOptions,
    ReplaceHyphensParams {
        precedence: Vec<HyphensVariant> =
            vec![HyphensVariant::Jisx0208_90Windows, HyphensVariant::Jisx0201]
    }
);

/// High-level normalization toggles. Every field defaults to off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Recipe {
    /// 舊字體 → 旧字体.
    pub kanji_old_new: bool,
    /// Hyphens after kana become prolonged sound marks, and prolonged
    /// sound marks after alphanumerics become hyphens.
    pub replace_suspicious_hyphens_to_prolonged_sound_marks: bool,
    pub replace_circled_or_squared_characters: ReplaceCircledOrSquaredCharactersOptions,
    pub replace_combined_characters: bool,
    pub replace_ideographic_annotations: bool,
    pub replace_radicals: bool,
    pub replace_spaces: bool,
    pub replace_hyphens: ReplaceHyphensOptions,
    pub replace_mathematical_alphanumerics: bool,
    pub replace_roman_numerals: bool,
    pub combine_decomposed_hiraganas_and_katakanas: bool,
    pub to_fullwidth: ToFullwidthOptions,
    pub hira_kata: Option<HiraKataMode>,
    /// 時々 → 時時, かゞ → かが.
    pub replace_japanese_iteration_marks: bool,
    pub to_halfwidth: ToHalfwidthOptions,
    pub remove_ivs_svs: RemoveIvsSvsOptions,
    /// Charset for the IVS/SVS bracket configs.
    pub charset: Charset,
}

impl Recipe {
    /// Every exclusivity rule this recipe violates.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let fullwidth = self.to_fullwidth != ToFullwidthOptions::No;
        let halfwidth = self.to_halfwidth != ToHalfwidthOptions::No;
        if fullwidth && halfwidth {
            violations.push("to_fullwidth: to_fullwidth and to_halfwidth are mutually exclusive".to_string());
            violations.push("to_halfwidth: to_halfwidth and to_fullwidth are mutually exclusive".to_string());
        }
        violations
    }
}

/// Two-list builder. Configs are identified by name; the final order is
/// head followed by tail.
#[derive(Debug, Default)]
pub struct ConfigListBuilder {
    head: Vec<TransliteratorConfig>,
    tail: Vec<TransliteratorConfig>,
}

/// Replace a same-named entry when `force_replace`, returning whether one
/// was found.
fn replace_existing(
    list: &mut [TransliteratorConfig],
    config: &TransliteratorConfig,
    force_replace: bool,
) -> bool {
    match list.iter_mut().find(|c| c.same_name(config)) {
        Some(existing) => {
            if force_replace {
                *existing = config.clone();
            }
            true
        }
        None => false,
    }
}

impl ConfigListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend to head unless a same-named config is already there.
    pub fn insert_head(&mut self, config: TransliteratorConfig, force_replace: bool) -> &mut Self {
        if !replace_existing(&mut self.head, &config, force_replace) {
            self.head.insert(0, config);
        }
        self
    }

    /// Prepend to tail unless a same-named config is already there.
    pub fn insert_middle(&mut self, config: TransliteratorConfig, force_replace: bool) -> &mut Self {
        if !replace_existing(&mut self.tail, &config, force_replace) {
            self.tail.insert(0, config);
        }
        self
    }

    /// Append to tail unless a same-named config is already there.
    pub fn insert_tail(&mut self, config: TransliteratorConfig, force_replace: bool) -> &mut Self {
        if !replace_existing(&mut self.tail, &config, force_replace) {
            self.tail.push(config);
        }
        self
    }

    pub fn build(self) -> Vec<TransliteratorConfig> {
        let mut configs = self.head;
        configs.extend(self.tail);
        configs
    }
}

fn composition() -> TransliteratorConfig {
    TransliteratorConfig::HiraKataComposition(HiraKataCompositionOptions {
        compose_non_combining_marks: true,
    })
}

/// Decorate at the head, strip at the tail.
fn bracket_ivs_svs(builder: &mut ConfigListBuilder, charset: Charset, drop_all_selectors: bool) {
    builder
        .insert_head(
            TransliteratorConfig::IvsSvsBase(IvsSvsBaseOptions {
                mode: IvsSvsBaseMode::IvsOrSvs,
                prefer_svs: false,
                charset,
                drop_selectors_altogether: false,
            }),
            true,
        )
        .insert_tail(
            TransliteratorConfig::IvsSvsBase(IvsSvsBaseOptions {
                mode: IvsSvsBaseMode::Base,
                prefer_svs: false,
                charset,
                drop_selectors_altogether: drop_all_selectors,
            }),
            true,
        );
}

/// Expand `recipe` into an ordered config list. All exclusivity violations
/// are reported together; nothing is built if there is any.
pub fn build_config_list(recipe: &Recipe) -> Result<Vec<TransliteratorConfig>, RecipeError> {
    let violations = recipe.violations();
    if !violations.is_empty() {
        return Err(RecipeError { violations });
    }

    let mut b = ConfigListBuilder::new();
    let simple = TransliteratorConfig::Simple;

    if recipe.kanji_old_new {
        bracket_ivs_svs(&mut b, recipe.charset, false);
        b.insert_middle(simple(SimpleTable::KanjiOldNew), false);
    }
    if recipe.replace_suspicious_hyphens_to_prolonged_sound_marks {
        b.insert_middle(
            TransliteratorConfig::ProlongedSoundMarks(ProlongedSoundMarksOptions {
                replace_prolonged_marks_following_alnums: true,
                ..Default::default()
            }),
            false,
        );
    }
    if let ReplaceCircledOrSquaredCharactersOptions::Yes { exclude_emojis } =
        &recipe.replace_circled_or_squared_characters
    {
        b.insert_middle(
            TransliteratorConfig::CircledOrSquared(CircledOrSquaredOptions {
                include_emojis: !exclude_emojis,
                ..Default::default()
            }),
            false,
        );
    }
    for (enabled, table) in [
        (recipe.replace_combined_characters, SimpleTable::Combined),
        (recipe.replace_ideographic_annotations, SimpleTable::IdeographicAnnotations),
        (recipe.replace_radicals, SimpleTable::Radicals),
        (recipe.replace_spaces, SimpleTable::Spaces),
    ] {
        if enabled {
            b.insert_middle(simple(table), false);
        }
    }
    if let ReplaceHyphensOptions::Yes { precedence } = &recipe.replace_hyphens {
        b.insert_middle(
            TransliteratorConfig::Hyphens(HyphensOptions {
                precedence: precedence.clone(),
            }),
            false,
        );
    }
    if recipe.replace_mathematical_alphanumerics {
        b.insert_middle(simple(SimpleTable::MathematicalAlphanumerics), false);
    }
    if recipe.replace_roman_numerals {
        b.insert_middle(simple(SimpleTable::RomanNumerals), false);
    }
    if recipe.combine_decomposed_hiraganas_and_katakanas {
        b.insert_head(composition(), false);
    }
    if let ToFullwidthOptions::Yes { u005c_as_yen_sign } = &recipe.to_fullwidth {
        b.insert_tail(
            TransliteratorConfig::Jisx0201AndAlike(Jisx0201AndAlikeOptions {
                fullwidth_to_halfwidth: false,
                convert_gl: true,
                convert_gr: true,
                u005c_as_yen_sign: Some(*u005c_as_yen_sign),
                ..Default::default()
            }),
            false,
        );
    }
    if let Some(mode) = recipe.hira_kata {
        b.insert_tail(
            TransliteratorConfig::HiraKata(HiraKataOptions { mode }),
            false,
        );
    }
    if recipe.replace_japanese_iteration_marks {
        b.insert_head(composition(), false);
        b.insert_middle(
            TransliteratorConfig::JapaneseIterationMarks(JapaneseIterationMarksOptions::default()),
            false,
        );
    }
    if let ToHalfwidthOptions::Yes { hankaku_kana } = &recipe.to_halfwidth {
        b.insert_tail(
            TransliteratorConfig::Jisx0201AndAlike(Jisx0201AndAlikeOptions {
                fullwidth_to_halfwidth: true,
                convert_gl: true,
                convert_gr: *hankaku_kana,
                ..Default::default()
            }),
            false,
        );
    }
    if let RemoveIvsSvsOptions::Yes { drop_all_selectors } = &recipe.remove_ivs_svs {
        bracket_ivs_svs(&mut b, recipe.charset, *drop_all_selectors);
    }

    let configs = b.build();
    debug!(
        config_count = configs.len(),
        configs = ?configs.iter().map(|c| c.name()).collect::<Vec<_>>(),
        "recipe compiled"
    );
    Ok(configs)
}

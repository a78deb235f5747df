//! Halfwidth (JIS X 0201) ↔ fullwidth conversion.
//!
//! Three ranges toggle independently: GL (ASCII letters, digits and
//! punctuation), GR (halfwidth katakana and its punctuation) and a small set
//! of look-alikes that are not true equivalents. Seven override flags pick a
//! meaning for the ambiguous legacy codepoints U+005C, U+007E and U+00A5.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::hira_kata_table::{
    HALFWIDTH_SEMIVOICED_MARK, HALFWIDTH_VOICED_MARK, KANA_TABLE, SMALL_KANA_TABLE,
};
use crate::char::{CharStream, CharUnit};
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{map_units, pair_units, PairRule, Transliterator};

pub const NAME: &str = "jisx0201-and-alike";

/// GR punctuation: (fullwidth, halfwidth).
const GR_PUNCTUATION: [(char, char); 8] = [
    ('\u{3002}', '\u{FF61}'),
    ('\u{300C}', '\u{FF62}'),
    ('\u{300D}', '\u{FF63}'),
    ('\u{3001}', '\u{FF64}'),
    ('\u{30FB}', '\u{FF65}'),
    ('\u{30FC}', '\u{FF70}'),
    ('\u{309B}', HALFWIDTH_VOICED_MARK),
    ('\u{309C}', HALFWIDTH_SEMIVOICED_MARK),
];

/// Combining marks only ever narrow; widening goes to U+309B / U+309C.
const GR_COMBINING_MARKS: [(char, char); 2] = [
    ('\u{3099}', HALFWIDTH_VOICED_MARK),
    ('\u{309A}', HALFWIDTH_SEMIVOICED_MARK),
];

/// Katakana-hiragana double hyphen, which merely resembles `=`.
const UNSAFE_SPECIALS: [(char, char); 1] = [('\u{30A0}', '\u{003D}')];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Override {
    U005cAsYenSign,
    U005cAsBackslash,
    U007eAsFullwidthTilde,
    U007eAsWaveDash,
    U007eAsOverline,
    U007eAsFullwidthMacron,
    U00a5AsYenSign,
}

impl Override {
    const ALL: [Override; 7] = [
        Override::U005cAsYenSign,
        Override::U005cAsBackslash,
        Override::U007eAsFullwidthTilde,
        Override::U007eAsWaveDash,
        Override::U007eAsOverline,
        Override::U007eAsFullwidthMacron,
        Override::U00a5AsYenSign,
    ];

    fn option_name(self) -> &'static str {
        match self {
            Override::U005cAsYenSign => "u005c_as_yen_sign",
            Override::U005cAsBackslash => "u005c_as_backslash",
            Override::U007eAsFullwidthTilde => "u007e_as_fullwidth_tilde",
            Override::U007eAsWaveDash => "u007e_as_wave_dash",
            Override::U007eAsOverline => "u007e_as_overline",
            Override::U007eAsFullwidthMacron => "u007e_as_fullwidth_macron",
            Override::U00a5AsYenSign => "u00a5_as_yen_sign",
        }
    }

    /// (fullwidth, halfwidth).
    fn pair(self) -> (char, char) {
        match self {
            Override::U005cAsYenSign => ('\u{FFE5}', '\u{005C}'),
            Override::U005cAsBackslash => ('\u{FF3C}', '\u{005C}'),
            Override::U007eAsFullwidthTilde => ('\u{FF5E}', '\u{007E}'),
            Override::U007eAsWaveDash => ('\u{301C}', '\u{007E}'),
            Override::U007eAsOverline => ('\u{203E}', '\u{007E}'),
            Override::U007eAsFullwidthMacron => ('\u{FFE3}', '\u{007E}'),
            Override::U00a5AsYenSign => ('\u{FFE5}', '\u{00A5}'),
        }
    }
}

/// Two enabled overrides rewrite the same input codepoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct OverrideConflict {
    pub input: char,
    pub options: Vec<&'static str>,
}

impl fmt::Display for OverrideConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflicting overrides for U+{:04X}: {}",
            u32::from(self.input),
            self.options.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jisx0201AndAlikeOptions {
    /// Direction: fullwidth → halfwidth when set, halfwidth → fullwidth otherwise.
    pub fullwidth_to_halfwidth: bool,
    pub convert_gl: bool,
    pub convert_gr: bool,
    /// Narrow hiragana as well (fullwidth → halfwidth only).
    pub convert_hiraganas: bool,
    /// Merge halfwidth kana + voiced mark into one fullwidth letter
    /// (halfwidth → fullwidth only).
    pub combine_voiced_sound_marks: bool,
    pub convert_unsafe_specials: Option<bool>,
    pub u005c_as_yen_sign: Option<bool>,
    pub u005c_as_backslash: Option<bool>,
    pub u007e_as_fullwidth_tilde: Option<bool>,
    pub u007e_as_wave_dash: Option<bool>,
    pub u007e_as_overline: Option<bool>,
    pub u007e_as_fullwidth_macron: Option<bool>,
    pub u00a5_as_yen_sign: Option<bool>,
}

impl Default for Jisx0201AndAlikeOptions {
    fn default() -> Self {
        Self {
            fullwidth_to_halfwidth: true,
            convert_gl: true,
            convert_gr: true,
            convert_hiraganas: false,
            combine_voiced_sound_marks: true,
            convert_unsafe_specials: None,
            u005c_as_yen_sign: None,
            u005c_as_backslash: None,
            u007e_as_fullwidth_tilde: None,
            u007e_as_wave_dash: None,
            u007e_as_overline: None,
            u007e_as_fullwidth_macron: None,
            u00a5_as_yen_sign: None,
        }
    }
}

impl Jisx0201AndAlikeOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        macro_rules! read_bool {
            ($($field:ident),* $(,)?) => {
                $(if let Some(b) = r.bool(stringify!($field))? {
                    out.$field = b;
                })*
            };
        }
        macro_rules! read_tristate {
            ($($field:ident),* $(,)?) => {
                $(out.$field = r.bool(stringify!($field))?;)*
            };
        }
        read_bool!(
            fullwidth_to_halfwidth,
            convert_gl,
            convert_gr,
            convert_hiraganas,
            combine_voiced_sound_marks,
        );
        read_tristate!(
            convert_unsafe_specials,
            u005c_as_yen_sign,
            u005c_as_backslash,
            u007e_as_fullwidth_tilde,
            u007e_as_wave_dash,
            u007e_as_overline,
            u007e_as_fullwidth_macron,
            u00a5_as_yen_sign,
        );
        r.finish()?;
        Ok(out)
    }

    fn explicit(&self, o: Override) -> Option<bool> {
        match o {
            Override::U005cAsYenSign => self.u005c_as_yen_sign,
            Override::U005cAsBackslash => self.u005c_as_backslash,
            Override::U007eAsFullwidthTilde => self.u007e_as_fullwidth_tilde,
            Override::U007eAsWaveDash => self.u007e_as_wave_dash,
            Override::U007eAsOverline => self.u007e_as_overline,
            Override::U007eAsFullwidthMacron => self.u007e_as_fullwidth_macron,
            Override::U00a5AsYenSign => self.u00a5_as_yen_sign,
        }
    }

    /// Effective value of an override once direction-dependent defaults
    /// are filled in.
    fn enabled(&self, o: Override) -> bool {
        if let Some(b) = self.explicit(o) {
            return b;
        }
        if self.fullwidth_to_halfwidth {
            match o {
                Override::U005cAsYenSign => self.u00a5_as_yen_sign.is_none(),
                Override::U007eAsFullwidthTilde | Override::U007eAsWaveDash => true,
                _ => false,
            }
        } else {
            match o {
                Override::U005cAsYenSign => self.u005c_as_backslash.is_none(),
                Override::U007eAsFullwidthTilde => {
                    self.u007e_as_wave_dash.is_none()
                        && self.u007e_as_overline.is_none()
                        && self.u007e_as_fullwidth_macron.is_none()
                }
                _ => false,
            }
        }
    }

    fn unsafe_specials(&self) -> bool {
        self.convert_unsafe_specials
            .unwrap_or(self.fullwidth_to_halfwidth)
    }

    /// Reject enabled overrides that rewrite the same input codepoint.
    fn check_overrides(&self) -> Result<Vec<Override>, OverrideConflict> {
        let enabled: Vec<Override> = Override::ALL
            .into_iter()
            .filter(|o| self.enabled(*o))
            .collect();
        let mut by_input: BTreeMap<char, Vec<&'static str>> = BTreeMap::new();
        for o in &enabled {
            let (fullwidth, halfwidth) = o.pair();
            let input = if self.fullwidth_to_halfwidth {
                fullwidth
            } else {
                halfwidth
            };
            by_input.entry(input).or_default().push(o.option_name());
        }
        match by_input.into_iter().find(|(_, names)| names.len() > 1) {
            Some((input, options)) => Err(OverrideConflict { input, options }),
            None => Ok(enabled),
        }
    }
}

/// Fullwidth ↔ halfwidth pairs enabled by a set of options, in
/// (fullwidth, halfwidth) orientation. Earlier pairs win on collisions.
fn enabled_pairs(
    options: &Jisx0201AndAlikeOptions,
    overrides: &[Override],
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut push = |fw: String, hw: String| pairs.push((fw, hw));
    if options.convert_gl {
        push('\u{3000}'.to_string(), ' '.to_string());
        for o in overrides {
            let (fw, hw) = o.pair();
            push(fw.to_string(), hw.to_string());
        }
        for cp in 0xFF01..=0xFF5D_u32 {
            if cp == 0xFF3C {
                continue;
            }
            if let (Some(fw), Some(hw)) = (char::from_u32(cp), char::from_u32(cp - 0xFEE0)) {
                push(fw.to_string(), hw.to_string());
            }
        }
    }
    if options.convert_gr {
        for (fw, hw) in GR_PUNCTUATION {
            push(fw.to_string(), hw.to_string());
        }
        for e in KANA_TABLE {
            let Some(hw) = e.halfwidth else { continue };
            push(e.katakana.to_string(), hw.to_string());
            if let Some(v) = e.katakana_voiced {
                push(v.to_string(), format!("{hw}{HALFWIDTH_VOICED_MARK}"));
            }
            if let Some(v) = e.katakana_semivoiced {
                push(v.to_string(), format!("{hw}{HALFWIDTH_SEMIVOICED_MARK}"));
            }
        }
        for (_, k, hw) in SMALL_KANA_TABLE {
            if let Some(hw) = hw {
                push(k.to_string(), hw.to_string());
            }
        }
    }
    if options.unsafe_specials() {
        for (fw, hw) in UNSAFE_SPECIALS {
            push(fw.to_string(), hw.to_string());
        }
    }
    pairs
}

/// Pairs that only apply when narrowing.
fn narrowing_only_pairs(options: &Jisx0201AndAlikeOptions) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if options.convert_gr {
        for (fw, hw) in GR_COMBINING_MARKS {
            pairs.push((fw.to_string(), hw.to_string()));
        }
        if options.convert_hiraganas {
            for e in KANA_TABLE {
                let Some(hw) = e.halfwidth else { continue };
                pairs.push((e.hiragana.to_string(), hw.to_string()));
                if let Some(v) = e.hiragana_voiced {
                    pairs.push((v.to_string(), format!("{hw}{HALFWIDTH_VOICED_MARK}")));
                }
                if let Some(v) = e.hiragana_semivoiced {
                    pairs.push((v.to_string(), format!("{hw}{HALFWIDTH_SEMIVOICED_MARK}")));
                }
            }
            for (h, _, hw) in SMALL_KANA_TABLE {
                if let Some(hw) = hw {
                    pairs.push((h.to_string(), hw.to_string()));
                }
            }
        }
    }
    pairs
}

pub struct Jisx0201AndAlikeTransliterator {
    fullwidth_to_halfwidth: bool,
    combine_voiced_sound_marks: bool,
    table: HashMap<String, String>,
    /// Halfwidth kana that may combine with a following voiced mark.
    combinable: HashSet<String>,
}

impl Jisx0201AndAlikeTransliterator {
    pub fn new(options: Jisx0201AndAlikeOptions) -> Result<Self, OverrideConflict> {
        let overrides = options.check_overrides()?;
        let mut table = HashMap::new();
        let mut combinable = HashSet::new();
        if options.fullwidth_to_halfwidth {
            let pairs = enabled_pairs(&options, &overrides)
                .into_iter()
                .chain(narrowing_only_pairs(&options));
            for (fw, hw) in pairs {
                table.entry(fw).or_insert(hw);
            }
        } else {
            for (fw, hw) in enabled_pairs(&options, &overrides) {
                let mut chars = hw.chars();
                if let (Some(base), Some(_mark)) = (chars.next(), chars.next()) {
                    combinable.insert(base.to_string());
                }
                table.entry(hw).or_insert(fw);
            }
        }
        debug!(
            fullwidth_to_halfwidth = options.fullwidth_to_halfwidth,
            entries = table.len(),
            overrides = ?overrides.iter().map(|o| o.option_name()).collect::<Vec<_>>(),
            "jisx0201 table built"
        );
        Ok(Self {
            fullwidth_to_halfwidth: options.fullwidth_to_halfwidth,
            combine_voiced_sound_marks: options.combine_voiced_sound_marks,
            table,
            combinable,
        })
    }

    fn lookup(&self, text: &str) -> Option<Cow<'static, str>> {
        self.table.get(text).map(|s| Cow::Owned(s.clone()))
    }
}

impl PairRule for Jisx0201AndAlikeTransliterator {
    fn holds(&self, unit: &CharUnit) -> bool {
        self.combine_voiced_sound_marks && self.combinable.contains(unit.text.as_ref())
    }

    fn combine(&self, first: &CharUnit, second: &CharUnit) -> Option<Cow<'static, str>> {
        let mut key = String::with_capacity(first.text.len() + second.text.len());
        key.push_str(&first.text);
        key.push_str(&second.text);
        self.lookup(&key)
    }

    fn single(&self, unit: &CharUnit) -> Option<Cow<'static, str>> {
        self.lookup(&unit.text)
    }
}

impl Transliterator for Jisx0201AndAlikeTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        if self.fullwidth_to_halfwidth {
            map_units(input, move |unit| self.lookup(&unit.text))
        } else {
            pair_units(input, self)
        }
    }
}

impl fmt::Debug for Jisx0201AndAlikeTransliterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jisx0201AndAlikeTransliterator")
            .field("fullwidth_to_halfwidth", &self.fullwidth_to_halfwidth)
            .field("entries", &self.table.len())
            .finish()
    }
}

//! Expands iteration marks (ゝ ゞ ヽ ヾ 々 and the vertical 〱 〲 〳 〴) into
//! a literal repeat of the preceding character.
//!
//! The preceding character is taken from this stage's own output, so a run
//! of marks expands left to right (かゝゝ → かかか).

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde_json::Value;

use super::hira_kata_table::{KANA_TABLE, SMALL_KANA_TABLE};
use crate::char::{CharStream, CharUnit};
use crate::config::{ConfigError, OptionReader};
use crate::transliterator::{map_units, Transliterator};
use crate::unicode::{is_kanji, single_char};

pub const NAME: &str = "japanese-iteration-marks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Script {
    Hiragana,
    Katakana,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterationMark {
    Kana { script: Script, voiced: bool },
    Kanji,
}

impl IterationMark {
    fn classify(c: char) -> Option<Self> {
        use Script::*;
        let kana = |script, voiced| Some(IterationMark::Kana { script, voiced });
        match c {
            '\u{309D}' | '\u{3031}' => kana(Hiragana, false),
            '\u{309E}' | '\u{3032}' => kana(Hiragana, true),
            '\u{30FD}' | '\u{3033}' => kana(Katakana, false),
            '\u{30FE}' | '\u{3034}' => kana(Katakana, true),
            '\u{3005}' => Some(IterationMark::Kanji),
            _ => None,
        }
    }
}

/// Kana classification for the preceding character.
struct KanaClasses {
    /// Plain letter → its voiced form, or `None` when it has none.
    plain: HashMap<char, (Script, Option<char>)>,
    voiced: HashSet<(Script, char)>,
}

/// Letters whose voiced form an iteration mark may produce. The table also
/// lists ゔ and ヷヸヹヺ, but a voiced mark never yields those.
fn iterable_voicing(base: char, voiced: Option<char>) -> Option<char> {
    match base {
        'う' | 'ワ' | 'ヰ' | 'ヱ' | 'ヲ' => None,
        _ => voiced,
    }
}

fn kana_classes() -> &'static KanaClasses {
    static CLASSES: OnceLock<KanaClasses> = OnceLock::new();
    CLASSES.get_or_init(|| {
        let mut plain = HashMap::new();
        let mut voiced = HashSet::new();
        for e in KANA_TABLE.iter().filter(|e| e.hiragana != 'ん') {
            let h = iterable_voicing(e.hiragana, e.hiragana_voiced);
            let k = iterable_voicing(e.katakana, e.katakana_voiced);
            plain.insert(e.hiragana, (Script::Hiragana, h));
            plain.insert(e.katakana, (Script::Katakana, k));
            voiced.extend(h.map(|v| (Script::Hiragana, v)));
            voiced.extend(k.map(|v| (Script::Katakana, v)));
        }
        // Small kana repeat but never voice; sokuon is excluded.
        for &(h, k, _) in SMALL_KANA_TABLE.iter().filter(|(h, _, _)| *h != 'っ') {
            plain.insert(h, (Script::Hiragana, None));
            plain.insert(k, (Script::Katakana, None));
        }
        KanaClasses { plain, voiced }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JapaneseIterationMarksOptions {
    /// Leave marks produced by an earlier stage as they are.
    pub skip_already_transliterated_chars: bool,
}

impl JapaneseIterationMarksOptions {
    pub fn decode(options: &Value) -> Result<Self, ConfigError> {
        let mut r = OptionReader::new(NAME, options)?;
        let mut out = Self::default();
        if let Some(b) = r.bool("skip_already_transliterated_chars")? {
            out.skip_already_transliterated_chars = b;
        }
        r.finish()?;
        Ok(out)
    }
}

pub struct JapaneseIterationMarksTransliterator {
    options: JapaneseIterationMarksOptions,
    classes: &'static KanaClasses,
}

impl JapaneseIterationMarksTransliterator {
    pub fn new(options: JapaneseIterationMarksOptions) -> Self {
        Self {
            options,
            classes: kana_classes(),
        }
    }

    /// What `mark` expands to after `prev`, if the pair is legal.
    fn expand(&self, mark: IterationMark, prev: &str) -> Option<String> {
        match mark {
            IterationMark::Kanji => {
                let first = prev.chars().next()?;
                is_kanji(first).then(|| prev.to_string())
            }
            IterationMark::Kana { script, voiced } => {
                let c = single_char(prev)?;
                if let Some(&(s, voiced_form)) = self.classes.plain.get(&c) {
                    if s != script {
                        return None;
                    }
                    let repeated = if voiced { voiced_form } else { Some(c) };
                    return repeated.map(String::from);
                }
                (voiced && self.classes.voiced.contains(&(script, c))).then(|| c.to_string())
            }
        }
    }

    fn rewrite(&self, unit: &CharUnit, prev: &mut Option<String>) -> Option<Cow<'static, str>> {
        let expanded = single_char(&unit.text)
            .and_then(IterationMark::classify)
            .filter(|_| {
                !(self.options.skip_already_transliterated_chars && unit.is_transliterated())
            })
            .and_then(|mark| self.expand(mark, prev.as_deref()?));
        *prev = Some(match &expanded {
            Some(text) => text.clone(),
            None => unit.text.to_string(),
        });
        expanded.map(Cow::Owned)
    }
}

impl Transliterator for JapaneseIterationMarksTransliterator {
    fn name(&self) -> &str {
        NAME
    }

    fn transliterate<'a>(&'a self, input: CharStream<'a>) -> CharStream<'a> {
        let mut prev: Option<String> = None;
        map_units(input, move |unit| self.rewrite(unit, &mut prev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char::{build_char_stream, render, Emitter};
    use serde_json::json;
    use std::rc::Rc;

    fn run(s: &str) -> String {
        JapaneseIterationMarksTransliterator::new(Default::default()).transliterate_str(s)
    }

    #[test]
    fn test_hiragana() {
        assert_eq!(run("かゝ"), "かか");
        assert_eq!(run("かゞ"), "かが");
        assert_eq!(run("がゞ"), "がが");
        assert_eq!(run("かゝゝ"), "かかか");
        assert_eq!(run("かゞゞ"), "かがが");
    }

    #[test]
    fn test_small_kana_repeat_without_voicing() {
        assert_eq!(run("ゃゝ"), "ゃゃ");
        assert_eq!(run("ァヽ"), "ァァ");
        assert_eq!(run("ゃゝァヽ"), "ゃゃァァ");
        assert_eq!(run("ゃゞ"), "ゃゞ");
        assert_eq!(run("ヵヾ"), "ヵヾ");
    }

    #[test]
    fn test_marks_chain_from_emitted_output() {
        assert_eq!(run("カヽヽ"), "カカカ");
        assert_eq!(run("カヽヾ"), "カカガ");
        assert_eq!(run("サヾヾ"), "サザザ");
        // The plain mark after a just-voiced repeat has a voiced predecessor.
        assert_eq!(run("サヾヽ"), "サザヽ");
        assert_eq!(run("ト〳〴"), "トトド");
    }

    #[test]
    fn test_illegal_contexts_are_unchanged() {
        // Voiced base with the plain mark.
        assert_eq!(run("がゝ"), "がゝ");
        // No voiced form exists.
        assert_eq!(run("あ〲"), "あ〲");
        // Hatsuon, sokuon and semi-voiced kana are not plain.
        assert_eq!(run("んゝっゝぱゞ"), "んゝっゝぱゞ");
        assert_eq!(run("ンヽッヽパヾ"), "ンヽッヽパヾ");
        // Voiced forms outside the k/s/t/h rows and ウ are not produced.
        assert_eq!(run("うゞゔゞ"), "うゞゔゞ");
        assert_eq!(run("ワヾヲヾヷヾ"), "ワヾヲヾヷヾ");
        // Script mismatch.
        assert_eq!(run("カゝかヽ"), "カゝかヽ");
        // Nothing precedes.
        assert_eq!(run("ゝ々"), "ゝ々");
    }

    #[test]
    fn test_katakana_and_vertical_forms() {
        assert_eq!(run("サヽ"), "ササ");
        assert_eq!(run("サヾ"), "サザ");
        assert_eq!(run("ウヾ"), "ウヴ");
        assert_eq!(run("か〱"), "かか");
        assert_eq!(run("は〲"), "はば");
        assert_eq!(run("ト〳ト〴"), "トトトド");
    }

    #[test]
    fn test_kanji() {
        assert_eq!(run("人々"), "人人");
        assert_eq!(run("時々刻々"), "時時刻刻");
        assert_eq!(run("あ々"), "あ々");
        assert_eq!(run("𠮟々"), "𠮟𠮟");
    }

    #[test]
    fn test_skip_already_transliterated() {
        let t = JapaneseIterationMarksTransliterator::new(JapaneseIterationMarksOptions {
            skip_already_transliterated_chars: true,
        });
        let units: Vec<_> = build_char_stream("か!").collect();
        let mut e = Emitter::new();
        let kept = e.pass(Rc::clone(&units[0]));
        let rewritten = e.emit("ゝ", &units[1]);
        let sentinel = e.pass(Rc::clone(&units[2]));
        let input: CharStream<'_> = Box::new(vec![kept, rewritten, sentinel].into_iter());
        assert_eq!(render(t.transliterate(input)), "かゝ");
        assert_eq!(t.transliterate_str("かゝ"), "かか");
    }

    #[test]
    fn test_decode() {
        let o = JapaneseIterationMarksOptions::decode(&json!({
            "skip_already_transliterated_chars": true
        }))
        .unwrap();
        assert!(o.skip_already_transliterated_chars);
    }
}

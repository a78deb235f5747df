//! Shared kana table: hiragana, katakana and halfwidth katakana forms of
//! every gojūon letter, with voiced and semi-voiced variants.
//!
//! `hira-kata`, `hira-kata-composition` and `jisx0201-and-alike` all derive
//! their lookup maps from these rows.

/// One letter in three scripts. Halfwidth voiced forms are the halfwidth
/// base followed by U+FF9E / U+FF9F and are derived, not stored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KanaEntry {
    pub hiragana: char,
    pub katakana: char,
    pub halfwidth: Option<char>,
    /// Voiced hiragana; `None` for katakana-only voiced letters (ヷヸヹヺ).
    pub hiragana_voiced: Option<char>,
    pub katakana_voiced: Option<char>,
    pub hiragana_semivoiced: Option<char>,
    pub katakana_semivoiced: Option<char>,
}

pub(crate) const HALFWIDTH_VOICED_MARK: char = '\u{FF9E}';
pub(crate) const HALFWIDTH_SEMIVOICED_MARK: char = '\u{FF9F}';

const fn plain(hiragana: char, katakana: char, halfwidth: Option<char>) -> KanaEntry {
    KanaEntry {
        hiragana,
        katakana,
        halfwidth,
        hiragana_voiced: None,
        katakana_voiced: None,
        hiragana_semivoiced: None,
        katakana_semivoiced: None,
    }
}

const fn voiced(h: char, k: char, hw: char, hv: char, kv: char) -> KanaEntry {
    let mut e = plain(h, k, Some(hw));
    e.hiragana_voiced = Some(hv);
    e.katakana_voiced = Some(kv);
    e
}

const fn semivoiced(h: char, k: char, hw: char, hv: char, kv: char, hs: char, ks: char) -> KanaEntry {
    let mut e = voiced(h, k, hw, hv, kv);
    e.hiragana_semivoiced = Some(hs);
    e.katakana_semivoiced = Some(ks);
    e
}

const fn katakana_voiced(h: char, k: char, hw: Option<char>, kv: char) -> KanaEntry {
    let mut e = plain(h, k, hw);
    e.katakana_voiced = Some(kv);
    e
}

pub(crate) static KANA_TABLE: &[KanaEntry] = &[
    plain('あ', 'ア', Some('ｱ')),
    plain('い', 'イ', Some('ｲ')),
    voiced('う', 'ウ', 'ｳ', 'ゔ', 'ヴ'),
    plain('え', 'エ', Some('ｴ')),
    plain('お', 'オ', Some('ｵ')),
    voiced('か', 'カ', 'ｶ', 'が', 'ガ'),
    voiced('き', 'キ', 'ｷ', 'ぎ', 'ギ'),
    voiced('く', 'ク', 'ｸ', 'ぐ', 'グ'),
    voiced('け', 'ケ', 'ｹ', 'げ', 'ゲ'),
    voiced('こ', 'コ', 'ｺ', 'ご', 'ゴ'),
    voiced('さ', 'サ', 'ｻ', 'ざ', 'ザ'),
    voiced('し', 'シ', 'ｼ', 'じ', 'ジ'),
    voiced('す', 'ス', 'ｽ', 'ず', 'ズ'),
    voiced('せ', 'セ', 'ｾ', 'ぜ', 'ゼ'),
    voiced('そ', 'ソ', 'ｿ', 'ぞ', 'ゾ'),
    voiced('た', 'タ', 'ﾀ', 'だ', 'ダ'),
    voiced('ち', 'チ', 'ﾁ', 'ぢ', 'ヂ'),
    voiced('つ', 'ツ', 'ﾂ', 'づ', 'ヅ'),
    voiced('て', 'テ', 'ﾃ', 'で', 'デ'),
    voiced('と', 'ト', 'ﾄ', 'ど', 'ド'),
    plain('な', 'ナ', Some('ﾅ')),
    plain('に', 'ニ', Some('ﾆ')),
    plain('ぬ', 'ヌ', Some('ﾇ')),
    plain('ね', 'ネ', Some('ﾈ')),
    plain('の', 'ノ', Some('ﾉ')),
    semivoiced('は', 'ハ', 'ﾊ', 'ば', 'バ', 'ぱ', 'パ'),
    semivoiced('ひ', 'ヒ', 'ﾋ', 'び', 'ビ', 'ぴ', 'ピ'),
    semivoiced('ふ', 'フ', 'ﾌ', 'ぶ', 'ブ', 'ぷ', 'プ'),
    semivoiced('へ', 'ヘ', 'ﾍ', 'べ', 'ベ', 'ぺ', 'ペ'),
    semivoiced('ほ', 'ホ', 'ﾎ', 'ぼ', 'ボ', 'ぽ', 'ポ'),
    plain('ま', 'マ', Some('ﾏ')),
    plain('み', 'ミ', Some('ﾐ')),
    plain('む', 'ム', Some('ﾑ')),
    plain('め', 'メ', Some('ﾒ')),
    plain('も', 'モ', Some('ﾓ')),
    plain('や', 'ヤ', Some('ﾔ')),
    plain('ゆ', 'ユ', Some('ﾕ')),
    plain('よ', 'ヨ', Some('ﾖ')),
    plain('ら', 'ラ', Some('ﾗ')),
    plain('り', 'リ', Some('ﾘ')),
    plain('る', 'ル', Some('ﾙ')),
    plain('れ', 'レ', Some('ﾚ')),
    plain('ろ', 'ロ', Some('ﾛ')),
    katakana_voiced('わ', 'ワ', Some('ﾜ'), 'ヷ'),
    katakana_voiced('ゐ', 'ヰ', None, 'ヸ'),
    katakana_voiced('ゑ', 'ヱ', None, 'ヹ'),
    katakana_voiced('を', 'ヲ', Some('ｦ'), 'ヺ'),
    plain('ん', 'ン', Some('ﾝ')),
];

/// Small kana: (hiragana, katakana, halfwidth).
pub(crate) static SMALL_KANA_TABLE: &[(char, char, Option<char>)] = &[
    ('ぁ', 'ァ', Some('ｧ')),
    ('ぃ', 'ィ', Some('ｨ')),
    ('ぅ', 'ゥ', Some('ｩ')),
    ('ぇ', 'ェ', Some('ｪ')),
    ('ぉ', 'ォ', Some('ｫ')),
    ('っ', 'ッ', Some('ｯ')),
    ('ゃ', 'ャ', Some('ｬ')),
    ('ゅ', 'ュ', Some('ｭ')),
    ('ょ', 'ョ', Some('ｮ')),
    ('ゎ', 'ヮ', None),
    ('ゕ', 'ヵ', None),
    ('ゖ', 'ヶ', None),
];

/// Voiced pairs (base, voiced) over both scripts, including the kana
/// iteration marks and their vertical forms.
pub(crate) fn voiced_pairs() -> impl Iterator<Item = (char, char)> {
    KANA_TABLE
        .iter()
        .flat_map(|e| {
            [
                e.hiragana_voiced.map(|v| (e.hiragana, v)),
                e.katakana_voiced.map(|v| (e.katakana, v)),
            ]
        })
        .flatten()
        .chain([('ゝ', 'ゞ'), ('ヽ', 'ヾ'), ('〱', '〲'), ('〳', '〴')])
}

/// Semi-voiced pairs (base, semi-voiced) over both scripts.
pub(crate) fn semivoiced_pairs() -> impl Iterator<Item = (char, char)> {
    KANA_TABLE
        .iter()
        .flat_map(|e| {
            [
                e.hiragana_semivoiced.map(|v| (e.hiragana, v)),
                e.katakana_semivoiced.map(|v| (e.katakana, v)),
            ]
        })
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hiragana_katakana_offset() {
        // The two blocks are parallel except for katakana-only letters.
        for e in KANA_TABLE {
            assert_eq!(e.katakana as u32 - e.hiragana as u32, 0x60, "{}", e.hiragana);
        }
        for (h, k, _) in SMALL_KANA_TABLE {
            assert_eq!(*k as u32 - *h as u32, 0x60, "{h}");
        }
    }

    #[test]
    fn test_no_duplicate_letters() {
        let mut seen = HashSet::new();
        for e in KANA_TABLE {
            assert!(seen.insert(e.hiragana));
            assert!(seen.insert(e.katakana));
        }
    }

    #[test]
    fn test_pairs() {
        let voiced: Vec<_> = voiced_pairs().collect();
        assert!(voiced.contains(&('か', 'が')));
        assert!(voiced.contains(&('ワ', 'ヷ')));
        assert!(voiced.contains(&('〳', '〴')));
        assert!(!voiced.iter().any(|(b, _)| *b == 'わ'));
        let semi: Vec<_> = semivoiced_pairs().collect();
        assert_eq!(semi.len(), 10);
    }
}

//! Character-level Unicode classification for Japanese text.

/// Check the full Hiragana block (U+3040..U+309F). Includes the combining
/// and spacing voicing marks and the iteration marks ゝ/ゞ.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Halfwidth katakana and halfwidth CJK punctuation (U+FF61..U+FF9F).
pub fn is_halfwidth_katakana(c: char) -> bool {
    ('\u{FF61}'..='\u{FF9F}').contains(&c)
}

/// CJK unified ideographs (BMP, extensions A through F) and the
/// compatibility ideograph blocks.
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || ('\u{2A700}'..='\u{2EBEF}').contains(&c)
        || ('\u{2F800}'..='\u{2FA1F}').contains(&c)
}

/// SVS selectors (U+FE00..U+FE0F) and IVS selectors (U+E0100..U+E01EF).
pub fn is_variation_selector(c: char) -> bool {
    ('\u{FE00}'..='\u{FE0F}').contains(&c) || ('\u{E0100}'..='\u{E01EF}').contains(&c)
}

/// Rendered width of `s` in UTF-16 code units. This is the unit every
/// `CharUnit` offset is measured in.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Split a unit's text into its base codepoint and trailing variation
/// selector, if the text is exactly two codepoints ending in one.
pub fn split_selector(s: &str) -> Option<(&str, char)> {
    let mut it = s.char_indices();
    it.next()?;
    let (idx, sel) = it.next()?;
    if it.next().is_some() || !is_variation_selector(sel) {
        return None;
    }
    Some((&s[..idx], sel))
}

/// Return the only codepoint of `s`, or `None` if `s` is empty or holds
/// more than one codepoint.
pub fn single_char(s: &str) -> Option<char> {
    let mut it = s.chars();
    let c = it.next()?;
    if it.next().is_some() {
        None
    } else {
        Some(c)
    }
}

//! Recipe-built chains applied to text.

use crate::recipe::{
    Recipe, ReplaceCircledOrSquaredCharactersOptions, ToFullwidthOptions, ToHalfwidthOptions,
};
use crate::transliterators::HiraKataMode;
use crate::{make_chain, make_transliterator, transliterate, Error, FactoryError};

#[test]
fn exclusive_width_toggles_fail_before_construction() {
    let recipe = Recipe {
        to_fullwidth: ToFullwidthOptions::Yes {
            u005c_as_yen_sign: false,
        },
        to_halfwidth: ToHalfwidthOptions::Yes { hankaku_kana: true },
        ..Default::default()
    };
    let err = make_transliterator(&recipe).unwrap_err();
    let Error::Recipe(e) = &err else {
        panic!("expected a recipe error, got {err:?}");
    };
    assert_eq!(e.violations.len(), 2);
    let message = err.to_string();
    assert!(message.contains("to_fullwidth"));
    assert!(message.contains("to_halfwidth"));
}

#[test]
fn empty_recipe_is_an_empty_chain() {
    assert!(matches!(
        make_transliterator(&Recipe::default()),
        Err(Error::Factory(FactoryError::EmptyChain))
    ));
}

#[test]
fn old_kanji_are_modernized_through_the_ivs_bracket() {
    let recipe = Recipe {
        kanji_old_new: true,
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "亞惡").unwrap(), "亜悪");
    assert_eq!(transliterate(&recipe, "abc").unwrap(), "abc");
}

#[test]
fn to_halfwidth_with_hankaku_kana() {
    let recipe = Recipe {
        to_halfwidth: ToHalfwidthOptions::Yes { hankaku_kana: true },
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "ＡＢＣ\u{3000}ガ").unwrap(), "ABC ｶﾞ");

    let recipe = Recipe {
        to_halfwidth: ToHalfwidthOptions::Yes {
            hankaku_kana: false,
        },
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "ＡＢＣガ").unwrap(), "ABCガ");
}

#[test]
fn to_fullwidth_combines_voiced_marks() {
    let recipe = Recipe {
        to_fullwidth: ToFullwidthOptions::Yes {
            u005c_as_yen_sign: false,
        },
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "ｶﾞABC").unwrap(), "ガＡＢＣ");
}

#[test]
fn decomposed_kana_and_script_conversion() {
    let recipe = Recipe {
        combine_decomposed_hiraganas_and_katakanas: true,
        hira_kata: Some(HiraKataMode::HiraToKata),
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "か\u{3099}き\u{309B}").unwrap(), "ガギ");
}

#[test]
fn iteration_marks_after_composition() {
    let recipe = Recipe {
        replace_japanese_iteration_marks: true,
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "時々").unwrap(), "時時");
    assert_eq!(transliterate(&recipe, "こゝろ").unwrap(), "こころ");
}

#[test]
fn suspicious_hyphens() {
    let recipe = Recipe {
        replace_suspicious_hyphens_to_prolonged_sound_marks: true,
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "カ-ド").unwrap(), "カード");
    assert_eq!(transliterate(&recipe, "ABCー").unwrap(), "ABC-");
}

#[test]
fn circled_without_emojis() {
    let recipe = Recipe {
        replace_circled_or_squared_characters: ReplaceCircledOrSquaredCharactersOptions::Yes {
            exclude_emojis: true,
        },
        replace_spaces: true,
        ..Default::default()
    };
    assert_eq!(transliterate(&recipe, "①\u{3000}🆘").unwrap(), "(1) 🆘");
}

#[test]
fn recipe_from_toml() {
    let recipe: Recipe = toml::from_str(
        r#"
replace_spaces = true
hira_kata = "kata-to-hira"
"#,
    )
    .unwrap();
    assert_eq!(transliterate(&recipe, "カナ\u{3000}").unwrap(), "かな ");
}

#[test]
fn explicit_chain() {
    let chain = make_chain(&crate::config::parse_config_list_json(
        r#"[{"name": "hira-kata", "options": {"mode": "kata-to-hira"}}, "spaces"]"#,
    )
    .unwrap())
    .unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(
        crate::Transliterator::transliterate_str(&chain, "カ\u{3000}"),
        "か "
    );
}

#[test]
fn default_settings_chain() {
    assert_eq!(
        crate::transliterate_with_settings("か\u{3099}\u{3000}①").unwrap(),
        "が (1)"
    );
}

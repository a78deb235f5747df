use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kana_norm::recipe::{Recipe, ReplaceHyphensOptions, ToHalfwidthOptions};
use kana_norm::registry::create;
use kana_norm::transliterators::HyphensVariant;
use kana_norm::{make_transliterator, Transliterator};

const INPUTS: &[(&str, &str)] = &[
    ("short", "ｶﾞｯｺｳ　①"),
    (
        "mixed",
        "東京都千代田区１－２－３　ＡＢＣビル５Ｆ（受付）ｶﾀｶﾅﾃｷｽﾄ、か\u{3099}っこう、時々",
    ),
    (
        "long",
        "日本語のテキスト正規化は、全角英数字ＡＢＣ１２３や半角ｶﾀｶﾅ、\
         旧字體の亞や惡、丸数字①②③、ハイフン‐－ー、合字㍻などを扱う。\
         こゝろ、人々、カ-ド、ABCー、\u{3000}空白\u{00A0}も含む。",
    ),
];

fn full_recipe() -> Recipe {
    Recipe {
        kanji_old_new: true,
        replace_suspicious_hyphens_to_prolonged_sound_marks: true,
        replace_combined_characters: true,
        replace_spaces: true,
        replace_hyphens: ReplaceHyphensOptions::Yes {
            precedence: vec![HyphensVariant::Jisx0208_90],
        },
        combine_decomposed_hiraganas_and_katakanas: true,
        replace_japanese_iteration_marks: true,
        to_halfwidth: ToHalfwidthOptions::Yes { hankaku_kana: true },
        ..Default::default()
    }
}

fn bench_recipe(c: &mut Criterion) {
    let chain = make_transliterator(&full_recipe()).unwrap();
    let mut group = c.benchmark_group("transliterate/recipe");
    for &(label, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| chain.transliterate_str(text));
        });
    }
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let (_, text) = INPUTS[2];
    let mut group = c.benchmark_group("transliterate/stage");
    for name in kana_norm::registry::builtin_names() {
        let t = create(name, &serde_json::Value::Null).unwrap();
        group.bench_function(name, |b| b.iter(|| t.transliterate_str(text)));
    }
    group.finish();
}

criterion_group!(benches, bench_recipe, bench_stages);
criterion_main!(benches);

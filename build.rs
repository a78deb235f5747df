fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    for (path, content) in [
        (
            "src/transliterators/data/spaces.toml",
            include_str!("src/transliterators/data/spaces.toml"),
        ),
        (
            "src/transliterators/data/radicals.toml",
            include_str!("src/transliterators/data/radicals.toml"),
        ),
        (
            "src/transliterators/data/mathematical_alphanumerics.toml",
            include_str!("src/transliterators/data/mathematical_alphanumerics.toml"),
        ),
        (
            "src/transliterators/data/ideographic_annotations.toml",
            include_str!("src/transliterators/data/ideographic_annotations.toml"),
        ),
        (
            "src/transliterators/data/roman_numerals.toml",
            include_str!("src/transliterators/data/roman_numerals.toml"),
        ),
        (
            "src/transliterators/data/combined.toml",
            include_str!("src/transliterators/data/combined.toml"),
        ),
        (
            "src/transliterators/data/kanji_old_new.toml",
            include_str!("src/transliterators/data/kanji_old_new.toml"),
        ),
        (
            "src/transliterators/data/circled_or_squared.toml",
            include_str!("src/transliterators/data/circled_or_squared.toml"),
        ),
        (
            "src/transliterators/data/hyphens.toml",
            include_str!("src/transliterators/data/hyphens.toml"),
        ),
    ] {
        validate_toml(path, content);
    }
    validate_tsv(
        "src/transliterators/data/ivs_svs_base.txt",
        include_str!("src/transliterators/data/ivs_svs_base.txt"),
        4,
    );
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}

fn validate_tsv(path: &str, content: &str, fields: usize) {
    for (i, line) in content.lines().enumerate() {
        if !line.is_empty() && line.split('\t').count() != fields {
            panic!("{path}:{}: expected {fields} tab-separated fields", i + 1);
        }
    }
}

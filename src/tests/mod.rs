mod recipes;

use std::rc::Rc;

use crate::char::{build_char_stream, CharUnit};
use crate::transliterator::Transliterator;

/// Run `t` over `text` and collect every unit, sentinel included.
pub(super) fn run_units(t: &dyn Transliterator, text: &str) -> Vec<Rc<CharUnit>> {
    t.transliterate(build_char_stream(text)).collect()
}

pub(super) fn run_named(name: &str, options: serde_json::Value, text: &str) -> String {
    crate::registry::create(name, &options)
        .unwrap()
        .transliterate_str(text)
}

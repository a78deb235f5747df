//! Stage-by-stage diagnostics for a chain.

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::char::{build_char_stream, render, CharStream, CharUnit};
use crate::transliterator::{Chain, Transliterator};

/// Full diagnostic result for one input string.
#[derive(Debug, Serialize)]
pub struct Explanation {
    pub input: String,
    pub stages: Vec<ExplainStage>,
    pub output: String,
}

/// One stage's output and the units it rewrote.
#[derive(Debug, Serialize)]
pub struct ExplainStage {
    pub name: String,
    pub output: String,
    pub rewrites: Vec<ExplainRewrite>,
}

/// A unit whose text was changed by this stage.
#[derive(Debug, Serialize)]
pub struct ExplainRewrite {
    /// Offset in this stage's output (UTF-16 code units).
    pub offset: usize,
    pub from: String,
    pub to: String,
}

/// Units this stage produced itself (not forwarded from upstream) whose
/// text differs from the unit they came from.
fn rewrites(input: &[Rc<CharUnit>], output: &[Rc<CharUnit>]) -> Vec<ExplainRewrite> {
    let forwarded: HashSet<*const CharUnit> = input.iter().map(Rc::as_ptr).collect();
    output
        .iter()
        .filter(|u| !forwarded.contains(&Rc::as_ptr(u)))
        .filter_map(|u| {
            let source = u.source.as_deref()?;
            (source.text != u.text).then(|| ExplainRewrite {
                offset: u.offset,
                from: source.text.to_string(),
                to: u.text.to_string(),
            })
        })
        .collect()
}

/// Run `chain` over `text`, materializing every intermediate stream.
pub fn explain(chain: &Chain, text: &str) -> Explanation {
    let mut units: Vec<Rc<CharUnit>> = build_char_stream(text).collect();
    let mut stages = Vec::with_capacity(chain.len());
    for stage in chain.stages() {
        let input: CharStream<'_> = Box::new(units.clone().into_iter());
        let output: Vec<Rc<CharUnit>> = stage.transliterate(input).collect();
        stages.push(ExplainStage {
            name: stage.name().to_string(),
            output: render(output.iter().cloned()),
            rewrites: rewrites(&units, &output),
        });
        units = output;
    }
    Explanation {
        input: text.to_string(),
        output: render(units),
        stages,
    }
}

/// Convenience for callers holding only a `dyn Transliterator`.
pub fn explain_single(stage: &dyn Transliterator, text: &str) -> ExplainStage {
    let input: Vec<Rc<CharUnit>> = build_char_stream(text).collect();
    let output: Vec<Rc<CharUnit>> = stage
        .transliterate(Box::new(input.clone().into_iter()))
        .collect();
    ExplainStage {
        name: stage.name().to_string(),
        output: render(output.iter().cloned()),
        rewrites: rewrites(&input, &output),
    }
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{}{}", s, " ".repeat(width - w))
    } else {
        s.to_string()
    }
}

/// Format an explanation as human-readable text.
pub fn format_text(result: &Explanation) -> String {
    let mut out = String::new();
    let name_width = result
        .stages
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("input".len());

    out.push_str(&format!("{}  {}\n", pad("input", name_width), result.input));
    for stage in &result.stages {
        let marker = if stage.rewrites.is_empty() { ' ' } else { '*' };
        out.push_str(&format!(
            "{}{} {}\n",
            pad(&stage.name, name_width),
            marker,
            stage.output
        ));
        for r in &stage.rewrites {
            out.push_str(&format!(
                "{}    @{:<4} {} -> {}\n",
                " ".repeat(name_width),
                r.offset,
                pad(&r.from, 4),
                r.to,
            ));
        }
    }
    out.push_str(&format!("{}  {}\n", pad("output", name_width), result.output));
    out
}

/// Format an explanation as pretty-printed JSON.
pub fn format_json(result: &Explanation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_chain_from_raw;
    use crate::transliterators::{HiraKataOptions, HiraKataTransliterator};

    #[test]
    fn test_explain_records_each_stage() {
        let chain = build_chain_from_raw(&[
            "hira-kata-composition".into(),
            "hira-kata".into(),
            "spaces".into(),
        ])
        .unwrap();
        let result = explain(&chain, "か\u{3099}\u{3000}x");
        assert_eq!(result.stages.len(), 3);
        assert_eq!(result.stages[0].output, "が\u{3000}x");
        assert_eq!(result.stages[1].output, "ガ\u{3000}x");
        assert_eq!(result.output, "ガ x");

        let composed = &result.stages[0].rewrites;
        assert_eq!(composed.len(), 1);
        assert_eq!((composed[0].from.as_str(), composed[0].to.as_str()), ("か", "が"));

        let spaces = &result.stages[2].rewrites;
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].offset, 1);
    }

    #[test]
    fn test_forwarded_rewrites_are_not_repeated() {
        let chain = build_chain_from_raw(&["hira-kata".into(), "spaces".into()]).unwrap();
        let result = explain(&chain, "か");
        assert_eq!(result.stages[0].rewrites.len(), 1);
        assert!(result.stages[1].rewrites.is_empty());
    }

    #[test]
    fn test_explain_empty_input() {
        let chain = build_chain_from_raw(&["spaces".into()]).unwrap();
        let result = explain(&chain, "");
        assert_eq!(result.output, "");
        assert!(result.stages[0].rewrites.is_empty());
    }

    #[test]
    fn test_explain_single() {
        let t = HiraKataTransliterator::new(HiraKataOptions::default());
        let stage = explain_single(&t, "あa");
        assert_eq!(stage.name, "hira-kata");
        assert_eq!(stage.output, "アa");
        assert_eq!(stage.rewrites.len(), 1);
    }

    #[test]
    fn test_formatters() {
        let chain = build_chain_from_raw(&["hira-kata".into()]).unwrap();
        let result = explain(&chain, "かな");
        let text = format_text(&result);
        assert!(text.contains("hira-kata*"));
        assert!(text.contains("か"));
        assert!(text.lines().last().unwrap().ends_with("カナ"));

        let json = format_json(&result).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["output"], "カナ");
        assert_eq!(v["stages"][0]["rewrites"][1]["to"], "ナ");
    }
}

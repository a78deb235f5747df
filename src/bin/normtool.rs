use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use kana_norm::explain;
use kana_norm::recipe::Recipe;
use kana_norm::{registry, settings, trace_init, Chain, RawConfig, Transliterator};

#[derive(Parser)]
#[command(name = "normtool", about = "Normalize Japanese text")]
struct Cli {
    /// Text to normalize (reads stdin when omitted)
    #[arg(long)]
    text: Option<String>,
    /// Recipe TOML file
    #[arg(long, conflicts_with = "chain")]
    recipe: Option<PathBuf>,
    /// Comma-separated transliterator names
    #[arg(long, value_delimiter = ',')]
    chain: Option<Vec<String>>,
    /// Settings TOML replacing the embedded defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Show each stage's output instead of the result
    #[arg(long)]
    explain: bool,
    /// With --explain, output JSON instead of text
    #[arg(long, requires = "explain")]
    json: bool,
    /// List the built-in transliterators and exit
    #[arg(long)]
    list: bool,
    /// Write a JSON trace log into this directory
    #[arg(long)]
    trace_dir: Option<PathBuf>,
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {e}");
    process::exit(1);
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Failed to read {}", path.display()), e))
}

fn build_chain(cli: &Cli) -> Chain {
    if let Some(path) = &cli.recipe {
        let recipe: Recipe = toml::from_str(&read_file(path))
            .unwrap_or_else(|e| fail(&format!("Invalid recipe {}", path.display()), e));
        return kana_norm::make_transliterator(&recipe)
            .unwrap_or_else(|e| fail("Failed to build chain", e));
    }
    if let Some(names) = &cli.chain {
        let entries: Vec<RawConfig> = names.iter().map(|n| RawConfig::Name(n.clone())).collect();
        return kana_norm::make_chain(&entries).unwrap_or_else(|e| fail("Failed to build chain", e));
    }
    kana_norm::settings_chain().unwrap_or_else(|e| fail("Failed to build chain", e))
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.trace_dir {
        trace_init::init_tracing(dir);
    }

    if cli.list {
        for name in registry::builtin_names() {
            println!("{name}");
        }
        return;
    }

    if let Some(path) = &cli.settings {
        settings::init_custom(read_file(path))
            .unwrap_or_else(|e| fail(&format!("Invalid settings {}", path.display()), e));
    }

    let chain = build_chain(&cli);

    let text = match &cli.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .unwrap_or_else(|e| fail("Failed to read stdin", e));
            buf
        }
    };

    let output = if cli.explain {
        let result = explain::explain(&chain, &text);
        if cli.json {
            let mut json = explain::format_json(&result)
                .unwrap_or_else(|e| fail("JSON serialization failed", e));
            json.push('\n');
            json
        } else {
            explain::format_text(&result)
        }
    } else {
        chain.transliterate_str(&text)
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        fail("Failed to write", e);
    }
}

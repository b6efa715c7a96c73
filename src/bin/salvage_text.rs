//! Salvage text from files
//!
//! Prints the text of each file, using the fallback stream scanner for PDFs.
//!
//! Usage:
//!   cargo run --release --bin salvage_text -- resume.pdf
//!   cargo run --release --bin salvage_text -- --json --warnings a.pdf b.csv
//!
//! Options:
//!   --json            print each result as JSON
//!   --warnings        include diagnostics (stderr in text mode)
//!   --no-contacts     skip email/URL/phone repair
//!   --collapse-runs   glue runs of 1-3 letter words
//!   --max-chars N     cap the text of each file at N characters
//!   -v, --verbose     debug logging (RUST_LOG overrides)

use pdf_salvage::ingest::{parse_file_path, ParseOptions};
use std::path::PathBuf;
use std::process::ExitCode;

struct CliConfig {
    files: Vec<PathBuf>,
    json: bool,
    options: ParseOptions,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut files = Vec::new();
        let mut json = false;
        let mut verbose = false;
        let mut options = ParseOptions::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--json" => json = true,
                "--warnings" => options.include_warnings = true,
                "--no-contacts" => {
                    options.extraction = options.extraction.with_normalize_contacts(false);
                },
                "--collapse-runs" => {
                    options.extraction = options.extraction.with_collapse_short_word_runs(true);
                },
                "--max-chars" => {
                    i += 1;
                    let value = args.get(i).ok_or("--max-chars needs a value")?;
                    options.max_chars = value
                        .parse()
                        .map_err(|e| format!("invalid --max-chars '{}': {}", value, e))?;
                },
                "--verbose" | "-v" => verbose = true,
                flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
                path => files.push(PathBuf::from(path)),
            }
            i += 1;
        }

        if files.is_empty() {
            return Err("no input files".to_string());
        }

        Ok(Self {
            files,
            json,
            options,
            verbose,
        })
    }
}

fn main() -> ExitCode {
    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: salvage_text [--json] [--warnings] [--no-contacts] [--collapse-runs] [--max-chars N] [-v] FILE..."
            );
            return ExitCode::from(2);
        },
    };

    let default_level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut failures = 0;

    for path in &config.files {
        let parsed = match parse_file_path(path, &config.options) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failures += 1;
                continue;
            },
        };

        if config.json {
            match serde_json::to_string_pretty(&parsed) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    failures += 1;
                },
            }
            continue;
        }

        if config.files.len() > 1 {
            println!("==> {} ({}) <==", parsed.file_name, parsed.file_type);
        }
        println!("{}", parsed.text);
        for warning in &parsed.warnings {
            eprintln!("{}: warning: {}", path.display(), warning);
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

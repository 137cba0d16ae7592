use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use swc_common::comments::Comments;
use tracing_subscriber::EnvFilter;
use ub_ast::{InputSyntax, QuoteStyle};
use ub_parser::{emit_program, parse_source, requote};
use ub_trivia::Trivia;
use ub_unbrace::{unbrace_program, unbrace_to_fixpoint, UnbraceReport};

mod config;
mod files;

use config::Config;
use files::collect_files;

#[derive(Parser)]
#[command(
    name = "unbrace",
    about = "Drop braces around single-statement if/loop bodies in JS/TS"
)]
struct Cli {
    /// Config file (defaults to ./unbrace.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log more (-v debug, -vv trace). `UNBRACE_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unwrap single-statement bodies and emit the result.
    Fix {
        /// Input files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file for a single input (stdout if omitted).
        #[arg(short, long, conflicts_with = "write")]
        output: Option<PathBuf>,
        /// Rewrite changed files in place.
        #[arg(long)]
        write: bool,
        /// Repeat the pass until nothing changes.
        #[arg(long)]
        fixpoint: bool,
        /// Strip comments from the output.
        #[arg(long)]
        no_comments: bool,
        /// Quote style for string literals: single, double or preserve.
        #[arg(long, value_name = "STYLE")]
        quote: Option<QuoteStyle>,
        /// Print per-file reports as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List files that still contain unwrappable blocks; fails if any do.
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Parse a file and dump its tree.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of the debug format.
        #[arg(long)]
        ast: bool,
    },
}

/// Per-run settings, config file merged with flags.
#[derive(Debug, Clone, Copy)]
struct Settings {
    fixpoint: bool,
    comments: bool,
    quote: QuoteStyle,
}

struct Outcome {
    path: PathBuf,
    output: String,
    report: UnbraceReport,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    #[serde(flatten)]
    report: &'a UnbraceReport,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("UNBRACE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse, run the pass, and print one file.
fn process(path: &Path, settings: Settings) -> Result<Outcome> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.display().to_string();
    let syntax = InputSyntax::from_path(path);

    let mut parsed = parse_source(&source, &filename, &syntax)?;
    let trivia = settings
        .comments
        .then(|| Trivia::new(&parsed.comments, &*parsed.source_map));

    let report = if settings.fixpoint {
        unbrace_to_fixpoint(&mut parsed.program, trivia)
    } else {
        unbrace_program(&mut parsed.program, trivia)
    };
    requote(&mut parsed.program, settings.quote);

    let comments: Option<&dyn Comments> = if settings.comments {
        Some(&parsed.comments)
    } else {
        None
    };
    let output = emit_program(&parsed.program, &parsed.source_map, comments)?;

    Ok(Outcome {
        path: path.to_path_buf(),
        output,
        report,
    })
}

fn process_all(files: &[PathBuf], settings: Settings) -> Result<Vec<Outcome>> {
    files.iter().map(|f| process(f, settings)).collect()
}

fn single(outcomes: &[Outcome]) -> Result<&Outcome> {
    match outcomes {
        [one] => Ok(one),
        _ => bail!(
            "{} input files; use --write to rewrite them in place",
            outcomes.len()
        ),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fix {
            inputs,
            output,
            write,
            fixpoint,
            no_comments,
            quote,
            json,
        } => {
            let settings = Settings {
                fixpoint: fixpoint || config.fixpoint,
                comments: config.comments && !no_comments,
                quote: quote.unwrap_or(config.quote),
            };
            let files = collect_files(&inputs, &config)?;
            let outcomes = process_all(&files, settings)?;

            if write {
                for outcome in &outcomes {
                    // Untouched files keep their original formatting.
                    if !outcome.report.changed() {
                        continue;
                    }
                    std::fs::write(&outcome.path, &outcome.output)
                        .with_context(|| format!("failed to write {}", outcome.path.display()))?;
                    eprintln!(
                        "Fixed: {} ({} block(s))",
                        outcome.path.display(),
                        outcome.report.unwrapped()
                    );
                }
            } else if let Some(path) = &output {
                let outcome = single(&outcomes)?;
                std::fs::write(path, &outcome.output)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            } else if !json {
                print!("{}", single(&outcomes)?.output);
            }

            if json {
                let reports: Vec<FileReport> = outcomes
                    .iter()
                    .map(|o| FileReport {
                        path: o.path.display().to_string(),
                        report: &o.report,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
        Commands::Check { inputs } => {
            let settings = Settings {
                fixpoint: false,
                comments: false,
                quote: QuoteStyle::Preserve,
            };
            let files = collect_files(&inputs, &config)?;
            let outcomes = process_all(&files, settings)?;

            let dirty: Vec<&Outcome> = outcomes.iter().filter(|o| o.report.changed()).collect();
            for outcome in &dirty {
                println!("{}: {}", outcome.path.display(), outcome.report.unwrapped());
            }
            if !dirty.is_empty() {
                bail!("{} file(s) have braces to remove", dirty.len());
            }
            eprintln!("OK: {} file(s)", outcomes.len());
        }
        Commands::Parse { input, ast } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let filename = input.display().to_string();
            let syntax = InputSyntax::from_path(&input);
            let parsed = parse_source(&source, &filename, &syntax)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.program)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.program);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_and_write_conflict() {
        let parsed = Cli::try_parse_from(["unbrace", "fix", "a.js", "--write", "-o", "b.js"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn quote_flag_parses() {
        let cli = Cli::try_parse_from(["unbrace", "fix", "a.js", "--quote", "double"]).unwrap();
        let Commands::Fix { quote, .. } = cli.command else {
            panic!("expected fix");
        };
        assert_eq!(quote, Some(QuoteStyle::Double));

        assert!(Cli::try_parse_from(["unbrace", "fix", "a.js", "--quote", "backtick"]).is_err());
    }

    #[test]
    fn process_rewrites_one_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("input.js");
        std::fs::write(&path, "// lead\nwhile (x) { /* keep */ step(\"go\"); }\n").unwrap();

        let settings = Settings {
            fixpoint: false,
            comments: true,
            quote: QuoteStyle::Single,
        };
        let outcome = process(&path, settings).unwrap();
        assert_eq!(outcome.report.loop_body, 1);
        assert!(outcome.output.contains("// lead"), "{}", outcome.output);
        assert!(outcome.output.contains("/* keep */"), "{}", outcome.output);
        assert!(outcome.output.contains("step('go')"), "{}", outcome.output);
        assert!(!outcome.output.contains('{'), "{}", outcome.output);
    }

    #[test]
    fn preserve_keeps_original_quotes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("input.js");
        std::fs::write(&path, "if (x) { say(\"hi\"); }\n").unwrap();

        let settings = Settings {
            fixpoint: false,
            comments: false,
            quote: QuoteStyle::Preserve,
        };
        let outcome = process(&path, settings).unwrap();
        assert!(outcome.output.contains("say(\"hi\")"), "{}", outcome.output);
    }
}

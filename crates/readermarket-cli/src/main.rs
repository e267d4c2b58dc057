//! `readermarket` - inspect FB2 books from the command line
//!
//! ```bash
//! # Parsed document as JSON
//! readermarket parse book.fb2 --pretty
//!
//! # Title, author and chapter list
//! readermarket info book.fb2.zip
//! ```

mod config;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use config::{parse_file_size, Config};
use readermarket_fb2::{load_fb2, parse_fb2_str, Fb2Error, LoadOptions, ParsedDocument};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "readermarket",
    about = "Parse FictionBook (FB2) e-books",
    long_about = "Parse FictionBook (FB2) e-books into metadata and chapters.\n\
                  \n\
                  Accepts plain .fb2 files and .fb2.zip archives.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Read settings from this file instead of ./.readermarket.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reject inputs larger than SIZE (e.g. 512K, 50M)
    #[arg(long, global = true, value_name = "SIZE", value_parser = parse_file_size)]
    max_size: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the parsed document as JSON
    Parse {
        /// Input .fb2 or .fb2.zip file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show metadata and the chapter list
    Info {
        /// Input .fb2 or .fb2.zip file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::discover(args.config.as_deref())?;
    let options = LoadOptions {
        max_size: args.max_size.or(config.max_size()?),
    };

    match args.command {
        Commands::Parse {
            input,
            output,
            pretty,
        } => {
            let document = load_document(&input, &options)?;
            let json = if pretty || config.output.pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };

            match output {
                Some(path) => {
                    fs::write(&path, json + "\n")
                        .with_context(|| format!("Failed to write output: {}", path.display()))?;
                    if !args.quiet {
                        eprintln!(
                            "{} {} ({} chapters)",
                            "Wrote".green().bold(),
                            path.display(),
                            document.chapters.len()
                        );
                    }
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{json}")?;
                }
            }
        }
        Commands::Info { input } => {
            let document = load_document(&input, &options)?;
            let mut stdout = std::io::stdout().lock();
            write_info(&mut stdout, &document)?;
        }
    }

    Ok(())
}

fn load_document(input: &Path, options: &LoadOptions) -> Result<ParsedDocument> {
    let text = load_fb2(input, options)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    log::info!("loaded {} ({} bytes)", input.display(), text.len());

    match parse_fb2_str(&text) {
        Ok(document) => {
            log::info!("parsed {} chapters", document.chapters.len());
            Ok(document)
        }
        Err(e @ Fb2Error::MalformedInput(_)) => {
            Err(e).with_context(|| format!("{} is malformed FB2 markup", input.display()))
        }
        Err(e) => Err(e.into()),
    }
}

fn write_info(out: &mut impl Write, document: &ParsedDocument) -> Result<()> {
    let meta = &document.metadata;

    writeln!(out, "{:<12}{}", "Title:", meta.title)?;
    writeln!(out, "{:<12}{}", "Author:", meta.author)?;

    let optional = [
        ("Genre:", &meta.genre),
        ("Language:", &meta.language),
        ("Date:", &meta.date),
        ("Annotation:", &meta.description),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "{label:<12}{value}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Chapters ({}):", document.chapters.len())?;
    for chapter in &document.chapters {
        writeln!(out, "  {}. {}", chapter.id, chapter.title)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use readermarket_fb2::{Chapter, DocumentMetadata};

    #[test]
    fn test_info_lists_present_fields_only() {
        let document = ParsedDocument {
            metadata: DocumentMetadata {
                title: "Test Book".to_string(),
                author: "Jane Doe".to_string(),
                language: Some("en".to_string()),
                ..DocumentMetadata::new()
            },
            chapters: vec![
                Chapter::new(1, "Intro".to_string(), "<p>Welcome</p>".to_string()),
                Chapter::new(2, "Chapter 2".to_string(), "<br/>".to_string()),
            ],
        };

        let mut out = Vec::new();
        write_info(&mut out, &document).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Title:      Test Book"));
        assert!(text.contains("Language:   en"));
        assert!(!text.contains("Genre:"));
        assert!(text.contains("Chapters (2):"));
        assert!(text.contains("  2. Chapter 2"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["readermarket", "-vv", "parse", "book.fb2", "--pretty"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Commands::Parse { pretty: true, .. }));

        let args = Args::try_parse_from(["readermarket", "info", "book.fb2", "--max-size", "1K"]).unwrap();
        assert_eq!(args.max_size, Some(1024));
    }
}

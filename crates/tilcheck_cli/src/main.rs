//! `tilcheck` command-line entry point.
//!
//! # Responsibility
//! - Merge config file values with command-line overrides.
//! - Print the report to stdout and map the outcome to an exit code.
//!
//! # Invariants
//! - stdout carries only the report; diagnostics go to stderr or log files.
//! - Fatal input errors exit with `EXIT_UNREADABLE_INPUT`.

use clap::{Parser, ValueEnum};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use tilcheck_core::{
    default_log_level, init_logging, render_json, render_text, CheckConfig, CheckService,
    Severity, EXIT_UNREADABLE_INPUT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "tilcheck",
    version,
    about = "Check that a notes index lists every note file exactly once"
)]
struct Cli {
    /// Repository root to scan [default: .]
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Index document relative to the root [default: README.md]
    #[arg(long, value_name = "FILE")]
    index: Option<PathBuf>,
    /// JSON config file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Note file extension [default: md]
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,
    /// Directory name to skip; replaces the defaults when given
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dirs: Vec<String>,
    /// Repository-relative file that is not a note
    #[arg(long = "exclude-file", value_name = "PATH")]
    exclude_files: Vec<String>,
    /// Treat unparsed index list items as failures
    #[arg(long)]
    strict: bool,
    /// Repository URL used to recognize absolute links back into it
    #[arg(long, value_name = "URL")]
    repository: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Severity of notes missing from the index (error|warning)
    #[arg(long, value_name = "SEVERITY")]
    unlisted: Option<Severity>,
    /// Severity of index entries with no note on disk (error|warning)
    #[arg(long, value_name = "SEVERITY")]
    dangling: Option<Severity>,
    /// Severity of notes listed more than once (error|warning)
    #[arg(long, value_name = "SEVERITY")]
    duplicates: Option<Severity>,
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rotated log files instead of stderr
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<(CheckConfig, OutputFormat), String> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path).map_err(|err| err.to_string())?,
            None => CheckConfig::default(),
        };

        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(index) = self.index {
            config.index = index;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if !self.exclude_dirs.is_empty() {
            config.excluded_dirs = self.exclude_dirs;
        }
        config.excluded_files.extend(self.exclude_files);
        if self.strict {
            config.strict = true;
        }
        if self.repository.is_some() {
            config.repository = self.repository;
        }
        if let Some(severity) = self.unlisted {
            config.unlisted = severity;
        }
        if let Some(severity) = self.dangling {
            config.dangling = severity;
        }
        if let Some(severity) = self.duplicates {
            config.duplicates = severity;
        }

        Ok((config, self.format))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("tilcheck: {err}");
        return ExitCode::from(EXIT_UNREADABLE_INPUT);
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(message) => {
            error!("event=check_failed module=cli status=error message={message}");
            eprintln!("tilcheck: {message}");
            ExitCode::from(EXIT_UNREADABLE_INPUT)
        }
    }
}

fn run(cli: Cli) -> Result<u8, String> {
    let (config, format) = cli.into_config()?;
    let service = CheckService::new(config).map_err(|err| err.to_string())?;
    let outcome = service.run().map_err(|err| err.to_string())?;

    let rendered = match format {
        OutputFormat::Text => render_text(&outcome),
        OutputFormat::Json => {
            let mut json = render_json(&outcome).map_err(|err| err.to_string())?;
            json.push('\n');
            json
        }
    };
    print!("{rendered}");
    Ok(outcome.exit_code())
}

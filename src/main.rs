use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use codesweep::commands::{run_clean, run_init, run_report, run_scan, CleanOptions, ScanOptions};
use codesweep::report::Severity;
use codesweep::reporters::{ConsoleReporter, JsonReporter, Reporter};

#[derive(Parser)]
#[command(name = "codesweep", version, about = "Dead code detector and codebase hygiene tool")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory to scan when no subcommand is given
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Console,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory and report hygiene issues
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Run a single scanner family (python, javascript, docs, css, config)
        #[arg(long)]
        only: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
        /// Path to a config file (default: <dir>/.codesweeprc.json)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Re-scan and apply fixes, with backups
    Clean {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Show what would change without touching files
        #[arg(long)]
        dry_run: bool,
        /// Apply without asking for confirmation
        #[arg(long)]
        auto: bool,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show the cached report from the last scan
    Report {
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
        /// Drill into one category (e.g. dead-files, stale-refs)
        #[arg(long)]
        detail: Option<String>,
    },
    /// Write a default .codesweeprc.json
    Init {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "codesweep=debug" } else { "codesweep=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn render(report: &codesweep::ScanReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Console => ConsoleReporter.render(report),
        OutputFormat::Json => JsonReporter.render(report),
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Bare `codesweep [dir]` behaves like `codesweep scan [dir]`
    let command = cli.command.unwrap_or(Command::Scan {
        dir: cli.dir,
        only: None,
        format: OutputFormat::Console,
        config: None,
        verbose: false,
    });

    match command {
        Command::Scan {
            dir,
            only,
            format,
            config,
            verbose,
        } => {
            init_tracing(verbose);
            let report = run_scan(
                &dir,
                &ScanOptions {
                    only,
                    config_file: config,
                },
            )?;
            report.save_cache()?;
            println!("{}", render(&report, format));
            if report.count_severity(Severity::Error) > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Clean {
            dir,
            dry_run,
            auto,
            verbose,
        } => {
            init_tracing(verbose);
            // Always clean against a fresh scan, not a stale cache
            let report = run_scan(&dir, &ScanOptions::default())?;
            let (_, failed) = run_clean(&report, &CleanOptions { dry_run, auto })?;
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Report { dir, format, detail } => {
            init_tracing(false);
            if let Some(report) = run_report(&dir, detail.as_deref())? {
                println!("{}", render(&report, format));
            }
        }
        Command::Init { dir } => {
            init_tracing(false);
            run_init(&dir)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

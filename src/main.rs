#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use subtrack::app_config::{self, Config};
use subtrack::app_controller::{Controller, ExtractionWindow};
use subtrack::file_utils::FileManager;
use subtrack::timecode::format_timestamp;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align a forced subtitle track onto a reference track
    Align {
        /// Correctly timed reference subtitle (main dialogue)
        #[arg(short, long)]
        reference: PathBuf,

        /// Forced subtitle whose timings should be corrected
        #[arg(short, long)]
        forced: PathBuf,

        /// Output path (defaults to <forced>.aligned.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove transcription hallucinations from a subtitle file
    Filter {
        /// Subtitle file to clean
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Total media duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Output path (defaults to <input>.clean.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON report of removed cues
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the dialogue of a time window
    Extract {
        /// Subtitle file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Window start in seconds
        #[arg(long, requires = "end", conflicts_with = "middle")]
        start: Option<f64>,

        /// Window end in seconds
        #[arg(long, requires = "start", conflicts_with = "middle")]
        end: Option<f64>,

        /// Use a window around the midpoint of the file
        #[arg(long)]
        middle: bool,
    },

    /// Print the first start and last end time of a subtitle file
    Bounds {
        /// Subtitle file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config,

    /// Generate shell completions for subtrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtrack - subtitle cue processing
///
/// Aligns forced subtitles, removes transcription hallucinations and extracts
/// dialogue windows from SRT files.
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(version)]
#[command(about = "SRT alignment and cleanup tool")]
#[command(long_about = "subtrack aligns forced subtitle tracks, removes speech-to-text hallucinations and extracts dialogue from SRT files.

EXAMPLES:
    subtrack align -r movie.en.srt -f movie.forced.srt       # Resync forced subtitles
    subtrack filter movie.whisper.srt -d 5400                # Clean a 90 minute transcript
    subtrack filter movie.whisper.srt -d 5400 --report r.json
    subtrack extract movie.en.srt --middle                   # Dialogue around the midpoint
    subtrack extract movie.en.srt --start 600 --end 900
    subtrack completions bash > subtrack.bash

CONFIGURATION:
    Settings are read from conf.json by default (see `subtrack config`).
    A missing file means built-in defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept everything here; the effective level is applied through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();
    let load = || load_controller(&cli.config_path, cli.log_level.clone());

    match &cli.command {
        Commands::Align { reference, forced, output } => {
            let controller = load()?;
            let output = output
                .clone()
                .unwrap_or_else(|| FileManager::generate_output_path(forced, "aligned", "srt"));
            let report = controller.align(reference, forced, &output)?;
            println!(
                "matches={} scale={:.6} offset={:.3} aligned={} cues={}",
                report.match_count, report.transform.scale, report.transform.offset, report.aligned, report.cue_count
            );
            info!("Success: {:?}", output);
        }
        Commands::Filter { input, duration, output, report } => {
            let controller = load()?;
            let output = output
                .clone()
                .unwrap_or_else(|| FileManager::generate_output_path(input, "clean", "srt"));
            let summary = controller.filter(input, &output, *duration, report.as_deref())?;
            println!("remaining={} removed={}", summary.remaining_cues, summary.removals.len());
            info!("Success: {:?}", output);
        }
        Commands::Extract { input, start, end, middle } => {
            let controller = load()?;
            let window = match (start, end, middle) {
                (_, _, true) => ExtractionWindow::Middle,
                (Some(start), Some(end), false) => ExtractionWindow::Range { start: *start, end: *end },
                _ => return Err(anyhow!("Either --middle or both --start and --end are required")),
            };
            let text = controller.extract(input, window)?;
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Commands::Bounds { input } => match load()?.bounds(input)? {
            Some((first, last)) => println!("{} --> {}", format_timestamp(first), format_timestamp(last)),
            None => println!("no timing information"),
        },
        Commands::Config => {
            println!("{}", load()?.config().to_json_pretty()?);
        }
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "subtrack", &mut std::io::stdout());
        }
    }

    Ok(())
}

// @loads: Configuration with CLI overrides, then builds the controller
fn load_controller(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Controller> {
    let mut config = Config::load(config_path)?;
    if let Some(level) = log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Controller::with_config(config)
}

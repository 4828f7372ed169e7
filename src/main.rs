// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, LogLevel};
use crate::batch::BatchOptions;
use crate::export::OutputFormat;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod batch;
mod errors;
mod export;
mod file_utils;
mod pipeline;
mod provider;
mod scene;
mod timecode;
mod transcript;

/// CLI wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Jsx,
    Srt,
    Vtt,
    Txt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Jsx => OutputFormat::Jsx,
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Txt => OutputFormat::Txt,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert transcripts into scene-grouped caption artifacts (default command)
    #[command(alias = "convert")]
    Convert(ConvertArgs),

    /// Generate shell completions for capscene
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input transcript file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for generated artifacts
    #[arg(short, long, default_value = "captions")]
    output_dir: PathBuf,

    /// Output formats to generate (repeatable)
    #[arg(short = 'F', long = "format", value_enum)]
    formats: Vec<CliOutputFormat>,

    /// Renderer style name, forwarded to the output metadata
    #[arg(long)]
    style: Option<String>,

    /// Renderer position name, forwarded to the output metadata
    #[arg(long)]
    position: Option<String>,

    /// Number of jobs processed concurrently
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Webhook reference attached to the batch for push-notifying clients
    #[arg(long)]
    webhook_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// capscene - scene-grouped caption converter
///
/// Converts SRT-style transcripts into scene-grouped, style-annotated
/// caption artifacts for motion-graphics renderers and subtitle players.
#[derive(Parser, Debug)]
#[command(name = "capscene")]
#[command(version = "0.1.0")]
#[command(about = "Scene-grouped caption converter")]
#[command(long_about = "capscene groups timed transcript segments into bounded scenes with
video-safe line wrapping and style annotations, then exports them as
After Effects JSX scripts, SRT/VTT subtitles or plain text. Directories
are processed as concurrent batches with live progress.

EXAMPLES:
    capscene talk.srt                        # Convert using default config
    capscene -F jsx -F vtt talk.srt          # Generate JSX and VTT artifacts
    capscene -o out/ transcripts/            # Batch-convert a directory
    capscene -j 8 transcripts/               # Use 8 concurrent workers
    capscene --style neon --position lower talk.srt
    capscene completions bash > capscene.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input transcript file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for generated artifacts
    #[arg(short, long, default_value = "captions")]
    output_dir: PathBuf,

    /// Output formats to generate (repeatable)
    #[arg(short = 'F', long = "format", value_enum)]
    formats: Vec<CliOutputFormat>,

    /// Renderer style name, forwarded to the output metadata
    #[arg(long)]
    style: Option<String>,

    /// Renderer position name, forwarded to the output metadata
    #[arg(long)]
    position: Option<String>,

    /// Number of jobs processed concurrently
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Webhook reference attached to the batch for push-notifying clients
    #[arg(long)]
    webhook_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
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

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "capscene", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let convert_args = ConvertArgs {
                input_path,
                output_dir: cli.output_dir,
                formats: cli.formats,
                style: cli.style,
                position: cli.position,
                concurrency: cli.concurrency,
                webhook_url: cli.webhook_url,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args).await
        }
    }
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut config = Config::from_file(&args.config_path)?;

    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(LevelFilter::from(&config.log_level));

    let options = BatchOptions {
        style: args.style,
        position: args.position,
        output_formats: args.formats.into_iter().map(OutputFormat::from).collect(),
        concurrency: args.concurrency,
        webhook_url: args.webhook_url,
    };

    let controller = Controller::with_config(config)?;
    controller
        .run(args.input_path, args.output_dir, options)
        .await
}

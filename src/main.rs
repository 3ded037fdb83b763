// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{BatchFailurePolicy, ComputeDevice, Config, TranscriptionTask};
use app_controller::{Controller, ProcessOptions};

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod media;
mod subtitle_processor;
mod transcribe;

/// CLI Wrapper for TranscriptionTask to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTask {
    Transcribe,
    Translate,
}

impl From<CliTask> for TranscriptionTask {
    fn from(cli_task: CliTask) -> Self {
        match cli_task {
            CliTask::Transcribe => TranscriptionTask::Transcribe,
            CliTask::Translate => TranscriptionTask::Translate,
        }
    }
}

/// CLI Wrapper for ComputeDevice to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDevice {
    Auto,
    Cpu,
    Cuda,
}

impl From<CliDevice> for ComputeDevice {
    fn from(cli_device: CliDevice) -> Self {
        match cli_device {
            CliDevice::Auto => ComputeDevice::Auto,
            CliDevice::Cpu => ComputeDevice::Cpu,
            CliDevice::Cuda => ComputeDevice::Cuda,
        }
    }
}

/// CLI Wrapper for BatchFailurePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFailurePolicy {
    Abort,
    Skip,
}

impl From<CliFailurePolicy> for BatchFailurePolicy {
    fn from(cli_policy: CliFailurePolicy) -> Self {
        match cli_policy {
            CliFailurePolicy::Abort => BatchFailurePolicy::Abort,
            CliFailurePolicy::Skip => BatchFailurePolicy::Skip,
        }
    }
}

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
    /// Generate subtitles and burn them into videos (default command)
    #[command(alias = "process")]
    Process(ProcessArgs),

    /// Generate shell completions for subburn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for generated files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Language code of the speech (e.g. 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Transcribe in the source language or translate to English
    #[arg(short, long, value_enum)]
    task: Option<CliTask>,

    /// Compute device for the transcription model
    #[arg(short, long, value_enum)]
    device: Option<CliDevice>,

    /// Keep the generated SRT files in the output directory
    #[arg(long)]
    output_srt: bool,

    /// Only generate SRT files, skip burning subtitles into the video
    #[arg(long)]
    srt_only: bool,

    /// One subtitle entry per word instead of per sentence
    #[arg(short, long)]
    word_by_word: bool,

    /// Directory containing a custom TTF font
    #[arg(long, requires = "font_name")]
    fonts_dir: Option<PathBuf>,

    /// Internal name of the custom TTF font
    #[arg(long)]
    font_name: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whether one failing video aborts the batch or is skipped
    #[arg(long, value_enum)]
    on_error: Option<CliFailurePolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subburn - WhisperX subtitles, burned in
///
/// Generates word-accurate subtitles for video files with WhisperX and
/// burns them into a re-encoded copy with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(version = "1.0.0")]
#[command(about = "Generate and burn WhisperX subtitles into videos")]
#[command(long_about = "subburn extracts audio from video files, transcribes and aligns it with WhisperX, and writes SRT files and/or videos with the subtitles burned in.

EXAMPLES:
    subburn movie.mp4                           # Burn subtitles using default config
    subburn --output-srt movie.mp4              # Also keep the SRT file
    subburn --srt-only movie.mp4                # Only write the SRT, no re-encode
    subburn -w movie.mp4                        # Word-by-word subtitles
    subburn -l en -t translate movie.mp4        # Translate English speech
    subburn --fonts-dir ./fonts --font-name Lobster movie.mp4
    subburn --on-error skip /videos/            # Keep going when one video fails
    subburn completions bash > subburn.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

REQUIREMENTS:
    ffmpeg must be on PATH; whisperx must be installed (pip install whisperx)
    or configured via the 'whisper.binary' config field.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Language code of the speech (e.g. 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Transcribe in the source language or translate to English
    #[arg(short, long, value_enum)]
    task: Option<CliTask>,

    /// Compute device for the transcription model
    #[arg(short, long, value_enum)]
    device: Option<CliDevice>,

    /// Keep the generated SRT files in the output directory
    #[arg(long)]
    output_srt: bool,

    /// Only generate SRT files, skip burning subtitles into the video
    #[arg(long)]
    srt_only: bool,

    /// One subtitle entry per word instead of per sentence
    #[arg(short, long)]
    word_by_word: bool,

    /// Directory containing a custom TTF font
    #[arg(long, requires = "font_name")]
    fonts_dir: Option<PathBuf>,

    /// Internal name of the custom TTF font
    #[arg(long)]
    font_name: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whether one failing video aborts the batch or is skipped
    #[arg(long, value_enum)]
    on_error: Option<CliFailurePolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subburn", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        None => {
            // Default behavior - use top-level args so a bare input path works
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let process_args = ProcessArgs {
                input_path,
                output_dir: cli.output_dir,
                language: cli.language,
                task: cli.task,
                device: cli.device,
                output_srt: cli.output_srt,
                srt_only: cli.srt_only,
                word_by_word: cli.word_by_word,
                fonts_dir: cli.fonts_dir,
                font_name: cli.font_name,
                force_overwrite: cli.force_overwrite,
                on_error: cli.on_error,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_process(process_args).await
        }
    }
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        apply_cli_overrides(&mut config, &options);
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &options);

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Collect the videos to process
    let video_paths = collect_input_videos(&options.input_path)?;

    let process_options = ProcessOptions {
        output_srt: options.output_srt || options.srt_only,
        srt_only: options.srt_only,
        task: options.task.map(Into::into).unwrap_or_default(),
        word_by_word: options.word_by_word,
        custom_font_dir: options.fonts_dir.clone(),
        custom_font_name: options.font_name.clone(),
        force_overwrite: options.force_overwrite,
    };

    // Create controller and run the pipeline
    let controller = Controller::with_config(config)?;
    let report = controller.process_videos(&video_paths, &process_options).await?;

    if !report.is_complete() {
        return Err(anyhow!("{} video(s) failed to process", report.failures.len()));
    }

    Ok(())
}

/// Apply command line overrides onto the loaded configuration
fn apply_cli_overrides(config: &mut Config, options: &ProcessArgs) {
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(language) = &options.language {
        config.language = language.clone();
    }

    if let Some(device) = &options.device {
        config.device = device.clone().into();
    }

    if let Some(on_error) = &options.on_error {
        config.on_error = on_error.clone().into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

/// Turn the input path into the list of videos to process
fn collect_input_videos(input_path: &Path) -> Result<Vec<PathBuf>> {
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    if input_path.is_dir() {
        let videos = file_utils::FileManager::find_video_files(input_path)?;
        if videos.is_empty() {
            return Err(anyhow!("No video files found in directory: {:?}", input_path));
        }
        info!("Found {} video file(s) in {:?}", videos.len(), input_path);
        return Ok(videos);
    }

    Err(anyhow!("Input path does not exist: {:?}", input_path))
}

/// Map the config log level onto the log crate's filter
fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where SRT files and burned videos are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Language code of the speech (ISO 639-1 or 639-2)
    #[serde(default = "default_language")]
    pub language: String,

    /// Compute device for the transcription model
    #[serde(default)]
    pub device: ComputeDevice,

    /// WhisperX backend settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Default styling for burned-in subtitles
    #[serde(default)]
    pub style: SubtitleStyleConfig,

    /// What to do with the rest of a batch when one video fails
    #[serde(default)]
    pub on_error: BatchFailurePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription task selection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionTask {
    // @task: Transcribe in the source language
    #[default]
    Transcribe,
    // @task: Translate the speech to English
    Translate,
}

impl TranscriptionTask {
    // @returns: Value passed to the backend CLI
    pub fn to_cli_string(&self) -> String {
        match self {
            Self::Transcribe => "transcribe".to_string(),
            Self::Translate => "translate".to_string(),
        }
    }
}

impl std::fmt::Display for TranscriptionTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_cli_string())
    }
}

impl std::str::FromStr for TranscriptionTask {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "transcribe" => Ok(Self::Transcribe),
            "translate" => Ok(Self::Translate),
            _ => Err(anyhow!("Invalid task: {}", s)),
        }
    }
}

/// Compute device for model inference
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    // @device: Let the backend pick
    #[default]
    Auto,
    // @device: Force CPU inference
    Cpu,
    // @device: Force CUDA inference
    Cuda,
}

impl ComputeDevice {
    // @returns: Value passed to the backend CLI, None when the tool decides
    pub fn to_cli_string(&self) -> Option<String> {
        match self {
            Self::Auto => None,
            Self::Cpu => Some("cpu".to_string()),
            Self::Cuda => Some("cuda".to_string()),
        }
    }

    // @returns: Capitalized device name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Auto => "Auto",
            Self::Cpu => "CPU",
            Self::Cuda => "CUDA",
        }
    }
}

impl std::str::FromStr for ComputeDevice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            _ => Err(anyhow!("Invalid device: {}", s)),
        }
    }
}

/// Batch failure policy
///
/// Whether a failing video aborts the whole batch or is recorded and skipped.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BatchFailurePolicy {
    // @policy: Stop the batch on the first failure
    #[default]
    Abort,
    // @policy: Record the failure and continue with the next video
    Skip,
}

impl std::str::FromStr for BatchFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(anyhow!("Invalid failure policy: {}", s)),
        }
    }
}

/// WhisperX backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Binary to invoke
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Model name (e.g. "small", "large-v3")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Inference batch size
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Optional compute type override (e.g. "int8" on CPU)
    #[serde(default)]
    pub compute_type: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            binary: default_whisper_binary(),
            model: default_whisper_model(),
            batch_size: default_batch_size(),
            compute_type: None,
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Styling applied to burned-in subtitles via the libass force_style override
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleStyleConfig {
    /// Font family name
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Directory with additional font files, for fonts not installed system-wide
    #[serde(default)]
    pub fonts_dir: Option<PathBuf>,

    /// Background colour in ASS &HAABBGGRR notation
    #[serde(default = "default_back_colour")]
    pub back_colour: String,

    /// Letter spacing
    #[serde(default = "default_spacing")]
    pub spacing: f32,

    /// Outline width
    #[serde(default)]
    pub outline: f32,

    /// Shadow depth
    #[serde(default = "default_shadow")]
    pub shadow: f32,

    /// Vertical margin from the bottom edge
    #[serde(default = "default_margin_v")]
    pub margin_v: u32,
}

impl Default for SubtitleStyleConfig {
    fn default() -> Self {
        Self {
            font_name: default_font_name(),
            font_size: default_font_size(),
            fonts_dir: None,
            back_colour: default_back_colour(),
            spacing: default_spacing(),
            outline: 0.0,
            shadow: default_shadow(),
            margin_v: default_margin_v(),
        }
    }
}

impl SubtitleStyleConfig {
    /// Copy of this style with a custom font applied
    ///
    /// Only the font changes; timing and text are unaffected by styling.
    pub fn with_font(&self, fonts_dir: Option<PathBuf>, font_name: Option<String>) -> Self {
        let mut style = self.clone();
        if fonts_dir.is_some() {
            style.fonts_dir = fonts_dir;
        }
        if let Some(font_name) = font_name {
            style.font_name = font_name;
        }
        style
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_language() -> String {
    "es".to_string()
}

fn default_whisper_binary() -> String {
    "whisperx".to_string()
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_batch_size() -> u32 {
    16
}

fn default_whisper_timeout_secs() -> u64 {
    3600
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_back_colour() -> String {
    "&H80000000".to_string()
}

fn default_spacing() -> f32 {
    0.2
}

fn default_shadow() -> f32 {
    0.75
}

fn default_margin_v() -> u32 {
    70
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // The backend needs a 2-letter code; surface bad codes before any work starts
        let _language_name = crate::language_utils::get_language_name(&self.language)?;
        crate::language_utils::normalize_to_part1(&self.language)?;

        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        if self.whisper.model.trim().is_empty() {
            return Err(anyhow!("Whisper model name must not be empty"));
        }

        if self.whisper.batch_size == 0 {
            return Err(anyhow!("Whisper batch size must be at least 1"));
        }

        if self.style.font_size == 0 {
            return Err(anyhow!("Subtitle font size must be at least 1"));
        }

        if let Some(fonts_dir) = &self.style.fonts_dir {
            if !fonts_dir.is_dir() {
                return Err(anyhow!("Fonts directory does not exist: {:?}", fonts_dir));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: default_output_dir(),
            language: default_language(),
            device: ComputeDevice::default(),
            whisper: WhisperConfig::default(),
            style: SubtitleStyleConfig::default(),
            on_error: BatchFailurePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

use async_trait::async_trait;
use log::{debug, error};
use std::path::Path;
use tokio::process::Command;

use crate::app_config::SubtitleStyleConfig;
use crate::errors::MediaError;
use crate::media::MediaEngine;

/// Timeout for audio extraction, which is roughly I/O bound
const EXTRACT_TIMEOUT_SECS: u64 = 600;

/// Timeout for burn-in, which re-encodes the whole video
const BURN_TIMEOUT_SECS: u64 = 3600;

/// Media engine backed by the ffmpeg command line tool
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    /// Binary to invoke (default "ffmpeg")
    binary: String,
}

impl FfmpegEngine {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    /// Use a specific ffmpeg binary instead of resolving from PATH
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for extracting a mono 16 kHz PCM WAV track
    ///
    /// Exposed for tests; the order matches what `extract_audio` runs.
    pub fn extract_audio_args(video_path: &Path, audio_path: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            video_path.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-ar".to_string(),
            "16000".to_string(),
            audio_path.to_string_lossy().to_string(),
        ]
    }

    /// Arguments for burning a subtitle file into a video
    ///
    /// The audio stream is copied untouched; only the video is re-encoded.
    pub fn burn_args(
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        style: &SubtitleStyleConfig,
    ) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            video_path.to_string_lossy().to_string(),
            "-vf".to_string(),
            Self::subtitles_filter(subtitle_path, style),
            "-c:a".to_string(),
            "copy".to_string(),
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// Build the `subtitles=` video filter with styling applied
    pub fn subtitles_filter(subtitle_path: &Path, style: &SubtitleStyleConfig) -> String {
        let mut filter = format!(
            "subtitles={}",
            Self::escape_filter_value(&subtitle_path.to_string_lossy())
        );

        if let Some(fonts_dir) = &style.fonts_dir {
            filter.push_str(&format!(
                ":fontsdir={}",
                Self::escape_filter_value(&fonts_dir.to_string_lossy())
            ));
        }

        filter.push_str(&format!(":force_style='{}'", Self::force_style(style)));
        filter
    }

    /// Assemble the libass force_style override string
    pub fn force_style(style: &SubtitleStyleConfig) -> String {
        format!(
            "FontName={},FontSize={},BackColour={},Spacing={},Outline={},Shadow={},MarginV={}",
            style.font_name,
            style.font_size,
            style.back_colour,
            style.spacing,
            style.outline,
            style.shadow,
            style.margin_v
        )
    }

    /// Escape a value for use inside an ffmpeg filter graph
    ///
    /// Filter syntax treats these characters as structure, so paths with
    /// colons (Windows drives) or brackets must be escaped.
    pub fn escape_filter_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if matches!(c, '\\' | ':' | '\'' | ',' | '[' | ']' | ';') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Run ffmpeg with the given arguments and a timeout
    async fn run(&self, args: &[String], timeout_secs: u64) -> Result<(), MediaError> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let ffmpeg_future = Command::new(&self.binary).args(args).output();

        let timeout_duration = std::time::Duration::from_secs(timeout_secs);
        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| MediaError::ToolNotFound {
                    tool: self.binary.clone(),
                    message: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(MediaError::Timeout {
                    tool: self.binary.clone(),
                    timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", self.binary, filtered);
            return Err(MediaError::CommandFailed {
                tool: self.binary.clone(),
                status: output.status.to_string(),
                stderr: filtered,
            });
        }

        Ok(())
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn extract_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
    ) -> Result<(), MediaError> {
        let args = Self::extract_audio_args(video_path, audio_path);
        self.run(&args, EXTRACT_TIMEOUT_SECS).await?;

        // ffmpeg can exit 0 and still produce nothing for a silent container
        let size = std::fs::metadata(audio_path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(MediaError::MissingOutput(
                audio_path.to_string_lossy().to_string(),
            ));
        }

        Ok(())
    }

    async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        style: &SubtitleStyleConfig,
    ) -> Result<(), MediaError> {
        let args = Self::burn_args(video_path, subtitle_path, output_path, style);
        self.run(&args, BURN_TIMEOUT_SECS).await?;

        let size = std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(MediaError::MissingOutput(
                output_path.to_string_lossy().to_string(),
            ));
        }

        Ok(())
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "title",
        "BPS",
        "DURATION",
        "NUMBER_OF",
        "_STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "encoder",
        "Side data:",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

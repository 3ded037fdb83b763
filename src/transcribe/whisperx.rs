use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

use crate::app_config::{ComputeDevice, TranscriptionTask, WhisperConfig};
use crate::errors::TranscriptionError;
use crate::language_utils;
use crate::transcribe::{Transcriber, Transcript, TranscriptSegment, WordTiming};

/// WhisperX sidecar backend
///
/// Runs the `whisperx` CLI (transcription plus forced alignment) on an audio
/// file and parses the JSON it writes next to the requested output directory.
/// The model itself is a black box; this type only builds the command line,
/// enforces a timeout and maps the JSON output into [`Transcript`].
#[derive(Debug, Clone)]
pub struct WhisperXTranscriber {
    /// Binary to invoke (default "whisperx")
    binary: String,
    /// Model name passed to --model
    model: String,
    /// Compute device selection
    device: ComputeDevice,
    /// Batch size passed to --batch_size
    batch_size: u32,
    /// Optional --compute_type override (e.g. "int8" on CPU)
    compute_type: Option<String>,
    /// Maximum seconds to wait for the backend
    timeout_secs: u64,
}

/// Raw JSON word entry produced by whisperx
#[derive(Debug, Deserialize)]
struct RawWord {
    word: String,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
}

/// Raw JSON segment entry produced by whisperx
#[derive(Debug, Deserialize)]
struct RawSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Vec<RawWord>,
}

/// Top-level JSON document produced by whisperx
#[derive(Debug, Deserialize)]
struct RawOutput {
    segments: Vec<RawSegment>,
    #[serde(default)]
    language: Option<String>,
}

impl WhisperXTranscriber {
    /// Create a backend from the whisper section of the configuration
    pub fn new(config: &WhisperConfig, device: ComputeDevice) -> Self {
        Self {
            binary: config.binary.clone(),
            model: config.model.clone(),
            device,
            batch_size: config.batch_size,
            compute_type: config.compute_type.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Build the whisperx command line for one audio file
    ///
    /// Exposed for tests; the argument order matches what `transcribe` runs.
    pub fn build_args(
        &self,
        audio_path: &Path,
        output_dir: &Path,
        language: &str,
        task: TranscriptionTask,
    ) -> Vec<String> {
        let mut args = vec![
            audio_path.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
            "--output_format".to_string(),
            "json".to_string(),
            "--language".to_string(),
            language.to_string(),
            "--task".to_string(),
            task.to_cli_string(),
            "--batch_size".to_string(),
            self.batch_size.to_string(),
        ];

        // Auto leaves device selection to the tool
        if let Some(device) = self.device.to_cli_string() {
            args.push("--device".to_string());
            args.push(device);
        }

        if let Some(compute_type) = &self.compute_type {
            args.push("--compute_type".to_string());
            args.push(compute_type.clone());
        }

        args
    }

    /// Map the raw JSON document into the backend-neutral transcript type
    fn into_transcript(raw: RawOutput, requested_language: &str) -> Transcript {
        let segments = raw
            .segments
            .into_iter()
            .map(|segment| TranscriptSegment {
                start: segment.start,
                end: segment.end,
                text: segment.text,
                words: segment
                    .words
                    .into_iter()
                    .map(|word| WordTiming {
                        word: word.word,
                        start: word.start,
                        end: word.end,
                    })
                    .collect(),
            })
            .collect();

        Transcript {
            language: raw.language.unwrap_or_else(|| requested_language.to_string()),
            segments,
        }
    }

    /// Keep only the tail of a noisy stderr dump for error messages
    fn stderr_tail(stderr: &str) -> String {
        const MAX_LINES: usize = 15;
        let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() <= MAX_LINES {
            lines.join("\n")
        } else {
            lines[lines.len() - MAX_LINES..].join("\n")
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperXTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
        task: TranscriptionTask,
    ) -> Result<Transcript, TranscriptionError> {
        // The backend only accepts 2-letter codes
        let language = language_utils::normalize_to_part1(language)
            .map_err(|e| TranscriptionError::UnsupportedLanguage(e.to_string()))?;

        // The JSON lands in a scratch directory named after the audio file stem
        let output_dir = tempfile::tempdir()
            .map_err(|e| TranscriptionError::BackendFailed(format!("Failed to create scratch dir: {}", e)))?;

        let args = self.build_args(audio_path, output_dir.path(), &language, task);
        debug!("Running {} {}", self.binary, args.join(" "));

        let whisperx_future = Command::new(&self.binary).args(&args).output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = whisperx_future => {
                result.map_err(|e| TranscriptionError::BackendFailed(
                    format!("Failed to launch '{}': {}. Is whisperx installed and on PATH?", self.binary, e)
                ))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscriptionError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::BackendFailed(format!(
                "'{}' exited with {}: {}",
                self.binary,
                output.status,
                Self::stderr_tail(&stderr)
            )));
        }

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let json_path = output_dir.path().join(format!("{}.json", stem));

        let content = std::fs::read_to_string(&json_path).map_err(|e| {
            TranscriptionError::ParseError(format!(
                "Backend reported success but {:?} is unreadable: {}",
                json_path, e
            ))
        })?;

        let raw: RawOutput = serde_json::from_str(&content)
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        if raw.segments.is_empty() {
            warn!("No speech detected in {:?}", audio_path);
            return Err(TranscriptionError::EmptyTranscript(
                audio_path.to_string_lossy().to_string(),
            ));
        }

        Ok(Self::into_transcript(raw, &language))
    }

    fn name(&self) -> &str {
        "whisperx"
    }
}

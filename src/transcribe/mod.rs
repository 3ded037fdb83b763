/*!
 * Transcription backend implementations.
 *
 * This module contains the transcription capability used by the pipeline:
 * - WhisperX: sidecar invocation of the whisperx CLI with word alignment
 * - Mock: configurable in-memory backend for testing
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::TranscriptionTask;
use crate::errors::TranscriptionError;

/// An aligned word within a transcript segment
///
/// The aligner cannot always time a word (digits are the usual case),
/// so the timestamps are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    /// The word text
    pub word: String,
    /// Start time in seconds
    pub start: Option<f64>,
    /// End time in seconds
    pub end: Option<f64>,
}

/// A single timed segment of transcribed speech
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
    /// Aligned words within this segment
    pub words: Vec<WordTiming>,
}

/// The full result of transcribing one audio file
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Language the model transcribed in (ISO 639-1)
    pub language: String,
    /// Segments ordered by start time
    pub segments: Vec<TranscriptSegment>,
}

/// Common trait for all transcription backends
///
/// This trait defines the interface that all backend implementations must follow,
/// allowing them to be used interchangeably by the controller: an audio file
/// plus language and task parameters in, ordered timed text segments out.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe and align an audio file
    ///
    /// # Arguments
    /// * `audio_path` - Path to the audio file to transcribe
    /// * `language` - ISO 639 language code of the speech
    /// * `task` - Whether to transcribe or translate to English
    ///
    /// # Returns
    /// * `Result<Transcript, TranscriptionError>` - The aligned transcript or an error
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
        task: TranscriptionTask,
    ) -> Result<Transcript, TranscriptionError>;

    /// Short backend name for log output
    fn name(&self) -> &str;
}

pub mod whisperx;
pub mod mock;

/*!
 * Mock transcription backend for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockTranscriber::working()` - Always succeeds with a canned transcript
 * - `MockTranscriber::failing()` - Always fails with an error
 * - `MockTranscriber::empty()` - Succeeds with zero segments
 * - `MockTranscriber::slow(ms)` - Succeeds after a delay (for timeout testing)
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::TranscriptionTask;
use crate::errors::TranscriptionError;
use crate::transcribe::{Transcriber, Transcript, TranscriptSegment, WordTiming};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a canned transcript
    Working,
    /// Always fails with a backend error
    Failing,
    /// Succeeds with an empty segment list
    Empty,
    /// Simulates slow transcription (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock transcriber for testing pipeline behavior without a model
#[derive(Debug)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of transcribe calls made
    call_count: Arc<AtomicUsize>,
    /// Transcript returned in the Working mode
    transcript: Transcript,
}

impl MockTranscriber {
    /// Create a new mock transcriber with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            transcript: Self::canned_transcript(),
        }
    }

    /// Create a working mock transcriber that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock transcriber that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns a transcript with no segments
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that succeeds after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Replace the transcript returned in the Working mode
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// Number of transcribe calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle to the call counter, for asserting after the mock is moved
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Two segments with aligned words, enough to exercise both SRT modes
    fn canned_transcript() -> Transcript {
        Transcript {
            language: "en".to_string(),
            segments: vec![
                TranscriptSegment {
                    start: 0.5,
                    end: 2.0,
                    text: "Hello there".to_string(),
                    words: vec![
                        WordTiming { word: "Hello".to_string(), start: Some(0.5), end: Some(1.1) },
                        WordTiming { word: "there".to_string(), start: Some(1.2), end: Some(2.0) },
                    ],
                },
                TranscriptSegment {
                    start: 2.5,
                    end: 4.0,
                    text: "General greeting".to_string(),
                    words: vec![
                        WordTiming { word: "General".to_string(), start: Some(2.5), end: Some(3.2) },
                        WordTiming { word: "greeting".to_string(), start: Some(3.3), end: Some(4.0) },
                    ],
                },
            ],
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        _language: &str,
        _task: TranscriptionTask,
    ) -> Result<Transcript, TranscriptionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.transcript.clone()),
            MockBehavior::Failing => Err(TranscriptionError::BackendFailed(
                "Mock backend failure".to_string(),
            )),
            MockBehavior::Empty => Err(TranscriptionError::EmptyTranscript(
                audio_path.to_string_lossy().to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(self.transcript.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

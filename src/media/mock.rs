/*!
 * Mock media engine for testing.
 *
 * Writes placeholder output files instead of invoking ffmpeg, so pipeline
 * tests can run on machines without the tool installed.
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::SubtitleStyleConfig;
use crate::errors::MediaError;
use crate::media::MediaEngine;

/// Which stage the mock should fail at, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockMediaBehavior {
    /// Both operations succeed and write placeholder files
    Working,
    /// Audio extraction fails
    FailExtract,
    /// Burn-in fails
    FailBurn,
}

/// Mock media engine that fabricates output files
#[derive(Debug)]
pub struct MockMediaEngine {
    behavior: MockMediaBehavior,
    /// Number of extract_audio calls
    extract_count: Arc<AtomicUsize>,
    /// Number of burn_subtitles calls
    burn_count: Arc<AtomicUsize>,
}

impl MockMediaEngine {
    pub fn new(behavior: MockMediaBehavior) -> Self {
        Self {
            behavior,
            extract_count: Arc::new(AtomicUsize::new(0)),
            burn_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Engine where both operations succeed
    pub fn working() -> Self {
        Self::new(MockMediaBehavior::Working)
    }

    /// Engine where audio extraction fails
    pub fn failing_extract() -> Self {
        Self::new(MockMediaBehavior::FailExtract)
    }

    /// Engine where burn-in fails
    pub fn failing_burn() -> Self {
        Self::new(MockMediaBehavior::FailBurn)
    }

    pub fn extract_count(&self) -> usize {
        self.extract_count.load(Ordering::SeqCst)
    }

    pub fn burn_count(&self) -> usize {
        self.burn_count.load(Ordering::SeqCst)
    }

    /// Handles to the call counters, for asserting after the mock is moved
    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::clone(&self.extract_count), Arc::clone(&self.burn_count))
    }
}

#[async_trait]
impl MediaEngine for MockMediaEngine {
    async fn extract_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
    ) -> Result<(), MediaError> {
        self.extract_count.fetch_add(1, Ordering::SeqCst);

        if self.behavior == MockMediaBehavior::FailExtract {
            return Err(MediaError::CommandFailed {
                tool: "mock-ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("could not open {:?}", video_path),
            });
        }

        std::fs::write(audio_path, b"RIFF")
            .map_err(|_| MediaError::MissingOutput(audio_path.to_string_lossy().to_string()))?;
        Ok(())
    }

    async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        _style: &SubtitleStyleConfig,
    ) -> Result<(), MediaError> {
        self.burn_count.fetch_add(1, Ordering::SeqCst);

        if self.behavior == MockMediaBehavior::FailBurn {
            return Err(MediaError::CommandFailed {
                tool: "mock-ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("filter failed for {:?}", subtitle_path),
            });
        }

        // A real burn depends on both inputs; the mock at least checks they exist
        if !video_path.exists() || !subtitle_path.exists() {
            return Err(MediaError::MissingOutput(format!(
                "inputs missing: {:?} / {:?}",
                video_path, subtitle_path
            )));
        }

        std::fs::write(output_path, b"\x00\x00\x00\x18ftyp")
            .map_err(|_| MediaError::MissingOutput(output_path.to_string_lossy().to_string()))?;
        Ok(())
    }
}

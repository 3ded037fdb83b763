/*!
 * Media tool implementations.
 *
 * This module contains the audio/video capability used by the pipeline:
 * - Ffmpeg: shells out to ffmpeg for audio extraction and subtitle burn-in
 * - Mock: in-memory engine for testing without ffmpeg installed
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::SubtitleStyleConfig;
use crate::errors::MediaError;

/// Common trait for media tool engines
///
/// This trait abstracts the external codec tool as a capability: a command
/// invocation in, a file (or error) out. The pipeline never inspects media
/// content itself, so the underlying tool can be swapped or mocked.
#[async_trait]
pub trait MediaEngine: Send + Sync + Debug {
    /// Extract the audio track of a video to a mono 16 kHz PCM WAV file
    ///
    /// # Arguments
    /// * `video_path` - Input video file
    /// * `audio_path` - WAV file to produce
    async fn extract_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
    ) -> Result<(), MediaError>;

    /// Re-encode a video with the given subtitle file burned into the frames
    ///
    /// # Arguments
    /// * `video_path` - Input video file (never mutated)
    /// * `subtitle_path` - SRT file to render
    /// * `output_path` - Video file to produce
    /// * `style` - Font and layout styling for the rendered subtitles
    async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        style: &SubtitleStyleConfig,
    ) -> Result<(), MediaError>;
}

pub mod ffmpeg;
pub mod mock;

/*!
 * # subburn
 *
 * A Rust library for generating word-accurate subtitles for videos with
 * WhisperX and burning them in with ffmpeg.
 *
 * ## Features
 *
 * - Extract audio tracks from video files
 * - Transcribe and align speech with the WhisperX CLI (black-box sidecar)
 * - Write SRT files, per segment or word by word
 * - Burn subtitles into a re-encoded copy of the video, with custom fonts
 * - Batch processing with a configurable failure policy
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle building and SRT serialization
 * - `transcribe`: Transcription backends:
 *   - `transcribe::whisperx`: WhisperX CLI sidecar
 *   - `transcribe::mock`: In-memory backend for tests
 * - `media`: Audio/video tool engines:
 *   - `media::ffmpeg`: ffmpeg invocation for extraction and burn-in
 *   - `media::mock`: In-memory engine for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod transcribe;
pub mod media;
pub mod app_controller;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, ProcessOptions, ProcessReport, VideoArtifacts};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use transcribe::{Transcriber, Transcript, TranscriptSegment, WordTiming};
pub use media::MediaEngine;
pub use errors::{AppError, MediaError, TranscriptionError};

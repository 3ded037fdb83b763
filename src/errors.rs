/*!
 * Error types for the subburn application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when invoking external media tools (ffmpeg/ffprobe)
#[derive(Error, Debug)]
pub enum MediaError {
    /// Error when the tool binary cannot be launched
    #[error("Failed to launch {tool}: {message}")]
    ToolNotFound {
        /// Name of the tool binary
        tool: String,
        /// Underlying launch error
        message: String,
    },

    /// Error when the tool exits with a non-zero status
    #[error("{tool} exited with {status}: {stderr}")]
    CommandFailed {
        /// Name of the tool binary
        tool: String,
        /// Exit status description
        status: String,
        /// Filtered stderr output
        stderr: String,
    },

    /// Error when the tool does not finish within the allowed time
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout {
        /// Name of the tool binary
        tool: String,
        /// Timeout that was exceeded
        timeout_secs: u64,
    },

    /// Error when the tool reports success but the expected output is missing or empty
    #[error("Expected output file is missing or empty: {0}")]
    MissingOutput(String),
}

/// Errors that can occur during transcription and alignment
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error when launching or running the transcription backend
    #[error("Transcription backend failed: {0}")]
    BackendFailed(String),

    /// Error when parsing the backend output fails
    #[error("Failed to parse transcription output: {0}")]
    ParseError(String),

    /// Error when the requested language is not usable by the backend
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Error when the backend does not finish within the allowed time
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// Error when the backend produced no segments at all
    #[error("Transcription produced no segments for {0}")]
    EmptyTranscript(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a media tool invocation
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

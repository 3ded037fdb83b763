/*!
 * Tests for transcription backends
 *
 * WhisperX tests only exercise command construction and input validation;
 * nothing here launches the real model.
 */

use std::path::Path;
use anyhow::Result;
use subburn::app_config::{ComputeDevice, TranscriptionTask, WhisperConfig};
use subburn::errors::TranscriptionError;
use subburn::transcribe::Transcriber;
use subburn::transcribe::mock::MockTranscriber;
use subburn::transcribe::whisperx::WhisperXTranscriber;
use crate::common;

fn whisper_config() -> WhisperConfig {
    WhisperConfig::default()
}

/// Test the whisperx command shape with an explicit device
#[test]
fn test_build_args_withCpuDevice_shouldIncludeDeviceFlag() {
    let transcriber = WhisperXTranscriber::new(&whisper_config(), ComputeDevice::Cpu);

    let args = transcriber.build_args(
        Path::new("/tmp/audio.wav"),
        Path::new("/tmp/scratch"),
        "es",
        TranscriptionTask::Transcribe,
    );

    assert_eq!(args[0], "/tmp/audio.wav");
    assert!(args.windows(2).any(|w| w == ["--model", "small"]));
    assert!(args.windows(2).any(|w| w == ["--output_format", "json"]));
    assert!(args.windows(2).any(|w| w == ["--language", "es"]));
    assert!(args.windows(2).any(|w| w == ["--task", "transcribe"]));
    assert!(args.windows(2).any(|w| w == ["--batch_size", "16"]));
    assert!(args.windows(2).any(|w| w == ["--device", "cpu"]));
}

/// Test that the auto device leaves device selection to the tool
#[test]
fn test_build_args_withAutoDevice_shouldOmitDeviceFlag() {
    let transcriber = WhisperXTranscriber::new(&whisper_config(), ComputeDevice::Auto);

    let args = transcriber.build_args(
        Path::new("audio.wav"),
        Path::new("scratch"),
        "es",
        TranscriptionTask::Transcribe,
    );

    assert!(!args.contains(&"--device".to_string()));
}

/// Test that the translate task and compute type are passed through
#[test]
fn test_build_args_withTranslateAndComputeType_shouldIncludeBoth() {
    let mut config = whisper_config();
    config.compute_type = Some("int8".to_string());
    let transcriber = WhisperXTranscriber::new(&config, ComputeDevice::Cuda);

    let args = transcriber.build_args(
        Path::new("audio.wav"),
        Path::new("scratch"),
        "en",
        TranscriptionTask::Translate,
    );

    assert!(args.windows(2).any(|w| w == ["--task", "translate"]));
    assert!(args.windows(2).any(|w| w == ["--compute_type", "int8"]));
    assert!(args.windows(2).any(|w| w == ["--device", "cuda"]));
}

/// Test that an unusable language fails before the backend is ever launched
#[tokio::test]
async fn test_transcribe_withInvalidLanguage_shouldFailWithUnsupportedLanguage() {
    let transcriber = WhisperXTranscriber::new(&whisper_config(), ComputeDevice::Auto);

    let result = transcriber
        .transcribe(Path::new("audio.wav"), "klingon", TranscriptionTask::Transcribe)
        .await;

    assert!(matches!(result, Err(TranscriptionError::UnsupportedLanguage(_))));
}

/// Test the working mock transcript shape
#[tokio::test]
async fn test_mock_transcriber_withWorkingBehavior_shouldReturnOrderedSegments() -> Result<()> {
    let transcriber = MockTranscriber::working();

    let transcript = transcriber
        .transcribe(Path::new("audio.wav"), "en", TranscriptionTask::Transcribe)
        .await?;

    assert!(!transcript.segments.is_empty());
    for pair in transcript.segments.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
    assert_eq!(transcriber.call_count(), 1);

    Ok(())
}

/// Test the failing mock
#[tokio::test]
async fn test_mock_transcriber_withFailingBehavior_shouldReturnBackendError() {
    let transcriber = MockTranscriber::failing();

    let result = transcriber
        .transcribe(Path::new("audio.wav"), "en", TranscriptionTask::Transcribe)
        .await;

    assert!(matches!(result, Err(TranscriptionError::BackendFailed(_))));
}

/// Test the empty mock
#[tokio::test]
async fn test_mock_transcriber_withEmptyBehavior_shouldReturnEmptyTranscriptError() {
    let transcriber = MockTranscriber::empty();

    let result = transcriber
        .transcribe(Path::new("audio.wav"), "en", TranscriptionTask::Transcribe)
        .await;

    assert!(matches!(result, Err(TranscriptionError::EmptyTranscript(_))));
}

/// Test a custom canned transcript
#[tokio::test]
async fn test_mock_transcriber_withCustomTranscript_shouldReturnIt() -> Result<()> {
    let custom = common::sample_transcript();
    let transcriber = MockTranscriber::working().with_transcript(custom.clone());

    let transcript = transcriber
        .transcribe(Path::new("audio.wav"), "en", TranscriptionTask::Transcribe)
        .await?;

    assert_eq!(transcript, custom);
    Ok(())
}

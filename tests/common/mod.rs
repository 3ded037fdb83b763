/*!
 * Common test utilities for the subburn test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use subburn::transcribe::{Transcript, TranscriptSegment, WordTiming};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a placeholder video file; the mock media engine only checks existence
pub fn create_fake_video(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really a video")
}

/// Creates a sample subtitle file for testing
#[allow(dead_code)]
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// A transcript with two segments and aligned words, including one word the
/// aligner could not time
pub fn sample_transcript() -> Transcript {
    Transcript {
        language: "en".to_string(),
        segments: vec![
            TranscriptSegment {
                start: 1.0,
                end: 3.5,
                text: "Twelve angry men".to_string(),
                words: vec![
                    WordTiming { word: "Twelve".to_string(), start: None, end: None },
                    WordTiming { word: "angry".to_string(), start: Some(1.8), end: Some(2.4) },
                    WordTiming { word: "men".to_string(), start: Some(2.5), end: Some(3.5) },
                ],
            },
            TranscriptSegment {
                start: 4.0,
                end: 6.0,
                text: "sat down".to_string(),
                words: vec![
                    WordTiming { word: "sat".to_string(), start: Some(4.0), end: Some(4.9) },
                    WordTiming { word: "down".to_string(), start: Some(5.0), end: Some(6.0) },
                ],
            },
        ],
    }
}

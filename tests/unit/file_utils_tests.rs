/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use subburn::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(test_file.to_str().unwrap()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("test_subdir");

    FileManager::ensure_dir(test_subdir.to_str().unwrap())?;

    assert!(test_subdir.exists());
    assert!(test_subdir.is_dir());

    Ok(())
}

/// Test that file_stem strips directory and extension
#[test]
fn test_file_stem_withNestedPath_shouldReturnStem() {
    assert_eq!(FileManager::file_stem("/videos/talk.show.mp4"), "talk.show");
    assert_eq!(FileManager::file_stem("clip.mkv"), "clip");
}

/// Test that generate_output_path creates the correct SRT path
#[test]
fn test_generate_output_path_withNoSuffix_shouldCreateSrtPath() {
    let input_file = Path::new("/tmp/input/video.mkv");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::generate_output_path(input_file, output_dir, None, "srt");

    assert_eq!(output_path, Path::new("/tmp/output/video.srt"));
}

/// Test that generate_output_path inserts the suffix before the extension
#[test]
fn test_generate_output_path_withSuffix_shouldCreateBurnedPath() {
    let input_file = Path::new("/tmp/input/video.mkv");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::generate_output_path(input_file, output_dir, Some("subtitled"), "mp4");

    assert_eq!(output_path, Path::new("/tmp/output/video.subtitled.mp4"));
}

/// Test that find_video_files finds nested videos and ignores other files
#[test]
fn test_find_video_files_withMixedTree_shouldReturnOnlyVideos() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    common::create_fake_video(&root, "a.mp4")?;
    common::create_test_file(&root, "notes.txt", "nothing")?;

    let nested = root.join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_fake_video(&nested, "b.MKV")?;

    let videos = FileManager::find_video_files(&root)?;

    assert_eq!(videos.len(), 2);
    assert!(videos.iter().any(|v| v.ends_with("a.mp4")));
    assert!(videos.iter().any(|v| v.ends_with("b.MKV")));

    Ok(())
}

/// Test that find_files matches extensions case-insensitively
#[test]
fn test_find_files_withUppercaseExtension_shouldMatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_test_file(&root, "subs.SRT", "1\n")?;

    let files = FileManager::find_files(&root, "srt")?;

    assert_eq!(files.len(), 1);
    Ok(())
}

/// Test that move_file moves content and removes the source
#[test]
fn test_move_file_withValidSource_shouldMoveContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&root, "from.tmp", "payload")?;
    let target = root.join("into").join("to.tmp");

    FileManager::move_file(&source, &target)?;

    assert!(!source.exists());
    assert_eq!(FileManager::read_to_string(&target)?, "payload");

    Ok(())
}

/// Test that move_file fails for a missing source
#[test]
fn test_move_file_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("to.tmp");

    assert!(FileManager::move_file("/no/such/file.tmp", &target).is_err());

    Ok(())
}

/// Test that detect_file_type recognizes subtitle files by extension
#[test]
fn test_detect_file_type_withSrtExtension_shouldReturnSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "video.srt")?;

    assert_eq!(FileManager::detect_file_type(&subtitle)?, FileType::Subtitle);

    Ok(())
}

/// Test that detect_file_type recognizes video files by extension
#[test]
fn test_detect_file_type_withVideoExtension_shouldReturnVideo() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_fake_video(&temp_dir.path().to_path_buf(), "movie.webm")?;

    assert_eq!(FileManager::detect_file_type(&video)?, FileType::Video);

    Ok(())
}

/// Test that detect_file_type fails for a missing file
#[test]
fn test_detect_file_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("/no/such/file.mp4").is_err());
}

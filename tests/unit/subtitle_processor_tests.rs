/*!
 * Tests for subtitle building and SRT serialization
 */

use anyhow::Result;
use subburn::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use subburn::transcribe::{Transcript, TranscriptSegment, WordTiming};
use crate::common;

/// Test SRT timestamp formatting
#[test]
fn test_format_timestamp_withVariousValues_shouldFormatCorrectly() {
    assert_eq!(SubtitleEntry::format_timestamp(0), "00:00:00,000");
    assert_eq!(SubtitleEntry::format_timestamp(1_500), "00:00:01,500");
    assert_eq!(SubtitleEntry::format_timestamp(61_000), "00:01:01,000");
    assert_eq!(SubtitleEntry::format_timestamp(3_661_042), "01:01:01,042");
}

/// Test SRT timestamp parsing
#[test]
fn test_parse_timestamp_withValidInput_shouldReturnMs() -> Result<()> {
    assert_eq!(SubtitleEntry::parse_timestamp("00:00:01,500")?, 1_500);
    assert_eq!(SubtitleEntry::parse_timestamp("01:01:01,042")?, 3_661_042);
    Ok(())
}

/// Test that malformed timestamps are rejected
#[test]
fn test_parse_timestamp_withInvalidInput_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("not a timestamp").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:99:00,000").is_err());
}

/// Test entry validation
#[test]
fn test_new_validated_withBadRanges_shouldFail() {
    assert!(SubtitleEntry::new_validated(1, 1000, 1000, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 2000, 1000, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1000, 2000, "   ".to_string()).is_err());
}

/// Test the SRT block format of a single entry
#[test]
fn test_entry_display_shouldRenderSrtBlock() -> Result<()> {
    let entry = SubtitleEntry::new_validated(3, 1_000, 2_500, "Hello".to_string())?;

    let rendered = format!("{}", entry);

    assert_eq!(rendered, "3\n00:00:01,000 --> 00:00:02,500\nHello\n\n");
    Ok(())
}

/// Test sentence-level conversion from a transcript
#[test]
fn test_from_transcript_withSegmentMode_shouldProduceOneEntryPerSegment() {
    let transcript = common::sample_transcript();

    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, false);

    assert_eq!(collection.entries.len(), 2);
    assert_eq!(collection.language, "en");
    assert_eq!(collection.entries[0].seq_num, 1);
    assert_eq!(collection.entries[0].start_time_ms, 1_000);
    assert_eq!(collection.entries[0].end_time_ms, 3_500);
    assert_eq!(collection.entries[0].text, "Twelve angry men");
    assert_eq!(collection.entries[1].text, "sat down");
}

/// Test word-level conversion from a transcript
#[test]
fn test_from_transcript_withWordMode_shouldProduceOneEntryPerAlignedWord() {
    let transcript = common::sample_transcript();

    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, true);

    // "Twelve" has no aligned timing and is dropped
    assert_eq!(collection.entries.len(), 4);
    let texts: Vec<&str> = collection.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["angry", "men", "sat", "down"]);
}

/// Test that word mode never produces fewer entries than segment mode drops to
#[test]
fn test_from_transcript_wordEntries_shouldStayWithinParentSegment() {
    let transcript = common::sample_transcript();

    let words = SubtitleCollection::from_transcript("video.mp4", &transcript, true);

    for entry in &words.entries {
        let parent = transcript
            .segments
            .iter()
            .find(|s| s.text.contains(&entry.text))
            .expect("word should come from a segment");
        let parent_start = (parent.start * 1000.0).round() as u64;
        let parent_end = (parent.end * 1000.0).round() as u64;
        assert!(entry.start_time_ms >= parent_start);
        assert!(entry.end_time_ms <= parent_end);
        assert!(entry.start_time_ms < entry.end_time_ms);
    }
}

/// Test that word timings outside the parent segment are clamped into it
#[test]
fn test_from_transcript_withWordOutsideSegment_shouldClamp() {
    let transcript = Transcript {
        language: "en".to_string(),
        segments: vec![TranscriptSegment {
            start: 2.0,
            end: 4.0,
            text: "late word".to_string(),
            words: vec![
                WordTiming { word: "late".to_string(), start: Some(1.0), end: Some(2.5) },
                WordTiming { word: "word".to_string(), start: Some(3.5), end: Some(9.0) },
            ],
        }],
    };

    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, true);

    assert_eq!(collection.entries.len(), 2);
    assert_eq!(collection.entries[0].start_time_ms, 2_000);
    assert_eq!(collection.entries[1].end_time_ms, 4_000);
}

/// Test that entries come out ordered and renumbered even if segments are not
#[test]
fn test_from_transcript_withUnorderedSegments_shouldSortByStartTime() {
    let transcript = Transcript {
        language: "en".to_string(),
        segments: vec![
            TranscriptSegment { start: 5.0, end: 6.0, text: "second".to_string(), words: vec![] },
            TranscriptSegment { start: 1.0, end: 2.0, text: "first".to_string(), words: vec![] },
        ],
    };

    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, false);

    assert_eq!(collection.entries[0].text, "first");
    assert_eq!(collection.entries[0].seq_num, 1);
    assert_eq!(collection.entries[1].text, "second");
    assert_eq!(collection.entries[1].seq_num, 2);
}

/// Test that the SRT arrow inside model text cannot corrupt the file
#[test]
fn test_from_transcript_withArrowInText_shouldSanitize() {
    let transcript = Transcript {
        language: "en".to_string(),
        segments: vec![TranscriptSegment {
            start: 0.0,
            end: 1.0,
            text: "go --> there".to_string(),
            words: vec![],
        }],
    };

    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, false);

    assert_eq!(collection.entries[0].text, "go -> there");
}

/// Test that a written SRT file parses back to the same entries
#[test]
fn test_write_to_srt_withEntries_shouldProduceParseableFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt_path = temp_dir.path().join("out.srt");

    let transcript = common::sample_transcript();
    let collection = SubtitleCollection::from_transcript("video.mp4", &transcript, false);
    collection.write_to_srt(&srt_path)?;

    let content = std::fs::read_to_string(&srt_path)?;
    let parsed = SubtitleCollection::parse_srt_string(&content)?;

    assert_eq!(parsed.len(), collection.entries.len());
    for (written, parsed) in collection.entries.iter().zip(parsed.iter()) {
        assert_eq!(written.start_time_ms, parsed.start_time_ms);
        assert_eq!(written.end_time_ms, parsed.end_time_ms);
        assert_eq!(written.text, parsed.text);
    }

    Ok(())
}

/// Test parsing a well-formed SRT string
#[test]
fn test_parse_srt_string_withValidContent_shouldReturnEntries() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nFirst line.\n\n2\n00:00:05,000 --> 00:00:09,000\nSecond line.\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "First line.");
    assert_eq!(entries[1].start_time_ms, 5_000);
    Ok(())
}

/// Test that parsing garbage fails rather than returning an empty collection
#[test]
fn test_parse_srt_string_withGarbage_shouldFail() {
    assert!(SubtitleCollection::parse_srt_string("no subtitles here").is_err());
}

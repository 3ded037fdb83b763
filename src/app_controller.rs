use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{BatchFailurePolicy, Config, TranscriptionTask};
use crate::file_utils::FileManager;
use crate::media::MediaEngine;
use crate::media::ffmpeg::FfmpegEngine;
use crate::subtitle_processor::SubtitleCollection;
use crate::transcribe::Transcriber;
use crate::transcribe::whisperx::WhisperXTranscriber;

// @module: Application controller for the subtitle pipeline

/// Suffix inserted into burned-video filenames so the output never
/// collides with an input living in the same directory
const BURNED_SUFFIX: &str = "subtitled";

/// Per-call options for [`Controller::process_videos`]
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Keep the SRT file in the output directory
    pub output_srt: bool,

    /// Only produce SRT files, skip burn-in entirely
    pub srt_only: bool,

    /// Transcribe in the source language or translate to English
    pub task: TranscriptionTask,

    /// One subtitle entry per aligned word instead of per segment
    pub word_by_word: bool,

    /// Directory with the custom font file, if any
    pub custom_font_dir: Option<PathBuf>,

    /// Internal name of the custom font, if any
    pub custom_font_name: Option<String>,

    /// Overwrite outputs that already exist
    pub force_overwrite: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output_srt: true,
            srt_only: false,
            task: TranscriptionTask::Transcribe,
            word_by_word: false,
            custom_font_dir: None,
            custom_font_name: None,
            force_overwrite: false,
        }
    }
}

/// Artifact paths produced for one video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoArtifacts {
    /// SRT file in the output directory, when requested
    pub srt: Option<PathBuf>,

    /// Burned video in the output directory, unless srt_only
    pub video: Option<PathBuf>,
}

/// A video the skip policy carried past a failure
#[derive(Debug)]
pub struct VideoFailure {
    /// The input video that failed
    pub path: PathBuf,

    /// Description of the failing stage
    pub error: String,
}

/// Result of processing a batch of videos
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Mapping from input video path to the artifacts produced for it
    pub artifacts: HashMap<PathBuf, VideoArtifacts>,

    /// Videos that failed, only populated under the skip policy
    pub failures: Vec<VideoFailure>,
}

impl ProcessReport {
    /// Whether every input produced its artifacts
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Main application controller for the subtitle pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Transcription backend
    transcriber: Box<dyn Transcriber>,

    // @field: Media tool engine
    media: Box<dyn MediaEngine>,
}

impl Controller {
    // @method: Create a controller with the production backends
    pub fn with_config(config: Config) -> Result<Self> {
        let transcriber = Box::new(WhisperXTranscriber::new(&config.whisper, config.device));
        let media = Box::new(FfmpegEngine::new());
        Ok(Self::with_backends(config, transcriber, media))
    }

    /// Create a controller with explicit backends (used by tests)
    pub fn with_backends(
        config: Config,
        transcriber: Box<dyn Transcriber>,
        media: Box<dyn MediaEngine>,
    ) -> Self {
        Self {
            config,
            transcriber,
            media,
        }
    }

    /// The configuration this controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline over a batch of videos
    ///
    /// Videos are processed sequentially. Per video: extract audio,
    /// transcribe and align, write the SRT, and burn it in unless
    /// `srt_only`. The batch failure policy from the configuration decides
    /// whether a failing video aborts the batch or is recorded and skipped.
    pub async fn process_videos(
        &self,
        video_paths: &[PathBuf],
        options: &ProcessOptions,
    ) -> Result<ProcessReport> {
        if video_paths.is_empty() {
            return Err(anyhow!("No input videos to process"));
        }

        FileManager::ensure_dir(&self.config.output_dir)?;

        let start_time = std::time::Instant::now();
        let mut report = ProcessReport::default();

        info!(
            "Processing {} video(s) with {} ({} device) into {:?}",
            video_paths.len(),
            self.transcriber.name(),
            self.config.device.display_name(),
            self.config.output_dir
        );

        let progress_bar = ProgressBar::new(video_paths.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} videos ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        for video_path in video_paths {
            let file_name = video_path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Processing: {}", file_name));

            match self.process_one(video_path, options).await {
                Ok(artifacts) => {
                    report.artifacts.insert(video_path.clone(), artifacts);
                }
                Err(e) => match self.config.on_error {
                    BatchFailurePolicy::Abort => {
                        progress_bar.finish_and_clear();
                        return Err(e.context(format!("Failed to process {:?}", video_path)));
                    }
                    BatchFailurePolicy::Skip => {
                        error!("Skipping {:?}: {:#}", video_path, e);
                        report.failures.push(VideoFailure {
                            path: video_path.clone(),
                            error: format!("{:#}", e),
                        });
                    }
                },
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        info!(
            "Finished {} of {} video(s) in {}",
            report.artifacts.len(),
            video_paths.len(),
            Self::format_duration(start_time.elapsed())
        );
        if !report.failures.is_empty() {
            warn!("{} video(s) failed, see log above", report.failures.len());
        }

        Ok(report)
    }

    /// Run the linear pipeline for a single video
    async fn process_one(&self, video_path: &Path, options: &ProcessOptions) -> Result<VideoArtifacts> {
        if !FileManager::file_exists(video_path) {
            return Err(anyhow!("Input video does not exist: {:?}", video_path));
        }

        let stem = FileManager::file_stem(video_path);
        let temp_dir = std::env::temp_dir();

        // The SRT only lands in the output directory when asked for;
        // otherwise it lives in the temp dir just long enough to burn it
        let srt_path = if options.output_srt {
            FileManager::generate_output_path(video_path, &self.config.output_dir, None, "srt")
        } else {
            temp_dir.join(format!("{}.srt", stem))
        };
        let burned_path = FileManager::generate_output_path(
            video_path,
            &self.config.output_dir,
            Some(BURNED_SUFFIX),
            "mp4",
        );

        // Skip when everything this call would produce is already on disk
        if !options.force_overwrite {
            let srt_done = !options.output_srt || srt_path.exists();
            let burn_done = options.srt_only || burned_path.exists();
            if srt_done && burn_done && (options.output_srt || !options.srt_only) {
                warn!(
                    "Skipping {:?}, outputs already exist (use -f to force overwrite)",
                    video_path
                );
                return Ok(VideoArtifacts {
                    srt: options.output_srt.then(|| srt_path),
                    video: (!options.srt_only).then(|| burned_path),
                });
            }
        }

        let stage_start = std::time::Instant::now();

        // Stage 1: audio extraction
        debug!("Extracting audio from {:?}", video_path);
        let audio_path = temp_dir.join(format!("{}.wav", stem));
        self.media
            .extract_audio(video_path, &audio_path)
            .await
            .context("Audio extraction failed")?;

        // Stage 2: transcription and alignment
        info!("Transcribing {:?}…", video_path.file_name().unwrap_or_default());
        let transcript = self
            .transcriber
            .transcribe(&audio_path, &self.config.language, options.task)
            .await
            .with_context(|| format!("Transcription failed for {:?}", video_path))?;
        debug!(
            "Transcription produced {} segment(s) in {}",
            transcript.segments.len(),
            Self::format_duration(stage_start.elapsed())
        );

        // Stage 3: SRT serialization
        let subtitles = SubtitleCollection::from_transcript(video_path, &transcript, options.word_by_word);
        if subtitles.entries.is_empty() {
            let _ = std::fs::remove_file(&audio_path);
            return Err(anyhow!("Transcript yielded no usable subtitle entries for {:?}", video_path));
        }
        subtitles.write_to_srt(&srt_path)?;
        if options.output_srt {
            info!("Success: {}", srt_path.display());
        }

        // Stage 4: burn-in, via a temp file moved into place so a failed
        // encode never leaves a half-written video in the output directory
        let mut artifacts = VideoArtifacts {
            srt: options.output_srt.then(|| srt_path.clone()),
            video: None,
        };

        if !options.srt_only {
            let style = self.config.style.with_font(
                options.custom_font_dir.clone(),
                options.custom_font_name.clone(),
            );
            let temp_out = temp_dir.join(format!("{}.{}.tmp.mp4", stem, BURNED_SUFFIX));

            let burn_result = self
                .media
                .burn_subtitles(video_path, &srt_path, &temp_out, &style)
                .await
                .context("Subtitle burn-in failed");

            match burn_result {
                Ok(()) => {
                    FileManager::move_file(&temp_out, &burned_path)?;
                    info!("Success: {}", burned_path.display());
                    artifacts.video = Some(burned_path);
                }
                Err(e) => {
                    let _ = std::fs::remove_file(&temp_out);
                    Self::cleanup_temp(&audio_path, &srt_path, options.output_srt);
                    return Err(e);
                }
            }
        }

        Self::cleanup_temp(&audio_path, &srt_path, options.output_srt);

        Ok(artifacts)
    }

    /// Remove per-video scratch files, keeping the SRT if it was requested
    fn cleanup_temp(audio_path: &Path, srt_path: &Path, output_srt: bool) {
        if let Err(e) = std::fs::remove_file(audio_path) {
            debug!("Could not remove temp audio {:?}: {}", audio_path, e);
        }
        if !output_srt {
            if let Err(e) = std::fs::remove_file(srt_path) {
                debug!("Could not remove temp subtitle {:?}: {}", srt_path, e);
            }
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

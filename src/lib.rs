//! Video Summarizer - fetch a YouTube caption transcript and summarize it with Gemini
//!
//! This library resolves a video identifier from a user-supplied link, pulls the caption
//! transcript for that video, and asks a generative-language service for a bullet-point summary.
//! The `web` module serves the whole flow as a small interactive page.

pub mod cli;
pub mod config;
pub mod link;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod transcript;
pub mod utils;
pub mod web;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use link::{parse_video_id, thumbnail_url, VideoId};
pub use pipeline::{PipelineReport, SummaryPipeline};
pub use summarize::{FallbackOutcome, ModelFallback, Summarizer, Summary};
pub use transcript::{CaptionService, CaptionTrack, Transcript, TranscriptFetcher, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Failures a single summarize request can end in
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizerError {
    #[error("Invalid link format: {0}")]
    InvalidLinkFormat(String),

    #[error("No transcript: {0}")]
    NoTranscript(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Transcripts disabled: {0}")]
    TranscriptsDisabled(String),

    #[error("Summarization failed: {0}")]
    SummarizationFailure(String),

    #[error("Transcript fetch failed: {0}")]
    UnknownFetchError(String),
}

impl SummarizerError {
    /// Short stable name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizerError::InvalidLinkFormat(_) => "invalid_link_format",
            SummarizerError::NoTranscript(_) => "no_transcript",
            SummarizerError::VideoUnavailable(_) => "video_unavailable",
            SummarizerError::TranscriptsDisabled(_) => "transcripts_disabled",
            SummarizerError::SummarizationFailure(_) => "summarization_failure",
            SummarizerError::UnknownFetchError(_) => "unknown_fetch_error",
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            SummarizerError::InvalidLinkFormat(detail) => {
                format!("Invalid YouTube video link format. {}", detail)
            }
            SummarizerError::NoTranscript(detail) => {
                format!("No transcript found for this video. {}", detail)
            }
            SummarizerError::VideoUnavailable(detail) => {
                format!(
                    "Video is unavailable (removed, private or region-blocked). {}",
                    detail
                )
            }
            SummarizerError::TranscriptsDisabled(detail) => {
                format!("Transcripts are disabled for this video by the uploader. {}", detail)
            }
            SummarizerError::SummarizationFailure(detail) => {
                format!("Summary generation failed. Please try again. {}", detail)
            }
            SummarizerError::UnknownFetchError(detail) => {
                format!("An error occurred while fetching the transcript: {}", detail)
            }
        }
    }
}

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::link::{parse_video_id, thumbnail_url, VideoId};
use crate::summarize::gemini::GeminiClient;
use crate::summarize::{ModelFallback, Summarizer, Summary, SummaryService};
use crate::transcript::youtube::YoutubeCaptionService;
use crate::transcript::{CaptionService, Transcript, TranscriptFetcher};
use crate::SummarizerError;

/// Identifier and thumbnail resolved from the submitted link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedVideo {
    pub id: VideoId,
    pub thumbnail_url: String,
}

/// What was learned about the transcript, without the text itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptStats {
    pub language_code: String,
    pub is_generated: bool,
    pub segments: usize,
    pub chars: usize,
    pub duration_secs: Option<f64>,
}

impl TranscriptStats {
    fn of(transcript: &Transcript) -> Self {
        Self {
            language_code: transcript.language_code.clone(),
            is_generated: transcript.is_generated,
            segments: transcript.segments.len(),
            chars: transcript.text.chars().count(),
            duration_secs: transcript.segments.last().map(|s| s.start + s.duration),
        }
    }
}

/// Everything one request produced; earlier steps survive a later failure
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub link: String,
    pub video: Option<ResolvedVideo>,
    pub transcript: Option<TranscriptStats>,
    pub summary: Option<Summary>,
    pub error: Option<SummarizerError>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl PipelineReport {
    fn new(link: &str) -> Self {
        Self {
            link: link.trim().to_string(),
            video: None,
            transcript: None,
            summary: None,
            error: None,
            completed_at: chrono::Utc::now(),
        }
    }

    /// Report for a request that never reached the pipeline
    pub fn rejected(link: &str, error: SummarizerError) -> Self {
        Self::new(link).fail(error)
    }

    fn fail(mut self, error: SummarizerError) -> Self {
        tracing::warn!(link = %self.link, kind = error.kind(), "Request failed: {}", error);
        self.error = Some(error);
        self.finish()
    }

    fn finish(mut self) -> Self {
        self.completed_at = chrono::Utc::now();
        self
    }
}

/// Link → thumbnail → transcript → summary, one request at a time
#[derive(Clone)]
pub struct SummaryPipeline {
    fetcher: TranscriptFetcher,
    summaries: SummaryService,
}

impl SummaryPipeline {
    /// Build the pipeline with the production captioning and summarization clients
    pub fn new(config: &Config) -> crate::Result<Self> {
        let captions = Arc::new(YoutubeCaptionService::new(&config.transcript)?);
        let summarizer = Arc::new(GeminiClient::new(&config.gemini)?);
        Self::with_services(captions, summarizer, config)
    }

    pub fn with_services(
        captions: Arc<dyn CaptionService>,
        summarizer: Arc<dyn Summarizer>,
        config: &Config,
    ) -> crate::Result<Self> {
        let fallback = ModelFallback::new(config.gemini.models.clone())?;

        Ok(Self {
            fetcher: TranscriptFetcher::new(captions, config.transcript.languages.clone()),
            summaries: SummaryService::new(summarizer, fallback),
        })
    }

    /// Resolve the link only; no network calls
    pub fn preview(&self, link: &str) -> PipelineReport {
        let mut report = PipelineReport::new(link);

        match resolve(link) {
            Ok(video) => {
                report.video = Some(video);
                report.finish()
            }
            Err(e) => report.fail(e),
        }
    }

    /// Run the whole flow for one link
    pub async fn run(&self, link: &str) -> PipelineReport {
        let mut report = PipelineReport::new(link);

        let video = match resolve(link) {
            Ok(video) => video,
            Err(e) => return report.fail(e),
        };
        let id = video.id.clone();
        report.video = Some(video);

        tracing::info!(video_id = %id, "Fetching transcript");
        let transcript = match self.fetcher.fetch(&id).await {
            Ok(transcript) => transcript,
            Err(e) => return report.fail(e),
        };
        report.transcript = Some(TranscriptStats::of(&transcript));

        tracing::info!(video_id = %id, chars = transcript.text.len(), "Summarizing transcript");
        match self.summaries.summarize(&transcript.text).await {
            Ok(summary) => {
                tracing::info!(video_id = %id, model = %summary.model, "Summary ready");
                report.summary = Some(summary);
                report.finish()
            }
            Err(e) => report.fail(e),
        }
    }
}

fn resolve(link: &str) -> Result<ResolvedVideo, SummarizerError> {
    let id = parse_video_id(link)?;
    Ok(ResolvedVideo {
        thumbnail_url: thumbnail_url(&id),
        id,
    })
}

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::{CaptionService, CaptionTrack, TranscriptSegment};
use crate::config::TranscriptConfig;
use crate::link::VideoId;
use crate::SummarizerError;

/// Caption service backed by `yt_transcript_rs`
pub struct YoutubeCaptionService {
    api: YouTubeTranscriptApi,
    timeout: Duration,
}

impl YoutubeCaptionService {
    pub fn new(config: &TranscriptConfig) -> crate::Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("Failed to create transcript client: {}", e))?;

        Ok(Self {
            api,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl CaptionService for YoutubeCaptionService {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, SummarizerError> {
        tracing::debug!(video_id = %video_id, "Listing caption tracks");

        let list = with_deadline(self.timeout, self.api.list_transcripts(video_id.as_str()))
            .await?
            .map_err(|e| retrieval_error(&e))?;

        Ok(list
            .transcripts()
            .map(|t| CaptionTrack {
                language_code: t.language_code().to_string(),
                language_name: t.language().to_string(),
                is_generated: t.is_generated(),
            })
            .collect())
    }

    async fn fetch_segments(
        &self,
        video_id: &VideoId,
        track: &CaptionTrack,
    ) -> Result<Vec<TranscriptSegment>, SummarizerError> {
        tracing::debug!(video_id = %video_id, language = %track.language_code, "Fetching captions");

        let languages = [track.language_code.as_str()];
        let fetched = with_deadline(
            self.timeout,
            self.api.fetch_transcript(video_id.as_str(), &languages, false),
        )
        .await?
        .map_err(|e| retrieval_error(&e))?;

        Ok(fetched
            .snippets
            .into_iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| TranscriptSegment {
                start: s.start,
                duration: s.duration,
                text: s.text,
            })
            .collect())
    }
}

/// Await `fut`, giving up with `UnknownFetchError` once `timeout` elapses
pub async fn with_deadline<F: Future>(timeout: Duration, fut: F) -> Result<F::Output, SummarizerError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        SummarizerError::UnknownFetchError(format!(
            "Request to the captioning service timed out after {}s",
            timeout.as_secs()
        ))
    })
}

fn retrieval_error(e: &CouldNotRetrieveTranscript) -> SummarizerError {
    map_reason(e.reason.as_ref(), e.to_string())
}

/// Map a retrieval failure reason onto the error taxonomy
pub fn map_reason(reason: Option<&CouldNotRetrieveTranscriptReason>, detail: String) -> SummarizerError {
    use CouldNotRetrieveTranscriptReason as Reason;

    match reason {
        Some(Reason::TranscriptsDisabled { .. }) => SummarizerError::TranscriptsDisabled(detail),
        Some(Reason::NoTranscriptFound { .. }) => SummarizerError::NoTranscript(detail),
        Some(
            Reason::VideoUnavailable { .. }
            | Reason::VideoUnplayable { .. }
            | Reason::AgeRestricted { .. }
            | Reason::InvalidVideoId { .. },
        ) => SummarizerError::VideoUnavailable(detail),
        Some(Reason::IpBlocked { .. } | Reason::RequestBlocked { .. }) => {
            SummarizerError::UnknownFetchError(format!("Request blocked by YouTube: {}", detail))
        }
        _ if detail.contains("429") => SummarizerError::UnknownFetchError(format!(
            "Too many requests to the captioning service: {}",
            detail
        )),
        _ => SummarizerError::UnknownFetchError(detail),
    }
}

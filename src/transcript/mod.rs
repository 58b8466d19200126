use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::link::VideoId;
use crate::SummarizerError;

pub mod youtube;

/// One timestamped caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Caption text, verbatim
    pub text: String,
}

/// A caption track the service lists for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Language code (en, en-US, de, ...)
    pub language_code: String,

    /// Human-readable language name
    pub language_name: String,

    /// Whether the track was generated by speech recognition
    pub is_generated: bool,
}

/// Transcript text assembled from a single caption track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language_code: String,
    pub is_generated: bool,
    pub segments: Vec<TranscriptSegment>,

    /// Segment texts joined by a single space, in chronological order
    pub text: String,
}

/// External captioning service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// List every caption track available for the video, in service order
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, SummarizerError>;

    /// Download the segments of one track, in chronological order
    async fn fetch_segments(
        &self,
        video_id: &VideoId,
        track: &CaptionTrack,
    ) -> Result<Vec<TranscriptSegment>, SummarizerError>;
}

/// Pick the track for the first preferred language that is available, else the first track.
///
/// A language matches a track whose code equals it or carries it as the primary subtag
/// (`en` matches `en-GB`). Within one language a manually created track wins over a generated one.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    for lang in languages {
        let lang = lang.to_lowercase();
        let matches_lang = |track: &&CaptionTrack| {
            let code = track.language_code.to_lowercase();
            code == lang || code.starts_with(&format!("{}-", lang))
        };

        let manual = tracks.iter().filter(matches_lang).find(|t| !t.is_generated);
        if let Some(track) = manual.or_else(|| tracks.iter().find(matches_lang)) {
            return Some(track);
        }
    }

    tracks.first()
}

/// Join segment texts with a single space and nothing else
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetches and assembles transcripts through a [`CaptionService`]
#[derive(Clone)]
pub struct TranscriptFetcher {
    service: Arc<dyn CaptionService>,
    languages: Vec<String>,
}

impl TranscriptFetcher {
    pub fn new(service: Arc<dyn CaptionService>, languages: Vec<String>) -> Self {
        Self { service, languages }
    }

    pub async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, SummarizerError> {
        let result = self.fetch_inner(video_id).await;

        if let Err(e) = &result {
            tracing::warn!(video_id = %video_id, kind = e.kind(), "Transcript fetch failed: {}", e);
        }

        result
    }

    async fn fetch_inner(&self, video_id: &VideoId) -> Result<Transcript, SummarizerError> {
        let tracks = self.service.list_tracks(video_id).await?;

        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            SummarizerError::NoTranscript(format!("No caption tracks listed for video {}", video_id))
        })?;

        tracing::info!(
            video_id = %video_id,
            language = %track.language_code,
            generated = track.is_generated,
            available = tracks.len(),
            "Selected caption track"
        );

        let segments = self.service.fetch_segments(video_id, track).await?;
        if segments.is_empty() {
            return Err(SummarizerError::NoTranscript(format!(
                "Caption track '{}' for video {} is empty",
                track.language_code, video_id
            )));
        }

        Ok(Transcript {
            video_id: video_id.clone(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            text: join_segments(&segments),
            segments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;

    fn track(code: &str, generated: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            language_name: code.to_string(),
            is_generated: generated,
        }
    }

    fn segment(start: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment { start, duration: 1.0, text: text.to_string() }
    }

    fn video() -> VideoId {
        "https://youtu.be/dQw4w9WgXcQ".parse().unwrap()
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_select_prefers_requested_language() {
        let tracks = vec![track("de", false), track("en", false)];
        assert_eq!(select_track(&tracks, &langs(&["en"])).unwrap().language_code, "en");
    }

    #[test]
    fn test_select_prefers_manual_over_generated() {
        let tracks = vec![track("en", true), track("en-GB", false)];
        let chosen = select_track(&tracks, &langs(&["en"])).unwrap();
        assert!(!chosen.is_generated);
        assert_eq!(chosen.language_code, "en-GB");
    }

    #[test]
    fn test_select_falls_back_to_first_track() {
        let tracks = vec![track("fr", true), track("de", false)];
        assert_eq!(select_track(&tracks, &langs(&["en"])).unwrap().language_code, "fr");
        assert!(select_track(&[], &langs(&["en"])).is_none());
    }

    #[test]
    fn test_join_keeps_text_verbatim() {
        let segments = vec![segment(0.0, "Hello"), segment(1.0, "Hello"), segment(2.0, "world,")];
        assert_eq!(join_segments(&segments), "Hello Hello world,");
    }

    #[tokio::test]
    async fn test_fetch_concatenates_segments() {
        let mut service = MockCaptionService::new();
        service
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("en", false)]));
        service
            .expect_fetch_segments()
            .with(always(), always())
            .returning(|_, _| Ok(vec![segment(0.0, "Hello"), segment(1.0, "world")]));

        let fetcher = TranscriptFetcher::new(Arc::new(service), langs(&["en"]));
        let transcript = fetcher.fetch(&video()).await.unwrap();

        assert_eq!(transcript.text, "Hello world");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.language_code, "en");
    }

    #[tokio::test]
    async fn test_fetch_zero_segments_is_no_transcript() {
        let mut service = MockCaptionService::new();
        service.expect_list_tracks().returning(|_| Ok(vec![track("en", false)]));
        service.expect_fetch_segments().returning(|_, _| Ok(vec![]));

        let fetcher = TranscriptFetcher::new(Arc::new(service), langs(&["en"]));
        let err = fetcher.fetch(&video()).await.unwrap_err();
        assert!(matches!(err, SummarizerError::NoTranscript(_)));
    }

    #[tokio::test]
    async fn test_fetch_no_tracks_is_no_transcript() {
        let mut service = MockCaptionService::new();
        service.expect_list_tracks().returning(|_| Ok(vec![]));
        service.expect_fetch_segments().times(0);

        let fetcher = TranscriptFetcher::new(Arc::new(service), langs(&["en"]));
        let err = fetcher.fetch(&video()).await.unwrap_err();
        assert!(matches!(err, SummarizerError::NoTranscript(_)));
    }

    #[tokio::test]
    async fn test_fetch_passes_service_errors_through() {
        for upstream in [
            SummarizerError::VideoUnavailable("removed".into()),
            SummarizerError::TranscriptsDisabled("off".into()),
            SummarizerError::UnknownFetchError("timeout".into()),
        ] {
            let expected = upstream.clone();
            let mut service = MockCaptionService::new();
            service
                .expect_list_tracks()
                .returning(move |_| Err(upstream.clone()));

            let fetcher = TranscriptFetcher::new(Arc::new(service), langs(&["en"]));
            assert_eq!(fetcher.fetch(&video()).await.unwrap_err(), expected);
        }
    }

    #[test]
    fn test_fetch_is_repeatable() {
        let mut service = MockCaptionService::new();
        service.expect_list_tracks().times(2).returning(|_| Ok(vec![track("en", false)]));
        service
            .expect_fetch_segments()
            .times(2)
            .returning(|_, _| Ok(vec![segment(0.0, "same"), segment(1.0, "words")]));

        let fetcher = TranscriptFetcher::new(Arc::new(service), langs(&["en"]));
        let first = tokio_test::block_on(fetcher.fetch(&video())).unwrap();
        let second = tokio_test::block_on(fetcher.fetch(&video())).unwrap();
        assert_eq!(first.text, second.text);
    }
}

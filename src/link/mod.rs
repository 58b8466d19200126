//! Video identifier extraction from user-supplied links.
//!
//! Matchers are tried in a fixed order and the first capture wins. Every matcher captures the
//! longest run of identifier characters after its prefix, so trailing parameters (`&t=30s`,
//! `?si=...`), path segments and fragments never leak into the identifier. Matchers are anchored
//! at the start of the link, so a YouTube URL nested inside another site's query never matches.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::SummarizerError;

/// Canonical identifier of a single video
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = SummarizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_video_id(s)
    }
}

/// One recognised link shape
pub struct Matcher {
    pub name: &'static str,
    pub extract: fn(&str) -> Option<String>,
}

/// Optional scheme and one optional subdomain, anchored at the start of the input
const HOST_PREFIX: &str = r"(?i)^(?:https?://)?(?:[\w-]+\.)?";

/// Hosts a link may point at, matched exactly or as a parent domain
const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "youtube-nocookie.com", "youtu.be"];

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("{}{}", HOST_PREFIX, pattern)).expect("valid link regex")
}

static WATCH_QUERY: Lazy<Regex> =
    Lazy::new(|| anchored(r"youtube(?:-nocookie)?\.com/watch/?\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]+)"));

static SHORT_LINK: Lazy<Regex> = Lazy::new(|| anchored(r"youtu\.be/([A-Za-z0-9_-]+)"));

static EMBED_LINK: Lazy<Regex> =
    Lazy::new(|| anchored(r"youtube(?:-nocookie)?\.com/embed/([A-Za-z0-9_-]+)"));

static PATH_LINK: Lazy<Regex> =
    Lazy::new(|| anchored(r"youtube\.com/(?:shorts|live|v)/([A-Za-z0-9_-]+)"));

fn capture(re: &Regex, input: &str) -> Option<String> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn match_watch_query(input: &str) -> Option<String> {
    capture(&WATCH_QUERY, input)
}

fn match_short_link(input: &str) -> Option<String> {
    capture(&SHORT_LINK, input)
}

fn match_embed_link(input: &str) -> Option<String> {
    capture(&EMBED_LINK, input)
}

fn match_path_link(input: &str) -> Option<String> {
    capture(&PATH_LINK, input)
}

static MATCHERS: [Matcher; 4] = [
    Matcher { name: "watch_query", extract: match_watch_query },
    Matcher { name: "short_link", extract: match_short_link },
    Matcher { name: "embed_link", extract: match_embed_link },
    Matcher { name: "path_link", extract: match_path_link },
];

/// Matchers in priority order
pub fn matchers() -> &'static [Matcher] {
    &MATCHERS
}

/// Whether the input's host is a YouTube domain
pub fn references_youtube(input: &str) -> bool {
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    url::Url::parse(&with_scheme)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .map_or(false, |host| {
            YOUTUBE_HOSTS
                .iter()
                .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
        })
}

/// Extract the video identifier from a link, failing fast when no known shape matches
pub fn parse_video_id(link: &str) -> Result<VideoId, SummarizerError> {
    let input = link.trim();

    for matcher in matchers() {
        if let Some(id) = (matcher.extract)(input) {
            tracing::debug!(matcher = matcher.name, video_id = %id, "Resolved video id");
            return Ok(VideoId(id));
        }
    }

    if references_youtube(input) {
        Err(SummarizerError::InvalidLinkFormat(format!(
            "Unrecognized YouTube link: {}",
            input
        )))
    } else {
        Err(SummarizerError::InvalidLinkFormat(format!(
            "Not a YouTube link: {}",
            input
        )))
    }
}

/// Thumbnail image derived from the identifier
pub fn thumbnail_url(id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{}/0.jpg", id)
}

/// Canonical watch page for the identifier
pub fn watch_url(id: &VideoId) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(link: &str) -> String {
        parse_video_id(link).unwrap().to_string()
    }

    #[test]
    fn test_watch_link_drops_trailing_params() {
        assert_eq!(id("https://www.youtube.com/watch?v=abc123XYZ_-&t=30s"), "abc123XYZ_-");
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_link_with_v_after_other_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&list=PL1"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(id("https://m.youtube.com/watch?v=dQw4w9WgXcQ#t=1"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_link() {
        assert_eq!(id("https://youtu.be/abc123XYZ_-"), "abc123XYZ_-");
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=Xy12"), "dQw4w9WgXcQ");
        assert_eq!(id("youtu.be/dQw4w9WgXcQ/"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_embed_and_path_links() {
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=5"), "dQw4w9WgXcQ");
        assert_eq!(id("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("https://www.youtube.com/live/dQw4w9WgXcQ?feature=share"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(id("  https://youtu.be/dQw4w9WgXcQ  "), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_plain_words_are_not_identifiers() {
        for input in ["programming", "hello-world", "dQw4w9WgXcQ"] {
            let err = parse_video_id(input).unwrap_err();
            assert!(matches!(err, SummarizerError::InvalidLinkFormat(_)), "{input}");
        }
    }

    #[test]
    fn test_foreign_hosts_are_rejected() {
        for input in [
            "https://evil.example/?r=youtu.be/abc123XYZ_-",
            "https://evil.example/redirect?to=https://www.youtube.com/watch?v=abc123XYZ_-",
            "notyoutube.com/watch?v=abc123XYZ_-",
            "https://notyoutu.be/abc123XYZ_-",
        ] {
            match parse_video_id(input).unwrap_err() {
                SummarizerError::InvalidLinkFormat(msg) => {
                    assert!(msg.starts_with("Not a YouTube link"), "{input}: {msg}")
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_host_detection() {
        assert!(references_youtube("https://m.youtube.com/feed"));
        assert!(references_youtube("youtu.be/x"));
        assert!(references_youtube("https://www.youtube-nocookie.com/embed/x"));
        assert!(!references_youtube("https://notyoutube.com/watch?v=x"));
        assert!(!references_youtube("not a link"));
    }

    #[test]
    fn test_not_a_link() {
        let err = parse_video_id("not a link").unwrap_err();
        assert!(matches!(err, SummarizerError::InvalidLinkFormat(_)));
        assert!(parse_video_id("").is_err());
        assert!(parse_video_id("https://vimeo.com/12345").is_err());
    }

    #[test]
    fn test_youtube_link_of_unknown_shape_fails_fast() {
        let err = parse_video_id("https://www.youtube.com/feed/subscriptions").unwrap_err();
        match err {
            SummarizerError::InvalidLinkFormat(msg) => assert!(msg.contains("Unrecognized")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_matcher_priority() {
        let names: Vec<_> = matchers().iter().map(|m| m.name).collect();
        assert_eq!(names, ["watch_query", "short_link", "embed_link", "path_link"]);
        // Each shape is only claimed by its own matcher.
        assert!((matchers()[1].extract)("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!((matchers()[0].extract)("https://youtu.be/dQw4w9WgXcQ").is_none());
    }

    #[test]
    fn test_derived_urls() {
        let video: VideoId = "https://youtu.be/abc123XYZ_-".parse().unwrap();
        assert_eq!(thumbnail_url(&video), "https://img.youtube.com/vi/abc123XYZ_-/0.jpg");
        assert_eq!(watch_url(&video), "https://www.youtube.com/watch?v=abc123XYZ_-");
    }
}

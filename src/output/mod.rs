//! HTML rendering for the web UI.

use crate::pipeline::{PipelineReport, TranscriptStats};
use crate::utils::{escape_html, format_duration};

pub const PAGE_TITLE: &str = "AI-Powered YouTube Video Summarizer";

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;color:#222}\
input[type=text]{width:100%;padding:.5rem;font-size:1rem;box-sizing:border-box}\
button{margin:.75rem .5rem 0 0;padding:.5rem 1rem;font-size:1rem}\
img.thumb{width:100%;margin-top:1rem;border-radius:.5rem}\
.error{background:#fde8e8;border:1px solid #f5a3a3;padding:.75rem;margin-top:1rem;border-radius:.25rem}\
.meta{color:#666;font-size:.9rem}\
.summary{white-space:pre-wrap;font-family:inherit;line-height:1.5}";

/// Render the page: the link form, plus whatever the report resolved
pub fn render_page(report: Option<&PipelineReport>) -> String {
    let link = report.map(|r| r.link.as_str()).unwrap_or_default();

    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", PAGE_TITLE));
    body.push_str(&render_form(link));

    if let Some(report) = report {
        body.push_str(&render_report(report));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        PAGE_TITLE, STYLE, body
    )
}

fn render_form(link: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/summarize\">\n\
<label for=\"url\">Enter YouTube Video Link:</label>\n\
<input type=\"text\" id=\"url\" name=\"url\" value=\"{}\" autofocus>\n\
<button type=\"submit\" formaction=\"/\" formmethod=\"get\">Show Thumbnail</button>\
<button type=\"submit\">Comprehensive Summary</button>\n\
</form>\n",
        escape_html(link)
    )
}

fn render_report(report: &PipelineReport) -> String {
    let mut html = String::new();

    if let Some(video) = &report.video {
        html.push_str(&format!(
            "<img class=\"thumb\" src=\"{}\" alt=\"Thumbnail for video {}\">\n",
            escape_html(&video.thumbnail_url),
            escape_html(video.id.as_str())
        ));
    }

    if let Some(stats) = &report.transcript {
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", escape_html(&describe_transcript(stats))));
    }

    if let Some(error) = &report.error {
        html.push_str(&format!(
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape_html(&error.user_message())
        ));
    }

    if let Some(summary) = &report.summary {
        html.push_str("<h2>Detailed Notes:</h2>\n");
        html.push_str(&format!(
            "<pre class=\"summary\">{}</pre>\n<p class=\"meta\">Generated by {} at {}</p>\n",
            escape_html(&summary.text),
            escape_html(&summary.model),
            report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    html
}

/// One-line description of the transcript that was summarized
pub fn describe_transcript(stats: &TranscriptStats) -> String {
    let mut line = format!(
        "Transcript: {}{}, {} segments, {} characters",
        stats.language_code,
        if stats.is_generated { " (auto-generated)" } else { "" },
        stats.segments,
        stats.chars
    );
    if let Some(duration) = stats.duration_secs {
        line.push_str(&format!(", {}", format_duration(duration)));
    }
    line
}

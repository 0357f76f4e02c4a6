use regex::Regex;
use std::sync::OnceLock;
use url::Url;

static YOUTUBE_RE: OnceLock<Regex> = OnceLock::new();

fn youtube_regex() -> &'static Regex {
    YOUTUBE_RE.get_or_init(|| {
        Regex::new(
            r#"https?://(?:[A-Za-z0-9-]+\.)?(?:youtube\.com|youtu\.be)/[^\s<>"'()\[\]]+"#,
        )
        .expect("failed to compile youtube regex")
    })
}

/// Find the first YouTube-looking link in arbitrary text.
///
/// This is deliberately shallow: anything under `youtube.com` or `youtu.be`
/// that parses as a URL is accepted and left for yt-dlp to judge.
#[must_use]
pub fn find_youtube_url(text: &str) -> Option<String> {
    youtube_regex().find_iter(text).find_map(|m| {
        let candidate = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        Url::parse(candidate).ok().map(|_| candidate.to_owned())
    })
}

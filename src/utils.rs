use std::{ffi::OsStr, path::Path};
use tokio::{fs::File, io::AsyncReadExt};

pub const TELEGRAM_CAPTION_LIMIT: usize = 1024;
pub static VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "m4v"];

/// Media kind of a downloaded file; decides which upload method is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Other,
}

/// Detect media kind by extension first, then by reading a small prefix and
/// probing it with `infer`.
pub async fn detect_media_kind(path: &Path) -> MediaKind {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        if VIDEO_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return MediaKind::Video;
        }
    }

    // Read a small prefix (8 KiB) asynchronously and probe
    if let Ok(mut f) = File::open(path).await {
        let mut buf = vec![0u8; 8192];
        match f.read(&mut buf).await {
            Ok(n) if n > 0 => {
                buf.truncate(n);
                if infer::get(&buf).is_some_and(|k| k.mime_type().starts_with("video/")) {
                    return MediaKind::Video;
                }
            }
            _ => {}
        }
    }

    MediaKind::Other
}

/// Build the upload caption from the video title and its source link,
/// truncated to Telegram's caption limit.
#[must_use]
pub fn build_caption(title: &str, url: &str) -> String {
    let title = title.trim();
    let mut caption = if title.is_empty() {
        url.to_owned()
    } else {
        format!("{title}\n{url}")
    };

    if caption.chars().count() > TELEGRAM_CAPTION_LIMIT {
        caption = caption
            .chars()
            .take(TELEGRAM_CAPTION_LIMIT.saturating_sub(3))
            .collect();
        caption.push_str("...");
    }
    caption
}

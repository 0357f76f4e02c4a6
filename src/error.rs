use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] tokio::io::Error),

    #[error("no YouTube link found in {0:?}")]
    NoYoutubeUrl(String),

    #[error("yt-dlp failed: {0}")]
    YtdlpFailed(String),

    #[error("no media found")]
    NoMediaFound,

    #[error("file is too large to upload: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },

    #[error("telegram upload failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

impl Error {
    #[inline]
    pub fn ytdlp_failed(text: impl Into<String>) -> Self {
        Self::YtdlpFailed(text.into())
    }

    #[inline]
    pub fn invalid_env(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEnv {
            key,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

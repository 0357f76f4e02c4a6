use crate::error::{Error, Result};
use std::{env, path::PathBuf};
use teloxide::types::{ChatId, Recipient};
use url::Url;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Function used to look up a configuration variable by name.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub youtube: YoutubeConfig,
    pub scratch: ScratchConfig,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat: Recipient,
    pub api_url: Option<Url>,
    /// Largest file the bot is allowed to upload, in bytes.
    pub upload_limit: u64,
}

#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub binary: String,
    /// Netscape cookie blob for age-gated content.
    pub cookies: Option<String>,
    pub format: String,
    pub max_filesize_mb: u64,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScratchConfig {
    /// Where the credential file is written.
    pub cookies_dir: PathBuf,
    /// Parent of the scratch directory; system temp dir when `None`.
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// - `Error::MissingEnv` if `TELEGRAM_BOT_TOKEN` or `TELEGRAM_CHAT_ID` is absent.
    /// - `Error::InvalidEnv` for values that fail to parse.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let youtube = YoutubeConfig::from_lookup(&get)?;
        Ok(Self {
            telegram: TelegramConfig::from_lookup(&get, youtube.max_filesize_mb)?,
            youtube,
            scratch: ScratchConfig::from_lookup(&get),
        })
    }
}

impl TelegramConfig {
    fn from_lookup(get: Lookup<'_>, limit_mb: u64) -> Result<Self> {
        let token = get("TELEGRAM_BOT_TOKEN").ok_or(Error::MissingEnv("TELEGRAM_BOT_TOKEN"))?;
        let chat = get("TELEGRAM_CHAT_ID")
            .ok_or(Error::MissingEnv("TELEGRAM_CHAT_ID"))
            .and_then(|raw| parse_recipient(&raw))?;
        let api_url = get("TELEGRAM_API_URL")
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|e| Error::invalid_env("TELEGRAM_API_URL", e.to_string()))
            })
            .transpose()?;

        let upload_limit = limit_mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
            Error::invalid_env("YTDLP_MAX_FILESIZE_MB", format!("{limit_mb} MiB does not fit in bytes"))
        })?;

        Ok(Self {
            token: token.trim().to_owned(),
            chat,
            api_url,
            upload_limit,
        })
    }
}

impl YoutubeConfig {
    const DEFAULT_BINARY: &'static str = "yt-dlp";
    const DEFAULT_MAX_FILESIZE_MB: u64 = 50;

    fn from_lookup(get: Lookup<'_>) -> Result<Self> {
        let max_filesize_mb = get("YTDLP_MAX_FILESIZE_MB")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|mb| *mb > 0)
                    .ok_or_else(|| {
                        Error::invalid_env("YTDLP_MAX_FILESIZE_MB", format!("{raw:?} is not a positive integer"))
                    })
            })
            .transpose()?
            .unwrap_or(Self::DEFAULT_MAX_FILESIZE_MB);

        let extra_args = match get("YTDLP_EXTRA_ARGS") {
            Some(raw) => shlex::split(&raw)
                .ok_or_else(|| Error::invalid_env("YTDLP_EXTRA_ARGS", "unbalanced quotes"))?,
            None => Vec::new(),
        };

        Ok(Self {
            binary: get("YTDLP_PATH").unwrap_or_else(|| Self::DEFAULT_BINARY.into()),
            cookies: get("YOUTUBE_COOKIES"),
            format: get("YTDLP_FORMAT").unwrap_or_else(|| default_format(max_filesize_mb)),
            max_filesize_mb,
            extra_args,
        })
    }
}

impl ScratchConfig {
    fn from_lookup(get: Lookup<'_>) -> Self {
        Self {
            cookies_dir: get("COOKIES_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            root: get("SCRATCH_ROOT").map(PathBuf::from),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            binary: Self::DEFAULT_BINARY.into(),
            cookies: None,
            format: default_format(Self::DEFAULT_MAX_FILESIZE_MB),
            max_filesize_mb: Self::DEFAULT_MAX_FILESIZE_MB,
            extra_args: Vec::new(),
        }
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            cookies_dir: PathBuf::from("."),
            root: None,
        }
    }
}

/// Best pre-muxed video+audio file under the cap, else separate video and
/// audio streams whose budgets add up to the cap. Formats with an unknown size
/// are kept (`<?`); the upload limit still guards the merged result.
#[must_use]
pub fn default_format(max_filesize_mb: u64) -> String {
    let audio_mb = (max_filesize_mb / 5).max(1);
    let video_mb = max_filesize_mb.saturating_sub(audio_mb);
    format!(
        "b[filesize<?{max_filesize_mb}M]/bv*[filesize<?{video_mb}M]+ba[filesize<?{audio_mb}M]"
    )
}

fn parse_recipient(raw: &str) -> Result<Recipient> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if raw.len() > 1 && raw.starts_with('@') {
        return Ok(Recipient::ChannelUsername(raw.to_owned()));
    }
    Err(Error::invalid_env(
        "TELEGRAM_CHAT_ID",
        format!("{raw:?} is neither a numeric id nor an @username"),
    ))
}

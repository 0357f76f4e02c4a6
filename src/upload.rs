use crate::{
    config::TelegramConfig,
    error::{Error, Result},
    utils::{MediaKind, detect_media_kind},
};
use std::path::Path;
use teloxide::{
    Bot,
    payloads::{SendDocumentSetters, SendVideoSetters},
    prelude::Requester,
    types::{InputFile, Recipient},
};
use tracing::info;

/// Sends a single file to the configured Telegram chat.
#[derive(Debug, Clone)]
pub struct TelegramUploader {
    bot: Bot,
    chat: Recipient,
    limit: u64,
}

impl TelegramUploader {
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        let mut bot = Bot::new(&config.token);
        if let Some(url) = &config.api_url {
            bot = bot.set_api_url(url.clone());
        }
        Self {
            bot,
            chat: config.chat.clone(),
            limit: config.upload_limit,
        }
    }

    /// Upload `path` with `caption` in one multipart request: videos through
    /// `sendVideo`, anything else through `sendDocument`.
    ///
    /// # Errors
    ///
    /// - `Error::FileTooLarge` if the file exceeds the upload limit (no request is made).
    /// - `Error::Telegram` if the request fails or the API answers with an error.
    pub async fn send(&self, path: &Path, caption: &str) -> Result<()> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > self.limit {
            return Err(Error::FileTooLarge {
                size,
                limit: self.limit,
            });
        }

        let kind = detect_media_kind(path).await;
        info!(path = %path.display(), size, ?kind, "uploading to telegram");

        let file = InputFile::file(path);
        match kind {
            MediaKind::Video => {
                self.bot
                    .send_video(self.chat.clone(), file)
                    .caption(caption)
                    .supports_streaming(true)
                    .await?;
            }
            MediaKind::Other => {
                self.bot
                    .send_document(self.chat.clone(), file)
                    .caption(caption)
                    .await?;
            }
        }
        Ok(())
    }
}

use crate::{
    config::Config,
    download::{DownloadRequest, Extractor},
    error::{Error, Result},
    scratch::Scratch,
    upload::TelegramUploader,
    utils::build_caption,
    validate::find_youtube_url,
};
use tracing::{info, instrument};

/// What a successful invocation delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub url: String,
    pub title: String,
    pub size: u64,
}

/// Download the first YouTube link found in `input` and send it to Telegram.
///
/// Scratch artifacts are dropped before this returns, on success and on
/// every error path.
///
/// # Errors
///
/// - `Error::NoYoutubeUrl` if `input` has no YouTube-looking link; nothing is
///   created and no network call is made.
/// - Propagates scratch, extractor and upload errors.
#[instrument(skip_all, fields(extractor = extractor.name()))]
pub async fn process(
    input: &str,
    config: &Config,
    extractor: &dyn Extractor,
    uploader: &TelegramUploader,
) -> Result<Outcome> {
    let url = find_youtube_url(input).ok_or_else(|| Error::NoYoutubeUrl(input.to_owned()))?;
    info!(url = %url, "processing");

    let scratch = Scratch::create(&config.scratch, config.youtube.cookies.as_deref())?;

    let request = DownloadRequest {
        url: &url,
        output_dir: scratch.dir(),
        cookies: scratch.cookies_path(),
        options: &config.youtube,
    };
    let downloaded = extractor.download(&request).await?;
    let size = tokio::fs::metadata(&downloaded.path).await?.len();

    let caption = build_caption(&downloaded.title, &url);
    uploader.send(&downloaded.path, &caption).await?;
    info!(title = %downloaded.title, size, "sent to telegram");

    drop(scratch);
    Ok(Outcome {
        url,
        title: downloaded.title,
        size,
    })
}

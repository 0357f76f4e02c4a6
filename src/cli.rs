use clap::Parser;

/// Download a YouTube video and send it to a Telegram chat.
///
/// The bot token and chat are read from `TELEGRAM_BOT_TOKEN` and
/// `TELEGRAM_CHAT_ID`; `YOUTUBE_COOKIES` may hold a cookie file for
/// age-gated videos.
#[derive(Debug, Parser)]
#[command(name = "yt2tg", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// YouTube link, or any text containing one
    #[arg(allow_hyphen_values = true)]
    pub url: String,
}

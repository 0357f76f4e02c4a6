use crate::{
    cli::Cli,
    config::{Config, Lookup},
    download::Extractor,
    job::process,
    upload::TelegramUploader,
};
use clap::Parser;
use std::{ffi::OsString, io::Write, process::ExitCode};
use tracing::error;

/// Result of one invocation, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::Failure => Self::FAILURE,
        }
    }
}

/// Run the whole tool: parse `args`, load config through `lookup`, download
/// with `extractor` and upload. User-facing messages go to `out`.
///
/// Anything but exactly one argument prints the usage and fails before any
/// config is read or network call is made.
pub async fn run<I, T, W>(args: I, lookup: Lookup<'_>, extractor: &dyn Extractor, out: &mut W) -> Status
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = write!(out, "{}", err.render());
            return Status::Failure;
        }
    };

    let config = match Config::from_lookup(lookup) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            let _ = writeln!(out, "❌ Failed: {err}");
            return Status::Failure;
        }
    };

    let uploader = TelegramUploader::new(&config.telegram);

    match process(&cli.url, &config, extractor, &uploader).await {
        Ok(outcome) => {
            let _ = writeln!(
                out,
                "✅ Sent {:?} ({} bytes) from {} to Telegram",
                outcome.title, outcome.size, outcome.url
            );
            Status::Success
        }
        Err(err) => {
            error!(%err, "processing failed");
            let _ = writeln!(out, "❌ Failed: {err}");
            Status::Failure
        }
    }
}

use color_eyre::Result;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "bunyan")]
const APP_NAME: &str = "yt2tg";

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the result line. Filter with `RUST_LOG` (default `info`).
///
/// The returned guard must be held until exit.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn setup_logger() -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(feature = "bunyan")]
    {
        use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};

        tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(APP_NAME.into(), writer))
            .try_init()?;
    }

    #[cfg(not(feature = "bunyan"))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_target(false))
            .try_init()?;
    }

    Ok(guard)
}

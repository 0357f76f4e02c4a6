use dotenv::dotenv;
use std::{env, io, process::ExitCode};
use yt2tg::{app, download::YtDlp, telemetry::setup_logger};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    if let Err(err) = color_eyre::install() {
        eprintln!("failed to install color-eyre: {err}");
    }

    // flushes buffered log lines when dropped
    let _guard = match setup_logger() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("failed to set up logging: {err}");
            None
        }
    };

    let lookup = |key: &str| env::var(key).ok();
    app::run(env::args_os(), &lookup, &YtDlp, &mut io::stdout())
        .await
        .into()
}

use crate::{
    config::YoutubeConfig,
    error::{Error, Result},
    utils::VIDEO_EXTENSIONS,
};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::{fs::read_dir, process::Command};
use tracing::{info, warn};

const FORBIDDEN_EXTENSIONS: &[&str] = &["json", "txt", "log", "part", "ytdl"];
const EXTRA_MEDIA_EXTENSIONS: &[&str] = &["m4a", "mp3", "opus", "ogg", "3gp", "flv"];
const FILEPATH_PREFIX: &str = "filepath=";
const TITLE_PREFIX: &str = "title=";

/// Everything the extraction library needs for a single download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    pub url: &'a str,
    /// Scratch directory the file must be written into.
    pub output_dir: &'a Path,
    /// Cookie file for age-gated content.
    pub cookies: Option<&'a Path>,
    pub options: &'a YoutubeConfig,
}

/// A file produced by the extraction library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub title: String,
}

/// Resolves a video URL into a single file on disk.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    /// Short name used for logging.
    fn name(&self) -> &'static str;

    /// Download `request.url` into `request.output_dir`.
    async fn download(&self, request: &DownloadRequest<'_>) -> Result<Downloaded>;
}

/// Extractor backed by the `yt-dlp` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct YtDlp;

#[async_trait::async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(&self, request: &DownloadRequest<'_>) -> Result<Downloaded> {
        let args = build_args(request);
        info!(url = %request.url, format = %request.options.format, "running yt-dlp");
        let stdout = run_command_in_dir(&request.options.binary, &args, request.output_dir).await?;
        resolve_download(&stdout, request.output_dir).await
    }
}

/// Build the yt-dlp argument list for a request.
#[must_use]
pub fn build_args(request: &DownloadRequest<'_>) -> Vec<String> {
    let options = request.options;
    let max_filesize = format!("{}M", options.max_filesize_mb);
    let base: &[&str] = &[
        "--no-playlist",
        "--no-progress",
        "--restrict-filenames",
        "--no-simulate",
        "-f",
        &options.format,
        "--max-filesize",
        &max_filesize,
        "--merge-output-format",
        "mp4",
        "-o",
        "%(title).100B [%(id)s].%(ext)s",
        "--print",
        "after_move:filepath=%(filepath)s",
        "--print",
        "after_move:title=%(title)s",
    ];
    let mut args = base.iter().map(ToString::to_string).collect::<Vec<_>>();

    if let Some(cookies) = request.cookies {
        args.extend(["--cookies".into(), cookies.to_string_lossy().into_owned()]);
    }

    args.extend(options.extra_args.iter().cloned());
    args.extend(["--".into(), request.url.to_owned()]);
    args
}

/// Run a command inside `cwd` and return its stdout.
///
/// # Errors
///
/// - `Error::Io` for spawn errors.
/// - `Error::YtdlpFailed` for a non-zero exit code (with stderr).
async fn run_command_in_dir(cmd: &str, args: &[String], cwd: &Path) -> Result<String> {
    let output = Command::new(cmd)
        .current_dir(cwd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            return Err(Error::ytdlp_failed(format!("{cmd} exited with {}", output.status)));
        }
        return Err(Error::ytdlp_failed(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Values yt-dlp printed after moving the final file into place.
#[derive(Debug, Default, PartialEq, Eq)]
struct Printed {
    filepath: Option<PathBuf>,
    title: Option<String>,
}

fn parse_printed(stdout: &str) -> Printed {
    let mut printed = Printed::default();
    for line in stdout.lines() {
        if let Some(path) = line.strip_prefix(FILEPATH_PREFIX) {
            let path = path.trim();
            if !path.is_empty() && path != "NA" {
                printed.filepath = Some(PathBuf::from(path));
            }
        } else if let Some(title) = line.strip_prefix(TITLE_PREFIX) {
            let title = title.trim();
            if !title.is_empty() && title != "NA" {
                printed.title = Some(title.to_owned());
            }
        }
    }
    printed
}

/// Locate the produced file, preferring the path yt-dlp printed and falling
/// back to scanning the scratch directory.
async fn resolve_download(stdout: &str, dir: &Path) -> Result<Downloaded> {
    let printed = parse_printed(stdout);

    let path = match printed.filepath {
        Some(path) => dir.join(path),
        None => {
            warn!("yt-dlp did not report a file path; scanning scratch directory");
            find_media_file(dir).await?
        }
    };

    let non_empty = tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false);
    if !non_empty {
        warn!(path = %path.display(), "downloaded file is missing or empty");
        return Err(Error::NoMediaFound);
    }

    let title = printed.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    info!(path = %path.display(), title = %title, "download finished");
    Ok(Downloaded { path, title })
}

async fn find_media_file(dir: &Path) -> Result<PathBuf> {
    let mut rd = read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if is_potential_media_file(&path) {
            files.push(path);
        }
    }

    info!(files = files.len(), "collected files from scratch directory");

    // deterministic pick
    files.sort();
    files.into_iter().next().ok_or(Error::NoMediaFound)
}

/// Filter function to determine if a file is potentially media based on name/extension.
fn is_potential_media_file(path: &Path) -> bool {
    if let Some(filename) = path.file_name().and_then(OsStr::to_str) {
        // Skip common non-media files
        if filename.starts_with('.') || filename.to_lowercase().contains("metadata") {
            return false;
        }
    }

    let ext = match path.extension().and_then(OsStr::to_str) {
        Some(e) => e.to_lowercase(),
        None => return false,
    };

    if FORBIDDEN_EXTENSIONS
        .iter()
        .any(|forbidden| forbidden.eq_ignore_ascii_case(&ext))
    {
        return false;
    }

    VIDEO_EXTENSIONS
        .iter()
        .chain(EXTRA_MEDIA_EXTENSIONS.iter())
        .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}

use crate::{config::ScratchConfig, error::Result};
use std::{io::Write, path::Path};
use tempfile::{Builder, NamedTempFile, TempDir};
use tracing::debug;

/// Temporary artifacts of one invocation.
///
/// Dropping the value removes the scratch directory (with the downloaded file
/// in it) and the credential file, whichever way the invocation ends. Keep it
/// alive until the upload has finished.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
    cookies: Option<NamedTempFile>,
}

impl Scratch {
    /// Create the scratch directory and, if a cookie blob is given, write it
    /// verbatim into a credential file in `config.cookies_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if either artifact cannot be created. Anything
    /// created before the failure is removed again.
    pub fn create(config: &ScratchConfig, cookies: Option<&str>) -> Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("yt2tg-");
        let dir = match &config.root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        debug!(path = %dir.path().display(), "created scratch directory");

        let cookies = cookies
            .map(|blob| write_cookie_file(&config.cookies_dir, blob))
            .transpose()?;

        Ok(Self { dir, cookies })
    }

    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    #[inline]
    #[must_use]
    pub fn cookies_path(&self) -> Option<&Path> {
        self.cookies.as_ref().map(NamedTempFile::path)
    }
}

fn write_cookie_file(dir: &Path, blob: &str) -> Result<NamedTempFile> {
    let mut file = Builder::new()
        .prefix("cookies-")
        .suffix(".txt")
        .tempfile_in(dir)?;
    file.write_all(blob.as_bytes())?;
    file.flush()?;
    debug!(path = %file.path().display(), "wrote cookie file");
    Ok(file)
}

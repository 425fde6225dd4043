// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delivery of exported documents to the user's downloads directory.

use std::path::{Path, PathBuf};

use linkstamp_core::error::Result;
use tracing::{info, instrument, warn};

/// Return the directory exported files are saved to by default.
pub fn download_dir() -> PathBuf {
    resolve_download_dir(
        std::env::var_os("XDG_DOWNLOAD_DIR").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_download_dir(xdg_download: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = xdg_download.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    if let Some(home) = home.filter(|home| !home.as_os_str().is_empty()) {
        return home.join("Downloads");
    }
    // Last resort
    PathBuf::from(".")
}

/// Write `bytes` to `dir/file_name`, replacing any existing file.
///
/// `file_name` may name a subdirectory of `dir` (`exports/out.pdf`); missing
/// directories are created. The bytes go to a hidden partial file beside the
/// target and are renamed into place, so the target is never observed
/// half-written.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub async fn deliver(bytes: &[u8], dir: &Path, file_name: &str) -> Result<PathBuf> {
    let target = dir.join(file_name);
    let (Some(parent), Some(name)) = (target.parent(), Path::new(file_name).file_name()) else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("`{file_name}` does not name a file"),
        )
        .into());
    };
    tokio::fs::create_dir_all(parent).await?;

    let partial = parent.join(format!(".{}.partial", name.to_string_lossy()));

    if let Err(err) = tokio::fs::write(&partial, bytes).await {
        tokio::fs::remove_file(&partial).await.ok();
        return Err(err.into());
    }
    if let Err(err) = tokio::fs::rename(&partial, &target).await {
        warn!(error = %err, "could not move export into place");
        tokio::fs::remove_file(&partial).await.ok();
        return Err(err.into());
    }

    info!(path = %target.display(), "export delivered");
    Ok(target)
}

use std::path::{Path, PathBuf};

use docmirror_fetch::HttpClient;
use docmirror_fs::WriteStatus;
use docmirror_manifest::Manifest;
use tracing::info;

use crate::error::{AppError, Result};

/// Download and parse the manifest, refreshing the local sentinel copy.
///
/// The sentinel is rewritten only when the text changed, so its mtime records the
/// last time the manifest actually moved.
pub async fn fetch_manifest<C: HttpClient>(client: &C, url: &str, sentinel: &Path) -> Result<Manifest> {
    info!("Fetching {}...", url);

    let unavailable = |reason: String| AppError::ManifestUnavailable {
        url: url.to_string(),
        reason,
    };

    let body = client.get(url).await.map_err(|e| unavailable(e.to_string()))?;
    let text = String::from_utf8(body.to_vec()).map_err(|e| unavailable(e.to_string()))?;

    store_sentinel(sentinel.to_path_buf(), text.clone()).await?;

    let manifest = Manifest::from_text(text);
    info!("Found {} URLs", manifest.len());
    Ok(manifest)
}

async fn store_sentinel(sentinel: PathBuf, text: String) -> Result<()> {
    let name = sentinel.display().to_string();
    let status = tokio::task::spawn_blocking(move || {
        if let Some(parent) = sentinel.parent()
            && !parent.as_os_str().is_empty()
        {
            docmirror_fs::ensure_dir(parent)?;
        }
        docmirror_fs::write_if_changed(&sentinel, text.as_bytes())
    })
    .await??;

    match status {
        WriteStatus::Created => info!("Creating initial {}", name),
        WriteStatus::Updated => info!("{} content has changed, updating local copy", name),
        WriteStatus::Unchanged => info!("{} content unchanged", name),
    }
    Ok(())
}

//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the router is built.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the users file exists.
///
/// A missing users file is not an error: the store treats it as an empty
/// collection and creates it on the first registration.
pub async fn ensure_users_file(users_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = users_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    match tokio::fs::metadata(users_file).await {
        Ok(meta) if meta.is_dir() => {
            return Err(anyhow::anyhow!(
                "users file path {} is a directory",
                users_file.display()
            ));
        }
        Ok(_) => info!(path = %users_file.display(), "using users file"),
        Err(_) => warn!(
            path = %users_file.display(),
            "users file not found; starting with an empty user list"
        ),
    }
    Ok(())
}

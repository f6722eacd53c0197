//! Saving unparseable bodies for later inspection.

use std::path::{Path, PathBuf};

/// Writes `body` to `<dir>/<random>-<unix seconds>.txt`.
///
/// Best effort: failures are logged and give `None`.
pub async fn write_dump(dir: &Path, body: &str) -> Option<PathBuf> {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        tracing::warn!(dir = %dir.display(), error = %e, "could not create dump directory");
        return None;
    }

    let path = dir.join(file_name(jiff::Timestamp::now()));
    if let Err(e) = tokio::fs::write(&path, body).await {
        tracing::warn!(path = %path.display(), error = %e, "could not write dump");
        return None;
    }

    tracing::warn!(
        path = %path.display(),
        bytes = body.len(),
        "unsupported response saved; please attach this file when reporting the problem"
    );
    Some(path)
}

fn file_name(now: jiff::Timestamp) -> String {
    format!("{:016x}-{}.txt", rand::random::<u64>(), now.as_second())
}

//! JSON file access
//!
//! Reads tolerate a missing file; writes replace the target atomically by
//! writing a sibling temp file, syncing it and renaming it into place.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

const INDENT: &[u8] = b"    ";

/// Read and parse a JSON file, returning `None` when it does not exist
pub async fn read_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::io(path, e)),
    };

    let value = serde_json::from_slice(&bytes).map_err(|source| AppError::Json {
        file: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(Some(value))
}

/// Serialize with 4-space indentation, keeping non-ASCII characters literal
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Replace `path` with the JSON rendering of `value`.
///
/// Either the old content or the new content is on disk afterwards, never a
/// truncated mix of both.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let bytes = to_pretty_json(value).map_err(|source| AppError::Json {
        file: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path_for(path);
    if let Err(e) = write_and_sync(&tmp, &bytes).await {
        discard(&tmp).await;
        return Err(AppError::io(&tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        discard(&tmp).await;
        return Err(AppError::io(path, e));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

async fn write_and_sync(tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

async fn discard(tmp: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("Could not remove temp file {}: {}", tmp.display(), e);
        }
    }
}

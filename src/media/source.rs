//! Resolving an audio source locator into bytes the decoder can read.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;

use super::types::{LoadedSource, MediaError};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Remote,
    Local(PathBuf),
}

/// Classify `uri` as a remote locator or a local path.
pub(crate) fn classify(uri: &str) -> Result<SourceKind, MediaError> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(MediaError::UnsupportedSource(uri.to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(SourceKind::Remote);
    }
    if let Some(path) = trimmed.strip_prefix("file://") {
        return Ok(SourceKind::Local(PathBuf::from(path)));
    }
    // Anything else that looks like `scheme://` is not something we can open.
    if trimmed.contains("://") {
        return Err(MediaError::UnsupportedSource(uri.to_string()));
    }
    Ok(SourceKind::Local(PathBuf::from(trimmed)))
}

/// Fetch the whole source into memory.
pub(crate) fn fetch(uri: &str, timeout: Duration) -> Result<LoadedSource, MediaError> {
    let bytes: Vec<u8> = match classify(uri)? {
        SourceKind::Remote => fetch_remote(uri, timeout)?,
        SourceKind::Local(path) => std::fs::read(&path).map_err(|source| MediaError::Io {
            path: path.display().to_string(),
            source,
        })?,
    };

    let tagged_duration = tagged_duration(&bytes);
    tracing::debug!(uri, len = bytes.len(), ?tagged_duration, "source fetched");

    Ok(LoadedSource {
        uri: uri.to_string(),
        bytes: Arc::from(bytes),
        tagged_duration,
    })
}

fn fetch_remote(uri: &str, timeout: Duration) -> Result<Vec<u8>, MediaError> {
    let fetch_err = |reason: String| MediaError::Fetch {
        uri: uri.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;

    let response = client
        .get(uri)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(e.to_string()))?;

    let body = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
    Ok(body.to_vec())
}

/// Duration from container metadata, if the bytes carry any.
pub(crate) fn tagged_duration(bytes: &[u8]) -> Option<Duration> {
    let probe = Probe::new(Cursor::new(bytes)).guess_file_type().ok()?;
    let tagged = probe.read().ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}

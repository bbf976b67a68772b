// SPDX-License-Identifier: MPL-2.0
//! Snapshot export port definition.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

/// Errors raised while saving or sharing a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The snapshot could not be encoded.
    EncodingFailed(String),
    /// Writing the file failed.
    Io(String),
    /// No destination directory could be determined.
    NoDestination,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EncodingFailed(msg) => write!(f, "Encoding failed: {msg}"),
            ExportError::Io(msg) => write!(f, "I/O error: {msg}"),
            ExportError::NoDestination => write!(f, "No destination for the snapshot"),
        }
    }
}

impl std::error::Error for ExportError {}

/// What happened to a shared snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Written to the given path.
    Saved(PathBuf),
    /// The user dismissed the share target.
    Cancelled,
}

/// Port for handing a PNG snapshot to the platform.
pub trait SnapshotSink: Send + Sync {
    /// Whether this sink can be used on the current platform.
    fn is_available(&self) -> bool;

    fn share(
        &self,
        file_name: &str,
        png: &[u8],
    ) -> impl Future<Output = Result<ShareOutcome, ExportError>> + Send;
}

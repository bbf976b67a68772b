// SPDX-License-Identifier: MPL-2.0
//! Snapshot share targets implementing the [`SnapshotSink`] port trait.
//!
//! - [`DialogShare`]: native save dialog via `rfd`
//! - [`DownloadShare`]: writes straight into a downloads directory under a
//!   fixed filename
//! - [`PlatformShare`]: the dialog when a desktop session is available, the
//!   download otherwise
//!
//! [`SnapshotSink`]: crate::application::port::SnapshotSink

use crate::application::port::{ExportError, ShareOutcome, SnapshotSink};
use futures_util::future::Either;
use std::future::Future;
use std::path::PathBuf;

/// Native save dialog.
#[derive(Debug, Clone)]
pub struct DialogShare {
    initial_dir: Option<PathBuf>,
    enabled: bool,
}

impl DialogShare {
    #[must_use]
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self {
            initial_dir,
            enabled: true,
        }
    }

    /// A dialog that is never offered.
    #[cfg(test)]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            initial_dir: None,
            enabled: false,
        }
    }
}

impl Default for DialogShare {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SnapshotSink for DialogShare {
    fn is_available(&self) -> bool {
        if !self.enabled {
            false
        } else if cfg!(target_os = "linux") {
            std::env::var_os("WAYLAND_DISPLAY").is_some() || std::env::var_os("DISPLAY").is_some()
        } else {
            true
        }
    }

    fn share(
        &self,
        file_name: &str,
        png: &[u8],
    ) -> impl Future<Output = Result<ShareOutcome, ExportError>> + Send {
        let mut dialog = rfd::AsyncFileDialog::new()
            .set_file_name(file_name)
            .add_filter("PNG", &["png"]);
        if let Some(dir) = &self.initial_dir {
            dialog = dialog.set_directory(dir);
        }
        let png = png.to_vec();

        async move {
            let Some(handle) = dialog.save_file().await else {
                return Ok(ShareOutcome::Cancelled);
            };
            let path = handle.path().to_path_buf();
            std::fs::write(&path, png).map_err(|e| ExportError::Io(e.to_string()))?;
            Ok(ShareOutcome::Saved(path))
        }
    }
}

/// Direct download into a directory, without asking.
#[derive(Debug, Clone)]
pub struct DownloadShare {
    dir: Option<PathBuf>,
}

impl DownloadShare {
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Downloads directory of the current user, if any.
    #[must_use]
    pub fn user_downloads() -> Self {
        Self::new(dirs::download_dir().or_else(dirs::home_dir))
    }
}

impl SnapshotSink for DownloadShare {
    fn is_available(&self) -> bool {
        self.dir.is_some()
    }

    fn share(
        &self,
        file_name: &str,
        png: &[u8],
    ) -> impl Future<Output = Result<ShareOutcome, ExportError>> + Send {
        let target = self.dir.as_ref().map(|dir| dir.join(file_name));
        let png = png.to_vec();

        async move {
            let path = target.ok_or(ExportError::NoDestination)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
            }
            std::fs::write(&path, png).map_err(|e| ExportError::Io(e.to_string()))?;
            Ok(ShareOutcome::Saved(path))
        }
    }
}

/// Dialog when possible, direct download otherwise.
#[derive(Debug, Clone)]
pub struct PlatformShare {
    dialog: DialogShare,
    download: DownloadShare,
}

impl PlatformShare {
    #[must_use]
    pub fn new(dialog: DialogShare, download: DownloadShare) -> Self {
        Self { dialog, download }
    }
}

impl Default for PlatformShare {
    fn default() -> Self {
        let download = DownloadShare::user_downloads();
        let dialog = DialogShare::new(download.dir.clone());
        Self::new(dialog, download)
    }
}

impl SnapshotSink for PlatformShare {
    fn is_available(&self) -> bool {
        self.dialog.is_available() || self.download.is_available()
    }

    fn share(
        &self,
        file_name: &str,
        png: &[u8],
    ) -> impl Future<Output = Result<ShareOutcome, ExportError>> + Send {
        if self.dialog.is_available() {
            Either::Left(self.dialog.share(file_name, png))
        } else {
            Either::Right(self.download.share(file_name, png))
        }
    }
}

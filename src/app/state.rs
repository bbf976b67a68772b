// SPDX-License-Identifier: MPL-2.0
//! Session state machine.
//!
//! All user-visible state lives in one [`Session`] value whose [`Phase`]
//! rules out the invalid flag combinations (capturing without a face,
//! viewing a screenshot while the catalog is still loading...). The struct
//! performs no I/O; `App::update` feeds it events and acts on the returned
//! transitions.

use crate::application::port::CatalogError;
use crate::domain::capture::Countdown;
use crate::domain::render::{Density, RenderConfig, TextureId};
use crate::domain::texture::{Texture, TextureCatalog};
use crate::error::Error;
use crate::media::compositor::Overlay;
use crate::media::snapshot::Snapshot;

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    LoadingCatalog,
    LoadingCamera,
    TrackingNoFace,
    TrackingFace,
    Capturing(CaptureProgress),
    ViewingScreenshot(Snapshot),
}

/// The two capture timers. The screenshot is shown once both are done.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureProgress {
    countdown: Countdown,
    snapshot: Option<Snapshot>,
}

impl CaptureProgress {
    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Content of the single message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Error(&'static str),
    Info(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    catalog: Option<TextureCatalog>,
    render: RenderConfig,
    camera_live: bool,
    status: Option<StatusMessage>,
    info_open: bool,
}

impl Session {
    /// A session waiting for its catalog.
    #[must_use]
    pub fn new(render: RenderConfig) -> Self {
        Self {
            phase: Phase::LoadingCatalog,
            catalog: None,
            render,
            camera_live: false,
            status: None,
            info_open: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&TextureCatalog> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn is_catalog_ready(&self) -> bool {
        self.catalog.is_some()
    }

    #[must_use]
    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// The selected texture, once the catalog has loaded.
    #[must_use]
    pub fn selected_texture(&self) -> Option<&Texture> {
        let id = self.render.texture.as_ref()?;
        self.catalog.as_ref()?.get(id)
    }

    /// Overlay parameters for the next composite, read by value.
    #[must_use]
    pub fn overlay(&self) -> Overlay<'_> {
        Overlay::new(
            self.selected_texture(),
            self.render.opacity(),
            self.render.enlargement,
        )
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Applies the catalog load result.
    ///
    /// Returns `true` when the catalog became ready and the camera should
    /// start. A failure records its message and leaves the session in
    /// [`Phase::LoadingCatalog`]; no partial catalog is kept.
    pub fn catalog_loaded(&mut self, result: Result<TextureCatalog, Error>) -> bool {
        if self.phase != Phase::LoadingCatalog {
            return false;
        }
        match result {
            Ok(catalog) if !catalog.is_empty() => {
                let keep_selection = self
                    .render
                    .texture
                    .as_ref()
                    .is_some_and(|id| catalog.get(id).is_some());
                if !keep_selection {
                    self.render.texture = catalog.first().map(|t| t.id().clone());
                }
                self.catalog = Some(catalog);
                self.phase = Phase::LoadingCamera;
                true
            }
            Ok(_) => {
                self.report(&Error::Catalog(CatalogError::Empty));
                false
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    /// The camera delivered its first frame.
    pub fn camera_started(&mut self) -> bool {
        self.camera_live = true;
        if self.phase == Phase::LoadingCamera {
            self.phase = Phase::TrackingNoFace;
            return true;
        }
        false
    }

    /// The camera stopped. A capture in progress is abandoned; an open
    /// screenshot stays open.
    pub fn camera_stopped(&mut self) {
        self.camera_live = false;
        match self.phase {
            Phase::TrackingNoFace | Phase::TrackingFace | Phase::Capturing(_) => {
                self.phase = Phase::LoadingCamera;
            }
            _ => {}
        }
    }

    /// Updates the face-found state from the latest composite.
    ///
    /// Returns the new state when it changed. Ignored outside tracking.
    pub fn face_changed(&mut self, found: bool) -> Option<bool> {
        match (&self.phase, found) {
            (Phase::TrackingNoFace, true) => {
                self.phase = Phase::TrackingFace;
                Some(true)
            }
            (Phase::TrackingFace, false) => {
                self.phase = Phase::TrackingNoFace;
                Some(false)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Whether the capture button is enabled.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.phase == Phase::TrackingFace
    }

    /// Starts a capture. A no-op returning `false` unless a face is tracked
    /// and no capture is running.
    pub fn start_capture(&mut self, countdown: Countdown) -> bool {
        if !self.can_capture() {
            return false;
        }
        self.phase = Phase::Capturing(CaptureProgress {
            countdown,
            snapshot: None,
        });
        true
    }

    #[must_use]
    pub fn countdown_remaining(&self) -> Option<u8> {
        match &self.phase {
            Phase::Capturing(progress) => Some(progress.countdown.remaining()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self.phase, Phase::Capturing(_))
    }

    /// One countdown second elapsed. Returns `true` if the screenshot is now
    /// shown.
    pub fn tick_countdown(&mut self) -> bool {
        if let Phase::Capturing(progress) = &mut self.phase {
            progress.countdown.tick();
        }
        self.finish_capture()
    }

    /// The delayed snapshot was taken. Returns `true` if the screenshot is
    /// now shown.
    pub fn snapshot_taken(&mut self, snapshot: Snapshot) -> bool {
        if let Phase::Capturing(progress) = &mut self.phase {
            if progress.snapshot.is_none() {
                progress.snapshot = Some(snapshot);
            }
        }
        self.finish_capture()
    }

    /// Drops a capture whose snapshot could not be taken.
    pub fn abort_capture(&mut self) {
        if self.is_capturing() {
            self.phase = self.idle_phase();
        }
    }

    fn finish_capture(&mut self) -> bool {
        let done = matches!(
            &self.phase,
            Phase::Capturing(p) if p.countdown.is_finished() && p.snapshot.is_some()
        );
        if !done {
            return false;
        }
        if let Phase::Capturing(CaptureProgress {
            snapshot: Some(snapshot),
            ..
        }) = std::mem::replace(&mut self.phase, Phase::LoadingCamera)
        {
            self.phase = Phase::ViewingScreenshot(snapshot);
        }
        true
    }

    #[must_use]
    pub fn screenshot(&self) -> Option<&Snapshot> {
        match &self.phase {
            Phase::ViewingScreenshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Closes the screenshot modal and resumes tracking.
    pub fn close_screenshot(&mut self) -> bool {
        if self.screenshot().is_none() {
            return false;
        }
        self.phase = self.idle_phase();
        true
    }

    fn idle_phase(&self) -> Phase {
        if self.camera_live {
            Phase::TrackingNoFace
        } else {
            Phase::LoadingCamera
        }
    }

    // =========================================================================
    // Overlay Choice
    // =========================================================================

    /// Selects a texture from the loaded catalog.
    pub fn select_texture(&mut self, id: &TextureId) -> bool {
        let known = self.catalog.as_ref().is_some_and(|c| c.get(id).is_some());
        if known {
            self.render.texture = Some(id.clone());
        }
        known
    }

    /// Returns `true` if the density changed.
    pub fn set_density(&mut self, density: Density) -> bool {
        if self.render.density == density {
            return false;
        }
        self.render.density = density;
        true
    }

    // =========================================================================
    // Message Area / Info Panel
    // =========================================================================

    /// Shows the user-facing sentence for `error`, replacing any previous
    /// message.
    pub fn report(&mut self, error: &Error) {
        self.status = Some(StatusMessage::Error(error.user_message()));
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage::Info(message.into()));
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    pub fn toggle_info(&mut self) -> bool {
        self.info_open = !self.info_open;
        self.info_open
    }

    #[must_use]
    pub fn is_info_open(&self) -> bool {
        self.info_open
    }
}

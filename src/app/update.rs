// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Startup is sequenced: the catalog loads first, then the landmark model is
//! prepared (downloaded and verified when needed), and only then is the
//! tracking worker spawned.

use super::{config, paths, App, Message, TextureChoice};
use crate::application::port::{
    CatalogError, DetectorError, ExportError, FrameSource, LandmarkDetector, ShareOutcome,
    SnapshotSink,
};
use crate::diagnostics::{AppStateEvent, UserAction};
use crate::domain::render::Density;
use crate::domain::texture::TextureCatalog;
use crate::error::Error;
use crate::infrastructure::{render_composite, FfmpegCamera, HttpFetcher, OnnxFaceMeshDetector};
use crate::media::tracking::{DetectorFactory, SourceFactory};
use crate::media::{catalog, face_mesh, Snapshot, TrackedFrame, TrackingEvent, TrackingHandle};
use iced::widget::image;
use iced::Task;
use std::path::PathBuf;

/// Routes a message to its handler.
pub(super) fn update(app: &mut App, message: Message) -> Task<Message> {
    app.diagnostics.process_pending();

    match message {
        Message::CatalogLoaded(result) => app.handle_catalog_loaded(result),
        Message::ModelDownloadProgress(progress) => {
            app.model_progress = Some(progress.clamp(0.0, 1.0));
            Task::none()
        }
        Message::ModelReady(result) => {
            app.model_progress = None;
            match result {
                Ok(path) => app.start_tracking(path),
                Err(err) => app.report_error(&err),
            }
            Task::none()
        }
        Message::Poll(_) => {
            let events = match &app.tracking {
                Some(handle) => handle.drain(),
                None => return Task::none(),
            };
            app.apply_tracking_events(events);
            Task::none()
        }
        Message::SelectTexture(choice) => {
            app.handle_select_texture(&choice);
            Task::none()
        }
        Message::SetDensity(density) => {
            app.handle_set_density(density);
            Task::none()
        }
        Message::Capture => app.handle_capture(),
        Message::CountdownTick => {
            if app.session.tick_countdown() {
                app.log_screenshot_shown();
            }
            Task::none()
        }
        Message::SnapshotDue => {
            app.handle_snapshot_due();
            Task::none()
        }
        Message::Share => app.handle_share(),
        Message::ShareCompleted(result) => {
            match result {
                Ok(ShareOutcome::Saved(path)) => {
                    app.diagnostics
                        .handle()
                        .log_state(AppStateEvent::SnapshotSaved);
                    app.session
                        .notify(format!("Snapshot saved to {}", path.display()));
                }
                Ok(ShareOutcome::Cancelled) => {}
                Err(err) => app.report_error(&Error::Export(err)),
            }
            Task::none()
        }
        Message::CloseScreenshot => {
            if app.session.close_screenshot() {
                app.screenshot_handle = None;
                app.diagnostics.handle().log_action(UserAction::CloseSnapshot);
            }
            Task::none()
        }
        Message::ToggleInfo => {
            app.session.toggle_info();
            app.diagnostics.handle().log_action(UserAction::ToggleInfo);
            Task::none()
        }
        Message::ExportDiagnostics => {
            app.handle_export_diagnostics();
            Task::none()
        }
        Message::DismissMessage => {
            app.session.dismiss_status();
            Task::none()
        }
    }
}

impl App {
    /// Logs `err` at its origin and shows its sentence in the message area.
    pub(super) fn report_error(&mut self, err: &Error) {
        eprintln!("{err}");
        self.diagnostics.handle().log_error(err);
        self.session.report(err);
    }

    // =========================================================================
    // Startup
    // =========================================================================

    pub(super) fn load_catalog_task(&self) -> Task<Message> {
        let url = self.catalog_url().to_string();
        let storage_base = self.config.storage_base_url().to_string();

        Task::perform(
            async move {
                let fetcher = HttpFetcher::new()
                    .map_err(|e| Error::Catalog(CatalogError::FetchFailed(e)))?;
                catalog::load_catalog(&fetcher, &url, &storage_base)
                    .await
                    .map_err(Error::from)
            },
            Message::CatalogLoaded,
        )
    }

    fn handle_catalog_loaded(
        &mut self,
        result: Result<TextureCatalog, Error>,
    ) -> Task<Message> {
        if let Err(err) = &result {
            eprintln!("{err}");
            self.diagnostics.handle().log_error(err);
        }
        if !self.session.catalog_loaded(result) {
            return Task::none();
        }

        let textures = self.session.catalog().map_or(0, |c| c.len());
        self.diagnostics
            .handle()
            .log_state(AppStateEvent::CatalogReady { textures });

        prepare_model_task(
            self.config.model_path(),
            self.config.detector.model_url.clone(),
            self.config.detector.model_checksum.clone(),
        )
    }

    fn start_tracking(&mut self, model_path: PathBuf) {
        let device = self.camera_device().to_string();
        let (width, height) = self.config.camera_resolution();
        let input_size = self.config.model_input_size();
        let options = self.config.detector_options();

        let source: SourceFactory = Box::new(move || {
            FfmpegCamera::open(&device, width, height)
                .map(|camera| Box::new(camera) as Box<dyn FrameSource>)
        });
        let detector: DetectorFactory = Box::new(move || {
            OnnxFaceMeshDetector::load(model_path, input_size, options)
                .map(|detector| Box::new(detector) as Box<dyn LandmarkDetector>)
        });

        self.tracking = Some(TrackingHandle::spawn(source, detector));
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Applies worker events in order. Only the newest frame is composited.
    pub(super) fn apply_tracking_events(&mut self, events: Vec<TrackingEvent>) {
        let mut latest = None;
        let mut finished = false;

        for event in events {
            match event {
                TrackingEvent::Started { width, height } => {
                    if self.session.camera_started() {
                        self.diagnostics
                            .handle()
                            .log_state(AppStateEvent::CameraStarted { width, height });
                    }
                }
                TrackingEvent::Frame(tracked) => latest = Some(tracked),
                TrackingEvent::Failed(err) => {
                    self.report_error(&err);
                    finished = true;
                }
                TrackingEvent::Ended => {
                    self.diagnostics.handle().log_state(AppStateEvent::CameraEnded);
                    finished = true;
                }
            }
        }

        if finished {
            self.tracking = None;
            self.session.camera_stopped();
        }
        if let Some(tracked) = latest {
            self.show_frame(&tracked);
        }
    }

    fn show_frame(&mut self, tracked: &TrackedFrame) {
        let overlay = self.session.overlay();
        let Some((canvas, outcome)) =
            render_composite(&tracked.frame, tracked.landmarks.as_ref(), &overlay)
        else {
            return;
        };

        match self.session.face_changed(outcome.face_found) {
            Some(true) => self.diagnostics.handle().log_state(AppStateEvent::FaceFound),
            Some(false) => self.diagnostics.handle().log_state(AppStateEvent::FaceLost),
            None => {}
        }

        self.preview_handle = Some(image::Handle::from_rgba(
            canvas.width(),
            canvas.height(),
            canvas.rgba_bytes().to_vec(),
        ));
        self.preview = Some(canvas);
    }

    // =========================================================================
    // Overlay Choice
    // =========================================================================

    fn handle_select_texture(&mut self, choice: &TextureChoice) {
        if self.session.select_texture(&choice.id) {
            self.diagnostics.handle().log_action(UserAction::SelectTexture {
                id: choice.id.to_string(),
            });
        }
    }

    fn handle_set_density(&mut self, density: Density) {
        if !self.session.set_density(density) {
            return;
        }
        self.diagnostics.handle().log_action(UserAction::SetDensity {
            density: density.key().to_string(),
        });

        self.config.overlay.density = Some(density);
        if let Err(err) = config::save_with_override(&self.config, self.config_dir.clone()) {
            eprintln!("Failed to save config: {err}");
            self.diagnostics
                .handle()
                .log_warning(format!("Failed to save config: {err}"));
        }
    }

    // =========================================================================
    // Capture / Share
    // =========================================================================

    fn handle_capture(&mut self) -> Task<Message> {
        if !self.session.start_capture(self.config.countdown()) {
            return Task::none();
        }
        self.diagnostics.handle().log_action(UserAction::StartCapture);

        let delay = self.config.capture_delay();
        Task::perform(
            async move { tokio::time::sleep(delay).await },
            |()| Message::SnapshotDue,
        )
    }

    fn handle_snapshot_due(&mut self) {
        if !self.session.is_capturing() {
            return;
        }
        let Some(canvas) = self.preview.as_ref() else {
            self.diagnostics
                .handle()
                .log_warning("Capture requested before any frame was shown");
            self.session.abort_capture();
            return;
        };

        match Snapshot::capture(canvas) {
            Ok(snapshot) => {
                self.diagnostics
                    .handle()
                    .log_state(AppStateEvent::SnapshotTaken {
                        width: snapshot.width(),
                        height: snapshot.height(),
                    });
                let frame = snapshot.frame();
                self.screenshot_handle = Some(image::Handle::from_rgba(
                    frame.width(),
                    frame.height(),
                    frame.rgba_bytes().to_vec(),
                ));
                if self.session.snapshot_taken(snapshot) {
                    self.log_screenshot_shown();
                }
            }
            Err(err) => {
                self.session.abort_capture();
                self.report_error(&Error::Export(err));
            }
        }
    }

    fn log_screenshot_shown(&self) {
        self.diagnostics
            .handle()
            .log_state(AppStateEvent::ScreenshotShown);
    }

    fn handle_share(&mut self) -> Task<Message> {
        let Some(snapshot) = self.session.screenshot() else {
            return Task::none();
        };
        self.diagnostics.handle().log_action(UserAction::ShareSnapshot);

        let png = snapshot.png_arc();
        let file_name = self.config.snapshot_file_name().to_string();
        let share = self.share.clone();

        if !share.is_available() {
            return Task::done(Message::ShareCompleted(Err(ExportError::NoDestination)));
        }

        Task::perform(
            async move { share.share(&file_name, &png).await },
            Message::ShareCompleted,
        )
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn handle_export_diagnostics(&mut self) {
        self.diagnostics
            .handle()
            .log_action(UserAction::ExportDiagnostics);
        self.diagnostics.process_pending();

        let Some(dir) = paths::get_app_data_dir() else {
            self.report_error(&Error::Io("No data directory available".to_string()));
            return;
        };
        match self.diagnostics.export_to_dir(dir.join("diagnostics")) {
            Ok(path) => self
                .session
                .notify(format!("Diagnostics saved to {}", path.display())),
            Err(err) => self.report_error(&err),
        }
    }
}

// =============================================================================
// Model Preparation
// =============================================================================

/// Makes sure the landmark model is on disk and matches its checksum.
///
/// A missing model is downloaded from `url` with progress messages; without
/// a URL it is a [`DetectorError::ModelNotFound`].
fn prepare_model_task(
    path: PathBuf,
    url: Option<String>,
    checksum: Option<String>,
) -> Task<Message> {
    use iced::futures::SinkExt;

    if path.is_file() {
        return Task::perform(
            async move { verify_model(path, checksum.as_deref()) },
            Message::ModelReady,
        );
    }

    let Some(url) = url else {
        return Task::done(Message::ModelReady(Err(Error::Detector(
            DetectorError::ModelNotFound(path.display().to_string()),
        ))));
    };

    Task::stream(iced::stream::channel(
        100,
        move |mut output: iced::futures::channel::mpsc::Sender<Message>| async move {
            let mut progress_tx = output.clone();
            let downloaded = face_mesh::download_model(
                &url,
                &path,
                checksum.as_deref(),
                move |progress| {
                    let _ = progress_tx.try_send(Message::ModelDownloadProgress(progress));
                },
            )
            .await;

            let result = downloaded.map(|_bytes| path).map_err(Error::from);
            let _ = output.send(Message::ModelReady(result)).await;
        },
    ))
}

/// Checks a model already on disk. A file with the wrong digest is deleted
/// so the next start downloads it again.
fn verify_model(path: PathBuf, checksum: Option<&str>) -> Result<PathBuf, Error> {
    let Some(expected) = checksum else {
        return Ok(path);
    };
    match face_mesh::verify_checksum(&path, expected) {
        Ok(()) => Ok(path),
        Err(err) => {
            if matches!(err, DetectorError::ChecksumMismatch { .. }) {
                face_mesh::discard_model(&path);
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verify_model_without_checksum_accepts_path() {
        let path = PathBuf::from("/nonexistent/face_landmark.onnx");
        assert_eq!(verify_model(path.clone(), None), Ok(path));
    }

    #[test]
    fn verify_model_deletes_file_with_wrong_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(face_mesh::MODEL_FILENAME);
        std::fs::write(&path, b"not a model").expect("write");

        let result = verify_model(path.clone(), Some("00ff"));

        assert!(matches!(
            result,
            Err(Error::Detector(DetectorError::ChecksumMismatch { .. }))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn verify_model_keeps_file_without_checksum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(face_mesh::MODEL_FILENAME);
        std::fs::write(&path, b"model bytes").expect("write");

        assert_eq!(verify_model(path.clone(), None), Ok(path.clone()));
        assert!(path.is_file());
    }

    #[test]
    fn verify_model_accepts_matching_digest() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"model bytes").expect("write");
        let digest = blake3::hash(b"model bytes").to_hex().to_string();

        assert!(verify_model(file.path().to_path_buf(), Some(&digest)).is_ok());
    }
}

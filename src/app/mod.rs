// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration.
//!
//! The `App` struct owns the explicit [`Session`] state machine, the texture
//! catalog (through the session), the tracking worker and the diagnostics
//! collector, and translates messages into side effects: network loads,
//! model preparation, snapshot sharing and config persistence.

pub mod config;
mod message;
pub mod paths;
pub mod state;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message, TextureChoice};
pub use state::{Phase, Session, StatusMessage};

use crate::diagnostics::{BufferCapacity, DiagnosticsCollector, RetentionPolicy};
use crate::domain::frame::Frame;
use crate::infrastructure::PlatformShare;
use crate::media::TrackingHandle;
use config::Config;
use iced::widget::image;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Root Iced application state.
pub struct App {
    config: Config,
    /// Directory `settings.toml` is saved to; `None` resolves through `paths`.
    config_dir: Option<PathBuf>,
    /// `--camera` override, never written back to the config file.
    camera_override: Option<String>,
    /// `--catalog-url` override, never written back to the config file.
    catalog_url_override: Option<String>,
    session: Session,
    tracking: Option<TrackingHandle>,
    /// Latest composited canvas, the source of snapshots.
    preview: Option<Frame>,
    preview_handle: Option<image::Handle>,
    screenshot_handle: Option<image::Handle>,
    model_progress: Option<f32>,
    share: PlatformShare,
    diagnostics: DiagnosticsCollector,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("phase", self.session.phase())
            .field("tracking", &self.tracking.is_some())
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: u32 = 1000;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 400;

/// Builds the window settings.
#[must_use]
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

    // iced 0.14 requires an `Fn` boot closure; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads the config and starts fetching the catalog.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let mut app = Self::with_config(config, None, flags);

        if let Some(warning) = config_warning {
            eprintln!("{warning}");
            app.diagnostics.handle().log_warning(warning.clone());
            app.session.notify(warning);
        }

        let task = app.load_catalog_task();
        (app, task)
    }

    fn with_config(config: Config, config_dir: Option<PathBuf>, flags: Flags) -> Self {
        let session = Session::new(config.render_config());
        Self {
            config,
            config_dir,
            camera_override: flags.camera,
            catalog_url_override: flags.catalog_url,
            session,
            tracking: None,
            preview: None,
            preview_handle: None,
            screenshot_handle: None,
            model_progress: None,
            share: PlatformShare::default(),
            diagnostics: DiagnosticsCollector::new(RetentionPolicy::new(
                BufferCapacity::new(config::DEFAULT_DIAGNOSTICS_CAPACITY),
                Duration::from_secs(config::DEFAULT_DIAGNOSTICS_RETENTION_MINS * 60),
            )),
        }
    }

    fn camera_device(&self) -> &str {
        self.camera_override
            .as_deref()
            .unwrap_or_else(|| self.config.camera_device())
    }

    fn catalog_url(&self) -> &str {
        self.catalog_url_override
            .as_deref()
            .unwrap_or_else(|| self.config.catalog_url())
    }

    fn title(&self) -> String {
        match self.session.countdown_remaining() {
            Some(seconds) if seconds > 0 => format!("Iris Lens - {seconds}"),
            _ => "Iris Lens".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::subscription(self)
    }
}

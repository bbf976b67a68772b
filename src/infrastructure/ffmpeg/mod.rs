// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`FrameSource`] port trait.
//!
//! [`FfmpegCamera`] opens either a capture device (V4L2 on Linux,
//! AVFoundation on macOS, DirectShow on Windows) or a plain video file, and
//! yields RGBA frames one at a time. Video files are paced at their own
//! frame rate so they replay like a live camera.
//!
//! [`FrameSource`]: crate::application::port::FrameSource

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::application::port::{CameraError, FrameSource};
use crate::domain::frame::Frame;

static FFMPEG_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initializes `FFmpeg` once and lowers its log level to errors only.
///
/// The outcome of the first attempt is returned on every call.
fn init_ffmpeg() -> Result<(), CameraError> {
    init_once(&FFMPEG_INIT, || {
        ffmpeg_next::init().map_err(|e| format!("FFmpeg initialization failed: {e}"))?;
        ffmpeg_next::device::register_all();

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
        Ok(())
    })
}

fn init_once(
    cell: &OnceLock<Result<(), String>>,
    init: impl FnOnce() -> Result<(), String>,
) -> Result<(), CameraError> {
    cell.get_or_init(init)
        .clone()
        .map_err(CameraError::OpenFailed)
}

/// Capture input format for the current platform.
fn platform_input_format() -> &'static str {
    if cfg!(target_os = "linux") {
        "video4linux2"
    } else if cfg!(target_os = "macos") {
        "avfoundation"
    } else {
        "dshow"
    }
}

/// Whether `source` names a capture device rather than a video file.
#[must_use]
pub fn is_capture_device(source: &str) -> bool {
    if cfg!(target_os = "linux") {
        source.starts_with("/dev/video")
    } else {
        !Path::new(source).is_file()
    }
}

/// `FFmpeg`-based camera.
///
/// This type is not `Send`; create it on the thread that reads from it.
pub struct FfmpegCamera {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    /// Target interval between frames for file playback, `None` for devices.
    pacing: Option<Duration>,
    last_frame_at: Option<Instant>,
}

impl FfmpegCamera {
    /// Opens `source` at the requested resolution.
    ///
    /// The resolution is a request to capture devices; video files keep
    /// their own size.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::OpenFailed`] if the device or file cannot be
    /// opened, or [`CameraError::NoVideoStream`] if it carries no video.
    pub fn open(source: &str, width: u32, height: u32) -> Result<Self, CameraError> {
        init_ffmpeg()?;

        let device = is_capture_device(source);
        let input = if device {
            open_device(source, width, height)?
        } else {
            ffmpeg_next::format::input(&source)
                .map_err(|e| CameraError::OpenFailed(format!("{source}: {e}")))?
        };

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(CameraError::NoVideoStream)?;
        let stream_index = stream.index();

        let frame_rate = stream.avg_frame_rate();
        let pacing = (!device && frame_rate.numerator() > 0 && frame_rate.denominator() > 0)
            .then(|| {
                Duration::from_secs_f64(
                    f64::from(frame_rate.denominator()) / f64::from(frame_rate.numerator()),
                )
            });

        let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| CameraError::OpenFailed(format!("Failed to create codec context: {e}")))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| CameraError::OpenFailed(format!("Failed to create video decoder: {e}")))?;

        let (width, height) = (decoder.width(), decoder.height());
        if width == 0 || height == 0 {
            return Err(CameraError::OpenFailed(format!(
                "Invalid video dimensions: {width}x{height}"
            )));
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| CameraError::OpenFailed(format!("Failed to create scaler: {e}")))?;

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            width,
            height,
            pacing,
            last_frame_at: None,
        })
    }

    /// Extracts RGBA data from a scaled frame, handling stride correctly.
    #[allow(clippy::cast_possible_truncation)]
    fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
        let width = frame.width();
        let height = frame.height();
        let data = frame.data(0);
        let stride = frame.stride(0);

        let mut rgba_bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            let row_start = (y * stride as u32) as usize;
            let row_end = row_start + (width * 4) as usize;
            rgba_bytes.extend_from_slice(&data[row_start..row_end]);
        }

        rgba_bytes
    }

    fn convert(&mut self, decoded: &ffmpeg_next::frame::Video) -> Result<Frame, CameraError> {
        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgba_frame)
            .map_err(|e| CameraError::DecodingFailed(format!("Scaling failed: {e}")))?;

        Frame::from_rgba(self.width, self.height, Self::extract_rgba_data(&rgba_frame))
            .ok_or_else(|| CameraError::DecodingFailed("Unexpected frame size".to_string()))
    }

    fn pace(&mut self) {
        if let (Some(interval), Some(last)) = (self.pacing, self.last_frame_at) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_frame_at = Some(Instant::now());
    }
}

fn open_device(
    source: &str,
    width: u32,
    height: u32,
) -> Result<ffmpeg_next::format::context::Input, CameraError> {
    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name() == platform_input_format())
        .ok_or_else(|| {
            CameraError::OpenFailed(format!("{} input not available", platform_input_format()))
        })?;

    let mut options = ffmpeg_next::Dictionary::new();
    options.set("video_size", &format!("{width}x{height}"));

    let context = ffmpeg_next::format::open_with(&source, &ffmpeg_next::Format::Input(format), options)
        .map_err(|e| CameraError::OpenFailed(format!("{source}: {e}")))?;

    match context {
        ffmpeg_next::format::context::Context::Input(input) => Ok(input),
        ffmpeg_next::format::context::Context::Output(_) => Err(CameraError::OpenFailed(format!(
            "{source} is not an input"
        ))),
    }
}

impl FrameSource for FfmpegCamera {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        let mut decoded = ffmpeg_next::frame::Video::empty();

        if self.decoder.receive_frame(&mut decoded).is_ok() {
            self.pace();
            return self.convert(&decoded).map(Some);
        }

        loop {
            let stream_index = self.stream_index;
            let packet = self
                .input
                .packets()
                .find(|(stream, _)| stream.index() == stream_index)
                .map(|(_, packet)| packet);

            let Some(packet) = packet else {
                return Ok(None);
            };

            self.decoder
                .send_packet(&packet)
                .map_err(|e| CameraError::DecodingFailed(format!("Packet send failed: {e}")))?;

            if self.decoder.receive_frame(&mut decoded).is_ok() {
                self.pace();
                return self.convert(&decoded).map(Some);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_init_is_reported_on_every_call() {
        let cell = OnceLock::new();

        let first = init_once(&cell, || Err("no codecs".to_string()));
        let second = init_once(&cell, || Ok(()));

        assert_eq!(first, Err(CameraError::OpenFailed("no codecs".to_string())));
        assert_eq!(second, first);
    }

    #[test]
    fn successful_init_runs_once() {
        let cell = OnceLock::new();
        let mut runs = 0;

        let _ = init_once(&cell, || {
            runs += 1;
            Ok(())
        });
        let again = init_once(&cell, || {
            runs += 1;
            Ok(())
        });

        assert_eq!(again, Ok(()));
        assert_eq!(runs, 1);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let result = FfmpegCamera::open("/nonexistent/clip.mp4", 1280, 720);
        assert!(matches!(result, Err(CameraError::OpenFailed(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn v4l2_paths_are_devices() {
        assert!(is_capture_device("/dev/video0"));
        assert!(!is_capture_device("clip.mp4"));
    }

    #[test]
    fn sample_video_yields_frames() {
        let path = "tests/data/sample.mp4";
        if !Path::new(path).exists() {
            return;
        }

        let mut camera = FfmpegCamera::open(path, 1280, 720).expect("open sample");
        let (width, height) = camera.resolution();
        let frame = camera.next_frame().expect("decode").expect("first frame");

        assert_eq!((frame.width(), frame.height()), (width, height));
    }
}

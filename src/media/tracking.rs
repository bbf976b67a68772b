// SPDX-License-Identifier: MPL-2.0
//! Camera + landmark detector worker.
//!
//! A single background thread pulls frames from a [`FrameSource`], runs the
//! [`LandmarkDetector`] on each one and delivers the pair to the UI through a
//! bounded channel. Frames are processed strictly one after another; the UI
//! sees each result exactly once and never two at the same time.
//!
//! Camera and detector are built on the worker thread from factories, so
//! neither has to be `Send` once constructed there.

use crate::application::port::{CameraError, DetectorError, FrameSource, LandmarkDetector};
use crate::domain::frame::Frame;
use crate::domain::landmark::LandmarkSet;
use crate::error::Error;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Builds the frame source on the worker thread.
pub type SourceFactory = Box<dyn FnOnce() -> Result<Box<dyn FrameSource>, CameraError> + Send>;

/// Builds the landmark detector on the worker thread.
pub type DetectorFactory =
    Box<dyn FnOnce() -> Result<Box<dyn LandmarkDetector>, DetectorError> + Send>;

/// Frames waiting for the UI. Small so the overlay never lags the camera.
const CHANNEL_CAPACITY: usize = 2;

/// How long a blocked send waits before rechecking the stop flag.
const SEND_POLL: Duration = Duration::from_millis(50);

/// Longest the UI thread waits for the worker when tracking stops.
pub const JOIN_TIMEOUT: Duration = Duration::from_millis(200);
const JOIN_POLL: Duration = Duration::from_millis(5);

/// A camera frame together with the detector's result for it.
#[derive(Debug, Clone)]
pub struct TrackedFrame {
    pub frame: Frame,
    pub landmarks: Option<LandmarkSet>,
}

/// Messages from the tracking worker.
#[derive(Debug, Clone)]
pub enum TrackingEvent {
    /// Camera and detector are running.
    Started { width: u32, height: u32 },
    /// One processed frame.
    Frame(TrackedFrame),
    /// The worker stopped on an error.
    Failed(Error),
    /// The source reached end of stream.
    Ended,
}

/// Owns the tracking worker. Dropping the handle stops the thread.
pub struct TrackingHandle {
    receiver: Receiver<TrackingEvent>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl TrackingHandle {
    /// Starts the worker.
    #[must_use]
    pub fn spawn(source: SourceFactory, detector: DetectorFactory) -> Self {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let worker = std::thread::Builder::new()
            .name("iris-tracking".to_string())
            .spawn(move || run_worker(source, detector, &sender, &worker_stop));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("Failed to spawn tracking thread: {e}");
                None
            }
        };

        Self {
            receiver,
            stop,
            worker,
        }
    }

    /// Takes every event delivered since the last call, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<TrackingEvent> {
        self.receiver.try_iter().collect()
    }

    /// Whether the worker thread is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Signals the worker to stop and waits up to [`JOIN_TIMEOUT`] for it.
    ///
    /// A worker still blocked in a camera read after that is detached; it
    /// exits on its own once the read returns and sees the stop flag.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let Some(worker) = self.worker.take() else {
            return;
        };

        let deadline = Instant::now() + JOIN_TIMEOUT;
        while !worker.is_finished() && Instant::now() < deadline {
            std::thread::sleep(JOIN_POLL);
        }
        if worker.is_finished() && worker.join().is_err() {
            eprintln!("Tracking thread panicked");
        }
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for TrackingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingHandle")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn run_worker(
    source: SourceFactory,
    detector: DetectorFactory,
    sender: &Sender<TrackingEvent>,
    stop: &AtomicBool,
) {
    let mut source = match source() {
        Ok(source) => source,
        Err(e) => {
            let _ = sender.send(TrackingEvent::Failed(e.into()));
            return;
        }
    };
    let mut detector = match detector() {
        Ok(detector) => detector,
        Err(e) => {
            let _ = sender.send(TrackingEvent::Failed(e.into()));
            return;
        }
    };

    let (width, height) = source.resolution();
    if !deliver(sender, stop, TrackingEvent::Started { width, height }) {
        return;
    }

    while !stop.load(Ordering::SeqCst) {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                deliver(sender, stop, TrackingEvent::Ended);
                return;
            }
            Err(e) => {
                deliver(sender, stop, TrackingEvent::Failed(e.into()));
                return;
            }
        };

        let landmarks = match detector.detect(&frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                deliver(sender, stop, TrackingEvent::Failed(e.into()));
                return;
            }
        };

        let event = TrackingEvent::Frame(TrackedFrame { frame, landmarks });
        if !deliver(sender, stop, event) {
            return;
        }
    }
}

/// Sends `event`, waiting for room unless a stop is requested.
///
/// Returns `false` once the worker should exit.
fn deliver(sender: &Sender<TrackingEvent>, stop: &AtomicBool, mut event: TrackingEvent) -> bool {
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        match sender.send_timeout(event, SEND_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(returned)) => event = returned,
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::landmark::Landmark;

    struct ScriptedSource {
        remaining: usize,
    }

    impl FrameSource for ScriptedSource {
        fn resolution(&self) -> (u32, u32) {
            (4, 4)
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            Ok(Some(Frame::filled(4, 4, [1, 2, 3, 255])))
        }
    }

    struct EveryOtherFace {
        calls: usize,
    }

    impl LandmarkDetector for EveryOtherFace {
        fn detect(&mut self, _frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
            self.calls += 1;
            Ok((self.calls % 2 == 1).then(|| vec![Landmark::new(0.5, 0.5, 0.0)].into()))
        }
    }

    fn collect_until_done(handle: &TrackingHandle) -> Vec<TrackingEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(handle.drain());
            if events
                .iter()
                .any(|e| matches!(e, TrackingEvent::Ended | TrackingEvent::Failed(_)))
            {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn frames_are_delivered_in_order_then_end() {
        let handle = TrackingHandle::spawn(
            Box::new(|| Ok(Box::new(ScriptedSource { remaining: 3 }) as Box<dyn FrameSource>)),
            Box::new(|| Ok(Box::new(EveryOtherFace { calls: 0 }) as Box<dyn LandmarkDetector>)),
        );

        let events = collect_until_done(&handle);

        assert!(matches!(
            events.first(),
            Some(TrackingEvent::Started { width: 4, height: 4 })
        ));
        let faces: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                TrackingEvent::Frame(f) => Some(f.landmarks.is_some()),
                _ => None,
            })
            .collect();
        assert_eq!(faces, vec![true, false, true]);
        assert!(matches!(events.last(), Some(TrackingEvent::Ended)));
    }

    #[test]
    fn camera_failure_is_reported() {
        let handle = TrackingHandle::spawn(
            Box::new(|| Err(CameraError::OpenFailed("permission denied".to_string()))),
            Box::new(|| Ok(Box::new(EveryOtherFace { calls: 0 }) as Box<dyn LandmarkDetector>)),
        );

        let events = collect_until_done(&handle);

        assert!(matches!(
            events.as_slice(),
            [TrackingEvent::Failed(Error::Camera(_))]
        ));
    }

    #[test]
    fn detector_failure_is_reported() {
        let handle = TrackingHandle::spawn(
            Box::new(|| Ok(Box::new(ScriptedSource { remaining: 1 }) as Box<dyn FrameSource>)),
            Box::new(|| Err(DetectorError::ModelNotFound("face_landmark.onnx".to_string()))),
        );

        let events = collect_until_done(&handle);

        assert!(matches!(
            events.as_slice(),
            [TrackingEvent::Failed(Error::Detector(_))]
        ));
    }

    /// Blocks in every read, like a camera that stopped delivering.
    struct StalledSource;

    impl FrameSource for StalledSource {
        fn resolution(&self) -> (u32, u32) {
            (4, 4)
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(Some(Frame::filled(4, 4, [0, 0, 0, 255])))
        }
    }

    #[test]
    fn stopping_does_not_wait_for_a_stalled_camera() {
        let mut handle = TrackingHandle::spawn(
            Box::new(|| Ok(Box::new(StalledSource) as Box<dyn FrameSource>)),
            Box::new(|| Ok(Box::new(EveryOtherFace { calls: 0 }) as Box<dyn LandmarkDetector>)),
        );
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        handle.stop();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!handle.is_running());
    }

    #[test]
    fn dropping_handle_stops_endless_source() {
        let handle = TrackingHandle::spawn(
            Box::new(|| {
                Ok(Box::new(ScriptedSource {
                    remaining: usize::MAX,
                }) as Box<dyn FrameSource>)
            }),
            Box::new(|| Ok(Box::new(EveryOtherFace { calls: 0 }) as Box<dyn LandmarkDetector>)),
        );
        std::thread::sleep(Duration::from_millis(20));
        drop(handle);
    }
}

//! Ownership of the live camera device.
//!
//! `CameraFeed` holds the one allowed handle to the device behind the
//! `FrameSource` seam. Starting an already-started feed stops the prior
//! stream first; stopping is idempotent. A device is not usable the moment
//! it opens: it warms up over a variable number of frames, delivering
//! undersized buffers until the stream settles, so readiness is observed by
//! polling rather than assumed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Mutex};
use std::thread;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// Frames at or below this size on either axis are warm-up frames and do
/// not count as a usable picture.
const MIN_FRAME_DIMENSION: u32 = 16;

/// One complete frame from the device: tightly packed RGB8, rows top-down.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// The seam between the capture pipeline and an actual camera device.
/// Production uses [`NokhwaSource`]; tests substitute synthetic sources.
pub trait FrameSource: Send {
    /// Acquires the device and begins streaming. Fails when no camera is
    /// present or access is denied.
    fn open(&mut self) -> Result<(), String>;

    /// Blocks until the device delivers the next complete frame. Pixel data
    /// is never read mid-frame; a returned `Frame` is always a full buffer.
    fn next_frame(&mut self) -> Result<Frame, String>;

    /// Releases the device. Safe to call more than once.
    fn close(&mut self);
}

type SourceFactory = Box<dyn Fn() -> Box<dyn FrameSource> + Send + Sync>;

/// Exclusive owner of the camera device handle.
pub struct CameraFeed {
    source: Mutex<Option<Box<dyn FrameSource>>>,
    ready: AtomicBool,
    in_flight: AtomicBool,
    factory: SourceFactory,
}

impl CameraFeed {
    pub fn new(factory: SourceFactory) -> CameraFeed {
        CameraFeed {
            source: Mutex::new(None),
            ready: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
            factory,
        }
    }

    /// Feed backed by the first attached camera device.
    pub fn with_device() -> CameraFeed {
        CameraFeed::new(Box::new(|| Box::new(NokhwaSource::new(0))))
    }

    /// Acquires the device and begins streaming. An already-running stream
    /// is stopped first; only one active stream may exist at a time.
    pub fn start(&self) -> Result<(), String> {
        let mut source = self
            .source
            .lock()
            .map_err(|_| "camera feed lock poisoned".to_string())?;
        if let Some(mut old) = source.take() {
            old.close();
        }
        self.ready.store(false, Ordering::SeqCst);
        let mut new_source = (self.factory)();
        new_source.open()?;
        *source = Some(new_source);
        Ok(())
    }

    /// Releases the device and clears feed state. Safe to call repeatedly.
    pub fn stop(&self) {
        if let Ok(mut source) = self.source.lock() {
            if let Some(mut old) = source.take() {
                old.close();
            }
        }
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.source
            .lock()
            .map(|source| source.is_some())
            .unwrap_or(false)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Grabs one frame to check whether the stream has warmed up yet.
    /// Returns the current readiness; callers poll this until it turns true.
    pub fn poke(&self) -> Result<bool, String> {
        if self.is_ready() {
            return Ok(true);
        }
        let mut guard = self
            .source
            .lock()
            .map_err(|_| "camera feed lock poisoned".to_string())?;
        let source = guard
            .as_mut()
            .ok_or_else(|| "Camera feed is not active".to_string())?;
        let frame = source.next_frame()?;
        let ready = frame.width > MIN_FRAME_DIMENSION && frame.height > MIN_FRAME_DIMENSION;
        if ready {
            self.ready.store(true, Ordering::SeqCst);
        }
        Ok(ready)
    }

    /// Blocks until the device delivers a full-size frame, discarding
    /// warm-up frames. The device decides how long that takes.
    pub fn ready_frame(&self) -> Result<Frame, String> {
        let mut guard = self
            .source
            .lock()
            .map_err(|_| "camera feed lock poisoned".to_string())?;
        let source = guard
            .as_mut()
            .ok_or_else(|| "Camera feed is not active".to_string())?;
        loop {
            let frame = source.next_frame()?;
            if frame.width > MIN_FRAME_DIMENSION && frame.height > MIN_FRAME_DIMENSION {
                self.ready.store(true, Ordering::SeqCst);
                return Ok(frame);
            }
        }
    }

    /// Claims the in-flight slot. A second capture while one is outstanding
    /// is rejected, never queued.
    pub fn begin_capture(&self) -> Result<(), String> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| "A capture is already in progress".to_string())?;
        Ok(())
    }

    pub fn finish_capture(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// `FrameSource` backed by the `nokhwa` cross-platform capture stack.
///
/// The device handle lives on a dedicated thread for its whole lifetime;
/// this struct only holds the channels to that thread. Frames are grabbed
/// one at a time on request and the stream is stopped when the command
/// channel closes.
pub struct NokhwaSource {
    index: u32,
    worker: Option<Worker>,
}

enum DeviceCommand {
    Grab,
    Close,
}

struct Worker {
    commands: std_mpsc::Sender<DeviceCommand>,
    frames: std_mpsc::Receiver<Result<Frame, String>>,
}

impl NokhwaSource {
    pub fn new(index: u32) -> NokhwaSource {
        NokhwaSource {
            index,
            worker: None,
        }
    }
}

impl FrameSource for NokhwaSource {
    fn open(&mut self) -> Result<(), String> {
        self.close();
        let (command_tx, command_rx) = std_mpsc::channel();
        let (frame_tx, frame_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let index = self.index;
        thread::spawn(move || {
            let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);
            let opened = Camera::new(CameraIndex::Index(index), requested)
                .and_then(|mut camera| camera.open_stream().map(|()| camera));
            let mut camera = match opened {
                Ok(camera) => {
                    let _ = ready_tx.send(Ok(()));
                    camera
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            while let Ok(DeviceCommand::Grab) = command_rx.recv() {
                let frame = camera
                    .frame()
                    .and_then(|buffer| buffer.decode_image::<RgbFormat>())
                    .map(|decoded| Frame {
                        width: decoded.width(),
                        height: decoded.height(),
                        rgb: decoded.into_raw(),
                    })
                    .map_err(|e| e.to_string());
                if frame_tx.send(frame).is_err() {
                    break;
                }
            }
            let _ = camera.stop_stream();
        });

        ready_rx
            .recv()
            .map_err(|_| "camera worker exited".to_string())??;
        self.worker = Some(Worker {
            commands: command_tx,
            frames: frame_rx,
        });
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, String> {
        let worker = self
            .worker
            .as_ref()
            .ok_or_else(|| "camera stream is not open".to_string())?;
        worker
            .commands
            .send(DeviceCommand::Grab)
            .map_err(|_| "camera worker exited".to_string())?;
        worker
            .frames
            .recv()
            .map_err(|_| "camera worker exited".to_string())?
    }

    fn close(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.commands.send(DeviceCommand::Close);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn solid_frame(width: u32, height: u32) -> Frame {
        Frame {
            width,
            height,
            rgb: vec![0; (width * height * 3) as usize],
        }
    }

    /// Synthetic source producing a fixed frame sequence, with warm-up
    /// frames first when requested.
    struct StillSource {
        frames: VecDeque<Frame>,
        closed: Arc<AtomicUsize>,
    }

    impl StillSource {
        fn factory(warmup: usize, closed: Arc<AtomicUsize>) -> SourceFactory {
            Box::new(move || {
                let mut frames = VecDeque::new();
                for _ in 0..warmup {
                    frames.push_back(solid_frame(8, 8));
                }
                frames.push_back(solid_frame(64, 48));
                Box::new(StillSource {
                    frames,
                    closed: closed.clone(),
                })
            })
        }
    }

    impl FrameSource for StillSource {
        fn open(&mut self) -> Result<(), String> {
            Ok(())
        }

        fn next_frame(&mut self) -> Result<Frame, String> {
            self.frames
                .pop_front()
                .ok_or_else(|| "no more frames".to_string())
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MissingCamera;

    impl FrameSource for MissingCamera {
        fn open(&mut self) -> Result<(), String> {
            Err("no camera device available".to_string())
        }

        fn next_frame(&mut self) -> Result<Frame, String> {
            Err("no camera device available".to_string())
        }

        fn close(&mut self) {}
    }

    #[test]
    fn start_failure_leaves_feed_inactive() {
        let feed = CameraFeed::new(Box::new(|| Box::new(MissingCamera)));
        assert!(feed.start().is_err());
        assert!(!feed.is_active());
        assert!(feed.ready_frame().is_err());
    }

    #[test]
    fn ready_frame_skips_warmup_frames() {
        let closed = Arc::new(AtomicUsize::new(0));
        let feed = CameraFeed::new(StillSource::factory(3, closed));
        feed.start().unwrap();
        assert!(!feed.is_ready());
        let frame = feed.ready_frame().unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(feed.is_ready());
    }

    #[test]
    fn poke_reports_warmup_then_ready() {
        let closed = Arc::new(AtomicUsize::new(0));
        let feed = CameraFeed::new(StillSource::factory(1, closed));
        feed.start().unwrap();
        assert!(!feed.poke().unwrap());
        assert!(feed.poke().unwrap());
        // Once ready, poking no longer consumes frames.
        assert!(feed.poke().unwrap());
    }

    #[test]
    fn restart_closes_previous_stream() {
        let closed = Arc::new(AtomicUsize::new(0));
        let feed = CameraFeed::new(StillSource::factory(0, closed.clone()));
        feed.start().unwrap();
        feed.start().unwrap();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        feed.stop();
        feed.stop();
        assert_eq!(closed.load(Ordering::SeqCst), 2);
        assert!(!feed.is_active());
    }

    #[test]
    fn second_capture_is_rejected_while_one_is_in_flight() {
        let closed = Arc::new(AtomicUsize::new(0));
        let feed = CameraFeed::new(StillSource::factory(0, closed));
        feed.start().unwrap();
        feed.begin_capture().unwrap();
        assert!(feed.begin_capture().is_err());
        feed.finish_capture();
        assert!(feed.begin_capture().is_ok());
    }
}

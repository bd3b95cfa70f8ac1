//! # mood-capture
//!
//! Capture device sessions and still-frame extraction for moodtask.
//!
//! - [`DeviceSessionManager`] acquires and releases the device, keeping at
//!   most one [`DeviceSession`] alive.
//! - [`capture_frame`] turns a ready session's current frame into a PNG
//!   [`CapturedFrame`].
//! - Backends implement [`CameraBackend`]; [`TestPatternCamera`] and
//!   [`StillImageCamera`] ship with the crate.
//!
//! ## Async usage
//!
//! Opening a device, waiting for its readiness signal, and PNG encoding are
//! all await points. Encoding runs on [`tokio::task::spawn_blocking`].

pub mod backend;
pub mod error;
pub mod frame;
pub mod session;
pub mod still_image;
pub mod test_pattern;

pub use backend::{CameraBackend, FrameSize, LiveStream, StreamRequest};
pub use error::CaptureError;
pub use frame::{CapturedFrame, FrameSummary, capture_frame, encode_png, grab_raster};
pub use session::{DeviceSession, DeviceSessionManager, SessionId};
pub use still_image::StillImageCamera;
pub use test_pattern::TestPatternCamera;

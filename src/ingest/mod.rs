//! Frame ingestion sources.
//!
//! This module provides the camera side of the gesture loop:
//! - USB/V4L2 devices (feature: ingest-v4l2)
//! - Synthetic `stub://` source (testing, demos, machines without a camera)
//!
//! Every source yields RGB24 `Frame`s. A source returning `Err` from
//! `next_frame` is treated by the loop as a dead camera: the loop stops and
//! nothing is retried.

#[cfg(feature = "ingest-v4l2")]
mod normalize;
pub mod synthetic;
#[cfg(feature = "ingest-v4l2")]
pub mod v4l2;

use anyhow::Result;

use crate::config::CameraSettings;
use crate::frame::Frame;

pub use synthetic::SyntheticSource;
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Source;

/// Device prefix that selects the synthetic source.
pub const STUB_PREFIX: &str = "stub://";

/// Anything that can hand the loop its next frame.
pub trait FrameSource {
    /// Human-readable source description for logs.
    fn describe(&self) -> String;

    /// Blocking read of the next frame. An error means the camera is gone.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Actual frame height delivered by the device, once known.
    fn frame_height(&self) -> u32;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn next_frame(&mut self) -> Result<Frame> {
        (**self).next_frame()
    }

    fn frame_height(&self) -> u32 {
        (**self).frame_height()
    }
}

/// Open the source named by `settings.device`.
///
/// `stub://` devices are always synthetic. Anything else requires the
/// `ingest-v4l2` feature.
pub fn open_source(settings: &CameraSettings) -> Result<Box<dyn FrameSource>> {
    if settings.device.starts_with(STUB_PREFIX) {
        let mut source = SyntheticSource::new(settings.clone());
        source.connect();
        return Ok(Box::new(source));
    }
    open_device(settings)
}

#[cfg(feature = "ingest-v4l2")]
fn open_device(settings: &CameraSettings) -> Result<Box<dyn FrameSource>> {
    let mut source = V4l2Source::new(settings.clone());
    source.connect()?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "ingest-v4l2"))]
fn open_device(settings: &CameraSettings) -> Result<Box<dyn FrameSource>> {
    Err(anyhow::anyhow!(
        "camera device {} requires the ingest-v4l2 feature (use stub:// for a synthetic source)",
        settings.device
    ))
}

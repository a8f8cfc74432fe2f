//! Synthetic frame source for `stub://` devices.
//!
//! Produces a moving gradient at the configured size. A `frame_limit` makes
//! the source fail after that many frames, which is how tests and demos
//! exercise the camera-failure exit.

use anyhow::{anyhow, Result};

use crate::config::CameraSettings;
use crate::frame::Frame;

use super::FrameSource;

pub struct SyntheticSource {
    settings: CameraSettings,
    frame_count: u64,
    frame_limit: Option<u64>,
}

impl SyntheticSource {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            frame_count: 0,
            frame_limit: None,
        }
    }

    /// Fail every read after `limit` frames have been produced.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Synthetic sources are always "connected".
    pub fn connect(&mut self) {
        log::info!(
            "SyntheticSource: connected to {} ({}x{})",
            self.settings.device,
            self.settings.width,
            self.settings.height
        );
    }

    pub fn frames_captured(&self) -> u64 {
        self.frame_count
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let w = self.settings.width as usize;
        let h = self.settings.height as usize;
        let shift = self.frame_count as usize;
        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                pixels.push(((x + shift) % 256) as u8);
                pixels.push(((y + shift) % 256) as u8);
                pixels.push(64);
            }
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("{} (synthetic)", self.settings.device)
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if let Some(limit) = self.frame_limit {
            if self.frame_count >= limit {
                return Err(anyhow!(
                    "synthetic source {} exhausted after {} frames",
                    self.settings.device,
                    limit
                ));
            }
        }
        self.frame_count += 1;
        let pixels = self.generate_pixels();
        Frame::from_rgb(
            pixels,
            self.settings.width,
            self.settings.height,
            self.frame_count,
        )
    }

    fn frame_height(&self) -> u32 {
        self.settings.height
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_settings() -> CameraSettings {
        CameraSettings {
            device: "stub://test".to_string(),
            width: 64,
            height: 48,
            target_fps: 30,
        }
    }

    #[test]
    fn synthetic_source_produces_sized_frames() -> Result<()> {
        let mut source = SyntheticSource::new(stub_settings());
        let frame = source.next_frame()?;
        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 48);
        assert_eq!(frame.index, 1);
        assert_eq!(frame.pixels().len(), 64 * 48 * 3);
        Ok(())
    }

    #[test]
    fn frame_limit_simulates_camera_failure() -> Result<()> {
        let mut source = SyntheticSource::new(stub_settings()).with_frame_limit(2);
        source.next_frame()?;
        source.next_frame()?;
        assert!(source.next_frame().is_err());
        assert!(source.next_frame().is_err());
        assert_eq!(source.frames_captured(), 2);
        Ok(())
    }

    #[test]
    fn consecutive_frames_differ() -> Result<()> {
        let mut source = SyntheticSource::new(stub_settings());
        let a = source.next_frame()?;
        let b = source.next_frame()?;
        assert_ne!(a.pixels(), b.pixels());
        Ok(())
    }
}

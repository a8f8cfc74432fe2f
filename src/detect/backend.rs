use anyhow::Result;

use crate::frame::Frame;

use super::landmark::LandmarkSet;

/// Hand-landmark detector.
///
/// Given a frame, report the landmarks of the detected hand in frame pixel
/// coordinates, or an empty set when no hand is visible. When a hand is
/// reported, all 21 points are expected to be present; callers still guard
/// against missing ids.
pub trait LandmarkDetector {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &Frame) -> Result<LandmarkSet>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(&mut self, frame: &Frame) -> Result<LandmarkSet> {
        (**self).detect(frame)
    }

    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}

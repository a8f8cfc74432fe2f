use anyhow::Result;

use crate::detect::backend::LandmarkDetector;
use crate::detect::landmark::LandmarkSet;
use crate::frame::Frame;

/// Backend that never sees a hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl LandmarkDetector for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<LandmarkSet> {
        Ok(LandmarkSet::empty())
    }
}

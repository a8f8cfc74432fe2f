//! Frame presentation and quit-key polling.
//!
//! `WindowDisplay` (feature: display-minifb) shows frames in a desktop
//! window and reports the quit key. `HeadlessDisplay` shows nothing and can
//! stop the loop after a fixed number of frames.

#[cfg(feature = "display-minifb")]
mod window;

use anyhow::{anyhow, Result};

use crate::frame::Frame;

#[cfg(feature = "display-minifb")]
pub use window::WindowDisplay;

pub const WINDOW_TITLE: &str = "Gesture Volume Control";

/// Display surface for annotated frames.
pub trait Display {
    /// Show `frame`. Returns `true` when the user asked to quit.
    fn present(&mut self, frame: &Frame) -> Result<bool>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn present(&mut self, frame: &Frame) -> Result<bool> {
        (**self).present(frame)
    }
}

/// No window. Optionally requests quit after `max_frames` presentations.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    presented: u64,
    max_frames: Option<u64>,
}

impl HeadlessDisplay {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            presented: 0,
            max_frames,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, _frame: &Frame) -> Result<bool> {
        self.presented += 1;
        Ok(self
            .max_frames
            .is_some_and(|limit| self.presented >= limit))
    }
}

/// Display for the binary: a window when built with one and not headless.
///
/// A frame budget only applies to headless runs; asking for one alongside a
/// window is an error.
pub fn build_display(headless: bool, max_frames: Option<u64>) -> Result<Box<dyn Display>> {
    if headless {
        return Ok(Box::new(HeadlessDisplay::new(max_frames)));
    }
    if let Some(limit) = max_frames {
        return Err(anyhow!(
            "a frame budget ({}) requires headless mode",
            limit
        ));
    }
    window_display()
}

#[cfg(feature = "display-minifb")]
fn window_display() -> Result<Box<dyn Display>> {
    Ok(Box::new(WindowDisplay::open(WINDOW_TITLE)?))
}

#[cfg(not(feature = "display-minifb"))]
fn window_display() -> Result<Box<dyn Display>> {
    log::warn!("built without display-minifb; running headless");
    Ok(Box::new(HeadlessDisplay::new(None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rgb;

    #[test]
    fn headless_quits_after_budget() -> Result<()> {
        let frame = Frame::filled(2, 2, Rgb(0, 0, 0))?;
        let mut display = HeadlessDisplay::new(Some(3));
        assert!(!display.present(&frame)?);
        assert!(!display.present(&frame)?);
        assert!(display.present(&frame)?);
        assert_eq!(display.presented(), 3);
        Ok(())
    }

    #[test]
    fn frame_budget_requires_headless() -> Result<()> {
        let err = build_display(false, Some(10)).err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.contains("headless")));

        let frame = Frame::filled(2, 2, Rgb(0, 0, 0))?;
        let mut display = build_display(true, Some(1))?;
        assert!(display.present(&frame)?);
        Ok(())
    }

    #[test]
    fn headless_without_budget_never_quits() -> Result<()> {
        let frame = Frame::filled(2, 2, Rgb(0, 0, 0))?;
        let mut display = HeadlessDisplay::new(None);
        for _ in 0..100 {
            assert!(!display.present(&frame)?);
        }
        Ok(())
    }
}

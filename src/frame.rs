//! Captured video frames.
//!
//! - `Frame`: owned RGB24 image produced by a `FrameSource`, consumed by the
//!   landmark detector, annotated by the overlay, then handed to the display.
//! - `Rgb`: a single pixel colour used by the drawing primitives.
//!
//! Frames live for exactly one loop iteration. Nothing retains them afterwards.

use anyhow::{anyhow, Result};

/// Bytes per pixel for the only layout we carry internally.
pub const RGB_CHANNELS: usize = 3;

// ----------------------------------------------------------------------------
// Rgb: pixel colour
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Packed `0x00RRGGBB`, the layout window surfaces expect.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }
}

// ----------------------------------------------------------------------------
// Frame: one captured image
// ----------------------------------------------------------------------------

/// One RGB24 video frame, row-major, no padding.
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Sequence number assigned by the source (1-based).
    pub index: u64,
}

impl Frame {
    /// Wrap already-normalized RGB24 bytes. Fails if the length does not
    /// match `width * height * 3`.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32, index: u64) -> Result<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch: expected {}, got {}",
                expected,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            index,
        })
    }

    /// A frame filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Rgb) -> Result<Self> {
        let len = expected_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / RGB_CHANNELS) {
            data.extend_from_slice(&[colour.0, colour.1, colour.2]);
        }
        Self::from_rgb(data, width, height, 0)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let offset = self.offset(x, y)?;
        Some(Rgb(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }

    /// Write one pixel. Coordinates outside the frame are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, colour: Rgb) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset] = colour.0;
            self.data[offset + 1] = colour.1;
            self.data[offset + 2] = colour.2;
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, colour: Rgb) {
        for row in y..y.saturating_add(h as i32) {
            for col in x..x.saturating_add(w as i32) {
                self.set_pixel(col, row, colour);
            }
        }
    }

    /// Pack pixels as `0x00RRGGBB` words into `out`, resizing it as needed.
    pub fn write_packed(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(
            self.data
                .chunks_exact(RGB_CHANNELS)
                .map(|px| Rgb(px[0], px[1], px[2]).to_u32()),
        );
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * RGB_CHANNELS)
    }
}

fn expected_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(RGB_CHANNELS))
        .ok_or_else(|| anyhow!("frame dimensions overflow"))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_validates_length() {
        assert!(Frame::from_rgb(vec![0u8; 12], 2, 2, 1).is_ok());
        assert!(Frame::from_rgb(vec![0u8; 11], 2, 2, 1).is_err());
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() -> Result<()> {
        let mut frame = Frame::filled(4, 3, Rgb(0, 0, 0))?;
        frame.set_pixel(-1, 0, Rgb::WHITE);
        frame.set_pixel(4, 0, Rgb::WHITE);
        frame.set_pixel(0, 3, Rgb::WHITE);
        assert!(frame.pixels().iter().all(|&b| b == 0));

        frame.set_pixel(3, 2, Rgb::GREEN);
        assert_eq!(frame.pixel(3, 2), Some(Rgb::GREEN));
        assert_eq!(frame.pixel(4, 2), None);
        Ok(())
    }

    #[test]
    fn fill_rect_clips_to_frame() -> Result<()> {
        let mut frame = Frame::filled(4, 4, Rgb(0, 0, 0))?;
        frame.fill_rect(2, 2, 10, 10, Rgb::RED);
        assert_eq!(frame.pixel(3, 3), Some(Rgb::RED));
        assert_eq!(frame.pixel(1, 1), Some(Rgb(0, 0, 0)));
        Ok(())
    }

    #[test]
    fn packed_pixels_are_0rgb() -> Result<()> {
        let frame = Frame::filled(1, 2, Rgb(0x12, 0x34, 0x56))?;
        let mut out = Vec::new();
        frame.write_packed(&mut out);
        assert_eq!(out, vec![0x0012_3456, 0x0012_3456]);
        Ok(())
    }
}

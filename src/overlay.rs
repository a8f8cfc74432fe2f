//! Frame annotation: volume readout and landmark markers.
//!
//! Text uses a built-in 5x7 bitmap font scaled by an integer factor, so no
//! font files need to ship with the binary.

use crate::detect::{hand, LandmarkSet};
use crate::frame::{Frame, Rgb};

/// Top-left corner of the volume readout.
pub const VOLUME_TEXT_ORIGIN: (i32, i32) = (10, 70);
pub const VOLUME_TEXT_COLOUR: Rgb = Rgb::GREEN;
pub const VOLUME_TEXT_SCALE: u32 = 3;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const MARKER_RADIUS: i32 = 4;

/// Text shown for a volume level.
pub fn volume_label(volume: u8) -> String {
    format!("Volume: {}%", volume)
}

/// Draw the volume readout at `VOLUME_TEXT_ORIGIN`.
///
/// The origin is the text baseline's left end, so glyphs extend upward
/// from it.
pub fn draw_volume(frame: &mut Frame, volume: u8) {
    let (x, baseline) = VOLUME_TEXT_ORIGIN;
    let top = baseline - (GLYPH_H * VOLUME_TEXT_SCALE) as i32;
    draw_text(
        frame,
        &volume_label(volume),
        x,
        top,
        VOLUME_TEXT_SCALE,
        VOLUME_TEXT_COLOUR,
    );
}

/// Draw `text` with its top-left corner at (x, y). Unknown characters render
/// as blanks.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, scale: u32, colour: Rgb) {
    let scale = scale.max(1);
    let advance = ((GLYPH_W + 1) * scale) as i32;
    let mut cx = x;
    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    frame.fill_rect(
                        cx + (col * scale) as i32,
                        y + (row as u32 * scale) as i32,
                        scale,
                        scale,
                        colour,
                    );
                }
            }
        }
        cx += advance;
    }
}

/// Mark every landmark, then join the thumb tip and index fingertip.
///
/// Landmarks outside the frame are skipped, and the link is only drawn when
/// both tips are on the frame.
pub fn draw_landmarks(frame: &mut Frame, landmarks: &LandmarkSet) {
    for lm in landmarks.iter() {
        if !on_frame(frame, lm.x, lm.y) {
            continue;
        }
        let colour = match lm.id {
            hand::THUMB_TIP | hand::INDEX_FINGER_TIP => Rgb::WHITE,
            _ => Rgb::RED,
        };
        draw_disc(frame, lm.x, lm.y, MARKER_RADIUS, colour);
    }
    if let (Some(a), Some(b)) = (
        landmarks.get(hand::THUMB_TIP),
        landmarks.get(hand::INDEX_FINGER_TIP),
    ) {
        if on_frame(frame, a.x, a.y) && on_frame(frame, b.x, b.y) {
            draw_line(frame, (a.x, a.y), (b.x, b.y), Rgb::WHITE);
        }
    }
}

fn on_frame(frame: &Frame, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < frame.width && (y as u32) < frame.height
}

// Centre must be on the frame; frame sizes keep `cx + dx` far from overflow.
fn draw_disc(frame: &mut Frame, cx: i32, cy: i32, r: i32, colour: Rgb) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                frame.set_pixel(cx + dx, cy + dy, colour);
            }
        }
    }
}

// Bresenham. Both endpoints must be on the frame.
fn draw_line(frame: &mut Frame, from: (i32, i32), to: (i32, i32), colour: Rgb) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        frame.set_pixel(x, y, colour);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn glyph(c: char) -> [u8; GLYPH_H as usize] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        'm' => [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        _ => [0x00; GLYPH_H as usize],
    }
}

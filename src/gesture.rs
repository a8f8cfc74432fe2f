//! Per-frame gesture interpretation.
//!
//! A pinch is the thumb tip and index fingertip closer than
//! `pinch_threshold_px`. While pinched, the index fingertip's height in the
//! frame sets the volume: top of frame is 0%, bottom is 100%. Each pinched
//! frame then yields exactly one volume key.
//!
//! The key is chosen by comparing the new level to the fixed midpoint
//! (`VOLUME_MIDPOINT`), not to the previous level. Holding a pinch in the
//! lower half of the frame keeps sending "volume up" every frame.

use crate::detect::{hand, Landmark, LandmarkSet};

/// Initial volume when nothing else is configured.
pub const DEFAULT_VOLUME: u8 = 50;
/// Levels below this emit "volume down", the rest "volume up".
pub const VOLUME_MIDPOINT: u8 = 50;
pub const DEFAULT_PINCH_THRESHOLD_PX: f32 = 30.0;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

// ----------------------------------------------------------------------------
// VolumeKey / VolumeState
// ----------------------------------------------------------------------------

/// Symbolic OS volume hotkey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumeKey {
    Up,
    Down,
}

impl VolumeKey {
    /// Hotkey identifier as the OS input layer names it.
    pub fn as_str(self) -> &'static str {
        match self {
            VolumeKey::Up => "volumeup",
            VolumeKey::Down => "volumedown",
        }
    }

    /// Direction for a freshly computed level.
    pub fn for_level(volume: u8) -> Self {
        if volume < VOLUME_MIDPOINT {
            VolumeKey::Down
        } else {
            VolumeKey::Up
        }
    }
}

impl std::fmt::Display for VolumeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current volume percentage, always within 0..=100.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeState(u8);

impl VolumeState {
    pub fn new(volume: u8) -> Self {
        Self(volume.min(100))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn set(&mut self, volume: u8) {
        self.0 = volume.min(100);
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

// ----------------------------------------------------------------------------
// Settings and outcome
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSettings {
    /// Strict upper bound on thumb/index distance for a pinch.
    pub pinch_threshold_px: f32,
    /// Pixel height mapped onto 0..=100.
    pub frame_height: u32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

/// What one frame's landmarks amounted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// No hand in the frame.
    NoHand,
    /// A hand was reported without a thumb tip or index fingertip.
    Incomplete,
    /// Hand present, fingers apart.
    Released { distance: f32 },
    /// Pinch: volume was set and `key` should be pressed once.
    Pinched {
        distance: f32,
        volume: u8,
        key: VolumeKey,
    },
}

impl GestureOutcome {
    pub fn hand_visible(&self) -> bool {
        !matches!(self, GestureOutcome::NoHand)
    }

    pub fn key(&self) -> Option<VolumeKey> {
        match self {
            GestureOutcome::Pinched { key, .. } => Some(*key),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Math
// ----------------------------------------------------------------------------

/// Euclidean distance between two landmarks in pixels.
///
/// Deltas are taken in `f64` so any pair of `i32` coordinates is valid.
pub fn pinch_distance(a: &Landmark, b: &Landmark) -> f32 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    (dx * dx + dy * dy).sqrt() as f32
}

/// Map a y coordinate in `[0, frame_height]` linearly onto `[0, 100]`.
///
/// The result is truncated toward zero. Coordinates outside the frame
/// saturate at 0 or 100.
pub fn volume_for_y(y: i32, frame_height: u32) -> u8 {
    if frame_height == 0 {
        return 0;
    }
    let scaled = f64::from(y) * 100.0 / f64::from(frame_height);
    scaled.clamp(0.0, 100.0) as u8
}

/// Interpret one frame's landmarks, updating `volume` on a pinch.
pub fn interpret(
    landmarks: &LandmarkSet,
    volume: &mut VolumeState,
    settings: &GestureSettings,
) -> GestureOutcome {
    if landmarks.is_empty() {
        return GestureOutcome::NoHand;
    }
    let (Some(index_tip), Some(thumb_tip)) = (
        landmarks.get(hand::INDEX_FINGER_TIP),
        landmarks.get(hand::THUMB_TIP),
    ) else {
        return GestureOutcome::Incomplete;
    };

    let distance = pinch_distance(index_tip, thumb_tip);
    if distance >= settings.pinch_threshold_px {
        return GestureOutcome::Released { distance };
    }

    volume.set(volume_for_y(index_tip.y, settings.frame_height));
    let level = volume.get();
    GestureOutcome::Pinched {
        distance,
        volume: level,
        key: VolumeKey::for_level(level),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Hand-gesture volume control.
//!
//! Pinch thumb and index finger in front of the camera and move the hand up
//! or down: the fingertip height sets a volume level, and every pinched
//! frame sends one OS volume key.
//!
//! The camera, landmark model, key simulation and window are collaborators
//! behind traits (`FrameSource`, `LandmarkDetector`, `VolumeKeys`,
//! `Display`). `GestureLoop` composes them around the pure logic in
//! `gesture`.

pub mod config;
pub mod control;
pub mod detect;
pub mod display;
pub mod frame;
pub mod gesture;
pub mod ingest;
pub mod overlay;
pub mod pipeline;

pub use config::{CameraSettings, DetectorSettings, GestureConfig};
pub use control::{LogKeys, RecordingKeys, VolumeKeys};
pub use detect::{Landmark, LandmarkDetector, LandmarkSet, NullBackend, ScriptedBackend};
pub use display::{Display, HeadlessDisplay};
pub use frame::{Frame, Rgb};
pub use gesture::{GestureOutcome, GestureSettings, VolumeKey, VolumeState};
pub use ingest::{FrameSource, SyntheticSource};
pub use pipeline::{GestureLoop, LoopExit, LoopSettings, LoopSummary, Step, StepReport};

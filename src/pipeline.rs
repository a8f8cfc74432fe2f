//! The gesture loop.
//!
//! One iteration:
//! 1. Read a frame (a failed read ends the loop)
//! 2. Ask the detector for landmarks
//! 3. Interpret the pinch, updating the volume state
//! 4. Press at most one volume key
//! 5. Annotate the frame if a hand was seen
//! 6. Present the frame and check for the quit key
//!
//! The loop owns its collaborators. Dropping it (which `run` does on every
//! exit path) releases the camera and the display.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::config::GestureConfig;
use crate::control::VolumeKeys;
use crate::detect::LandmarkDetector;
use crate::display::Display;
use crate::gesture::{self, GestureOutcome, GestureSettings, VolumeState};
use crate::ingest::FrameSource;
use crate::overlay;

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The quit key was pressed or the window closed.
    QuitRequested,
    /// The camera failed to deliver a frame.
    SourceExhausted,
    /// The interrupt flag was raised (Ctrl-C).
    Interrupted,
}

/// Observable result of one completed iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub frame_index: u64,
    pub outcome: GestureOutcome,
    pub volume: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Continue(StepReport),
    Exit(LoopExit),
}

/// Totals reported once `run` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub exit: LoopExit,
    pub frames: u64,
    pub key_presses: u64,
    pub volume: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopSettings {
    pub gesture: GestureSettings,
    pub initial_volume: u8,
    pub draw_landmarks: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            gesture: GestureSettings::default(),
            initial_volume: gesture::DEFAULT_VOLUME,
            draw_landmarks: true,
        }
    }
}

impl From<&GestureConfig> for LoopSettings {
    fn from(cfg: &GestureConfig) -> Self {
        Self {
            gesture: cfg.gesture,
            initial_volume: cfg.initial_volume,
            draw_landmarks: cfg.draw_landmarks,
        }
    }
}

pub struct GestureLoop<S, D, K, W> {
    source: S,
    detector: D,
    keys: K,
    display: W,
    volume: VolumeState,
    settings: LoopSettings,
    interrupt: Option<Arc<AtomicBool>>,
    frames: u64,
    key_presses: u64,
}

impl<S, D, K, W> GestureLoop<S, D, K, W>
where
    S: FrameSource,
    D: LandmarkDetector,
    K: VolumeKeys,
    W: Display,
{
    pub fn new(source: S, detector: D, keys: K, display: W, settings: LoopSettings) -> Self {
        let device_height = source.frame_height();
        if device_height != settings.gesture.frame_height {
            log::warn!(
                "{} delivers {}px tall frames but volume maps over {}px",
                source.describe(),
                device_height,
                settings.gesture.frame_height
            );
        }
        Self {
            source,
            detector,
            keys,
            display,
            volume: VolumeState::new(settings.initial_volume),
            settings,
            interrupt: None,
            frames: 0,
            key_presses: 0,
        }
    }

    /// Stop at the next iteration boundary once `flag` is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn volume(&self) -> u8 {
        self.volume.get()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Run one iteration.
    pub fn step(&mut self) -> Result<Step> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            return Ok(Step::Exit(LoopExit::Interrupted));
        }

        let mut frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("camera read failed, stopping: {:#}", err);
                return Ok(Step::Exit(LoopExit::SourceExhausted));
            }
        };
        self.frames += 1;

        let landmarks = self.detector.detect(&frame)?;
        let outcome = gesture::interpret(&landmarks, &mut self.volume, &self.settings.gesture);

        match outcome {
            GestureOutcome::Pinched {
                distance,
                volume,
                key,
            } => {
                log::debug!(
                    "frame {}: pinch {:.1}px -> volume {} ({})",
                    frame.index,
                    distance,
                    volume,
                    key
                );
                self.keys.press(key)?;
                self.key_presses += 1;
            }
            GestureOutcome::Released { distance } => {
                log::debug!("frame {}: open hand {:.1}px", frame.index, distance);
            }
            GestureOutcome::Incomplete => {
                log::warn!(
                    "frame {}: detector reported {} landmarks without thumb/index tips",
                    frame.index,
                    landmarks.len()
                );
            }
            GestureOutcome::NoHand => {}
        }

        if outcome.hand_visible() {
            if self.settings.draw_landmarks {
                overlay::draw_landmarks(&mut frame, &landmarks);
            }
            overlay::draw_volume(&mut frame, self.volume.get());
        }

        if self.display.present(&frame)? {
            return Ok(Step::Exit(LoopExit::QuitRequested));
        }

        Ok(Step::Continue(StepReport {
            frame_index: frame.index,
            outcome,
            volume: self.volume.get(),
        }))
    }

    /// Iterate until an exit condition, then release every collaborator.
    pub fn run(mut self) -> Result<LoopSummary> {
        log::info!(
            "gesture loop running: source={}, detector={}, pinch<{}px, height={}px",
            self.source.describe(),
            self.detector.name(),
            self.settings.gesture.pinch_threshold_px,
            self.settings.gesture.frame_height
        );
        let exit = loop {
            if let Step::Exit(exit) = self.step()? {
                break exit;
            }
        };
        let summary = LoopSummary {
            exit,
            frames: self.frames,
            key_presses: self.key_presses,
            volume: self.volume.get(),
        };
        log::info!(
            "gesture loop stopped ({:?}) after {} frames, {} key presses, volume {}%",
            summary.exit,
            summary.frames,
            summary.key_presses,
            summary.volume
        );
        Ok(summary)
    }
}

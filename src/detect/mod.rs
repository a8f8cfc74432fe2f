//! Hand-landmark detection.
//!
//! The detector is an external collaborator: the gesture loop only sees the
//! `LandmarkDetector` trait and the `LandmarkSet` it returns.

mod backend;
mod backends;
mod landmark;

use anyhow::{anyhow, Result};

use crate::config::DetectorSettings;

pub use backend::LandmarkDetector;
pub use backends::{NullBackend, ScriptedBackend};
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use landmark::{hand, Landmark, LandmarkSet};

/// Build the detector named by `settings.backend`.
pub fn build_detector(
    settings: &DetectorSettings,
    frame_width: u32,
    frame_height: u32,
) -> Result<Box<dyn LandmarkDetector>> {
    let mut detector: Box<dyn LandmarkDetector> = match settings.backend.as_str() {
        "scripted" => Box::new(ScriptedBackend::demo_sweep(frame_width, frame_height)),
        "null" => Box::new(NullBackend),
        "tract" => build_tract(settings)?,
        other => return Err(anyhow!("unknown detector backend '{}'", other)),
    };
    detector.warm_up()?;
    log::info!("detector backend: {}", detector.name());
    Ok(detector)
}

#[cfg(feature = "backend-tract")]
fn build_tract(settings: &DetectorSettings) -> Result<Box<dyn LandmarkDetector>> {
    let model_path = settings
        .model_path
        .as_ref()
        .ok_or_else(|| anyhow!("tract backend requires a model path"))?;
    let backend = TractBackend::new(model_path, backends::tract::DEFAULT_INPUT_SIZE)?
        .with_presence_threshold(settings.presence_threshold);
    Ok(Box::new(backend))
}

#[cfg(not(feature = "backend-tract"))]
fn build_tract(_settings: &DetectorSettings) -> Result<Box<dyn LandmarkDetector>> {
    Err(anyhow!("detector backend 'tract' requires the backend-tract feature"))
}

#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::backend::LandmarkDetector;
use crate::detect::landmark::{hand, Landmark, LandmarkSet};
use crate::frame::Frame;

/// Square input edge of the common 21-point hand-landmark models.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Tract-based backend for ONNX hand-landmark models.
///
/// Expects a model with input `1x3xSxS` (RGB, f32 in 0..1) and two outputs:
/// 63 floats of `(x, y, z)` per landmark in model-input pixels, and a scalar
/// hand presence score. The frame is resized with nearest-neighbour sampling
/// and landmarks are scaled back to frame pixels.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    input_size: u32,
    presence_threshold: f32,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let edge = input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, edge, edge)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            input_size,
            presence_threshold: 0.5,
        })
    }

    /// Override the default presence threshold.
    pub fn with_presence_threshold(mut self, threshold: f32) -> Self {
        self.presence_threshold = threshold;
        self
    }

    fn build_input(&self, frame: &Frame) -> Result<Tensor> {
        if frame.width == 0 || frame.height == 0 {
            return Err(anyhow!("cannot run inference on an empty frame"));
        }
        let edge = self.input_size as usize;
        let sx = frame.width as f32 / edge as f32;
        let sy = frame.height as f32 / edge as f32;
        let pixels = frame.pixels();
        let stride = frame.width as usize * 3;

        let input = tract_ndarray::Array4::from_shape_fn((1, 3, edge, edge), |(_, c, y, x)| {
            let src_x = ((x as f32 * sx) as usize).min(frame.width as usize - 1);
            let src_y = ((y as f32 * sy) as usize).min(frame.height as usize - 1);
            pixels[src_y * stride + src_x * 3 + c] as f32 / 255.0
        });
        Ok(input.into_tensor())
    }

    fn extract_landmarks(&self, outputs: TVec<TValue>, frame: &Frame) -> Result<LandmarkSet> {
        let coords = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?
            .to_array_view::<f32>()
            .context("landmark tensor was not f32")?;
        let presence = match outputs.get(1) {
            Some(score) => score
                .to_array_view::<f32>()
                .context("presence tensor was not f32")?
                .iter()
                .copied()
                .next()
                .unwrap_or(0.0),
            None => 1.0,
        };
        if !presence.is_finite() || presence < self.presence_threshold {
            return Ok(LandmarkSet::empty());
        }

        let values: Vec<f32> = coords.iter().copied().collect();
        if values.len() < hand::LANDMARK_COUNT * 3 {
            return Err(anyhow!(
                "expected {} landmark values, model produced {}",
                hand::LANDMARK_COUNT * 3,
                values.len()
            ));
        }

        let scale_x = frame.width as f32 / self.input_size as f32;
        let scale_y = frame.height as f32 / self.input_size as f32;
        let points = values
            .chunks_exact(3)
            .take(hand::LANDMARK_COUNT)
            .enumerate()
            .map(|(id, xyz)| {
                Landmark::new(
                    id as u8,
                    (xyz[0] * scale_x).round() as i32,
                    (xyz[1] * scale_y).round() as i32,
                )
            })
            .collect();
        Ok(LandmarkSet::from_points(points))
    }
}

impl LandmarkDetector for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &Frame) -> Result<LandmarkSet> {
        let input = self.build_input(frame)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        self.extract_landmarks(outputs, frame)
    }
}

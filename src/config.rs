use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::gesture::{
    GestureSettings, DEFAULT_FRAME_HEIGHT, DEFAULT_PINCH_THRESHOLD_PX, DEFAULT_VOLUME,
};
use crate::ingest::STUB_PREFIX;

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_FPS: u32 = 30;
const DEFAULT_BACKEND: &str = "tract";
const DEFAULT_MODEL_PATH: &str = "models/hand_landmark.onnx";
const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

pub const CONFIG_ENV: &str = "GESTURE_VOLUME_CONFIG";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    camera: Option<CameraConfigFile>,
    gesture: Option<GestureConfigFile>,
    detector: Option<DetectorConfigFile>,
    display: Option<DisplayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    target_fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct GestureConfigFile {
    pinch_threshold_px: Option<f32>,
    frame_height: Option<u32>,
    initial_volume: Option<u8>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    presence_threshold: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplayConfigFile {
    draw_landmarks: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct GestureConfig {
    pub camera: CameraSettings,
    pub gesture: GestureSettings,
    pub initial_volume: u8,
    pub detector: DetectorSettings,
    pub draw_landmarks: bool,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            target_fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub presence_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            gesture: GestureSettings::default(),
            initial_volume: DEFAULT_VOLUME,
            detector: DetectorSettings {
                backend: DEFAULT_BACKEND.to_string(),
                model_path: Some(PathBuf::from(DEFAULT_MODEL_PATH)),
                presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
            },
            draw_landmarks: true,
        }
    }
}

impl GestureConfig {
    /// Load from `GESTURE_VOLUME_CONFIG` (if set), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        Self::load_from(config_path.as_deref())
    }

    /// Load from an explicit file (or defaults), then apply env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        let camera = file.camera.unwrap_or_default();
        let gesture = file.gesture.unwrap_or_default();
        let detector = file.detector.unwrap_or_default();
        let display = file.display.unwrap_or_default();

        Self {
            camera: CameraSettings {
                device: camera.device.unwrap_or(defaults.camera.device),
                width: camera.width.unwrap_or(defaults.camera.width),
                height: camera.height.unwrap_or(defaults.camera.height),
                target_fps: camera.target_fps.unwrap_or(defaults.camera.target_fps),
            },
            gesture: GestureSettings {
                pinch_threshold_px: gesture
                    .pinch_threshold_px
                    .unwrap_or(DEFAULT_PINCH_THRESHOLD_PX),
                frame_height: gesture.frame_height.unwrap_or(DEFAULT_FRAME_HEIGHT),
            },
            initial_volume: gesture.initial_volume.unwrap_or(defaults.initial_volume),
            detector: DetectorSettings {
                backend: detector.backend.unwrap_or(defaults.detector.backend),
                model_path: detector.model_path.or(defaults.detector.model_path),
                presence_threshold: detector
                    .presence_threshold
                    .unwrap_or(defaults.detector.presence_threshold),
            },
            draw_landmarks: display.draw_landmarks.unwrap_or(defaults.draw_landmarks),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(device) = non_empty_var("GESTURE_VOLUME_DEVICE") {
            self.camera.device = device;
        }
        if let Some(backend) = non_empty_var("GESTURE_VOLUME_BACKEND") {
            self.detector.backend = backend;
        }
        if let Some(model) = non_empty_var("GESTURE_VOLUME_MODEL") {
            self.detector.model_path = Some(PathBuf::from(model));
        }
        if let Some(px) = non_empty_var("GESTURE_VOLUME_PINCH_PX") {
            self.gesture.pinch_threshold_px = px
                .parse()
                .map_err(|_| anyhow!("GESTURE_VOLUME_PINCH_PX must be a number of pixels"))?;
        }
        if let Some(height) = non_empty_var("GESTURE_VOLUME_FRAME_HEIGHT") {
            self.gesture.frame_height = height.parse().map_err(|_| {
                anyhow!("GESTURE_VOLUME_FRAME_HEIGHT must be an integer number of pixels")
            })?;
        }
        Ok(())
    }

    /// Check ranges. Called by the loaders; callers that build a config by
    /// hand can call it too.
    pub fn validate(&self) -> Result<()> {
        if !(self.gesture.pinch_threshold_px.is_finite() && self.gesture.pinch_threshold_px > 0.0)
        {
            return Err(anyhow!("pinch threshold must be a positive number of pixels"));
        }
        if self.gesture.frame_height == 0 {
            return Err(anyhow!("frame height must be greater than zero"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera width and height must be greater than zero"));
        }
        if self.initial_volume > 100 {
            return Err(anyhow!("initial volume must be within 0..=100"));
        }
        if !(0.0..=1.0).contains(&self.detector.presence_threshold) {
            return Err(anyhow!("presence threshold must be within 0.0..=1.0"));
        }
        if self.detector.backend == "tract" && self.detector.model_path.is_none() {
            return Err(anyhow!("detector backend 'tract' requires model_path"));
        }
        // Scripted landmarks ignore the image, so pairing them with a real
        // camera would press volume keys that no hand made.
        if self.detector.backend == "scripted" && !self.camera.device.starts_with(STUB_PREFIX) {
            return Err(anyhow!(
                "detector backend 'scripted' only runs against a {} camera, not {}",
                STUB_PREFIX,
                self.camera.device
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

use anyhow::{Context, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::VolumeKeys;
use crate::gesture::VolumeKey;

/// Presses the OS media volume keys through enigo.
pub struct EnigoKeys {
    enigo: Enigo,
}

impl EnigoKeys {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default()).context("connect to OS input layer")?;
        Ok(Self { enigo })
    }
}

impl VolumeKeys for EnigoKeys {
    fn press(&mut self, key: VolumeKey) -> Result<()> {
        let os_key = match key {
            VolumeKey::Up => Key::VolumeUp,
            VolumeKey::Down => Key::VolumeDown,
        };
        self.enigo
            .key(os_key, Direction::Click)
            .with_context(|| format!("simulate {} key", key))
    }
}

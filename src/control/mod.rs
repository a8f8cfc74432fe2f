//! OS input simulation for volume hotkeys.
//!
//! The gesture loop only knows `VolumeKeys`. Real key events come from
//! `EnigoKeys` (feature: input-enigo); `LogKeys` is the dry-run sink and
//! `RecordingKeys` captures presses for inspection.

#[cfg(feature = "input-enigo")]
mod enigo_keys;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::gesture::VolumeKey;

#[cfg(feature = "input-enigo")]
pub use enigo_keys::EnigoKeys;

/// Emits one symbolic volume key event per call.
pub trait VolumeKeys {
    fn press(&mut self, key: VolumeKey) -> Result<()>;
}

impl<K: VolumeKeys + ?Sized> VolumeKeys for Box<K> {
    fn press(&mut self, key: VolumeKey) -> Result<()> {
        (**self).press(key)
    }
}

/// Dry-run sink: logs the hotkey instead of pressing it.
#[derive(Debug, Default)]
pub struct LogKeys {
    presses: u64,
}

impl LogKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presses(&self) -> u64 {
        self.presses
    }
}

impl VolumeKeys for LogKeys {
    fn press(&mut self, key: VolumeKey) -> Result<()> {
        self.presses += 1;
        log::info!("hotkey {} (dry run, #{})", key, self.presses);
        Ok(())
    }
}

/// Records every press into a shared list.
///
/// Clones share the same list, so a caller can keep one handle while the
/// loop owns the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingKeys {
    pressed: Rc<RefCell<Vec<VolumeKey>>>,
}

impl RecordingKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed(&self) -> Vec<VolumeKey> {
        self.pressed.borrow().clone()
    }

    pub fn count(&self, key: VolumeKey) -> usize {
        self.pressed.borrow().iter().filter(|k| **k == key).count()
    }
}

impl VolumeKeys for RecordingKeys {
    fn press(&mut self, key: VolumeKey) -> Result<()> {
        self.pressed.borrow_mut().push(key);
        Ok(())
    }
}

/// Key sink for the binary: real keys when available and not a dry run.
pub fn build_keys(dry_run: bool) -> Result<Box<dyn VolumeKeys>> {
    if dry_run {
        log::info!("volume keys: dry run (logged only)");
        return Ok(Box::new(LogKeys::new()));
    }
    os_keys()
}

#[cfg(feature = "input-enigo")]
fn os_keys() -> Result<Box<dyn VolumeKeys>> {
    log::info!("volume keys: OS input simulation");
    Ok(Box::new(EnigoKeys::new()?))
}

#[cfg(not(feature = "input-enigo"))]
fn os_keys() -> Result<Box<dyn VolumeKeys>> {
    log::warn!("built without input-enigo; volume keys are logged only");
    Ok(Box::new(LogKeys::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_clones_share_history() -> Result<()> {
        let handle = RecordingKeys::new();
        let mut sink: Box<dyn VolumeKeys> = Box::new(handle.clone());
        sink.press(VolumeKey::Up)?;
        sink.press(VolumeKey::Down)?;
        sink.press(VolumeKey::Up)?;
        assert_eq!(handle.pressed(), vec![VolumeKey::Up, VolumeKey::Down, VolumeKey::Up]);
        assert_eq!(handle.count(VolumeKey::Up), 2);
        Ok(())
    }

    #[test]
    fn log_keys_counts_presses() -> Result<()> {
        let mut keys = LogKeys::new();
        keys.press(VolumeKey::Down)?;
        assert_eq!(keys.presses(), 1);
        Ok(())
    }

    #[test]
    fn dry_run_never_touches_the_os() -> Result<()> {
        let mut keys = build_keys(true)?;
        keys.press(VolumeKey::Up)
    }
}

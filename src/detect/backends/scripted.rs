use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::LandmarkDetector;
use crate::detect::landmark::LandmarkSet;
use crate::frame::Frame;

/// Deterministic backend that replays a fixed script of landmark sets.
///
/// Each call to `detect` pops the next entry. Once the script runs out the
/// backend reports no hand, unless it was built with `cycle`.
pub struct ScriptedBackend {
    script: VecDeque<LandmarkSet>,
    replay: Option<Vec<LandmarkSet>>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = LandmarkSet>) -> Self {
        Self {
            script: script.into_iter().collect(),
            replay: None,
        }
    }

    /// Restart from the top when the script is exhausted.
    pub fn cycle(mut self) -> Self {
        self.replay = Some(self.script.iter().cloned().collect());
        self
    }

    /// A hand that appears, pinches, sweeps from the top of the frame to the
    /// bottom, opens, and leaves. Repeats forever.
    pub fn demo_sweep(width: u32, height: u32) -> Self {
        let cx = (width / 2) as i32;
        let h = height as i32;
        let steps = 20;
        let wrist = (cx, h - 40);
        let open = LandmarkSet::pinch((cx - 60, h / 2), (cx, h / 2), wrist);
        let mut script = Vec::new();

        script.extend((0..10).map(|_| LandmarkSet::empty()));
        script.extend((0..10).map(|_| open.clone()));
        for i in 0..=steps {
            let y = h * i / steps;
            script.push(LandmarkSet::pinch((cx - 8, y), (cx, y), wrist));
        }
        script.extend((0..10).map(|_| open.clone()));

        Self::new(script).cycle()
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LandmarkDetector for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<LandmarkSet> {
        if self.script.is_empty() {
            if let Some(replay) = &self.replay {
                self.script.extend(replay.iter().cloned());
            }
        }
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rgb;

    #[test]
    fn replays_then_reports_no_hand() -> Result<()> {
        let frame = Frame::filled(4, 4, Rgb(0, 0, 0))?;
        let hand = LandmarkSet::pinch((0, 0), (0, 0), (0, 0));
        let mut backend = ScriptedBackend::new(vec![hand.clone(), LandmarkSet::empty()]);

        assert_eq!(backend.detect(&frame)?, hand);
        assert!(backend.detect(&frame)?.is_empty());
        assert!(backend.detect(&frame)?.is_empty());
        assert_eq!(backend.remaining(), 0);
        Ok(())
    }

    #[test]
    fn cycle_restarts_script() -> Result<()> {
        let frame = Frame::filled(4, 4, Rgb(0, 0, 0))?;
        let hand = LandmarkSet::pinch((1, 1), (2, 2), (0, 0));
        let mut backend = ScriptedBackend::new(vec![hand.clone()]).cycle();

        for _ in 0..3 {
            assert_eq!(backend.detect(&frame)?, hand);
        }
        Ok(())
    }

    #[test]
    fn demo_sweep_reaches_both_ends() -> Result<()> {
        let frame = Frame::filled(4, 4, Rgb(0, 0, 0))?;
        let mut backend = ScriptedBackend::demo_sweep(640, 480);
        let mut ys = Vec::new();
        for _ in 0..60 {
            let set = backend.detect(&frame)?;
            if let Some(tip) = set.get(crate::detect::hand::INDEX_FINGER_TIP) {
                ys.push(tip.y);
            }
        }
        assert!(ys.contains(&0));
        assert!(ys.contains(&480));
        Ok(())
    }
}

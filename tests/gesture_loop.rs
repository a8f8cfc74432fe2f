use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};

use gesture_volume::{
    CameraSettings, Display, Frame, FrameSource, GestureLoop, GestureOutcome, HeadlessDisplay,
    LandmarkSet, LoopExit, LoopSettings, NullBackend, RecordingKeys, Rgb, ScriptedBackend, Step,
    SyntheticSource, VolumeKey,
};

fn camera(height: u32) -> CameraSettings {
    CameraSettings {
        device: "stub://test".to_string(),
        width: 64,
        height,
        target_fps: 30,
    }
}

fn source() -> SyntheticSource {
    SyntheticSource::new(camera(480))
}

fn pinch(index_y: i32, thumb_y: i32) -> LandmarkSet {
    LandmarkSet::pinch((30, thumb_y), (30, index_y), (30, 470))
}

/// Records presented frames so tests can look at the overlay.
struct CapturingDisplay {
    volume_text_drawn: Rc<Cell<u32>>,
    dropped: Rc<Cell<bool>>,
}

impl Display for CapturingDisplay {
    fn present(&mut self, frame: &Frame) -> Result<bool> {
        let green = frame
            .pixels()
            .chunks_exact(3)
            .any(|px| Rgb(px[0], px[1], px[2]) == Rgb::GREEN);
        if green {
            self.volume_text_drawn.set(self.volume_text_drawn.get() + 1);
        }
        Ok(false)
    }
}

impl Drop for CapturingDisplay {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

/// Headless display that reports when the loop lets go of it.
struct TrackedHeadless {
    inner: HeadlessDisplay,
    dropped: Rc<Cell<bool>>,
}

impl Display for TrackedHeadless {
    fn present(&mut self, frame: &Frame) -> Result<bool> {
        self.inner.present(frame)
    }
}

impl Drop for TrackedHeadless {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

/// Fails after `frames` reads and reports when it is released.
struct FlakyCamera {
    inner: SyntheticSource,
    released: Rc<Cell<bool>>,
}

impl FrameSource for FlakyCamera {
    fn describe(&self) -> String {
        "flaky".to_string()
    }

    fn next_frame(&mut self) -> Result<Frame> {
        self.inner.next_frame()
    }

    fn frame_height(&self) -> u32 {
        self.inner.frame_height()
    }
}

impl Drop for FlakyCamera {
    fn drop(&mut self) {
        self.released.set(true);
    }
}

fn expect_continue(step: Step) -> (GestureOutcome, u8) {
    match step {
        Step::Continue(report) => (report.outcome, report.volume),
        Step::Exit(exit) => panic!("loop exited early: {:?}", exit),
    }
}

#[test]
fn no_hand_frames_leave_volume_and_keys_alone() -> Result<()> {
    let keys = RecordingKeys::new();
    let mut gesture_loop = GestureLoop::new(
        source(),
        NullBackend,
        keys.clone(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    );

    for _ in 0..5 {
        let (outcome, volume) = expect_continue(gesture_loop.step()?);
        assert_eq!(outcome, GestureOutcome::NoHand);
        assert_eq!(volume, 50);
    }
    assert!(keys.pressed().is_empty());
    Ok(())
}

#[test]
fn pinch_scenarios_set_volume_and_press_one_key_each() -> Result<()> {
    let keys = RecordingKeys::new();
    let script = vec![
        pinch(240, 235), // 50 -> up
        pinch(0, 0),     // 0 -> down
        pinch(480, 480), // 100 -> up
    ];
    let mut gesture_loop = GestureLoop::new(
        source(),
        ScriptedBackend::new(script),
        keys.clone(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    );

    assert_eq!(expect_continue(gesture_loop.step()?).1, 50);
    assert_eq!(keys.pressed(), vec![VolumeKey::Up]);

    assert_eq!(expect_continue(gesture_loop.step()?).1, 0);
    assert_eq!(keys.pressed(), vec![VolumeKey::Up, VolumeKey::Down]);

    assert_eq!(expect_continue(gesture_loop.step()?).1, 100);
    assert_eq!(
        keys.pressed(),
        vec![VolumeKey::Up, VolumeKey::Down, VolumeKey::Up]
    );
    Ok(())
}

#[test]
fn open_hand_keeps_prior_volume_regardless_of_height() -> Result<()> {
    let keys = RecordingKeys::new();
    // Distance 40 at the very top of the frame.
    let open = LandmarkSet::pinch((54, 32), (30, 0), (30, 470));
    let mut gesture_loop = GestureLoop::new(
        source(),
        ScriptedBackend::new(vec![pinch(384, 384), open]),
        keys.clone(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    );

    assert_eq!(expect_continue(gesture_loop.step()?).1, 80);
    let (outcome, volume) = expect_continue(gesture_loop.step()?);
    assert_eq!(outcome, GestureOutcome::Released { distance: 40.0 });
    assert_eq!(volume, 80);
    assert_eq!(keys.pressed(), vec![VolumeKey::Up]);
    Ok(())
}

#[test]
fn holding_a_pinch_repeats_the_key_every_frame() -> Result<()> {
    let keys = RecordingKeys::new();
    let mut gesture_loop = GestureLoop::new(
        source(),
        ScriptedBackend::new(vec![pinch(300, 300); 4]),
        keys.clone(),
        HeadlessDisplay::new(None),
        LoopSettings {
            initial_volume: 90,
            ..LoopSettings::default()
        },
    );

    for _ in 0..4 {
        gesture_loop.step()?;
    }
    // Level stays at 62 and moved down from 90, but every frame sends "up".
    assert_eq!(gesture_loop.volume(), 62);
    assert_eq!(keys.count(VolumeKey::Up), 4);
    assert_eq!(keys.count(VolumeKey::Down), 0);
    Ok(())
}

#[test]
fn overlay_only_drawn_when_a_hand_is_seen() -> Result<()> {
    let drawn = Rc::new(Cell::new(0));
    let dropped = Rc::new(Cell::new(false));
    let display = CapturingDisplay {
        volume_text_drawn: drawn.clone(),
        dropped: dropped.clone(),
    };
    let script = vec![LandmarkSet::empty(), pinch(240, 240), LandmarkSet::empty()];
    let mut gesture_loop = GestureLoop::new(
        SyntheticSource::new(CameraSettings {
            width: 320,
            ..camera(480)
        }),
        ScriptedBackend::new(script),
        RecordingKeys::new(),
        display,
        LoopSettings {
            draw_landmarks: false,
            ..LoopSettings::default()
        },
    );

    for _ in 0..3 {
        gesture_loop.step()?;
    }
    assert_eq!(drawn.get(), 1);
    drop(gesture_loop);
    assert!(dropped.get());
    Ok(())
}

#[test]
fn camera_failure_ends_loop_and_releases_resources() -> Result<()> {
    let released = Rc::new(Cell::new(false));
    let camera = FlakyCamera {
        inner: source().with_frame_limit(3),
        released: released.clone(),
    };
    let keys = RecordingKeys::new();
    let summary = GestureLoop::new(
        camera,
        ScriptedBackend::new(vec![pinch(0, 0)]),
        keys.clone(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    )
    .run()?;

    assert_eq!(summary.exit, LoopExit::SourceExhausted);
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.key_presses, 1);
    assert_eq!(summary.volume, 0);
    assert_eq!(keys.pressed(), vec![VolumeKey::Down]);
    assert!(released.get());
    Ok(())
}

#[test]
fn quit_key_stops_the_loop() -> Result<()> {
    let dropped = Rc::new(Cell::new(false));
    let display = TrackedHeadless {
        inner: HeadlessDisplay::new(Some(7)),
        dropped: dropped.clone(),
    };
    let summary = GestureLoop::new(
        source(),
        ScriptedBackend::demo_sweep(64, 480),
        RecordingKeys::new(),
        display,
        LoopSettings::default(),
    )
    .run()?;

    assert_eq!(summary.exit, LoopExit::QuitRequested);
    assert_eq!(summary.frames, 7);
    assert!(dropped.get());
    Ok(())
}

#[test]
fn interrupt_flag_stops_before_next_frame() -> Result<()> {
    let flag = Arc::new(AtomicBool::new(false));
    let mut gesture_loop = GestureLoop::new(
        source(),
        NullBackend,
        RecordingKeys::new(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    )
    .with_interrupt(flag.clone());

    gesture_loop.step()?;
    flag.store(true, Ordering::SeqCst);
    assert_eq!(gesture_loop.step()?, Step::Exit(LoopExit::Interrupted));
    assert_eq!(gesture_loop.frames_processed(), 1);
    Ok(())
}

#[test]
fn detector_errors_propagate() {
    struct BrokenDetector;
    impl gesture_volume::LandmarkDetector for BrokenDetector {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn detect(&mut self, _frame: &Frame) -> Result<LandmarkSet> {
            Err(anyhow!("model crashed"))
        }
    }

    let result = GestureLoop::new(
        source(),
        BrokenDetector,
        RecordingKeys::new(),
        HeadlessDisplay::new(None),
        LoopSettings::default(),
    )
    .run();
    assert!(result.is_err());
}

#[test]
fn taller_camera_uses_configured_frame_height() -> Result<()> {
    let keys = RecordingKeys::new();
    let mut settings = LoopSettings::default();
    settings.gesture.frame_height = 720;
    let mut gesture_loop = GestureLoop::new(
        SyntheticSource::new(camera(720)),
        ScriptedBackend::new(vec![pinch(540, 540)]),
        keys.clone(),
        HeadlessDisplay::new(None),
        settings,
    );

    assert_eq!(expect_continue(gesture_loop.step()?).1, 75);
    assert_eq!(keys.pressed(), vec![VolumeKey::Up]);
    Ok(())
}

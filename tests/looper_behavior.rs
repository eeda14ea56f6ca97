use std::f32::consts::TAU;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use tapeloop_dsp::{
    looper::{
        speed::{is_speed_locked, resolve_speed},
        store::LEFT,
        Direction, Frame, Playback, SampleStore, TriggerStage, WriteHead,
    },
    ClearMode, Looper, LooperConfig, LooperInputs,
};

const CAPACITY: usize = 8_192;
const MIN_LOOP: u32 = 61;
const FADE: u32 = 80;
const TRIGGER_FADE: u32 = 40;

fn playback() -> Playback {
    Playback::new(CAPACITY, MIN_LOOP, FADE, TRIGGER_FADE)
}

/// Set the window while stalled so it lands without a crossfade.
fn with_window(start: f32, length: f32, speed: f32) -> Playback {
    let mut pb = playback();
    pb.set_speed(0.0);
    pb.request_start(start);
    pb.request_length(length);
    pb.set_speed(speed);
    pb
}

fn sine_store(period: f32) -> SampleStore {
    let mut store = SampleStore::new(CAPACITY);
    for i in 0..CAPACITY as i64 {
        let v = (TAU * i as f32 / period).sin();
        store.write(i, v, v);
    }
    store
}

fn max_step(out: &[f32]) -> f32 {
    out.windows(2).fold(0.0f32, |acc, w| acc.max((w[1] - w[0]).abs()))
}

proptest! {
    #[test]
    fn writes_wrap_to_the_same_frame(
        position in -10_000_000i64..10_000_000,
        turns in -50i64..50,
        value in -1.0f32..1.0,
    ) {
        let mut store = SampleStore::new(1_000);
        store.write(position, value, -value);
        let frame = store.frame(position + turns * 1_000);
        prop_assert_eq!(frame, Frame::new(value, -value));
        prop_assert!(store.wrap(position) < 1_000);
    }

    #[test]
    fn fractional_reads_wrap(
        // Keeps `position` and `position + 1024` exact in f32 eighths
        base in -2_000_000i32..2_000_000,
        eighths in 0u8..8,
        backward in any::<bool>(),
    ) {
        let mut store = SampleStore::new(64);
        for i in 0..64 {
            store.write(i, i as f32, 0.0);
        }
        let direction = if backward { Direction::Backward } else { Direction::Forward };
        let position = base as f32 + eighths as f32 / 8.0;
        let a = store.read(position, direction);
        let b = store.read(position + 64.0 * 16.0, direction);
        prop_assert_eq!(a, b);
        prop_assert!(a.left >= 0.0 && a.left <= 63.0);
    }

    #[test]
    fn huge_positions_read_inside_the_store(
        position in prop_oneof![-1e30f32..1e30, -1e12f32..1e12],
        backward in any::<bool>(),
    ) {
        let mut store = SampleStore::new(64);
        for i in 0..64 {
            store.write(i, i as f32, 0.0);
        }
        let direction = if backward { Direction::Backward } else { Direction::Forward };
        let frame = store.read(position, direction);
        prop_assert!(frame.left >= 0.0 && frame.left <= 63.0);
    }
}

#[test]
fn active_head_round_trips_integer_positions() {
    let mut store = SampleStore::with_noise(CAPACITY, 0.001, 11);
    let mut head = WriteHead::new(FADE);
    head.start();
    // Finish the fade-in somewhere out of the way
    for i in 0..FADE as i64 {
        head.write(&mut store, LEFT, 4_000 + i, 0.0);
    }

    for (i, position) in [-3i64, 0, 17, 8_191, 8_192, 20_001].iter().enumerate() {
        let value = 0.1 * i as f32 - 0.3;
        head.write(&mut store, LEFT, *position, value);
        let read = store.read(*position as f32, Direction::Forward);
        assert_eq!(read.left, value);
    }
}

#[test]
fn unstarted_head_writes_nothing() {
    let mut store = SampleStore::with_noise(256, 0.01, 5);
    let before: Vec<Frame> = (0..256).map(|i| store.frame(i)).collect();
    let mut head = WriteHead::new(FADE);
    assert!(!head.is_writing());
    for i in 0..1_000 {
        head.write(&mut store, LEFT, i, 1.0);
    }
    let after: Vec<Frame> = (0..256).map(|i| store.frame(i)).collect();
    assert_eq!(before, after);
}

#[test]
fn fade_in_is_monotonic_and_reverses_smoothly() {
    let mut store = SampleStore::new(1_024);
    let mut head = WriteHead::new(FADE);
    head.start();

    let mut levels = Vec::new();
    for i in 0..FADE as i64 {
        head.write(&mut store, LEFT, i, 1.0);
        levels.push(head.level());
    }
    assert!(levels.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(*levels.last().unwrap(), 1.0);
    assert_eq!(levels.len(), FADE as usize);

    // Turn around halfway through a second fade-in
    head.stop();
    for i in 0..FADE as i64 {
        head.write(&mut store, LEFT, 100 + i, 1.0);
    }
    head.start();
    let step = 1.0 / FADE as f32;
    let mut last = head.level();
    for i in 0..(FADE / 2) as i64 {
        head.write(&mut store, LEFT, 200 + i, 1.0);
        assert!((head.level() - last).abs() <= step + 1e-6);
        last = head.level();
    }
    head.stop();
    head.write(&mut store, LEFT, 300, 1.0);
    assert!((last - head.level()).abs() <= step + 1e-6);
}

/// Speeds paired with the number of samples after which the loop repeats
/// exactly: 1.5 frames a sample needs three passes of a 1000 frame loop.
const LOOP_PERIODS: [(f32, usize); 4] = [
    (1.0, 1_000),
    (-1.0, 1_000),
    (1.5, 2_000),
    (-1.5, 2_000),
];

#[test]
fn stable_loop_is_periodic() {
    let store = SampleStore::with_noise(CAPACITY, 0.8, 42);
    for (speed, period) in LOOP_PERIODS {
        let mut pb = with_window(300.0, 1_000.0, speed);
        let out: Vec<f32> = (0..3 * period).map(|_| pb.next(&store).left).collect();
        for n in period..2 * period {
            assert_abs_diff_eq!(out[n], out[n + period], epsilon = 1e-6);
        }
    }
}

#[test]
fn seam_blends_stay_between_candidates() {
    let store = SampleStore::with_noise(CAPACITY, 0.8, 42);
    let length = 1_000.0;
    let start = 300.0;

    for (speed, _) in LOOP_PERIODS {
        let mut pb = with_window(start, length, speed);
        // The other side of the seam is one loop behind going forward, one
        // loop ahead going backward
        let seam = if speed > 0.0 { -length } else { length };
        for _ in 0..4_000 {
            let phase = pb.phase();
            let direction = pb.direction();
            let a = store.read(start + phase, direction).left;
            let b = store.read(start + phase + seam, direction).left;
            let out = pb.next(&store).left;
            assert!(
                out >= a.min(b) - 0.01 && out <= a.max(b) + 0.01,
                "speed {} phase {}: {} not between {} and {}",
                speed,
                phase,
                out,
                a,
                b
            );
        }
    }
}

/// Largest sample-to-sample step of a 2000 frame loop, steady and with the
/// loop cut to 1000 frames `change_at` samples in. Both runs skip the first
/// 100 samples, where a backward loop starts on its seam.
fn length_change_steps(speed: f32, change_at: usize, crossfades: bool) -> (f32, f32) {
    let store = sine_store(64.0);
    let warmed_up = || {
        let mut pb = with_window(0.0, 2_000.0, speed);
        for _ in 0..100 {
            pb.next(&store);
        }
        pb
    };

    let mut pb = warmed_up();
    let steady: Vec<f32> = (0..1_000).map(|_| pb.next(&store).left).collect();

    let mut pb = warmed_up();
    let mut out: Vec<f32> = (0..change_at).map(|_| pb.next(&store).left).collect();
    pb.request_length(1_000.0);
    assert_eq!(pb.is_fading(), crossfades, "speed {} phase {}", speed, pb.phase());
    out.extend((0..3_000).map(|_| pb.next(&store).left));
    assert_eq!(pb.length(), 1_000.0);
    assert!(pb.is_fading() || (0.0..1_000.0).contains(&pb.phase()));

    (max_step(&steady), max_step(&out))
}

#[test]
fn shortening_inside_the_new_window_is_smooth() {
    // Each change lands with the phase already below 1000
    for (speed, change_at) in [(1.0, 400), (-1.0, 1_500), (1.5, 300), (-1.5, 700)] {
        let (steady, changed) = length_change_steps(speed, change_at, false);
        assert!(changed <= 2.0 * steady, "speed {}: {} > 2 x {}", speed, changed, steady);
    }
}

#[test]
fn shortening_past_the_phase_is_smooth() {
    // Each change lands with the phase past 1000, so the cut crossfades
    for (speed, change_at) in [(1.0, 1_400), (-1.0, 500), (1.5, 600), (-1.5, 500)] {
        let (steady, changed) = length_change_steps(speed, change_at, true);
        assert!(changed <= 2.0 * steady, "speed {}: {} > 2 x {}", speed, changed, steady);
    }
}

#[test]
fn speed_deadbands() {
    let cases = [
        (0.05, 0.0, true),
        (0.0999, 0.0, true),
        (0.1, 0.0, true),
        (0.1001, 0.1001, false),
        (0.11, 0.11, false),
        (0.94, 0.94, false),
        (0.9499, 0.9499, false),
        (0.95, 1.0, true),
        (0.9501, 1.0, true),
        (1.0, 1.0, true),
        (1.0499, 1.0, true),
        (1.05, 1.0, true),
        (1.0501, 1.0501, false),
        (1.06, 1.06, false),
    ];
    for (raw, resolved, locked) in cases {
        assert_eq!(resolve_speed(raw), resolved, "speed {}", raw);
        assert_eq!(resolve_speed(-raw), -resolved, "speed {}", -raw);
        assert_eq!(is_speed_locked(raw), locked, "speed {}", raw);
        assert_eq!(is_speed_locked(-raw), locked, "speed {}", -raw);
    }
}

#[test]
fn retrigger_resets_phase_and_runs_the_envelope() {
    let store = SampleStore::with_noise(CAPACITY, 0.8, 7);
    let mut pb = playback();
    for _ in 0..500 {
        pb.next(&store);
    }

    pb.retrigger();
    assert_eq!(pb.phase(), 0.0);
    assert_eq!(pb.trigger_stage(), TriggerStage::FadingOut);

    let t = TRIGGER_FADE as usize;
    let fade_out: Vec<Frame> = (0..t).map(|_| pb.next(&store)).collect();
    assert_eq!(pb.phase(), 0.0);
    assert_eq!(pb.trigger_stage(), TriggerStage::FadingIn);
    assert_abs_diff_eq!(
        fade_out[0].left,
        store.frame(500).left * (1.0 - 1.0 / t as f32),
        epsilon = 1e-6
    );
    assert_eq!(fade_out[t - 1], Frame::SILENT);

    let fade_in: Vec<Frame> = (0..t).map(|_| pb.next(&store)).collect();
    assert_eq!(pb.trigger_stage(), TriggerStage::Idle);
    for (k, frame) in fade_in.iter().enumerate() {
        let gain = (k + 1) as f32 / t as f32;
        assert_abs_diff_eq!(frame.left, store.frame(k as i64).left * gain, epsilon = 1e-6);
    }
    assert_eq!(fade_in[t - 1], store.frame(t as i64 - 1));
}

const BLOCK: usize = 64;

fn looper(config: LooperConfig) -> Looper {
    Looper::new(config).expect("valid config")
}

fn small_config() -> LooperConfig {
    LooperConfig::new(8_000.0)
        .with_buffer_seconds(1.0)
        .with_clock_timeout_seconds(0.1)
}

fn block(looper: &mut Looper, inputs: &LooperInputs) -> Vec<f32> {
    let input = [0.5; BLOCK];
    let mut left = [0.0; BLOCK];
    let mut right = [0.0; BLOCK];
    looper.process(inputs, &input, &input, &mut left, &mut right);
    left.to_vec()
}

#[test]
fn incremental_clear_mutes_until_done() {
    let mut looper = looper(small_config().with_clear_mode(ClearMode::Incremental));
    let clear = LooperInputs {
        clear: true,
        ..LooperInputs::default()
    };

    for _ in 0..128 {
        let out = block(&mut looper, &clear);
        assert!(out.iter().all(|&x| x == 0.0));
    }
    assert!(looper.store().is_silent());

    block(&mut looper, &LooperInputs::default());
    assert!(!looper.is_clearing());
}

#[test]
fn clock_tick_retriggers_and_times_out() {
    let mut looper = looper(small_config());
    for _ in 0..10 {
        block(&mut looper, &LooperInputs::default());
    }
    assert!(!looper.clock_is_external());

    let tick = LooperInputs {
        clock: 1.0,
        ..LooperInputs::default()
    };
    block(&mut looper, &tick);
    assert!(looper.clock_is_external());
    // 40 samples of tail fade-out, then the head runs from phase 0
    assert_eq!(looper.trigger_stage(), TriggerStage::FadingIn);
    assert_eq!(looper.phase(), (BLOCK - 40) as f32);

    // 800 samples without a tick
    for _ in 0..13 {
        block(&mut looper, &LooperInputs::default());
    }
    assert!(!looper.clock_is_external());
}

#[test]
fn clock_retrigger_can_be_disabled() {
    let mut looper = looper(small_config().with_retrigger_on_clock(false));
    block(&mut looper, &LooperInputs::default());
    let tick = LooperInputs {
        clock: 1.0,
        ..LooperInputs::default()
    };
    block(&mut looper, &tick);
    assert!(looper.clock_is_external());
    assert_eq!(looper.trigger_stage(), TriggerStage::Idle);
    assert_eq!(looper.phase(), (2 * BLOCK) as f32);
}

#[test]
fn cycle_flag_marks_the_store_wrap() {
    let mut looper = looper(small_config());
    let mut wraps = 0;
    for _ in 0..250 {
        block(&mut looper, &LooperInputs::default());
        if looper.cycle_started() {
            wraps += 1;
        }
    }
    // 16000 samples over an 8000 frame store
    assert_eq!(wraps, 2);
}

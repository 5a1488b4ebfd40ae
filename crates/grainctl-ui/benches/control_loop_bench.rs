//! Criterion benchmarks for the per-tick control path
//!
//! Run with: cargo bench -p grainctl-ui
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use grainctl_config::{MemoryStore, PresetLocation, Settings};
use grainctl_core::Parameters;
use grainctl_platform::{
    CalibrationData, CvInputTable, CvScaler, EventQueue, GestureClassifier, InputFrame, SwitchId,
    Switches,
};
use grainctl_ui::{ControlLoop, EngineState, SimulatedPanel, UiMode, paint};

const TICK_COUNTS: &[u32] = &[1, 100, 1000];

fn bench_control_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ControlLoop");

    for &ticks in TICK_COUNTS {
        group.bench_with_input(BenchmarkId::new("idle", ticks), &ticks, |b, &ticks| {
            let mut cl = ControlLoop::new(
                SimulatedPanel::new(),
                Settings::init(MemoryStore::new()),
                EngineState::new(),
            );
            b.iter(|| {
                cl.run(black_box(ticks)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gestures");

    let classifier = GestureClassifier::new();
    let released = InputFrame::released().switches;
    let held = InputFrame::released()
        .with_held(SwitchId::Freeze)
        .with_held(SwitchId::Bypass)
        .switches;

    group.bench_function("scan_classify_idle", |b| {
        let mut switches = Switches::new();
        let mut queue = EventQueue::new();
        let mut now = 0u32;
        b.iter(|| {
            now = now.wrapping_add(1);
            switches.scan(black_box(&released));
            classifier.classify(&mut switches, now, &mut queue).unwrap();
        });
    });

    group.bench_function("scan_classify_combo", |b| {
        let mut switches = Switches::new();
        let mut queue = EventQueue::new();
        let mut now = 0u32;
        b.iter(|| {
            now = now.wrapping_add(1);
            let levels = if now % 2048 < 1024 { &held } else { &released };
            switches.scan(black_box(levels));
            classifier.classify(&mut switches, now, &mut queue).unwrap();
            while queue.pop().is_some() {}
        });
    });

    group.finish();
}

fn bench_cv_scaler(c: &mut Criterion) {
    let mut group = c.benchmark_group("CvScaler");

    let mut frame = InputFrame::released();
    for (i, value) in frame.adc.iter_mut().enumerate() {
        *value = i as f32 / 10.0;
    }

    group.bench_function("read", |b| {
        let mut scaler = CvScaler::new(&CvInputTable::DEFAULT, CalibrationData::default());
        let mut params = Parameters::new();
        b.iter(|| {
            scaler.read(black_box(&frame), &mut params);
            black_box(&params);
        });
    });

    group.finish();
}

fn bench_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("Leds");

    let mut engine = EngineState::new();
    engine.set_peak(0.3);
    let cursor = PresetLocation::new(1, 2);

    for mode in [UiMode::VuMeter, UiMode::PlaybackMode, UiMode::Load] {
        group.bench_with_input(BenchmarkId::new("paint", mode.name()), &mode, |b, &mode| {
            let mut clock = 0u32;
            b.iter(|| {
                clock = clock.wrapping_add(1);
                black_box(paint(mode, black_box(clock), &engine, cursor))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_control_loop,
    bench_gestures,
    bench_cv_scaler,
    bench_paint,
);

criterion_main!(benches);

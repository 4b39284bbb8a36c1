use chart_timing::{
    MeasureInfo, TimeSignature, Timing, TimingError,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sig(numerator: u32, denominator: u32) -> TimeSignature {
    TimeSignature::new(numerator, denominator)
}

#[test]
fn time_by_tick_without_tempo_changes() {
    init_logger();
    let timing =
        Timing::new(24, &[(0, 240.0)], &[(0, sig(4, 4))]).unwrap();

    assert_eq!(timing.get_time_by_tick(0), 0.0);
    assert_eq!(timing.get_time_by_tick(96), 1000.0);
    assert_eq!(timing.get_time_by_tick(-96), -1000.0);

    // res 24 at 240 BPM: one tick is 1000/96 ms.
    for tick in -200..=200 {
        let expected = tick as f64 * 1000.0 / 96.0;
        let actual = timing.get_time_by_tick(tick);
        assert!(
            (actual - expected).abs() < 1e-9,
            "tick={tick}: {actual} != {expected}"
        );
    }
}

#[test]
fn time_by_tick_with_tempo_changes() {
    let timing = Timing::new(
        24,
        &[(0, 240.0), (96, 120.0), (192, 480.0)],
        &[],
    )
    .unwrap();

    assert_eq!(timing.get_time_by_tick(-96), -1000.0);
    assert_eq!(timing.get_time_by_tick(0), 0.0);
    assert_eq!(timing.get_time_by_tick(48), 500.0);
    assert_eq!(timing.get_time_by_tick(96), 1000.0);
    assert_eq!(timing.get_time_by_tick(144), 2000.0);
    assert_eq!(timing.get_time_by_tick(192), 3000.0);
    assert_eq!(timing.get_time_by_tick(288), 3500.0);
}

#[test]
fn time_by_tick_single_segment_anywhere() {
    // One tempo segment behaves the same wherever it sits: the line
    // always passes through (tick 0, time 0).
    for bpm_tick in [-100, -50, 0, 50, 100] {
        let timing =
            Timing::new(24, &[(bpm_tick, 240.0)], &[]).unwrap();
        for i in -2..=2 {
            assert_eq!(
                timing.get_time_by_tick(96 * i),
                1000.0 * i as f64,
                "bpm_tick={bpm_tick}, tick={}",
                96 * i
            );
        }
    }
}

#[test]
fn tick_by_time_inverts_time_by_tick() {
    let timing = Timing::new(
        24,
        &[(0, 240.0), (96, 120.0), (192, 480.0)],
        &[],
    )
    .unwrap();

    assert_eq!(timing.get_tick_by_time(0.0), 0.0);
    assert_eq!(timing.get_tick_by_time(2000.0), 144.0);
    assert_eq!(timing.get_tick_by_time(-1000.0), -96.0);
    assert_eq!(timing.get_tick_by_time(3500.0), 288.0);

    for tick in (-192..=384).step_by(7) {
        let time = timing.get_time_by_tick(tick);
        let back = timing.get_tick_by_time(time);
        assert!(
            (back - tick as f64).abs() < 1e-6,
            "tick={tick}, time={time}, back={back}"
        );
    }
}

#[test]
fn measure_info_by_tick_simple() {
    let timing =
        Timing::new(24, &[(0, 240.0)], &[(0, sig(4, 4))]).unwrap();

    assert_eq!(
        timing.get_measure_info_by_tick(0),
        MeasureInfo {
            idx: 0,
            tick: 0,
            sig: sig(4, 4),
            beat_length: 24,
            full_length: 96,
        }
    );
    assert_eq!(
        timing.get_measure_info_by_idx(0),
        timing.get_measure_info_by_tick(0)
    );
}

#[test]
fn measure_info_by_tick_preroll() {
    let timing = Timing::default();
    let info = timing.get_measure_info_by_tick(-1);
    assert_eq!((info.idx, info.tick), (-1, -96));
}

#[test]
fn measure_idx_round_trip() {
    // Includes a mid-measure signature change (tick 50): measure 0 is
    // partial, measure 1 starts at the change point.
    let timing = Timing::new(
        24,
        &[(0, 240.0)],
        &[(0, sig(4, 4)), (50, sig(3, 4)), (300, sig(7, 8))],
    )
    .unwrap();

    for k in -5..=20 {
        let by_idx = timing.get_measure_info_by_idx(k);
        let back = timing.get_measure_info_by_tick(by_idx.tick);
        assert_eq!(back.idx, k, "by_idx={by_idx:?}");
        assert_eq!(back, by_idx);
    }
}

#[test]
fn rejects_incompatible_signature() {
    // 4 * 1 = 4 ticks per whole note is not divisible by 3.
    assert_eq!(
        Timing::new(1, &[], &[(0, sig(4, 3))]).unwrap_err(),
        TimingError::IncompatibleSignature {
            res: 1,
            sig: sig(4, 3)
        }
    );
}

#[test]
fn rejects_invalid_signature_components() {
    for bad in [sig(0, 4), sig(4, 0)] {
        assert_eq!(
            Timing::new(24, &[], &[(96, bad)]).unwrap_err(),
            TimingError::InvalidTimeSignature {
                tick: 96,
                sig: bad
            }
        );
    }
}

#[test]
fn rejects_invalid_bpm() {
    let err = Timing::new(24, &[(10, -120.0)], &[]).unwrap_err();
    assert_eq!(
        err,
        TimingError::InvalidBpm {
            tick: 10,
            bpm: -120.0
        }
    );
    assert!(err.to_string().contains("tick=10"));
}

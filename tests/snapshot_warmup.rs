use std::collections::BTreeMap;

use cubist::{
    Canvas, CardSource, Clock, CpuBackend, CubistResult, Engine, EngineConfig, FrameRGBA, ManualClock,
    NoopScrollLock, Rgba8, SectionId, SectionSource, TimestampMs, DECODE_TIMEOUT,
};

const CANVAS: Canvas = Canvas {
    width: 40,
    height: 30,
};

fn engine() -> Engine {
    let config = EngineConfig {
        canvas: CANVAS,
        ..EngineConfig::default()
    };
    Engine::new(config, Box::new(CpuBackend::new()), Box::new(NoopScrollLock)).unwrap()
}

fn sources() -> BTreeMap<SectionId, Box<dyn SectionSource>> {
    SectionId::ALL
        .into_iter()
        .map(|id| {
            let src: Box<dyn SectionSource> = Box::new(CardSource::new(
                CANVAS,
                Rgba8::opaque(30, 30, 90),
                Rgba8::opaque(210, 140, 50),
            ));
            (id, src)
        })
        .collect()
}

#[test]
fn warm_up_captures_all_sections_and_signals_ready() {
    let mut engine = engine();
    assert!(!engine.snapshots_ready());

    let clock = ManualClock::new(TimestampMs(0));
    let report = engine.warm_up(&sources(), &clock);

    assert_eq!(report.captured.len(), 6);
    assert!(report.failed.is_empty());
    assert!(engine.snapshots_ready());

    for id in SectionId::ALL {
        let record = engine.session().snapshot(id).expect("snapshot stored");
        // captured at the configured 0.6 scale
        assert_eq!(record.width, 24);
        assert_eq!(record.height, 18);
        assert_eq!(record.decode().unwrap().width, 24);
    }
}

#[test]
fn repeated_warm_up_overwrites_rather_than_accumulating() {
    let mut engine = engine();
    let clock = ManualClock::new(TimestampMs(0));

    engine.warm_up(&sources(), &clock);
    let first_versions: Vec<u64> = SectionId::ALL
        .iter()
        .map(|id| engine.session().snapshot(*id).unwrap().captured_version)
        .collect();

    engine.warm_up(&sources(), &clock);
    assert_eq!(engine.session().snapshot_count(), 6);
    for (id, old) in SectionId::ALL.iter().zip(first_versions) {
        let new = engine.session().snapshot(*id).unwrap().captured_version;
        assert!(new > old, "recapture must advance the version counter");
    }
}

struct SlowImages {
    inner: CardSource,
}

impl SectionSource for SlowImages {
    fn assets_ready(&self) -> bool {
        false
    }

    fn rasterize(&self) -> CubistResult<FrameRGBA> {
        self.inner.rasterize()
    }
}

#[test]
fn slow_image_decode_is_bounded_by_the_timeout() {
    let mut engine = engine();
    let clock = ManualClock::new(TimestampMs(0));

    let mut sources = sources();
    sources.insert(
        SectionId::Portfolio,
        Box::new(SlowImages {
            inner: CardSource::new(CANVAS, Rgba8::opaque(5, 5, 5), Rgba8::opaque(9, 9, 9)),
        }),
    );

    let report = engine.warm_up(&sources, &clock);

    // the section is captured anyway, with whatever had decoded
    assert!(report.captured.contains(&SectionId::Portfolio));
    assert!(engine.session().snapshot(SectionId::Portfolio).is_some());
    // and the pass waited out the bound instead of hanging
    assert!(clock.now().0 >= DECODE_TIMEOUT.0);
}

struct FailingSource;

impl SectionSource for FailingSource {
    fn rasterize(&self) -> CubistResult<FrameRGBA> {
        Err(cubist::CubistError::capture("offscreen mount failed"))
    }
}

#[test]
fn capture_failures_degrade_to_missing_snapshots() {
    let mut engine = engine();
    let clock = ManualClock::new(TimestampMs(0));

    let mut sources = sources();
    sources.insert(SectionId::Tech, Box::new(FailingSource));

    let report = engine.warm_up(&sources, &clock);
    assert_eq!(report.captured.len(), 5);
    assert_eq!(report.failed, vec![SectionId::Tech]);
    assert!(engine.session().snapshot(SectionId::Tech).is_none());
    // warm-up still signals ready; transitions tolerate the gap
    assert!(engine.snapshots_ready());
}

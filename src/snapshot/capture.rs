use std::collections::BTreeMap;

use crate::{
    foundation::clock::Clock,
    foundation::core::{DurationMs, FrameRGBA, Rgba8},
    foundation::error::CubistResult,
    sections::registry::{SectionId, SectionRegistry},
    snapshot::source::SectionSource,
    snapshot::store::SessionStore,
};

/// Bound on waiting for a section's images to finish decoding.
pub const DECODE_TIMEOUT: DurationMs = DurationMs(700);

/// Pause between decode-readiness polls.
pub const DECODE_POLL_INTERVAL: DurationMs = DurationMs(25);

/// Scale applied to captured section rasters.
pub const SNAPSHOT_SCALE: f64 = 0.6;

/// Outcome of one warm-up pass over the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarmUpReport {
    pub captured: Vec<SectionId>,
    pub failed: Vec<SectionId>,
}

/// Produces cached raster snapshots of every section ahead of time, so the
/// cube transition never needs the live section content mounted.
///
/// The pass runs sequentially in registry order, one section at a time, to
/// bound memory and rendering cost. Per-section failures are swallowed: a
/// missing snapshot later renders as a placeholder face.
pub struct SnapshotCache {
    scale: f64,
    decode_timeout: DurationMs,
    poll_interval: DurationMs,
    background: Rgba8,
}

impl SnapshotCache {
    pub fn new(
        scale: f64,
        decode_timeout: DurationMs,
        poll_interval: DurationMs,
        background: Rgba8,
    ) -> Self {
        Self {
            scale,
            decode_timeout,
            poll_interval,
            background,
        }
    }

    /// Capture every registered section into `store`, overwriting previous
    /// snapshots, and flip the store's ready signal when done.
    #[tracing::instrument(skip_all)]
    pub fn warm_up(
        &self,
        registry: &SectionRegistry,
        sources: &BTreeMap<SectionId, Box<dyn SectionSource>>,
        clock: &dyn Clock,
        store: &mut SessionStore,
    ) -> WarmUpReport {
        let mut report = WarmUpReport::default();

        for desc in registry.sections() {
            let id = desc.id;
            let Some(source) = sources.get(&id) else {
                tracing::warn!(section = id.as_str(), "no source for section, skipping capture");
                report.failed.push(id);
                continue;
            };

            if !self.wait_for_assets(source.as_ref(), clock) {
                // Capture proceeds with whatever did decode in time.
                tracing::warn!(
                    section = id.as_str(),
                    timeout_ms = self.decode_timeout.0,
                    "image decode timed out, capturing anyway"
                );
            }

            match self.capture_one(source.as_ref()) {
                Ok(frame) => match store.put_snapshot(id, &frame) {
                    Ok(()) => {
                        tracing::debug!(
                            section = id.as_str(),
                            width = frame.width,
                            height = frame.height,
                            "captured snapshot"
                        );
                        report.captured.push(id);
                    }
                    Err(e) => {
                        tracing::warn!(section = id.as_str(), error = %e, "snapshot store failed");
                        report.failed.push(id);
                    }
                },
                Err(e) => {
                    tracing::warn!(section = id.as_str(), error = %e, "snapshot capture failed");
                    report.failed.push(id);
                }
            }
        }

        store.mark_snapshots_ready();
        report
    }

    fn wait_for_assets(&self, source: &dyn SectionSource, clock: &dyn Clock) -> bool {
        let deadline = clock.now().advanced_by(self.decode_timeout);
        while !source.assets_ready() {
            if clock.now() >= deadline {
                return false;
            }
            clock.sleep(self.poll_interval);
        }
        true
    }

    fn capture_one(&self, source: &dyn SectionSource) -> CubistResult<FrameRGBA> {
        let full = source.rasterize()?;
        let flattened = composite_opaque(&full, self.background);
        downscale(&flattened, self.scale)
    }
}

/// Blend straight-alpha content over an opaque fill so transparent regions
/// do not composite incorrectly onto the cube.
fn composite_opaque(frame: &FrameRGBA, background: Rgba8) -> FrameRGBA {
    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        px[0] = ((u16::from(px[0]) * a + u16::from(background.r) * inv) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + u16::from(background.g) * inv) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + u16::from(background.b) * inv) / 255) as u8;
        px[3] = 255;
    }
    out
}

fn downscale(frame: &FrameRGBA, scale: f64) -> CubistResult<FrameRGBA> {
    let w = ((f64::from(frame.width) * scale).round() as u32).max(1);
    let h = ((f64::from(frame.height) * scale).round() as u32).max(1);
    if w == frame.width && h == frame.height {
        return Ok(frame.clone());
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            crate::foundation::error::CubistError::capture(
                "frame buffer does not match its dimensions",
            )
        })?;
    let resized = image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle);
    FrameRGBA::from_raw(w, h, resized.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::clock::ManualClock;
    use crate::foundation::core::{Canvas, TimestampMs};
    use crate::snapshot::source::CardSource;

    fn cache() -> SnapshotCache {
        SnapshotCache::new(
            SNAPSHOT_SCALE,
            DECODE_TIMEOUT,
            DECODE_POLL_INTERVAL,
            Rgba8::opaque(18, 20, 28),
        )
    }

    fn sources_for_all() -> BTreeMap<SectionId, Box<dyn SectionSource>> {
        SectionId::ALL
            .into_iter()
            .map(|id| {
                let src: Box<dyn SectionSource> = Box::new(CardSource::new(
                    Canvas {
                        width: 40,
                        height: 30,
                    },
                    Rgba8::opaque(20, 20, 60),
                    Rgba8::opaque(220, 120, 40),
                ));
                (id, src)
            })
            .collect()
    }

    #[test]
    fn warm_up_captures_every_section_at_reduced_scale() {
        let registry = SectionRegistry::standard();
        let clock = ManualClock::new(TimestampMs(0));
        let mut store = SessionStore::new();

        let report = cache().warm_up(&registry, &sources_for_all(), &clock, &mut store);
        assert_eq!(report.captured.len(), 6);
        assert!(report.failed.is_empty());
        assert!(store.snapshots_ready());

        let rec = store.snapshot(SectionId::Home).unwrap();
        assert_eq!(rec.width, 24); // 40 * 0.6
        assert_eq!(rec.height, 18); // 30 * 0.6
    }

    #[test]
    fn missing_source_is_swallowed() {
        let registry = SectionRegistry::standard();
        let clock = ManualClock::new(TimestampMs(0));
        let mut store = SessionStore::new();
        let mut sources = sources_for_all();
        sources.remove(&SectionId::Tech);

        let report = cache().warm_up(&registry, &sources, &clock, &mut store);
        assert_eq!(report.captured.len(), 5);
        assert_eq!(report.failed, vec![SectionId::Tech]);
        assert!(store.snapshot(SectionId::Tech).is_none());
        assert!(store.snapshots_ready());
    }

    struct NeverReady;

    impl SectionSource for NeverReady {
        fn assets_ready(&self) -> bool {
            false
        }

        fn rasterize(&self) -> CubistResult<FrameRGBA> {
            Ok(FrameRGBA::filled(8, 8, Rgba8::opaque(0, 0, 0)))
        }
    }

    #[test]
    fn decode_timeout_does_not_block_capture() {
        let registry = SectionRegistry::standard();
        let clock = ManualClock::new(TimestampMs(0));
        let mut store = SessionStore::new();
        let mut sources = sources_for_all();
        sources.insert(SectionId::About, Box::new(NeverReady));

        let report = cache().warm_up(&registry, &sources, &clock, &mut store);
        // the never-ready section is still captured after the timeout
        assert!(report.captured.contains(&SectionId::About));
        // the manual clock advanced past the per-section deadline
        assert!(clock.now() >= TimestampMs(DECODE_TIMEOUT.0));
    }

    #[test]
    fn transparent_content_lands_on_opaque_background() {
        let transparent = FrameRGBA::filled(
            10,
            10,
            Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
        );
        let out = composite_opaque(&transparent, Rgba8::opaque(18, 20, 28));
        assert_eq!(out.pixel(5, 5), Some(Rgba8::opaque(18, 20, 28)));
    }
}

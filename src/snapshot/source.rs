use crate::foundation::{
    core::{Canvas, FrameRGBA, Rgba8},
    error::CubistResult,
};

/// Host capability: render one section's content into an off-screen
/// raster buffer.
///
/// Rasterization is front-loaded in the warm-up pass; nothing else in the
/// engine performs IO or live rendering of section content.
pub trait SectionSource {
    /// Whether the section's images have finished decoding. The warm-up
    /// pass polls this up to a bounded timeout and then captures whatever
    /// is available.
    fn assets_ready(&self) -> bool {
        true
    }

    /// Produce the section's full-scale raster content, straight RGBA8.
    fn rasterize(&self) -> CubistResult<FrameRGBA>;
}

/// Procedural stand-in for real section content: a flat card with a header
/// band and an accent block. Used by the CLI demo and tests.
pub struct CardSource {
    canvas: Canvas,
    base: Rgba8,
    accent: Rgba8,
}

impl CardSource {
    pub fn new(canvas: Canvas, base: Rgba8, accent: Rgba8) -> Self {
        Self {
            canvas,
            base,
            accent,
        }
    }
}

impl SectionSource for CardSource {
    fn rasterize(&self) -> CubistResult<FrameRGBA> {
        let Canvas { width, height } = self.canvas;
        let mut frame = FrameRGBA::filled(width, height, self.base);

        let band_h = height / 6;
        for y in 0..band_h {
            for x in 0..width {
                frame.put_pixel(x, y, self.accent);
            }
        }

        // Accent block roughly where the section's hero content sits.
        let bx0 = width / 8;
        let bx1 = width / 2;
        let by0 = height / 3;
        let by1 = by0 + height / 4;
        for y in by0..by1.min(height) {
            for x in bx0..bx1.min(width) {
                frame.put_pixel(x, y, self.accent);
            }
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_source_fills_canvas() {
        let src = CardSource::new(
            Canvas {
                width: 32,
                height: 24,
            },
            Rgba8::opaque(10, 10, 40),
            Rgba8::opaque(200, 120, 40),
        );
        let frame = src.rasterize().unwrap();
        assert_eq!(frame.width, 32);
        assert_eq!(frame.height, 24);
        // header band uses the accent color
        assert_eq!(frame.pixel(0, 0), Some(Rgba8::opaque(200, 120, 40)));
        // lower-right corner keeps the base color
        assert_eq!(frame.pixel(31, 23), Some(Rgba8::opaque(10, 10, 40)));
    }
}

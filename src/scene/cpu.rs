use kurbo::Point;

use crate::{
    animation::pose::CubePose,
    foundation::core::{FrameRGBA, Rgba8},
    foundation::error::{CubistError, CubistResult},
    scene::backend::{CubeBackend, CubeSceneDesc},
    scene::geometry::{ProjectedQuad, project_cube},
    sections::faces::CubeFace,
};

/// Software reference backend: perspective-correct textured quads onto a
/// plain RGBA8 frame. Deterministic output for a given scene and pose.
pub struct CpuBackend {
    scene: Option<Scene>,
}

struct Scene {
    desc: CubeSceneDesc,
    last_quads: Vec<(CubeFace, ProjectedQuad)>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self { scene: None }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeBackend for CpuBackend {
    fn mount(&mut self, desc: CubeSceneDesc) -> CubistResult<()> {
        if desc.canvas.width == 0 || desc.canvas.height == 0 {
            return Err(CubistError::render("cannot mount a zero-sized scene"));
        }
        self.scene = Some(Scene {
            desc,
            last_quads: Vec::new(),
        });
        Ok(())
    }

    fn render(&mut self, pose: &CubePose) -> CubistResult<FrameRGBA> {
        let scene = self
            .scene
            .as_mut()
            .ok_or_else(|| CubistError::render("render without a mounted scene"))?;
        let desc = &scene.desc;

        let mut frame = FrameRGBA::filled(desc.canvas.width, desc.canvas.height, desc.background);
        let quads = project_cube(
            desc.axis,
            pose.angle_rad,
            pose.scale,
            pose.wobble_rad,
            desc.canvas,
            desc.perspective_distance,
        );

        // Painter's order, far to near.
        let mut order: Vec<usize> = (0..quads.len()).collect();
        order.sort_by(|&a, &b| {
            quads[a]
                .1
                .depth
                .partial_cmp(&quads[b].1.depth)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for i in order {
            let (face, quad) = &quads[i];
            if !quad.visible {
                continue;
            }
            draw_quad(
                &mut frame,
                quad,
                desc.textures.get(*face),
                desc.placeholder,
            );
        }

        scene.last_quads = quads;
        Ok(frame)
    }

    fn face_at(&self, x: f64, y: f64) -> Option<CubeFace> {
        let scene = self.scene.as_ref()?;
        scene
            .last_quads
            .iter()
            .filter(|(_, q)| q.visible && q.contains(x, y))
            .max_by(|(_, a), (_, b)| {
                a.depth
                    .partial_cmp(&b.depth)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(face, _)| *face)
    }

    fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    fn dispose(&mut self) {
        self.scene = None;
    }
}

fn draw_quad(
    frame: &mut FrameRGBA,
    quad: &ProjectedQuad,
    texture: Option<&FrameRGBA>,
    placeholder: Rgba8,
) {
    let c = &quad.corners;
    let iw = &quad.inv_w;
    // Two triangles in texture order.
    fill_triangle(
        frame,
        [c[0], c[1], c[2]],
        [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
        [iw[0], iw[1], iw[2]],
        texture,
        placeholder,
        quad.shade,
    );
    fill_triangle(
        frame,
        [c[0], c[2], c[3]],
        [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        [iw[0], iw[2], iw[3]],
        texture,
        placeholder,
        quad.shade,
    );
}

fn edge(a: Point, b: Point, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

#[allow(clippy::too_many_arguments)]
fn fill_triangle(
    frame: &mut FrameRGBA,
    pts: [Point; 3],
    uvs: [(f64, f64); 3],
    inv_w: [f64; 3],
    texture: Option<&FrameRGBA>,
    placeholder: Rgba8,
    shade: f64,
) {
    let area = edge(pts[0], pts[1], pts[2].x, pts[2].y);
    if area.abs() < 1e-9 {
        return;
    }

    let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().min(f64::from(frame.width) - 1.0)).max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil().min(f64::from(frame.height) - 1.0)).max(0.0) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;
            let w0 = edge(pts[1], pts[2], px, py) / area;
            let w1 = edge(pts[2], pts[0], px, py) / area;
            let w2 = edge(pts[0], pts[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let color = match texture {
                Some(tex) => {
                    let denom = w0 * inv_w[0] + w1 * inv_w[1] + w2 * inv_w[2];
                    if denom.abs() < 1e-12 {
                        placeholder
                    } else {
                        let u = (w0 * uvs[0].0 * inv_w[0]
                            + w1 * uvs[1].0 * inv_w[1]
                            + w2 * uvs[2].0 * inv_w[2])
                            / denom;
                        let v = (w0 * uvs[0].1 * inv_w[0]
                            + w1 * uvs[1].1 * inv_w[1]
                            + w2 * uvs[2].1 * inv_w[2])
                            / denom;
                        sample_nearest(tex, u, v)
                    }
                }
                None => placeholder,
            };
            frame.put_pixel(x, y, shaded(color, shade));
        }
    }
}

fn sample_nearest(tex: &FrameRGBA, u: f64, v: f64) -> Rgba8 {
    let x = ((u.clamp(0.0, 1.0)) * f64::from(tex.width - 1)).round() as u32;
    let y = ((v.clamp(0.0, 1.0)) * f64::from(tex.height - 1)).round() as u32;
    tex.pixel(x, y).unwrap_or(Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    })
}

fn shaded(color: Rgba8, shade: f64) -> Rgba8 {
    let s = shade.clamp(0.0, 1.0);
    Rgba8 {
        r: (f64::from(color.r) * s).round() as u8,
        g: (f64::from(color.g) * s).round() as u8,
        b: (f64::from(color.b) * s).round() as u8,
        a: color.a,
    }
}

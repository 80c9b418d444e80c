use kurbo::Point;

use crate::{foundation::core::Canvas, sections::faces::CubeFace};

/// Rotation axis of a transition.
///
/// `Vertical` rolls content top-to-bottom (rotation about the screen X
/// axis) and is the only axis the standard navigation path exercises.
/// `Horizontal` rotates about the screen Y axis and is kept for
/// generality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationAxis {
    Horizontal,
    Vertical,
}

/// Fraction of the shorter canvas edge covered by an unrotated face.
const SCREEN_FILL: f64 = 0.72;

const HALF: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub(crate) const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn scaled(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    fn rotated_x(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    fn rotated_y(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }

    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }

    fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One cube face projected to screen space.
#[derive(Clone, Debug)]
pub struct ProjectedQuad {
    /// Screen-space corners in texture order: top-left, top-right,
    /// bottom-right, bottom-left (as seen from outside the face).
    pub corners: [Point; 4],
    /// Mean view-space depth; larger is closer to the camera.
    pub depth: f64,
    /// Whether the face is front-facing at this pose.
    pub visible: bool,
    /// Per-corner reciprocal perspective divisor, for perspective-correct
    /// texture interpolation.
    pub(crate) inv_w: [f64; 4],
    /// Flat brightness from the face's view-facing after rotation.
    pub(crate) shade: f64,
}

impl ProjectedQuad {
    /// Point-in-quad test in screen space.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        let mut sign = 0.0f64;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            if cross.abs() < f64::EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }
}

/// Corners of one face of the unit cube, in texture order as seen from
/// outside the face.
fn face_corners(face: CubeFace) -> [Vec3; 4] {
    const H: f64 = HALF;
    match face {
        CubeFace::Front => [
            Vec3::new(-H, H, H),
            Vec3::new(H, H, H),
            Vec3::new(H, -H, H),
            Vec3::new(-H, -H, H),
        ],
        CubeFace::Back => [
            Vec3::new(H, H, -H),
            Vec3::new(-H, H, -H),
            Vec3::new(-H, -H, -H),
            Vec3::new(H, -H, -H),
        ],
        CubeFace::Right => [
            Vec3::new(H, H, H),
            Vec3::new(H, H, -H),
            Vec3::new(H, -H, -H),
            Vec3::new(H, -H, H),
        ],
        CubeFace::Left => [
            Vec3::new(-H, H, -H),
            Vec3::new(-H, H, H),
            Vec3::new(-H, -H, H),
            Vec3::new(-H, -H, -H),
        ],
        CubeFace::Top => [
            Vec3::new(-H, H, -H),
            Vec3::new(H, H, -H),
            Vec3::new(H, H, H),
            Vec3::new(-H, H, H),
        ],
        CubeFace::Bottom => [
            Vec3::new(-H, -H, H),
            Vec3::new(H, -H, H),
            Vec3::new(H, -H, -H),
            Vec3::new(-H, -H, -H),
        ],
    }
}

fn rotate_for(axis: RotationAxis, angle: f64, wobble: f64, v: Vec3) -> Vec3 {
    match axis {
        RotationAxis::Vertical => v.rotated_x(angle).rotated_y(wobble),
        RotationAxis::Horizontal => v.rotated_y(angle).rotated_x(wobble),
    }
}

/// Project all six faces of the cube at the given attitude onto the
/// canvas. Returns one entry per face with visibility and depth filled in;
/// callers paint visible faces in ascending depth order.
pub fn project_cube(
    axis: RotationAxis,
    angle_rad: f64,
    scale: f64,
    wobble_rad: f64,
    canvas: Canvas,
    perspective_distance: f64,
) -> Vec<(CubeFace, ProjectedQuad)> {
    let d = perspective_distance;
    let cx = f64::from(canvas.width) / 2.0;
    let cy = f64::from(canvas.height) / 2.0;
    let screen = f64::from(canvas.width.min(canvas.height)) * SCREEN_FILL;

    let mut quads = Vec::with_capacity(6);
    for face in CubeFace::ALL {
        let rotated: Vec<Vec3> = face_corners(face)
            .into_iter()
            .map(|c| rotate_for(axis, angle_rad, wobble_rad, c.scaled(scale)))
            .collect();

        let mut corners = [Point::ZERO; 4];
        let mut inv_w = [0.0f64; 4];
        let mut depth = 0.0;
        for (i, v) in rotated.iter().enumerate() {
            let w = d - v.z;
            let factor = d / w;
            corners[i] = Point::new(cx + v.x * factor * screen, cy - v.y * factor * screen);
            inv_w[i] = 1.0 / w;
            depth += v.z;
        }
        depth /= 4.0;

        let area = signed_area(&corners);
        let visible = area > f64::EPSILON;

        let normal = rotated[3].sub(rotated[0]).cross(rotated[1].sub(rotated[0]));
        let facing = if normal.len() > 0.0 {
            (normal.z / normal.len()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let shade = 0.7 + 0.3 * facing;

        quads.push((
            face,
            ProjectedQuad {
                corners,
                depth,
                visible,
                inv_w,
                shade,
            },
        ));
    }
    quads
}

/// Shoelace area in screen coordinates (y down). Positive for faces whose
/// outside is toward the camera, given the texture corner order.
fn signed_area(corners: &[Point; 4]) -> f64 {
    let mut sum = 0.0;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Canvas = Canvas {
        width: 200,
        height: 100,
    };

    fn quads_at(angle: f64) -> Vec<(CubeFace, ProjectedQuad)> {
        project_cube(RotationAxis::Vertical, angle, 1.0, 0.0, CANVAS, 3.0)
    }

    fn quad(quads: &[(CubeFace, ProjectedQuad)], face: CubeFace) -> &ProjectedQuad {
        quads
            .iter()
            .find(|(f, _)| *f == face)
            .map(|(_, q)| q)
            .expect("all faces projected")
    }

    #[test]
    fn at_rest_only_front_is_visible() {
        let quads = quads_at(0.0);
        for (face, q) in &quads {
            assert_eq!(*face == CubeFace::Front, q.visible, "face {face:?}");
        }
    }

    #[test]
    fn mid_rotation_shows_two_faces() {
        let quads = quads_at(45f64.to_radians());
        let visible: Vec<_> = quads.iter().filter(|(_, q)| q.visible).collect();
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn quarter_turn_lands_on_an_adjacent_face() {
        let quads = quads_at(90f64.to_radians());
        let visible: Vec<_> = quads
            .iter()
            .filter(|(_, q)| q.visible)
            .map(|(f, _)| *f)
            .collect();
        assert_eq!(visible.len(), 1);
        assert!(visible[0] == CubeFace::Top || visible[0] == CubeFace::Bottom);
    }

    #[test]
    fn front_face_is_centered_and_contains_center() {
        let quads = quads_at(0.0);
        let front = quad(&quads, CubeFace::Front);
        assert!(front.contains(100.0, 50.0));
        assert!(!front.contains(0.5, 0.5));
    }

    #[test]
    fn front_is_nearer_than_back() {
        let quads = quads_at(0.0);
        let front = quad(&quads, CubeFace::Front);
        let back = quad(&quads, CubeFace::Back);
        assert!(front.depth > back.depth);
    }

    #[test]
    fn horizontal_axis_exposes_side_faces() {
        let quads = project_cube(
            RotationAxis::Horizontal,
            45f64.to_radians(),
            1.0,
            0.0,
            CANVAS,
            3.0,
        );
        let visible: Vec<_> = quads
            .iter()
            .filter(|(_, q)| q.visible)
            .map(|(f, _)| *f)
            .collect();
        assert!(visible.contains(&CubeFace::Front));
        assert!(visible.contains(&CubeFace::Left) || visible.contains(&CubeFace::Right));
    }
}

//! Rotational projection: expand one anchor point into its symmetric
//! copies around the view center.
//!
//! ```text
//!                               (px, py)
//!                                  |
//!   (cx, cy) -----------------------
//! ```
//!
//! The anchor is converted to polar form relative to the center, then
//! re-emitted at `fold` evenly spaced angles with the same radius.
//! Mirroring reflects each copy across the horizontal axis through the
//! center.

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// How the anchor's start angle is recovered from its offset to the center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AngleMode {
    /// `atan(dy / dx)`: anchors left of the center alias onto their
    /// horizontal mirror. Matches the drawings the layouts were tuned on.
    #[default]
    Atan,
    /// `atan2(dy, dx)`: full-quadrant polar angle.
    Atan2,
}

/// Symmetry order plus optional mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Symmetry {
    /// Number of rotated copies
    pub fold: u32,
    /// Also emit each copy reflected across the horizontal axis
    pub mirror: bool,
}

impl Default for Symmetry {
    fn default() -> Self {
        Self::six_fold()
    }
}

impl Symmetry {
    pub fn new(fold: u32, mirror: bool) -> Self {
        Self { fold, mirror }
    }

    /// Six rotations with mirroring, the "mandala" look.
    pub fn six_fold() -> Self {
        Self::new(6, true)
    }

    /// Number of points [`rotated_positions`] yields for `anchor`.
    pub fn output_len(&self, anchor: Point, center: Point) -> usize {
        let copies = self.fold as usize;
        if self.mirrors(anchor, center) {
            copies * 2
        } else {
            copies
        }
    }

    fn mirrors(&self, anchor: Point, center: Point) -> bool {
        self.mirror && anchor.y != center.y
    }
}

/// Angle between the anchor's offset from `center` and the horizontal.
/// Zero when the anchor lies on the horizontal through the center and
/// `mode` is [`AngleMode::Atan`].
pub fn start_angle(anchor: Point, center: Point, mode: AngleMode) -> f64 {
    let dx = anchor.x - center.x;
    let dy = anchor.y - center.y;
    match mode {
        AngleMode::Atan if dy != 0.0 => (dy / dx).atan(),
        AngleMode::Atan => 0.0,
        AngleMode::Atan2 => dy.atan2(dx),
    }
}

/// All symmetric copies of `anchor`, in draw order.
///
/// Copy `k` sits at `start + k * 360° / fold`. When mirroring applies, its
/// reflection immediately follows it.
pub fn rotated_positions(
    anchor: Point,
    center: Point,
    symmetry: Symmetry,
    mode: AngleMode,
) -> Vec<Point> {
    let mut points = Vec::with_capacity(symmetry.output_len(anchor, center));
    if symmetry.fold == 0 {
        return points;
    }

    let start = start_angle(anchor, center, mode);
    let r = anchor.distance_to(center);
    let step = 360.0 / symmetry.fold as f64;
    let mirror = symmetry.mirrors(anchor, center);

    for k in 0..symmetry.fold {
        let angle = (step * k as f64).to_radians() + start;
        let (sin, cos) = angle.sin_cos();
        let x = center.x + cos * r;
        points.push(Point::new(x, center.y + sin * r));
        if mirror {
            points.push(Point::new(x, center.y - sin * r));
        }
    }
    points
}

/// The single copy of `anchor` on ray `index` of `ray_count` evenly spaced
/// rays. A ray count of zero is treated as one.
pub fn ray_position(
    anchor: Point,
    center: Point,
    index: usize,
    ray_count: usize,
    mode: AngleMode,
) -> Point {
    let start = start_angle(anchor, center, mode);
    let r = anchor.distance_to(center);
    let step = 360.0 / ray_count.max(1) as f64;
    let angle = (step * index as f64).to_radians() + start;
    Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn horizontal_anchor_has_no_mirror() {
        let origin = Point::new(0.0, 0.0);
        let pts = rotated_positions(
            Point::new(10.0, 0.0),
            origin,
            Symmetry::six_fold(),
            AngleMode::Atan,
        );
        let h = 10.0 * 60f64.to_radians().sin();
        let expected = [
            Point::new(10.0, 0.0),
            Point::new(5.0, h),
            Point::new(-5.0, h),
            Point::new(-10.0, 0.0),
            Point::new(-5.0, -h),
            Point::new(5.0, -h),
        ];
        assert_eq!(pts.len(), 6);
        for (got, want) in pts.iter().zip(expected.iter()) {
            assert!(close(*got, *want), "{got:?} != {want:?}");
        }
    }

    #[test]
    fn off_axis_anchor_doubles_with_mirror() {
        let center = Point::new(400.0, 300.0);
        let anchor = Point::new(470.0, 320.0);
        let pts = rotated_positions(anchor, center, Symmetry::six_fold(), AngleMode::Atan);
        assert_eq!(pts.len(), 12);
        assert_eq!(Symmetry::six_fold().output_len(anchor, center), 12);
        // first copy is the anchor itself, second its reflection
        assert!(close(pts[0], anchor));
        assert!(close(pts[1], Point::new(470.0, 280.0)));
    }

    #[test]
    fn mirroring_can_be_disabled() {
        let pts = rotated_positions(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Symmetry::new(5, false),
            AngleMode::Atan,
        );
        assert_eq!(pts.len(), 5);
    }

    #[test]
    fn zero_fold_is_empty() {
        let pts = rotated_positions(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Symmetry::new(0, true),
            AngleMode::Atan,
        );
        assert!(pts.is_empty());
    }

    #[test]
    fn atan_aliases_left_half_but_atan2_does_not() {
        let center = Point::new(0.0, 0.0);
        let left = Point::new(-3.0, 4.0);
        let right = Point::new(3.0, -4.0);
        assert_eq!(
            start_angle(left, center, AngleMode::Atan),
            start_angle(right, center, AngleMode::Atan)
        );
        assert_ne!(
            start_angle(left, center, AngleMode::Atan2),
            start_angle(right, center, AngleMode::Atan2)
        );

        let p = ray_position(left, center, 0, 1, AngleMode::Atan2);
        assert!(close(p, left));
    }

    #[test]
    fn vertical_offset_resolves_to_quarter_turn() {
        let a = start_angle(Point::new(0.0, 5.0), Point::new(0.0, 0.0), AngleMode::Atan);
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn rays_are_evenly_spaced() {
        let center = Point::new(0.0, 0.0);
        let anchor = Point::new(2.0, 0.0);
        let p = ray_position(anchor, center, 1, 4, AngleMode::Atan);
        assert!(close(p, Point::new(0.0, 2.0)));
        let q = ray_position(anchor, center, 3, 0, AngleMode::Atan);
        assert!(close(q, anchor));
    }

    #[test]
    fn every_copy_keeps_the_anchor_radius() {
        let center = Point::new(390.0, 200.0);
        for &(x, y) in &[(500.0, 260.0), (300.0, 120.0), (390.0, 90.0), (391.0, 200.0)] {
            let anchor = Point::new(x, y);
            let r = anchor.distance_to(center);
            for mode in [AngleMode::Atan, AngleMode::Atan2] {
                for p in rotated_positions(anchor, center, Symmetry::new(7, true), mode) {
                    assert!((p.distance_to(center) - r).abs() <= 1e-9 * r.max(1.0));
                }
            }
        }
    }
}

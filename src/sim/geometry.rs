//! Convex geometry for the runner hitbox and obstacle shapes
//!
//! Everything lives in ground space: `x` grows to the right from the game
//! area's left edge and `y` grows upward from the ground line (`y = 0`).
//! Rotations are visual rotations, clockwise on screen, in degrees.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Same rectangle shifted by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.left + offset.x, self.bottom + offset.y, self.width, self.height)
    }

    /// Corners, counter-clockwise from bottom-left
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left, self.bottom),
            DVec2::new(self.right(), self.bottom),
            DVec2::new(self.right(), self.top()),
            DVec2::new(self.left, self.top()),
        ]
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: DVec2::new(self.left, self.bottom),
            max: DVec2::new(self.right(), self.top()),
        }
    }
}

/// Bounding box used for cheap rejection before SAT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Bounding box of a point set (empty sets give an inverted box that
    /// overlaps nothing)
    pub fn from_points(points: &[DVec2]) -> Self {
        points.iter().fold(
            Self {
                min: DVec2::splat(f64::INFINITY),
                max: DVec2::splat(f64::NEG_INFINITY),
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which way a spike points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeDirection {
    /// Apex at the top, standing on the ground or a block
    Up,
    /// Apex at the bottom, hanging from a bar
    Down,
}

/// Triangle inscribed in `rect` pointing in `direction`
pub fn spike_triangle(rect: &Rect, direction: SpikeDirection) -> [DVec2; 3] {
    let mid_x = rect.left + rect.width / 2.0;
    match direction {
        SpikeDirection::Up => [
            DVec2::new(mid_x, rect.top()),
            DVec2::new(rect.right(), rect.bottom),
            DVec2::new(rect.left, rect.bottom),
        ],
        SpikeDirection::Down => [
            DVec2::new(rect.left, rect.top()),
            DVec2::new(rect.right(), rect.top()),
            DVec2::new(mid_x, rect.bottom),
        ],
    }
}

/// Corners of a `width × height` body rotated about its bottom-center
///
/// Returned relative to the pivot, in order bottom-left, bottom-right,
/// top-right, top-left (before rotation).
pub fn rotated_body_corners(width: f64, height: f64, angle_deg: f64) -> [DVec2; 4] {
    let half_w = width / 2.0;
    let local = [
        DVec2::new(-half_w, 0.0),
        DVec2::new(half_w, 0.0),
        DVec2::new(half_w, height),
        DVec2::new(-half_w, height),
    ];
    if angle_deg == 0.0 {
        return local;
    }
    // Clockwise on screen is a negative rotation with y pointing up
    let (sin, cos) = (-angle_deg.to_radians()).sin_cos();
    let rotation = DVec2::new(cos, sin);
    local.map(|p| rotation.rotate(p))
}

/// Vertical lift that keeps every corner of the rotated body at or above
/// the pivot's ground line
///
/// Shared by the presentation snapshot and the collision hitbox so the two
/// can never disagree about where the runner is drawn.
pub fn ground_lift(width: f64, height: f64, angle_deg: f64) -> f64 {
    let normalized = crate::normalize_degrees(angle_deg);
    if normalized == 0.0 {
        return 0.0;
    }
    let min_y = rotated_body_corners(width, height, normalized)
        .iter()
        .map(|c| c.y)
        .fold(f64::INFINITY, f64::min);
    if min_y < 0.0 { -min_y } else { 0.0 }
}

/// Unit edge normals of a convex polygon
fn polygon_axes(poly: &[DVec2]) -> impl Iterator<Item = DVec2> + '_ {
    (0..poly.len()).map(move |i| {
        let edge = poly[(i + 1) % poly.len()] - poly[i];
        // Zero-length edges give a zero axis, which never reports overlap
        edge.perp().try_normalize().unwrap_or(DVec2::ZERO)
    })
}

/// Project a polygon onto an axis, returning the (min, max) interval
pub fn project_polygon(poly: &[DVec2], axis: DVec2) -> (f64, f64) {
    poly.iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

/// Separating-axis test between two convex polygons
///
/// Returns true only if the projections overlap by more than `min_overlap`
/// on every edge normal of both polygons. Touching shapes, or shapes that
/// overlap by no more than the slack on some axis, do not collide.
pub fn polygons_overlap(a: &[DVec2], b: &[DVec2], min_overlap: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    polygon_axes(a).chain(polygon_axes(b)).all(|axis| {
        let (a_min, a_max) = project_polygon(a, axis);
        let (b_min, b_max) = project_polygon(b, axis);
        let overlap = a_max.min(b_max) - a_min.max(b_min);
        overlap > min_overlap
    })
}

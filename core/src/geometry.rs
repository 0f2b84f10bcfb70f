//! Geometry primitives shared by the pathfinder, line-of-sight tester,
//! collision avoidance and combat resolution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{TileCoord, TILE_SIZE};

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    min: Vec2,
    max: Vec2,
}

impl Rect {
    /// Creates a rectangle anchored at `min` spanning `size` world units.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Footprint of a single tile of the arena grid.
    #[must_use]
    pub fn of_tile(tile: TileCoord) -> Self {
        Self::from_min_size(tile.origin(), Vec2::splat(TILE_SIZE))
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner of the rectangle.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Returns the rectangle grown by `pad` on every side.
    #[must_use]
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(pad),
            max: self.max + Vec2::splat(pad),
        }
    }

    /// Point of the rectangle (edges included) nearest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Reports whether a circle strictly overlaps the rectangle.
    ///
    /// A circle that merely touches an edge does not overlap.
    #[must_use]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let offset = center - self.closest_point(center);
        offset.length_squared() < radius * radius
    }

    /// Reports whether the segment `start`-`end` crosses any of the four edges.
    ///
    /// A segment lying entirely inside the rectangle touches no edge and is
    /// therefore not reported.
    #[must_use]
    pub fn intersects_segment(&self, start: Vec2, end: Vec2) -> bool {
        let top_left = self.min;
        let top_right = Vec2::new(self.max.x, self.min.y);
        let bottom_left = Vec2::new(self.min.x, self.max.y);
        let bottom_right = self.max;

        segments_intersect(start, end, top_left, top_right)
            || segments_intersect(start, end, bottom_left, bottom_right)
            || segments_intersect(start, end, top_left, bottom_left)
            || segments_intersect(start, end, top_right, bottom_right)
    }
}

/// Parametric segment intersection test.
///
/// Solves for `t` and `u` along both segments and accepts the crossing when
/// both lie in `[0, 1]`. Parallel (and collinear) segments never intersect.
#[must_use]
pub fn segments_intersect(a_start: Vec2, a_end: Vec2, b_start: Vec2, b_end: Vec2) -> bool {
    let a = a_start - a_end;
    let b = b_start - b_end;
    let denominator = a.x * b.y - a.y * b.x;
    if denominator == 0.0 {
        return false;
    }

    let offset = a_start - b_start;
    let t = (offset.x * b.y - offset.y * b.x) / denominator;
    let u = -(a.x * offset.y - a.y * offset.x) / denominator;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Result of advancing an entity toward a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Position reached after the step.
    pub position: Vec2,
    /// Unit vector pointing from the starting position toward the target.
    pub facing: Vec2,
}

/// Moves `speed` world units from `position` toward `target`.
///
/// Returns `None` when the two points coincide, in which case no direction
/// exists and the caller must leave the entity untouched. The step may
/// overshoot the target when `speed` exceeds the remaining distance.
#[must_use]
pub fn step_towards(position: Vec2, target: Vec2, speed: f32) -> Option<Step> {
    let facing = (target - position).try_normalize()?;
    Some(Step {
        position: position + facing * speed,
        facing,
    })
}

/// Reports whether two circles of equal `radius` overlap.
#[must_use]
pub fn circles_overlap(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius * 2.0
}

/// Reports whether `offset` lies inside a forward cone.
///
/// The cone points along the unit vector `facing` and has the provided
/// `cos_half_angle`. Points on the boundary are inside; the origin itself is
/// inside every cone.
#[must_use]
pub fn within_cone(offset: Vec2, facing: Vec2, cos_half_angle: f32) -> bool {
    offset.dot(facing) >= cos_half_angle * offset.length()
}

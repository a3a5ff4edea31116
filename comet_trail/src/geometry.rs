// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trail seed geometry and the per-frame polygon builder.

use comet_caret::CaretRect;
use kurbo::{BezPath, Point};

/// Horizontal delta stored when a move had no horizontal component.
///
/// A literal zero would be indistinguishable from "not seeded" and would
/// collapse the trail into a zero-width polygon; this value turns a purely
/// vertical move into a narrow vertical flash instead.
pub const DIR_X_SENTINEL: f64 = 3.0;

/// Leading taper factor applied to the target edge.
const TARGET_TAPER: f64 = 0.15;
/// Reduced taper for the target corner that leans with vertical travel.
const LEAN_TAPER: f64 = 0.05;
/// Ratio below which the target edge has settled onto the caret.
const TARGET_SETTLE: f64 = 0.3;
/// Ratio offset for the origin corner that leans with vertical travel.
const LEAN_SETTLE: f64 = 0.02;

/// Seed geometry for one trail: where the caret is now and how it got there.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrailGeometry {
    /// Current caret x.
    pub x: f64,
    /// Current caret y.
    pub y: f64,
    /// Signed horizontal delta from the previous caret, or [`DIR_X_SENTINEL`].
    pub dir_x: f64,
    /// Signed vertical delta from the previous caret.
    pub dir_y: f64,
    /// Height of the new caret.
    pub ext_target: f64,
    /// Height of the previous caret.
    pub ext_origin: f64,
}

impl TrailGeometry {
    /// Geometry for a move from `from` to `to`.
    pub fn between(from: CaretRect, to: CaretRect) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        Self {
            x: to.x,
            y: to.y,
            dir_x: if dx == 0.0 { DIR_X_SENTINEL } else { dx },
            dir_y: dy,
            ext_target: to.height,
            ext_origin: from.height,
        }
    }

    /// Whether this seed came from a move with no horizontal component.
    pub fn is_vertical(&self) -> bool {
        self.dir_x == DIR_X_SENTINEL
    }

    /// Build the trail polygon for a decay `ratio` in `[0, 1)`.
    ///
    /// The polygon spans from the caret's current edge (the target side) back
    /// towards where it came from (the origin side). The target side tapers
    /// softly while the ratio is high; the origin side retracts with the ratio.
    /// Vertical travel makes one corner on each side lag so the shape leans
    /// in the direction of motion.
    pub fn polygon(&self, ratio: f64) -> TrailPolygon {
        let Self {
            x,
            y,
            dir_x,
            dir_y,
            ext_target,
            ext_origin,
        } = *self;

        let target_lag = |taper: f64| x - dir_x * taper * (ratio - TARGET_SETTLE).max(0.0);

        let mut target_x1 = target_lag(TARGET_TAPER);
        let mut target_x2 = target_x1;
        let mut origin_x1 = x - dir_x * ratio;
        let mut origin_x2 = origin_x1;

        if self.is_vertical() {
            target_x1 = x;
            target_x2 = x;
            origin_x1 = x - dir_x;
            origin_x2 = origin_x1;
        } else if dir_y < 0.0 {
            target_x2 = target_lag(LEAN_TAPER);
            origin_x1 = x - dir_x * (ratio - LEAN_SETTLE).max(0.0);
        } else if dir_y > 0.0 {
            target_x1 = target_lag(LEAN_TAPER);
            origin_x2 = x - dir_x * (ratio - LEAN_SETTLE).max(0.0);
        }

        let origin_y = y - dir_y * ratio;
        let origin_height = ext_target - (ext_target - ext_origin) * ratio;

        TrailPolygon {
            points: [
                Point::new(target_x1, y + ext_target),
                Point::new(target_x2, y),
                Point::new(origin_x1, origin_y),
                Point::new(origin_x2, origin_y + origin_height),
            ],
        }
    }
}

/// A closed four-point trail outline.
///
/// Points run target-bottom, target-top, origin-top, origin-bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrailPolygon {
    /// The outline's corners.
    pub points: [Point; 4],
}

impl TrailPolygon {
    /// The outline as a closed path, ready to fill.
    pub fn to_path(&self) -> BezPath {
        let [a, b, c, d] = self.points;
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.line_to(d);
        path.close_path();
        path
    }
}

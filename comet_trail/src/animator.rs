// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-counted trail decay.

use comet_caret::CaretRect;

use crate::geometry::{TrailGeometry, TrailPolygon};

/// What a single animation frame should do with the trail canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrailFrame {
    /// Nothing to do: no trail has been seeded since the last drain.
    Idle,
    /// Clear the canvas and fill this polygon.
    Draw {
        /// Outline for this frame.
        polygon: TrailPolygon,
        /// Remaining decay in `[0, 1)`.
        ratio: f64,
    },
    /// The trail just drained: clear the canvas once and reveal the caret.
    Finished,
}

/// Countdown state for one caret's trail.
///
/// [`Trail::seed`] arms the countdown and [`Trail::tick`] consumes one step
/// per frame. Termination is purely frame-count driven: the tick after the
/// countdown reaches zero reports [`TrailFrame::Finished`] exactly once, and
/// every later tick is [`TrailFrame::Idle`] until the next seed.
///
/// ```rust
/// use comet_caret::CaretRect;
/// use comet_trail::{Trail, TrailFrame};
///
/// let mut trail = Trail::new();
/// trail.seed(CaretRect::new(0.0, 0.0, 16.0), CaretRect::new(40.0, 0.0, 16.0), 3);
///
/// let mut draws = 0;
/// while let TrailFrame::Draw { .. } = trail.tick(3) {
///     draws += 1;
/// }
/// assert_eq!(draws, 3);
/// assert_eq!(trail.tick(3), TrailFrame::Idle);
/// ```
#[derive(Clone, Debug)]
pub struct Trail {
    geometry: TrailGeometry,
    countdown: u32,
    drained: bool,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

impl Trail {
    /// An idle trail with nothing to draw.
    pub const fn new() -> Self {
        Self {
            geometry: TrailGeometry {
                x: 0.0,
                y: 0.0,
                dir_x: 0.0,
                dir_y: 0.0,
                ext_target: 0.0,
                ext_origin: 0.0,
            },
            countdown: 0,
            drained: true,
        }
    }

    /// Seed a trail for a caret move from `from` to `to` lasting `steps` frames.
    pub fn seed(&mut self, from: CaretRect, to: CaretRect, steps: u32) {
        self.geometry = TrailGeometry::between(from, to);
        self.countdown = steps;
        self.drained = false;
    }

    /// Advance one frame with the current step count.
    pub fn tick(&mut self, steps: u32) -> TrailFrame {
        if self.countdown == 0 {
            if self.drained {
                return TrailFrame::Idle;
            }
            self.drained = true;
            return TrailFrame::Finished;
        }
        self.countdown -= 1;
        let ratio = f64::from(self.countdown) / f64::from(steps.max(1));
        TrailFrame::Draw {
            polygon: self.geometry.polygon(ratio),
            ratio,
        }
    }

    /// Keep the countdown within `[0, steps]` after the step count shrinks.
    pub fn clamp(&mut self, steps: u32) {
        self.countdown = self.countdown.min(steps);
    }

    /// Drop any in-flight trail without reporting a drain.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Frames left before the trail drains.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Whether a seeded trail has not yet reported [`TrailFrame::Finished`].
    pub fn is_active(&self) -> bool {
        !self.drained
    }

    /// The most recent seed.
    pub fn geometry(&self) -> &TrailGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn seeded(steps: u32) -> Trail {
        let mut trail = Trail::new();
        trail.seed(
            CaretRect::new(10.0, 20.0, 16.0),
            CaretRect::new(50.0, 20.0, 16.0),
            steps,
        );
        trail
    }

    #[test]
    fn new_trail_is_idle() {
        let mut trail = Trail::new();
        assert!(!trail.is_active());
        assert_eq!(trail.tick(30), TrailFrame::Idle);
    }

    #[test]
    fn exactly_n_draws_then_one_finish() {
        let steps = 30;
        let mut trail = seeded(steps);
        assert_eq!(trail.countdown(), steps);

        let mut ratios = Vec::new();
        for _ in 0..steps {
            match trail.tick(steps) {
                TrailFrame::Draw { ratio, .. } => ratios.push(ratio),
                other => panic!("expected a draw, got {other:?}"),
            }
        }
        assert_eq!(trail.countdown(), 0);
        assert!(ratios.windows(2).all(|w| w[1] < w[0]), "ratio must strictly decrease");
        assert!(ratios.iter().all(|r| (0.0..1.0).contains(r)));
        assert_eq!(ratios.last().copied(), Some(0.0));

        assert_eq!(trail.tick(steps), TrailFrame::Finished);
        assert_eq!(trail.tick(steps), TrailFrame::Idle);
        assert_eq!(trail.tick(steps), TrailFrame::Idle);
    }

    #[test]
    fn reseed_mid_flight_restarts_countdown() {
        let mut trail = seeded(10);
        for _ in 0..4 {
            trail.tick(10);
        }
        assert_eq!(trail.countdown(), 6);

        trail.seed(
            CaretRect::new(50.0, 20.0, 16.0),
            CaretRect::new(50.0, 60.0, 16.0),
            10,
        );
        assert_eq!(trail.countdown(), 10);
        assert!(trail.geometry().is_vertical());
    }

    #[test]
    fn clamp_keeps_countdown_in_range() {
        let mut trail = seeded(30);
        trail.clamp(5);
        assert_eq!(trail.countdown(), 5);
        trail.clamp(50);
        assert_eq!(trail.countdown(), 5);
    }

    #[test]
    fn reset_skips_the_finish() {
        let mut trail = seeded(3);
        trail.tick(3);
        trail.reset();
        assert_eq!(trail.countdown(), 0);
        assert_eq!(trail.tick(3), TrailFrame::Idle);
    }
}

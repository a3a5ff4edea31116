// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay canvas seam.

use kurbo::{BezPath, Size};

use crate::animator::TrailFrame;

/// A 2D canvas the trail is painted onto.
///
/// Hosts typically back this with an absolutely positioned canvas element
/// laid over the editor.
pub trait TrailSurface {
    /// Clear the whole canvas.
    fn clear(&mut self);

    /// Fill `path` with a CSS color. No stroke is drawn.
    fn fill(&mut self, path: &BezPath, color: &str);

    /// Resize the canvas backing store.
    fn resize(&mut self, size: Size);
}

/// Paint one frame onto `surface`.
///
/// Returns `true` when `frame` was the drain, so the caller can reveal the
/// caret glyph.
pub fn paint<S: TrailSurface + ?Sized>(surface: &mut S, frame: &TrailFrame, color: &str) -> bool {
    match frame {
        TrailFrame::Idle => false,
        TrailFrame::Draw { polygon, .. } => {
            surface.clear();
            surface.fill(&polygon.to_path(), color);
            false
        }
        TrailFrame::Finished => {
            surface.clear();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Trail;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use comet_caret::CaretRect;

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl TrailSurface for Recorder {
        fn clear(&mut self) {
            self.ops.push("clear".to_string());
        }

        fn fill(&mut self, _path: &BezPath, color: &str) {
            self.ops.push(alloc::format!("fill {color}"));
        }

        fn resize(&mut self, _size: Size) {
            self.ops.push("resize".to_string());
        }
    }

    #[test]
    fn draw_clears_then_fills() {
        let mut trail = Trail::new();
        trail.seed(CaretRect::ZERO, CaretRect::new(40.0, 0.0, 16.0), 2);
        let mut surface = Recorder::default();

        assert!(!paint(&mut surface, &trail.tick(2), "#78dce8"));
        assert_eq!(surface.ops, ["clear", "fill #78dce8"]);
    }

    #[test]
    fn finish_clears_once_and_reports() {
        let mut trail = Trail::new();
        trail.seed(CaretRect::ZERO, CaretRect::new(40.0, 0.0, 16.0), 1);
        let mut surface = Recorder::default();

        paint(&mut surface, &trail.tick(1), "red");
        surface.ops.clear();

        assert!(paint(&mut surface, &trail.tick(1), "red"));
        assert!(!paint(&mut surface, &trail.tick(1), "red"));
        assert_eq!(surface.ops, ["clear"]);
    }
}

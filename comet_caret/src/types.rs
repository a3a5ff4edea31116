// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: the resolved caret rectangle and pointer-drag bookkeeping.

use alloc::string::String;

use kurbo::{Rect, Vec2};

/// A caret position relative to the editor host's bounding box.
///
/// Coordinates already include page scroll offsets, so a caret placed from
/// this value tracks its line while the page scrolls.
///
/// [`CaretRect::ZERO`] is a *valid* caret at the origin. "No caret" is
/// represented by the reserved [`CaretRect::INVALID`] sentinel instead.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CaretRect {
    /// Left edge of the caret.
    pub x: f64,
    /// Top edge of the caret.
    pub y: f64,
    /// Caret height (the line box height at the caret).
    pub height: f64,
}

impl CaretRect {
    /// A valid caret at the editor origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Sentinel meaning "no valid caret": the overlay must hide.
    pub const INVALID: Self = Self::new(-1.0, -1.0, 0.0);

    /// Create a caret rectangle.
    pub const fn new(x: f64, y: f64, height: f64) -> Self {
        Self { x, y, height }
    }

    /// Returns `false` for [`CaretRect::INVALID`].
    ///
    /// Only the position is compared; a caret at `(-1, -1)` is never produced
    /// by a real layout, whatever its height.
    pub fn is_valid(&self) -> bool {
        !(self.x == -1.0 && self.y == -1.0)
    }

    /// Returns `true` if the position (not the height) differs from `other`.
    pub fn moved_from(&self, other: &Self) -> bool {
        self.x != other.x || self.y != other.y
    }

    /// Convert a client-space rectangle into editor space.
    ///
    /// The caret sits on the rectangle's leading edge unless `trailing` is
    /// set, in which case it sits on the trailing edge.
    pub fn from_client(rect: Rect, host: Rect, scroll: Vec2, trailing: bool) -> Self {
        let edge = if trailing { rect.width() } else { 0.0 };
        Self {
            x: rect.x0 + edge + scroll.x - host.x0,
            y: rect.y0 + scroll.y - host.y0,
            height: rect.height(),
        }
    }
}

/// Text content of the elements under the pointer at press time and during
/// the drag.
///
/// Used to decide whether a drag stayed inside a single table cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragTargets {
    /// Text content of the element that received the press.
    pub down: String,
    /// Text content of the element most recently dragged over.
    pub over: String,
}

/// Pointer-drag extremes.
///
/// The resolver only consults this to break left/right ties when a
/// rectangle is ambiguous (a collapsed range in a title or a table cell).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
    /// Client x at pointer down.
    pub down_x: f64,
    /// Client x at the last pointer move while pressed.
    pub move_x: f64,
    /// Caret y resolved at pointer down.
    pub down_y: f64,
    /// Caret y resolved at the last pointer move while pressed.
    pub move_y: f64,
    targets: Option<DragTargets>,
}

impl DragState {
    /// Create an empty drag state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer press at client `x` over an element with `target_text`.
    ///
    /// `move_x` is left untouched; it keeps the last drag's value until the
    /// pointer moves again.
    pub fn press(&mut self, x: f64, target_text: String) {
        self.down_x = x;
        self.targets = Some(DragTargets {
            down: target_text.clone(),
            over: target_text,
        });
    }

    /// Record a pointer move while pressed.
    pub fn drag_over(&mut self, x: f64, target_text: String) {
        self.move_x = x;
        match &mut self.targets {
            Some(targets) => targets.over = target_text,
            None => {
                self.targets = Some(DragTargets {
                    down: String::new(),
                    over: target_text,
                });
            }
        }
    }

    /// Whether the caret belongs on the leading edge of an ambiguous rectangle.
    ///
    /// True when the drag went left or did not move horizontally.
    pub fn leading_edge(&self) -> bool {
        self.move_x <= self.down_x
    }

    /// Whether the press and the latest drag target look like the same table cell.
    ///
    /// This compares text content, so two cells with identical contents are
    /// indistinguishable. With no recorded press it is trivially true.
    pub fn same_cell(&self) -> bool {
        self.targets.as_ref().is_none_or(|t| t.down == t.over)
    }

    /// The recorded press/drag targets, if any.
    pub fn targets(&self) -> Option<&DragTargets> {
        self.targets.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid_and_sentinel_is_not() {
        assert!(CaretRect::ZERO.is_valid());
        assert!(!CaretRect::INVALID.is_valid());
        assert!(!CaretRect::new(-1.0, -1.0, 12.0).is_valid());
        assert!(CaretRect::new(-1.0, 0.0, 0.0).is_valid());
    }

    #[test]
    fn client_rect_is_shifted_into_editor_space() {
        let host = Rect::new(100.0, 50.0, 900.0, 700.0);
        let rect = Rect::new(130.0, 70.0, 138.0, 86.0);
        let scroll = Vec2::new(0.0, 10.0);

        let leading = CaretRect::from_client(rect, host, scroll, false);
        assert_eq!(leading, CaretRect::new(30.0, 30.0, 16.0));

        let trailing = CaretRect::from_client(rect, host, scroll, true);
        assert_eq!(trailing, CaretRect::new(38.0, 30.0, 16.0));
    }

    #[test]
    fn moved_ignores_height() {
        let a = CaretRect::new(10.0, 20.0, 16.0);
        assert!(!CaretRect::new(10.0, 20.0, 30.0).moved_from(&a));
        assert!(CaretRect::new(11.0, 20.0, 16.0).moved_from(&a));
    }

    #[test]
    fn leading_edge_follows_drag_direction() {
        let mut drag = DragState::new();
        drag.press(50.0, String::from("cell"));
        assert!(drag.leading_edge(), "no movement picks the leading edge");

        drag.drag_over(80.0, String::from("cell"));
        assert!(!drag.leading_edge());

        drag.drag_over(20.0, String::from("cell"));
        assert!(drag.leading_edge());
    }

    #[test]
    fn same_cell_compares_text_content() {
        let mut drag = DragState::new();
        assert!(drag.same_cell(), "no press recorded");

        drag.press(0.0, String::from("a"));
        assert!(drag.same_cell());

        drag.drag_over(5.0, String::from("b"));
        assert!(!drag.same_cell());

        // Duplicate cell contents are indistinguishable.
        drag.drag_over(9.0, String::from("a"));
        assert!(drag.same_cell());
    }
}

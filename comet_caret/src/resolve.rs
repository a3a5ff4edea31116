// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position resolution: from raw geometry queries to a single caret rectangle.

use alloc::string::String;

use kurbo::Rect;

use crate::source::{GeometrySource, Markers, NodeKind, any_class};
use crate::types::{CaretRect, DragState};

/// The character shown inside a block-style caret, with its rendered size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGlyph {
    /// Character immediately after the caret.
    pub text: char,
    /// Computed font size of that character, as a CSS length.
    pub font_size: String,
}

/// Computes caret rectangles from a [`GeometrySource`].
///
/// Resolution is a pure query: the same source state always yields the same
/// rectangle, and nothing is written back to the host.
///
/// Decision order:
/// 1. Inside a title field, use the selection's client rectangle, picking its
///    leading or trailing edge from the drag direction.
/// 2. Otherwise ask the editor for the rectangle of the character at the caret.
/// 3. If that fails inside a table, measure a collapsed range at the selection
///    start or end (again by drag direction), provided the drag stayed in one
///    cell and the selection sits in a text node.
/// 4. If that fails outside a table (line ends, empty lines), map the offset
///    into the node tree and measure there: the last client rectangle of an
///    element, or a collapsed range inside a text node.
/// 5. Otherwise return [`CaretRect::INVALID`].
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    markers: Markers,
}

impl Resolver {
    /// Create a resolver that recognizes structure through `markers`.
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    /// The structural markers in use.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Whether the live selection sits inside the document title field.
    pub fn is_title_context<S: GeometrySource>(&self, source: &S) -> bool {
        let Some(range) = source.selection() else {
            return false;
        };
        any_class(source, &range.common_ancestor, |c| c == self.markers.title)
    }

    /// Resolve the caret rectangle in editor space.
    ///
    /// `host` is the editor host's client-space bounding box; `None` means the
    /// host is not in the document and always yields [`CaretRect::INVALID`].
    pub fn resolve<S: GeometrySource>(
        &self,
        source: &S,
        host: Option<Rect>,
        drag: &DragState,
        is_title: bool,
    ) -> CaretRect {
        let Some(host) = host else {
            return CaretRect::INVALID;
        };
        let scroll = source.scroll_offset();

        if is_title {
            return match source.selection_rect() {
                Some(rect) => CaretRect::from_client(rect, host, scroll, !drag.leading_edge()),
                None => CaretRect::INVALID,
            };
        }

        let Some(offset) = caret_offset(source) else {
            return CaretRect::INVALID;
        };

        if let Some(rect) = source.coords_for_char(offset) {
            return CaretRect::from_client(rect, host, scroll, false);
        }

        if self.in_table(source) {
            return match self.table_rect(source, drag) {
                Some((rect, trailing)) => CaretRect::from_client(rect, host, scroll, trailing),
                None => CaretRect::INVALID,
            };
        }

        match self.line_end_rect(source, offset) {
            Some(rect) => CaretRect::from_client(rect, host, scroll, false),
            None => CaretRect::INVALID,
        }
    }

    /// The character after the caret for block-caret display.
    ///
    /// Returns `None` inside a title field, at the end of a line, or at the end
    /// of the document.
    ///
    /// Lines are logical lines: a soft-wrapped line counts as one, so the
    /// glyph after a visual wrap point is the next character of the same line.
    pub fn block_glyph<S: GeometrySource>(&self, source: &S, is_title: bool) -> Option<BlockGlyph> {
        if is_title {
            return None;
        }
        let cursor = source.cursor()?;
        let span = source.line_span(cursor.line)?;
        let pos = span.start + cursor.ch.min(span.len());
        if pos >= span.end {
            return None;
        }
        let text = source.char_at(pos)?;
        let font_size = source.font_size_at(pos)?;
        Some(BlockGlyph { text, font_size })
    }

    fn in_table<S: GeometrySource>(&self, source: &S) -> bool {
        let Some(range) = source.selection() else {
            return false;
        };
        let table = self.markers.table.as_str();
        let mut node = Some(range.common_ancestor);
        while let Some(n) = node {
            if any_class(source, &n, |c| c.contains(table)) {
                return true;
            }
            node = source.parent(&n);
        }
        false
    }

    /// Returns the measured rectangle and whether the caret sits on its trailing edge.
    fn table_rect<S: GeometrySource>(&self, source: &S, drag: &DragState) -> Option<(Rect, bool)> {
        let range = source.selection()?;
        // A drag across cells has no single caret to place.
        if !drag.same_cell() || source.node_kind(&range.common_ancestor) != NodeKind::Text {
            return None;
        }
        let leading = drag.leading_edge();
        let offset = if leading {
            range.start_offset
        } else {
            range.end_offset
        };
        let rect = source.collapsed_range_rect(&range.common_ancestor, offset)?;
        Some((rect, !leading))
    }

    fn line_end_rect<S: GeometrySource>(&self, source: &S, offset: usize) -> Option<Rect> {
        let pos = source.dom_at_pos(offset)?;
        let container = self.markers.content_container.as_str();
        let at_top_level = source.parent(&pos.node).is_some_and(|p| {
            source.node_kind(&p) == NodeKind::Element
                && source
                    .class_names(&p)
                    .split_ascii_whitespace()
                    .any(|c| c == container)
        });
        if at_top_level {
            return None;
        }
        match source.node_kind(&pos.node) {
            // The last rectangle covers trailing block boundaries.
            NodeKind::Element => source.client_rects(&pos.node).last().copied(),
            NodeKind::Text => source
                .collapsed_range_rect(&pos.node, pos.offset)
                .filter(|r| r.width() != 0.0 || r.height() != 0.0),
            NodeKind::Other => None,
        }
    }
}

fn caret_offset<S: GeometrySource>(source: &S) -> Option<usize> {
    let cursor = source.cursor()?;
    let span = source.line_span(cursor.line)?;
    Some(span.start + cursor.ch)
}

// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry source seam and the structural markers the resolver looks for.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Rect, Vec2};

/// Coarse classification of a document node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An element node (has a class list and client rectangles).
    Element,
    /// A text node (measured by synthesizing a collapsed range inside it).
    Text,
    /// Anything else (comments, documents, fragments).
    Other,
}

/// Editor caret in line/column form. Both fields are zero-based.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineCol {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column within the line, in characters.
    pub ch: usize,
}

/// The live selection range as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionRange<N> {
    /// Deepest node containing both ends of the range.
    pub common_ancestor: N,
    /// Offset of the range start inside its container.
    pub start_offset: usize,
    /// Offset of the range end inside its container.
    pub end_offset: usize,
}

/// A document offset mapped into the node tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomPosition<N> {
    /// Node that holds the position.
    pub node: N,
    /// Offset inside `node` (characters for text, children for elements).
    pub offset: usize,
}

/// Thin query layer over the host's selection API and the editor's internal
/// coordinate lookups.
///
/// Every method is a read-only query that may come back empty; the resolver
/// owns all fallback policy. Rectangles are in client space (relative to the
/// viewport, before page scroll).
pub trait GeometrySource {
    /// Handle to a node in the host's document tree.
    type Node: Clone + PartialEq;

    /// Classify `node`.
    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    /// Parent of `node`, or `None` at the root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Space-separated class list of an element; empty for other nodes.
    fn class_names(&self, node: &Self::Node) -> Cow<'_, str>;

    /// Current page scroll offset.
    fn scroll_offset(&self) -> Vec2;

    /// The first range of the live selection.
    fn selection(&self) -> Option<SelectionRange<Self::Node>>;

    /// First client rectangle of the live selection range.
    fn selection_rect(&self) -> Option<Rect>;

    /// The editor's caret as line/column.
    fn cursor(&self) -> Option<LineCol>;

    /// Document offsets spanned by a zero-based line, excluding the line break.
    fn line_span(&self, line: usize) -> Option<Range<usize>>;

    /// The character starting at document `offset`.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// The editor's own rectangle for the character at `offset`.
    ///
    /// Editors commonly fail this lookup at line ends and on empty lines.
    fn coords_for_char(&self, offset: usize) -> Option<Rect>;

    /// Map a document offset into the node tree.
    fn dom_at_pos(&self, offset: usize) -> Option<DomPosition<Self::Node>>;

    /// Client rectangles of an element, in layout order.
    fn client_rects(&self, node: &Self::Node) -> Vec<Rect>;

    /// Bounding rectangle of a collapsed range placed at `offset` inside `node`.
    fn collapsed_range_rect(&self, node: &Self::Node, offset: usize) -> Option<Rect>;

    /// Computed font size (a CSS length such as `"16px"`) of the text rendered
    /// at document `offset`.
    fn font_size_at(&self, offset: usize) -> Option<String>;
}

/// Class and node-name markers that identify structurally interesting parts
/// of the host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    /// Class of the editable document title field.
    pub title: String,
    /// Substring that marks any table-related class.
    pub table: String,
    /// Class of the editor's content container.
    pub content_container: String,
    /// Class of wrapper nodes the host churns while editing tables.
    pub table_cell_wrapper: String,
    /// Class of the modal dialog container in the application shell.
    pub modal_container: String,
    /// Node name of line breaks.
    pub line_break: String,
    /// Node name of the modal dialog container.
    pub modal_node: String,
    /// Content signature of the stylesheet that carries caret position.
    pub caret_carrier: String,
    /// Content signature of the stylesheet that carries block-caret font size.
    pub block_carrier: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            title: "inline-title".into(),
            table: "table".into(),
            content_container: "cm-contentContainer".into(),
            table_cell_wrapper: "table-cell-wrapper".into(),
            modal_container: "modal-container".into(),
            line_break: "BR".into(),
            modal_node: "DIV".into(),
            caret_carrier: "smooth-cursor-busyo".into(),
            block_carrier: "vim-text".into(),
        }
    }
}

/// Returns `true` if any class on `node` (or, for a text node, on its parent
/// element) satisfies `pred`.
pub(crate) fn any_class<S: GeometrySource>(
    source: &S,
    node: &S::Node,
    mut pred: impl FnMut(&str) -> bool,
) -> bool {
    match source.node_kind(node) {
        NodeKind::Element => source.class_names(node).split_ascii_whitespace().any(&mut pred),
        NodeKind::Text => source.parent(node).is_some_and(|p| {
            source.node_kind(&p) == NodeKind::Element
                && source.class_names(&p).split_ascii_whitespace().any(&mut pred)
        }),
        NodeKind::Other => false,
    }
}

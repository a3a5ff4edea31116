// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host that records everything the engine does to it.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use comet_caret::{DomPosition, GeometrySource, LineCol, NodeKind, SelectionRange};
use comet_trail::TrailSurface;
use kurbo::{BezPath, Rect, Size, Vec2};

use crate::host::{DocumentId, Host, Overlay, OverlayFlags, SessionId};

pub(crate) const CARET_SHEET: &str =
    ".smooth-cursor-busyo { --cursor-x: 0; --cursor-y: 0; --cursor-height: 0; }";
pub(crate) const BLOCK_SHEET: &str = ".vim-text { --vim-font-size: 14px; }";

/// Editor host elements all share these client bounds.
pub(crate) const EDITOR_BOUNDS: Rect = Rect::new(100.0, 40.0, 900.0, 640.0);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SurfaceOp {
    Clear,
    Fill(String),
    Resize(Size),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct OverlayRecord {
    pub(crate) session: Option<SessionId>,
    pub(crate) flags: OverlayFlags,
    pub(crate) block_text: String,
    pub(crate) ops: Vec<SurfaceOp>,
    pub(crate) removed: bool,
}

type Records = Rc<RefCell<Vec<OverlayRecord>>>;

#[derive(Debug)]
pub(crate) struct FakeSurface {
    records: Records,
    index: usize,
}

impl FakeSurface {
    fn push(&self, op: SurfaceOp) {
        self.records.borrow_mut()[self.index].ops.push(op);
    }
}

impl TrailSurface for FakeSurface {
    fn clear(&mut self) {
        self.push(SurfaceOp::Clear);
    }

    fn fill(&mut self, _path: &BezPath, color: &str) {
        self.push(SurfaceOp::Fill(color.to_owned()));
    }

    fn resize(&mut self, size: Size) {
        self.push(SurfaceOp::Resize(size));
    }
}

#[derive(Debug)]
pub(crate) struct FakeOverlay {
    surface: FakeSurface,
}

impl FakeOverlay {
    fn with_record<R>(&self, f: impl FnOnce(&mut OverlayRecord) -> R) -> R {
        f(&mut self.surface.records.borrow_mut()[self.surface.index])
    }
}

impl Overlay for FakeOverlay {
    type Surface = FakeSurface;

    fn apply_flags(&mut self, flags: OverlayFlags) {
        self.with_record(|r| r.flags = flags);
    }

    fn set_block_text(&mut self, text: &str) {
        self.with_record(|r| r.block_text = text.to_owned());
    }

    fn surface(&mut self) -> &mut FakeSurface {
        &mut self.surface
    }

    fn is_attached(&self) -> bool {
        self.with_record(|r| !r.removed)
    }

    fn remove(&mut self) {
        self.with_record(|r| r.removed = true);
    }
}

#[derive(Debug)]
pub(crate) struct FakeHost {
    pub(crate) editors: HashMap<DocumentId, u32>,
    pub(crate) open: Vec<DocumentId>,
    pub(crate) viewport: Size,
    pub(crate) cursor: Option<LineCol>,
    pub(crate) char_rect: Option<Rect>,
    pub(crate) next_char: Option<char>,
    pub(crate) font_size: Option<String>,
    pub(crate) block_caret: bool,
    pub(crate) styles: Vec<String>,
    pub(crate) style_writes: usize,
    pub(crate) native_caret_hidden: bool,
    pub(crate) bound: Vec<SessionId>,
    pub(crate) shell_observing: bool,
    overlays: Records,
}

impl FakeHost {
    /// A host with one editor per document, all open, and both carriers present.
    pub(crate) fn with_documents(documents: &[&str]) -> Self {
        let editors = documents
            .iter()
            .zip(1..)
            .map(|(d, node)| (DocumentId::from(*d), node))
            .collect();
        Self {
            editors,
            open: documents.iter().map(|d| DocumentId::from(*d)).collect(),
            viewport: Size::new(800.0, 600.0),
            cursor: Some(LineCol { line: 0, ch: 0 }),
            char_rect: None,
            next_char: None,
            font_size: Some("16px".into()),
            block_caret: false,
            styles: vec![CARET_SHEET.into(), BLOCK_SHEET.into()],
            style_writes: 0,
            native_caret_hidden: false,
            bound: Vec::new(),
            shell_observing: false,
            overlays: Rc::default(),
        }
    }

    /// Place the caret at `(x, y)` in editor space with the given height.
    pub(crate) fn caret_at(&mut self, x: f64, y: f64, height: f64) {
        let left = EDITOR_BOUNDS.x0 + x;
        let top = EDITOR_BOUNDS.y0 + y;
        self.char_rect = Some(Rect::new(left, top, left, top + height));
    }

    /// Snapshot of the overlay created for `session`.
    pub(crate) fn overlay(&self, session: SessionId) -> OverlayRecord {
        self.overlays
            .borrow()
            .iter()
            .find(|r| r.session == Some(session))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn caret_sheet(&self) -> &str {
        &self.styles[0]
    }

    pub(crate) fn block_sheet(&self) -> &str {
        &self.styles[1]
    }
}

impl GeometrySource for FakeHost {
    type Node = u32;

    fn node_kind(&self, _node: &u32) -> NodeKind {
        NodeKind::Element
    }

    fn parent(&self, _node: &u32) -> Option<u32> {
        None
    }

    fn class_names(&self, _node: &u32) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn selection(&self) -> Option<SelectionRange<u32>> {
        None
    }

    fn selection_rect(&self) -> Option<Rect> {
        None
    }

    fn cursor(&self) -> Option<LineCol> {
        self.cursor
    }

    fn line_span(&self, _line: usize) -> Option<Range<usize>> {
        Some(0..80)
    }

    fn char_at(&self, _offset: usize) -> Option<char> {
        self.next_char
    }

    fn coords_for_char(&self, _offset: usize) -> Option<Rect> {
        self.char_rect
    }

    fn dom_at_pos(&self, _offset: usize) -> Option<DomPosition<u32>> {
        None
    }

    fn client_rects(&self, _node: &u32) -> Vec<Rect> {
        Vec::new()
    }

    fn collapsed_range_rect(&self, _node: &u32, _offset: usize) -> Option<Rect> {
        None
    }

    fn font_size_at(&self, _offset: usize) -> Option<String> {
        self.font_size.clone()
    }
}

impl Host for FakeHost {
    type Overlay = FakeOverlay;
    type Binding = SessionId;
    type ShellObserver = ();
    type Style = usize;

    fn editor_for(&self, document: &DocumentId) -> Option<u32> {
        self.editors.get(document).copied()
    }

    fn editor_bounds(&self, _editor: &u32) -> Option<Rect> {
        Some(EDITOR_BOUNDS)
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn open_documents(&self) -> Vec<DocumentId> {
        self.open.clone()
    }

    fn create_overlay(&mut self, _editor: &u32, session: SessionId) -> FakeOverlay {
        let mut records = self.overlays.borrow_mut();
        records.push(OverlayRecord {
            session: Some(session),
            ..OverlayRecord::default()
        });
        FakeOverlay {
            surface: FakeSurface {
                records: Rc::clone(&self.overlays),
                index: records.len() - 1,
            },
        }
    }

    fn bind(&mut self, _editor: &u32, session: SessionId) -> SessionId {
        self.bound.push(session);
        session
    }

    fn unbind(&mut self, binding: SessionId) {
        self.bound.retain(|s| *s != binding);
    }

    fn observe_shell(&mut self) {
        self.shell_observing = true;
    }

    fn disconnect_shell(&mut self, _observer: ()) {
        self.shell_observing = false;
    }

    fn find_style(&self, signature: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.contains(signature))
    }

    fn style_text(&self, style: &usize) -> Option<String> {
        self.styles.get(*style).cloned()
    }

    fn set_style_text(&mut self, style: &usize, text: String) {
        self.style_writes += 1;
        self.styles[*style] = text;
    }

    fn set_native_caret_hidden(&mut self, hidden: bool) {
        self.native_caret_hidden = hidden;
    }

    fn block_caret_active(&self) -> bool {
        self.block_caret
    }
}

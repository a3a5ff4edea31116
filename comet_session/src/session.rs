// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-document overlay state.

use core::fmt;

use comet_caret::{CaretRect, DragState};
use comet_trail::Trail;

use crate::host::{DocumentId, Host, Overlay, OverlayFlags, SessionId};

/// Lifecycle of one document slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session exists for the document (never created, or init is pending).
    Uninitialized,
    /// Overlay nodes, listeners, and observers are live.
    Initialized,
    /// The session was torn down; a later open re-initializes from scratch.
    TornDown,
}

/// Overlay state for one open document.
///
/// Everything a document's caret needs lives in this one aggregate: the host
/// handles, the last resolved caret, the trail, and the per-session input
/// flags. Sessions never share state.
pub struct Session<H: Host> {
    pub(crate) id: SessionId,
    pub(crate) document: DocumentId,
    pub(crate) editor: H::Node,
    pub(crate) overlay: H::Overlay,
    pub(crate) binding: H::Binding,
    pub(crate) last_pos: CaretRect,
    pub(crate) trail: Trail,
    pub(crate) first_trail: bool,
    pub(crate) flags: OverlayFlags,
    pub(crate) focused: bool,
    pub(crate) mouse_down: bool,
    pub(crate) dom_changed: bool,
    pub(crate) drag: DragState,
}

impl<H: Host> fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("document", &self.document)
            .field("last_pos", &self.last_pos)
            .field("trail", &self.trail)
            .field("first_trail", &self.first_trail)
            .field("flags", &self.flags)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Session<H> {
    pub(crate) fn new(
        id: SessionId,
        document: DocumentId,
        editor: H::Node,
        overlay: H::Overlay,
        binding: H::Binding,
    ) -> Self {
        Self {
            id,
            document,
            editor,
            overlay,
            binding,
            last_pos: CaretRect::ZERO,
            trail: Trail::new(),
            first_trail: true,
            flags: OverlayFlags::empty(),
            focused: true,
            mouse_down: false,
            dom_changed: false,
            drag: DragState::new(),
        }
    }

    /// Slot index of this session.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Document this session belongs to.
    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    /// The editor host element.
    pub fn editor(&self) -> &H::Node {
        &self.editor
    }

    /// The overlay nodes.
    pub fn overlay(&self) -> &H::Overlay {
        &self.overlay
    }

    /// Last valid caret; [`CaretRect::ZERO`] until the first resolve.
    pub fn last_pos(&self) -> CaretRect {
        self.last_pos
    }

    /// Trail countdown and seed.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Whether the next seed will be swallowed (no trail right after creation).
    pub fn is_first_trail(&self) -> bool {
        self.first_trail
    }

    /// Current overlay presentation flags.
    pub fn flags(&self) -> OverlayFlags {
        self.flags
    }

    /// Whether this session's editor has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether a content mutation is waiting for its delayed resolve.
    pub fn is_dom_changed(&self) -> bool {
        self.dom_changed
    }

    /// Pointer-drag bookkeeping.
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Seed a trail from the last position to `to`.
    ///
    /// The first seed after creation only reveals the caret, so opening a
    /// document does not draw a trail from the origin. Returns `true` if a
    /// trail was started.
    pub(crate) fn seed_trail(&mut self, to: CaretRect, steps: u32) -> bool {
        if self.first_trail {
            self.first_trail = false;
            self.flags.insert(OverlayFlags::SHOW);
            return false;
        }
        self.trail.seed(self.last_pos, to, steps);
        self.flags.remove(OverlayFlags::SHOW);
        true
    }

    pub(crate) fn apply_flags(&mut self) {
        self.overlay.apply_flags(self.flags);
    }

    pub(crate) fn hide(&mut self) {
        self.focused = false;
        self.flags.remove(OverlayFlags::SHOW);
        self.apply_flags();
    }
}

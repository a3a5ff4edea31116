// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seams between the engine and the host application.

use core::fmt;

use comet_caret::GeometrySource;
use comet_trail::TrailSurface;
use kurbo::{Rect, Size};

/// Identity of an open document (its file path).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a document path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The document path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Slot index of a session. Assigned monotonically and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags::bitflags! {
    /// Presentation state of a caret overlay element.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OverlayFlags: u8 {
        /// The caret glyph is visible.
        const SHOW          = 0b0000_0001;
        /// Position changes apply instantly instead of transitioning.
        const NO_TRANSITION = 0b0000_0010;
        /// Blink and other caret animations are suspended.
        const NO_ANIMATION  = 0b0000_0100;
    }
}

/// Input events a host forwards from listeners scoped to an editor.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary pointer pressed.
    PointerDown {
        /// Client x of the pointer.
        x: f64,
        /// Text content of the element under the pointer.
        target_text: String,
    },
    /// Pointer moved (only meaningful while pressed).
    PointerMove {
        /// Client x of the pointer.
        x: f64,
        /// Text content of the element under the pointer.
        target_text: String,
    },
    /// Primary pointer released.
    PointerUp,
    /// A key was pressed.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// IME composition started.
    CompositionStart,
    /// IME composition text changed.
    CompositionUpdate,
    /// IME composition committed or cancelled.
    CompositionEnd,
    /// The editor's scroller scrolled.
    Scroll,
}

/// The overlay nodes the engine appends to an editor host: the caret
/// element, its block-caret text node, and the trail canvas.
pub trait Overlay {
    /// The trail canvas.
    type Surface: TrailSurface;

    /// Reflect `flags` onto the caret element.
    fn apply_flags(&mut self, flags: OverlayFlags);

    /// Set the text shown inside a block caret.
    fn set_block_text(&mut self, text: &str);

    /// The trail canvas.
    fn surface(&mut self) -> &mut Self::Surface;

    /// Whether the canvas is still in the document.
    fn is_attached(&self) -> bool;

    /// Remove every overlay node from the document.
    fn remove(&mut self);
}

/// The host application as seen by the engine.
///
/// The host owns every DOM node. The engine only keeps the handles returned
/// here and promises to hand them back for teardown.
pub trait Host: GeometrySource {
    /// Overlay nodes created for one session.
    type Overlay: Overlay;
    /// Input listeners and the content observer attached for one session.
    type Binding;
    /// Observer watching the application shell for modal dialogs.
    type ShellObserver;
    /// Handle to a stylesheet node.
    type Style: Clone;

    /// The editor host element showing `document`, if it is in the DOM.
    fn editor_for(&self, document: &DocumentId) -> Option<Self::Node>;

    /// Client-space bounding box of an editor host element.
    fn editor_bounds(&self, editor: &Self::Node) -> Option<Rect>;

    /// Size of the viewport, used to size trail canvases.
    fn viewport_size(&self) -> Size;

    /// Documents currently open in any pane.
    fn open_documents(&self) -> Vec<DocumentId>;

    /// Append overlay nodes to `editor`.
    fn create_overlay(&mut self, editor: &Self::Node, session: SessionId) -> Self::Overlay;

    /// Attach input listeners and start the content observer for `editor`.
    fn bind(&mut self, editor: &Self::Node, session: SessionId) -> Self::Binding;

    /// Detach listeners and disconnect the content observer.
    fn unbind(&mut self, binding: Self::Binding);

    /// Start observing the application shell.
    fn observe_shell(&mut self) -> Self::ShellObserver;

    /// Stop observing the application shell.
    fn disconnect_shell(&mut self, observer: Self::ShellObserver);

    /// A stylesheet whose text contains `signature`.
    fn find_style(&self, signature: &str) -> Option<Self::Style>;

    /// Current text of a stylesheet.
    fn style_text(&self, style: &Self::Style) -> Option<String>;

    /// Replace the text of a stylesheet.
    fn set_style_text(&mut self, style: &Self::Style, text: String);

    /// Hide or restore the platform's native caret.
    fn set_native_caret_hidden(&mut self, hidden: bool);

    /// Whether the editor is drawing a block-style caret.
    fn block_caret_active(&self) -> bool;
}

// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comet Caret: caret rectangle resolution for a custom caret overlay.
//!
//! Rich text surfaces rarely offer one reliable "where is the caret" API.
//! Editor coordinate lookups fail at line ends and on empty lines, table
//! widgets and title fields live outside the editor's model, and collapsed
//! ranges report zero-width rectangles whose correct edge depends on how the
//! user got there. This crate funnels all of those sources through one pure
//! query.
//!
//! - [`GeometrySource`]: the thin, read-only seam over the host's selection
//!   API and the editor's coordinate lookups. Every query may come back empty.
//! - [`Resolver`]: applies fallbacks per document shape and returns a
//!   [`CaretRect`] in editor space, or [`CaretRect::INVALID`].
//! - [`DragState`]: pointer-drag extremes used only to break left/right ties.
//! - [`Markers`]: the class and node-name markers that identify titles,
//!   tables, the content container, and the stylesheet carriers.
//!
//! ## Minimal example
//!
//! ```rust
//! use comet_caret::{CaretRect, DragState};
//! use kurbo::{Rect, Vec2};
//!
//! let host = Rect::new(100.0, 40.0, 900.0, 640.0);
//! let glyph = Rect::new(130.0, 60.0, 138.0, 76.0);
//!
//! // A press followed by a drag to the right puts the caret on the trailing edge.
//! let mut drag = DragState::new();
//! drag.press(120.0, String::new());
//! drag.drag_over(160.0, String::new());
//!
//! let caret = CaretRect::from_client(glyph, host, Vec2::ZERO, !drag.leading_edge());
//! assert_eq!(caret, CaretRect::new(38.0, 20.0, 16.0));
//! assert!(caret.is_valid());
//! assert!(!CaretRect::INVALID.is_valid());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod resolve;
mod source;
mod types;

pub use resolve::{BlockGlyph, Resolver};
pub use source::{DomPosition, GeometrySource, LineCol, Markers, NodeKind, SelectionRange};
pub use types::{CaretRect, DragState, DragTargets};

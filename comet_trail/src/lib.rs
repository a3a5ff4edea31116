// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comet Trail: a decaying "comet" trail behind a moving caret.
//!
//! Each caret move seeds a [`TrailGeometry`] from the previous and current
//! caret rectangles. A [`Trail`] then counts down one step per animation frame;
//! every step yields a tapered four-point [`TrailPolygon`] that retracts
//! towards the caret as the decay ratio falls to zero.
//!
//! - [`TrailGeometry::between`] pins the horizontal delta to
//!   [`DIR_X_SENTINEL`] for purely vertical moves, so those render as a
//!   narrow vertical flash instead of a zero-width polygon.
//! - [`Trail::tick`] is purely frame-count driven. There is no completion
//!   callback: the tick after the countdown hits zero reports
//!   [`TrailFrame::Finished`] once.
//! - [`TrailSurface`] is the canvas seam and [`paint`] applies a frame to it.
//!
//! Geometry is pure and can be tested without a rendering surface:
//!
//! ```rust
//! use comet_caret::CaretRect;
//! use comet_trail::{DIR_X_SENTINEL, TrailGeometry};
//!
//! let geo = TrailGeometry::between(
//!     CaretRect::new(10.0, 20.0, 16.0),
//!     CaretRect::new(10.0, 40.0, 16.0),
//! );
//! assert_eq!(geo.dir_x, DIR_X_SENTINEL);
//! assert_eq!(geo.dir_y, 20.0);
//!
//! // Halfway through the decay the origin edge sits halfway back.
//! let poly = geo.polygon(0.5);
//! assert_eq!(poly.points[2].y, 30.0);
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

mod animator;
mod geometry;
mod surface;

pub use animator::{Trail, TrailFrame};
pub use geometry::{DIR_X_SENTINEL, TrailGeometry, TrailPolygon};
pub use surface::{TrailSurface, paint};

// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comet Session: per-document caret overlay sessions.
//!
//! This crate ties the caret resolver from `comet_caret` and the trail from
//! `comet_trail` to a host application. A [`CaretEngine`] owns one
//! [`Session`] per open document and keeps them strictly isolated: each has
//! its own overlay nodes, last caret position, trail, and input flags.
//!
//! The host implements [`Host`] (and, through it, the read-only geometry
//! queries of [`comet_caret::GeometrySource`]) and forwards its events:
//!
//! - document lifecycle and focus changes;
//! - input from listeners scoped to each editor, as [`InputEvent`]s;
//! - mutation-observer batches, as [`MutationRecord`]s;
//! - one [`CaretEngine::frame`] call per animation frame.
//!
//! Each position update resolves the caret, rewrites the numeric custom
//! properties in the external style carrier (see [`carrier`]), toggles the
//! overlay's [`OverlayFlags`], and seeds a trail when the caret moved. Work
//! that must wait for the host's layout (session creation, carrier discovery,
//! post-mutation resolves) is queued on a frame scheduler and coalesced.
//!
//! ## Configuration
//!
//! [`Config`] is persisted by the host as camelCase JSON. Missing fields fall
//! back to their defaults:
//!
//! ```rust
//! use comet_session::{Config, Theme};
//!
//! let config = Config::from_json(r##"{ "trailStep": 12, "trailColorDark": "#222" }"##).unwrap();
//! assert_eq!(config.trail_step, 12);
//! assert!(config.enable_trail);
//! assert_eq!(config.trail_color_for(Theme::Light), "#78dce8");
//! assert_eq!(config.trail_color_for(Theme::Dark), "#222");
//!
//! assert!(Config::from_json(r#"{ "trailStep": 0 }"#).is_err());
//! ```
//!
//! ## Mutation filtering
//!
//! ```rust
//! use comet_caret::Markers;
//! use comet_session::{MutatedNode, MutationRecord, content_changed};
//!
//! let markers = Markers::default();
//! let churn = [MutationRecord::added([MutatedNode::element("BR", "")])];
//! assert!(!content_changed(&churn, &markers));
//!
//! let edit = [MutationRecord::removed([MutatedNode::element("DIV", "cm-line")])];
//! assert!(content_changed(&edit, &markers));
//! ```
//!
//! ## Logging
//!
//! Lifecycle transitions are reported through `tracing`: `info` for session
//! creation and teardown, `warn` when a session cannot be created, `debug` for
//! carrier discovery and modal transitions, and `trace` for every resolve.

pub mod carrier;
mod config;
mod engine;
mod error;
mod host;
mod mutation;
mod session;

#[cfg(test)]
mod fake;

pub use config::{Config, Theme};
pub use engine::{
    ANIMATION_RESTORE_FRAMES, CARRIER_DISCOVERY_FRAMES, CaretEngine, INIT_DELAY_FRAMES,
    SETTLE_FRAMES,
};
pub use error::{EngineError, Result};
pub use host::{DocumentId, Host, InputEvent, Overlay, OverlayFlags, SessionId};
pub use mutation::{
    ModalChange, MutatedNode, MutationKind, MutationRecord, content_changed, modal_change,
};
pub use session::{Session, SessionState};

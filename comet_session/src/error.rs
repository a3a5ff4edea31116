// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for the session layer.

use crate::host::{DocumentId, SessionId};

/// Convenience result type used across the session layer.
pub type Result<T, E = EngineError> = core::result::Result<T, E>;

/// Errors surfaced by [`CaretEngine`](crate::CaretEngine) operations.
///
/// None of these are fatal. Internally scheduled work logs and absorbs them;
/// they are only returned from calls a host makes directly.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The editor host element for a document is not in the DOM yet.
    #[error("no editor host found for document `{document}`")]
    MissingHost {
        /// Document whose session could not be created.
        document: DocumentId,
    },

    /// An operation named a session that is not live.
    #[error("no live caret session {0}")]
    UnknownSession(SessionId),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persisted configuration could not be parsed.
    #[error("configuration could not be parsed: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    /// Build an [`EngineError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

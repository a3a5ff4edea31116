// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-facing configuration supplied by the external settings store.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Color scheme of the host application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

/// Caret overlay configuration.
///
/// Field names are camelCase on the wire and every field is optional there:
/// a partially persisted object is merged over [`Config::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Frames a trail takes to decay. Higher is slower. Must be positive.
    pub trail_step: u32,
    /// Whether caret moves leave a trail.
    pub enable_trail: bool,
    /// Trail fill color for light themes.
    pub trail_color: String,
    /// Trail fill color for dark themes.
    pub trail_color_dark: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trail_step: 30,
            enable_trail: true,
            trail_color: "#78dce8".into(),
            trail_color_dark: "#78dce8".into(),
        }
    }
}

impl Config {
    /// Parse persisted settings, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize for the settings store.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values the engine cannot animate with.
    pub fn validate(&self) -> Result<()> {
        if self.trail_step == 0 {
            return Err(EngineError::invalid_config("trailStep must be positive"));
        }
        Ok(())
    }

    /// Trail fill color for `theme`.
    pub fn trail_color_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.trail_color,
            Theme::Dark => &self.trail_color_dark,
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration.

use crate::error::{ParseError, Result};

/// When the combined A+B channel emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinedEmission {
    /// Recompute and emit on every button edge, even if the combined value
    /// did not change.
    #[default]
    EveryEdge,
    /// Emit only when the combined value differs from the last one emitted.
    OnChange,
}

/// Configuration of a simulated device.
///
/// # Examples
///
/// ```
/// use microbit_sim::config::{CombinedEmission, DeviceConfig};
///
/// let config = DeviceConfig::default()
///     .with_friendly_name("Desk board")
///     .with_combined_emission(CombinedEmission::OnChange);
///
/// let json = r#"{ "friendly_name": "Desk board", "combined_emission": "on_change" }"#;
/// assert_eq!(DeviceConfig::from_json(json).unwrap(), config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Optional friendly name, used in log fields.
    pub friendly_name: Option<String>,
    /// Emission policy of the combined A+B channel.
    pub combined_emission: CombinedEmission,
}

impl DeviceConfig {
    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the emission policy of the combined A+B channel.
    #[must_use]
    pub fn with_combined_emission(mut self, policy: CombinedEmission) -> Self {
        self.combined_emission = policy;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the document is not valid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ParseError::from(e).into())
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ParseError::from(e).into())
    }
}

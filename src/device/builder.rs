// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device builder.

use crate::config::{CombinedEmission, DeviceConfig};
use crate::device::Device;
use crate::event::DeviceId;

/// Builder for creating simulated devices.
///
/// # Examples
///
/// ```
/// use microbit_sim::Device;
/// use microbit_sim::config::CombinedEmission;
///
/// let device = Device::builder()
///     .with_friendly_name("Left board")
///     .with_combined_emission(CombinedEmission::OnChange)
///     .build();
///
/// assert_eq!(device.friendly_name(), Some("Left board"));
/// ```
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    config: DeviceConfig,
    id: Option<DeviceId>,
}

impl DeviceBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_friendly_name(name);
        self
    }

    /// Sets the emission policy of the combined A+B channel.
    #[must_use]
    pub fn with_combined_emission(mut self, policy: CombinedEmission) -> Self {
        self.config = self.config.with_combined_emission(policy);
        self
    }

    /// Uses a fixed identifier instead of a random one.
    #[must_use]
    pub fn with_id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Builds the device. Both buttons start released.
    #[must_use]
    pub fn build(self) -> Device {
        let id = self.id.unwrap_or_default();
        tracing::debug!(
            device = %id,
            name = ?self.config.friendly_name,
            combined_emission = ?self.config.combined_emission,
            "Creating device"
        );
        Device::from_parts(id, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build() {
        let device = DeviceBuilder::new().build();
        assert_eq!(device.config(), &DeviceConfig::default());
        assert!(device.friendly_name().is_none());
    }

    #[test]
    fn fixed_id() {
        let id = DeviceId::new();
        let device = DeviceBuilder::new().with_id(id).build();
        assert_eq!(device.id(), id);
    }

    #[test]
    fn with_config_then_override() {
        let config = DeviceConfig::default().with_friendly_name("first");
        let device = DeviceBuilder::new()
            .with_config(config)
            .with_combined_emission(CombinedEmission::OnChange)
            .build();

        assert_eq!(device.friendly_name(), Some("first"));
        assert_eq!(device.config().combined_emission, CombinedEmission::OnChange);
    }
}

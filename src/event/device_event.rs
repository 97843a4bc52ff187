// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::{Acceleration, ButtonId, CompassHeading, DisplayPattern};

use super::DeviceId;

/// A value delivered on one of the six device channels.
///
/// The [`Display`](fmt::Display) rendering is the human-readable log line
/// written by [`EventLogger`](crate::observer::EventLogger).
///
/// # Examples
///
/// ```
/// use microbit_sim::event::DeviceEvent;
///
/// let event = DeviceEvent::ButtonA(true);
/// assert_eq!(event.to_string(), "Button A pressed");
///
/// let event = DeviceEvent::ButtonAB(false);
/// assert_eq!(event.to_string(), "Buttons A+B released");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// Button A was pressed (`true`) or released (`false`).
    ButtonA(bool),
    /// Button B was pressed (`true`) or released (`false`).
    ButtonB(bool),
    /// The combined A+B state was recomputed.
    #[serde(rename = "button_ab")]
    ButtonAB(bool),
    /// A display pattern was published.
    Display(DisplayPattern),
    /// An accelerometer reading was published.
    Accelerometer(Acceleration),
    /// A compass heading was published.
    Compass(CompassHeading),
}

impl DeviceEvent {
    /// Creates the event for a single button edge.
    #[must_use]
    pub fn button(id: ButtonId, pressed: bool) -> Self {
        match id {
            ButtonId::A => Self::ButtonA(pressed),
            ButtonId::B => Self::ButtonB(pressed),
        }
    }

    /// Returns the name of the channel that carries this event.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::ButtonA(_) => "button_a",
            Self::ButtonB(_) => "button_b",
            Self::ButtonAB(_) => "button_ab",
            Self::Display(_) => "display",
            Self::Accelerometer(_) => "accelerometer",
            Self::Compass(_) => "compass",
        }
    }

    /// Returns `true` for the three button channels.
    #[must_use]
    pub const fn is_button(&self) -> bool {
        matches!(self, Self::ButtonA(_) | Self::ButtonB(_) | Self::ButtonAB(_))
    }

    /// Returns `true` for the accelerometer and compass channels.
    #[must_use]
    pub const fn is_sensor(&self) -> bool {
        matches!(self, Self::Accelerometer(_) | Self::Compass(_))
    }
}

const fn edge(pressed: bool) -> &'static str {
    if pressed { "pressed" } else { "released" }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ButtonA(pressed) => write!(f, "Button A {}", edge(*pressed)),
            Self::ButtonB(pressed) => write!(f, "Button B {}", edge(*pressed)),
            Self::ButtonAB(pressed) => write!(f, "Buttons A+B {}", edge(*pressed)),
            Self::Display(pattern) => write!(f, "Display changed: {pattern}"),
            Self::Accelerometer(reading) => write!(f, "Accelerometer changed: {reading}"),
            Self::Compass(heading) => write!(f, "Compass direction changed: {heading}"),
        }
    }
}

/// A timestamped event from a specific device, as carried on the
/// [`EventBus`](super::EventBus).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventRecord {
    /// The device that emitted the event.
    pub device_id: DeviceId,
    /// When the event was delivered.
    pub timestamp: DateTime<Utc>,
    /// The event itself.
    pub event: DeviceEvent,
}

impl EventRecord {
    /// Stamps `event` with the current time.
    #[must_use]
    pub fn now(device_id: DeviceId, event: DeviceEvent) -> Self {
        Self {
            device_id,
            timestamp: Utc::now(),
            event,
        }
    }
}

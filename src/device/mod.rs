// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The simulated board.
//!
//! A [`Device`] owns six channels:
//!
//! | Channel         | Kind          | Payload              |
//! |-----------------|---------------|----------------------|
//! | `button_a`      | latest-value  | `bool`               |
//! | `button_b`      | latest-value  | `bool`               |
//! | `button_ab`     | latest-value  | `bool` (A AND B)     |
//! | `display`       | plain         | [`DisplayPattern`]   |
//! | `accelerometer` | plain         | [`Acceleration`]     |
//! | `compass`       | plain         | [`CompassHeading`]   |
//!
//! Input arrives through plain method calls made by whatever captures
//! user interaction ([`Device::report_button_edge`],
//! [`Device::publish_display`]). The device never polls.
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use microbit_sim::{ButtonId, Device};
//! use microbit_sim::subscription::Subscribable;
//!
//! let device = Device::new();
//! let combined = Arc::new(Mutex::new(Vec::new()));
//! let combined_clone = combined.clone();
//!
//! device.on_button_ab().subscribe(move |both| combined_clone.lock().push(*both));
//!
//! device.report_button_edge(ButtonId::A, true);
//! device.report_button_edge(ButtonId::B, true);
//! device.report_button_edge(ButtonId::A, false);
//!
//! // Replayed initial state, then one value per edge
//! assert_eq!(*combined.lock(), vec![false, false, true, false]);
//! ```

mod builder;

pub use builder::DeviceBuilder;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::ReentrantMutex;

use crate::config::{CombinedEmission, DeviceConfig};
use crate::error::Result;
use crate::event::{DeviceEvent, DeviceId};
use crate::subscription::{
    ChannelView, EventChannel, Gate, LatestValueChannel, LatestView, Subscribable, SubscriptionId,
};
use crate::types::{
    Acceleration, ButtonId, ButtonsSnapshot, CompassHeading, DisplayPattern, LedGrid,
};

/// A simulated button/LED/sensor board.
///
/// `Device` is `Send + Sync`; share it with `Arc` when input is reported
/// from several threads. Updates are serialized by an internal re-entrant
/// gate, so a callback may itself report edges or publish patterns.
pub struct Device {
    id: DeviceId,
    config: DeviceConfig,
    gate: Gate,
    button_a: LatestValueChannel<bool>,
    button_b: LatestValueChannel<bool>,
    button_ab: LatestValueChannel<bool>,
    /// Last combined value delivered, for [`CombinedEmission::OnChange`].
    ab_announced: AtomicBool,
    display: EventChannel<DisplayPattern>,
    accelerometer: EventChannel<Acceleration>,
    compass: EventChannel<CompassHeading>,
}

impl Device {
    /// Creates a device with a random ID and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        DeviceBuilder::new().build()
    }

    /// Returns a builder for a customized device.
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::new()
    }

    /// Creates a device from a configuration.
    #[must_use]
    pub fn from_config(config: DeviceConfig) -> Self {
        DeviceBuilder::new().with_config(config).build()
    }

    pub(crate) fn from_parts(id: DeviceId, config: DeviceConfig) -> Self {
        let gate: Gate = Arc::new(ReentrantMutex::new(()));
        Self {
            id,
            config,
            button_a: LatestValueChannel::with_gate("button_a", false, gate.clone()),
            button_b: LatestValueChannel::with_gate("button_b", false, gate.clone()),
            button_ab: LatestValueChannel::with_gate("button_ab", false, gate.clone()),
            gate,
            ab_announced: AtomicBool::new(false),
            display: EventChannel::with_name("display"),
            accelerometer: EventChannel::with_name("accelerometer"),
            compass: EventChannel::with_name("compass"),
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Returns the friendly name, if configured.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.config.friendly_name.as_deref()
    }

    // ========== Input ==========

    /// Reports a press (`true`) or release (`false`) of a button.
    ///
    /// Both the button channel and the combined A+B channel are updated
    /// before any subscriber runs, so a callback on either channel always
    /// reads `on_button_ab().current() == a && b`. Button subscribers are
    /// notified first, then combined subscribers.
    ///
    /// With the default [`CombinedEmission::EveryEdge`] policy the combined
    /// channel emits on every call, even when its value is unchanged.
    pub fn report_button_edge(&self, id: ButtonId, pressed: bool) {
        let _gate = self.gate.lock();

        let channel = self.button(id);
        channel.store(pressed);
        let combined = self.button_a.current() && self.button_b.current();
        self.button_ab.store(combined);
        tracing::debug!(device = %self.id, button = %id, pressed, combined, "Button edge");

        channel.notify(&pressed);

        // An edge reported from a button callback may have moved the combined state on
        let combined = self.button_ab.current();
        let announce = match self.config.combined_emission {
            CombinedEmission::EveryEdge => {
                self.ab_announced.store(combined, Ordering::Relaxed);
                true
            }
            CombinedEmission::OnChange => {
                self.ab_announced.swap(combined, Ordering::Relaxed) != combined
            }
        };
        if announce {
            self.button_ab.notify(&combined);
        } else {
            tracing::trace!(device = %self.id, combined, "Combined state unchanged, not emitted");
        }
    }

    /// Reports a button edge for a textual button identity.
    ///
    /// Only `"A"` and `"B"` are accepted, matched exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidButton`](crate::error::ValueError::InvalidButton)
    /// for any other identity; no channel is touched in that case.
    pub fn report_button_edge_named(&self, name: &str, pressed: bool) -> Result<()> {
        let id = name.parse::<ButtonId>().inspect_err(|e| {
            tracing::warn!(device = %self.id, error = %e, "Rejected button edge");
        })?;
        self.report_button_edge(id, pressed);
        Ok(())
    }

    /// Publishes a display pattern, unchanged, to every display subscriber.
    ///
    /// The pattern is neither validated nor retained.
    pub fn publish_display(&self, pattern: impl Into<DisplayPattern>) {
        let pattern = pattern.into();
        let _gate = self.gate.lock();
        tracing::debug!(device = %self.id, pattern = %pattern, "Display pattern published");
        self.display.dispatch(&pattern);
    }

    /// Publishes a checked LED grid as a display pattern.
    pub fn show(&self, grid: &LedGrid) {
        self.publish_display(grid.to_pattern());
    }

    /// Publishes an accelerometer reading.
    ///
    /// The device has no sensor of its own and never calls this itself.
    pub fn publish_accelerometer(&self, reading: Acceleration) {
        let _gate = self.gate.lock();
        tracing::trace!(device = %self.id, %reading, "Accelerometer reading published");
        self.accelerometer.dispatch(&reading);
    }

    /// Publishes a compass heading.
    ///
    /// The device has no sensor of its own and never calls this itself.
    pub fn publish_compass(&self, heading: CompassHeading) {
        let _gate = self.gate.lock();
        tracing::trace!(device = %self.id, %heading, "Compass heading published");
        self.compass.dispatch(&heading);
    }

    // ========== State ==========

    /// Returns whether a button is currently held.
    #[must_use]
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.button(id).current()
    }

    /// Returns a consistent snapshot of both buttons and their combination.
    #[must_use]
    pub fn buttons(&self) -> ButtonsSnapshot {
        let _gate = self.gate.lock();
        ButtonsSnapshot {
            a: self.button_a.current(),
            b: self.button_b.current(),
            ab: self.button_ab.current(),
        }
    }

    // ========== Channels ==========

    /// Button A channel. Replays the current state on subscribe.
    #[must_use]
    pub fn on_button_a(&self) -> LatestView<'_, bool> {
        LatestView::new(&self.button_a)
    }

    /// Button B channel. Replays the current state on subscribe.
    #[must_use]
    pub fn on_button_b(&self) -> LatestView<'_, bool> {
        LatestView::new(&self.button_b)
    }

    /// Combined A+B channel. Replays the current state on subscribe.
    #[must_use]
    pub fn on_button_ab(&self) -> LatestView<'_, bool> {
        LatestView::new(&self.button_ab)
    }

    /// Channel of a single button.
    #[must_use]
    pub fn on_button(&self, id: ButtonId) -> LatestView<'_, bool> {
        LatestView::new(self.button(id))
    }

    /// Display pattern channel. No replay.
    #[must_use]
    pub fn on_display_change(&self) -> ChannelView<'_, DisplayPattern> {
        ChannelView::new(&self.display)
    }

    /// Accelerometer channel. No replay.
    #[must_use]
    pub fn on_accelerometer_change(&self) -> ChannelView<'_, Acceleration> {
        ChannelView::new(&self.accelerometer)
    }

    /// Compass channel. No replay.
    #[must_use]
    pub fn on_compass_change(&self) -> ChannelView<'_, CompassHeading> {
        ChannelView::new(&self.compass)
    }

    /// Subscribes one callback to all six channels.
    ///
    /// The button channels replay their current state, so the callback
    /// receives `ButtonA`, `ButtonB` and `ButtonAB` events before this
    /// method returns.
    pub fn on_any_event<F>(&self, callback: F) -> EventSubscriptions
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        EventSubscriptions {
            button_a: forward(&self.button_a, &callback, |p: &bool| DeviceEvent::ButtonA(*p)),
            button_b: forward(&self.button_b, &callback, |p: &bool| DeviceEvent::ButtonB(*p)),
            button_ab: forward(&self.button_ab, &callback, |p: &bool| DeviceEvent::ButtonAB(*p)),
            display: forward(&self.display, &callback, |p: &DisplayPattern| {
                DeviceEvent::Display(p.clone())
            }),
            accelerometer: forward(&self.accelerometer, &callback, |r: &Acceleration| {
                DeviceEvent::Accelerometer(*r)
            }),
            compass: forward(&self.compass, &callback, |h: &CompassHeading| DeviceEvent::Compass(*h)),
        }
    }

    /// Removes every subscription made by [`on_any_event`](Self::on_any_event).
    ///
    /// Returns the number of subscriptions that were still active.
    pub fn unsubscribe_all(&self, subscriptions: &EventSubscriptions) -> usize {
        [
            self.button_a.unsubscribe(subscriptions.button_a),
            self.button_b.unsubscribe(subscriptions.button_b),
            self.button_ab.unsubscribe(subscriptions.button_ab),
            self.display.unsubscribe(subscriptions.display),
            self.accelerometer.unsubscribe(subscriptions.accelerometer),
            self.compass.unsubscribe(subscriptions.compass),
        ]
        .into_iter()
        .filter(|removed| *removed)
        .count()
    }

    fn button(&self, id: ButtonId) -> &LatestValueChannel<bool> {
        match id {
            ButtonId::A => &self.button_a,
            ButtonId::B => &self.button_b,
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("buttons", &self.buttons())
            .finish_non_exhaustive()
    }
}

/// Subscription IDs returned by [`Device::on_any_event`], one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSubscriptions {
    /// Button A subscription.
    pub button_a: SubscriptionId,
    /// Button B subscription.
    pub button_b: SubscriptionId,
    /// Combined A+B subscription.
    pub button_ab: SubscriptionId,
    /// Display subscription.
    pub display: SubscriptionId,
    /// Accelerometer subscription.
    pub accelerometer: SubscriptionId,
    /// Compass subscription.
    pub compass: SubscriptionId,
}

impl EventSubscriptions {
    /// Returns all six IDs in channel order.
    #[must_use]
    pub fn ids(&self) -> [SubscriptionId; 6] {
        [
            self.button_a,
            self.button_b,
            self.button_ab,
            self.display,
            self.accelerometer,
            self.compass,
        ]
    }
}

fn forward<T, C, F>(channel: &C, callback: &Arc<F>, wrap: fn(&T) -> DeviceEvent) -> SubscriptionId
where
    T: 'static,
    C: Subscribable<T>,
    F: Fn(&DeviceEvent) + Send + Sync + 'static,
{
    let callback = Arc::clone(callback);
    channel.subscribe(move |value: &T| callback(&wrap(value)))
}

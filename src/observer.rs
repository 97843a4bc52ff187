// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event logging observer.
//!
//! [`EventLogger`] subscribes to every channel of a [`Device`] and writes
//! one line per event. Data flows one way: the logger never holds on to
//! the device and never reports input back into it.

use crate::device::{Device, EventSubscriptions};
use crate::event::{DeviceEvent, DeviceId};

/// Destination of the observer's event lines.
///
/// Any `Fn(DeviceId, &DeviceEvent)` closure is a sink.
pub trait EventSink: Send + Sync + 'static {
    /// Records one event from `device`.
    fn record(&self, device: DeviceId, event: &DeviceEvent);
}

impl<F> EventSink for F
where
    F: Fn(DeviceId, &DeviceEvent) + Send + Sync + 'static,
{
    fn record(&self, device: DeviceId, event: &DeviceEvent) {
        self(device, event);
    }
}

/// Sink writing each event as an `info` level `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, device: DeviceId, event: &DeviceEvent) {
        tracing::info!(device = %device, channel = event.channel(), "{event}");
    }
}

/// Logs every event of a device.
///
/// # Examples
///
/// ```
/// use microbit_sim::{ButtonId, Device};
/// use microbit_sim::observer::EventLogger;
///
/// let device = Device::new();
/// let logger = EventLogger::attach(&device);
///
/// device.report_button_edge(ButtonId::A, true);
/// device.publish_display("10101:01010:00100:01010:10101");
///
/// logger.detach(&device);
/// ```
#[derive(Debug)]
pub struct EventLogger {
    device_id: DeviceId,
    subscriptions: EventSubscriptions,
}

impl EventLogger {
    /// Attaches a logger that writes through `tracing`.
    #[must_use]
    pub fn attach(device: &Device) -> Self {
        Self::attach_with(device, TracingSink)
    }

    /// Attaches a logger that writes to a custom sink.
    ///
    /// The current button states are written immediately, since the
    /// button channels replay on subscribe.
    #[must_use]
    pub fn attach_with<S: EventSink>(device: &Device, sink: S) -> Self {
        let device_id = device.id();
        let subscriptions =
            device.on_any_event(move |event: &DeviceEvent| sink.record(device_id, event));
        tracing::debug!(device = %device_id, "Event logger attached");
        Self {
            device_id,
            subscriptions,
        }
    }

    /// Returns the ID of the observed device.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Returns the subscriptions held by the logger.
    #[must_use]
    pub fn subscriptions(&self) -> &EventSubscriptions {
        &self.subscriptions
    }

    /// Removes the logger's subscriptions from `device`.
    ///
    /// Returns the number of subscriptions removed.
    pub fn detach(self, device: &Device) -> usize {
        if device.id() != self.device_id {
            tracing::warn!(
                logger_device = %self.device_id,
                device = %device.id(),
                "Detaching event logger from a different device"
            );
        }
        let removed = device.unsubscribe_all(&self.subscriptions);
        tracing::debug!(device = %self.device_id, removed, "Event logger detached");
        removed
    }
}

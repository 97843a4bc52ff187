// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting device events to async consumers.

use tokio::sync::broadcast;

use crate::device::{Device, EventSubscriptions};

use super::{DeviceEvent, EventRecord};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus forwarding device events to tokio receivers.
///
/// Device channels deliver synchronously on the caller's thread. The bus
/// bridges them to async code: once [attached](Self::attach), every value
/// a device emits is wrapped in a timestamped [`EventRecord`] and sent on a
/// broadcast channel.
///
/// # Capacity
///
/// The bus has a fixed capacity (default 256). A receiver that falls
/// behind loses the oldest records and gets `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use microbit_sim::{ButtonId, Device};
/// use microbit_sim::event::{DeviceEvent, EventBus};
///
/// let device = Device::new();
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// let attachment = bus.attach(&device);
/// device.report_button_edge(ButtonId::A, true);
///
/// // Replayed initial button states come first
/// let mut events = Vec::new();
/// while let Ok(record) = rx.try_recv() {
///     events.push(record.event);
/// }
/// assert_eq!(events.last(), Some(&DeviceEvent::ButtonAB(false)));
/// assert!(events.contains(&DeviceEvent::ButtonA(true)));
///
/// device.unsubscribe_all(&attachment);
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<EventRecord>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to device events.
    ///
    /// Returns a receiver that will receive all records published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    /// Returns the number of active receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes a record to all receivers.
    ///
    /// If there are no receivers, the record is silently discarded.
    pub fn publish(&self, record: EventRecord) {
        // No receivers is not an error
        let _ = self.sender.send(record);
    }

    /// Publishes a record and returns the number of receivers that got it.
    #[must_use]
    pub fn publish_counted(&self, record: EventRecord) -> usize {
        self.sender.send(record).unwrap_or(0)
    }

    /// Forwards every event of `device` onto the bus.
    ///
    /// The button channels replay their state, so three records are sent
    /// right away. Pass the returned subscriptions to
    /// [`Device::unsubscribe_all`] to detach.
    pub fn attach(&self, device: &Device) -> EventSubscriptions {
        let sender = self.sender.clone();
        let device_id = device.id();
        tracing::debug!(device = %device_id, "Attaching device to event bus");
        device.on_any_event(move |event: &DeviceEvent| {
            let _ = sender.send(EventRecord::now(device_id, event.clone()));
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait and read-only channel views.
//!
//! Devices hand out views rather than channels so that observers can
//! subscribe and unsubscribe but never emit.

use super::{EventChannel, LatestValueChannel, SubscriptionId};

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```
/// use microbit_sim::Device;
/// use microbit_sim::subscription::Subscribable;
///
/// let device = Device::new();
///
/// let sub_id = device.on_display_change().subscribe(|pattern| {
///     println!("Display: {pattern}");
/// });
///
/// // Unsubscribe when no longer needed
/// device.on_display_change().unsubscribe(sub_id);
/// ```
pub trait Subscribable<T> {
    /// Registers a callback and returns its subscription ID.
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Read-only view of an [`EventChannel`].
#[derive(Debug)]
pub struct ChannelView<'a, T> {
    channel: &'a EventChannel<T>,
}

impl<'a, T: 'static> ChannelView<'a, T> {
    pub(crate) fn new(channel: &'a EventChannel<T>) -> Self {
        Self { channel }
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }
}

impl<T: 'static> Subscribable<T> for ChannelView<'_, T> {
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.channel.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}

impl<T> Clone for ChannelView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ChannelView<'_, T> {}

/// Read-only view of a [`LatestValueChannel`].
///
/// Besides subscribing, it exposes the current value.
#[derive(Debug)]
pub struct LatestView<'a, T> {
    channel: &'a LatestValueChannel<T>,
}

impl<'a, T: Clone + Send + Sync + 'static> LatestView<'a, T> {
    pub(crate) fn new(channel: &'a LatestValueChannel<T>) -> Self {
        Self { channel }
    }

    /// Returns the most recently emitted value.
    #[must_use]
    pub fn current(&self) -> T {
        self.channel.current()
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscribable<T> for LatestView<'_, T> {
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.channel.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}

impl<T> Clone for LatestView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LatestView<'_, T> {}

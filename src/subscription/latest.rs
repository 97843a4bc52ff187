// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel that remembers and replays its latest value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{ReentrantMutex, RwLock};

use super::channel::{Callback, EventChannel, invoke};
use super::{Subscribable, SubscriptionId};

/// Serializes updates and replays across threads.
///
/// Re-entrant so callbacks running under the gate may emit or subscribe
/// again on the same thread.
pub(crate) type Gate = Arc<ReentrantMutex<()>>;

/// An [`EventChannel`] that remembers the most recent value.
///
/// A new subscriber is called once, during [`subscribe`](Subscribable::subscribe),
/// with the current value, and then receives every later emission like a
/// plain channel subscriber.
///
/// # Nested emissions
///
/// A callback may emit on the channel it is being called from. The nested
/// value is delivered to every subscriber, and the outer pass stops there:
/// the last value any subscriber receives is always the stored one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use microbit_sim::subscription::{LatestValueChannel, Subscribable};
///
/// let channel = LatestValueChannel::new(false);
/// channel.emit(true);
/// channel.emit(false);
/// channel.emit(true);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = seen.clone();
/// channel.subscribe(move |pressed: &bool| seen_clone.lock().push(*pressed));
///
/// // Only the latest value is replayed, not the history
/// assert_eq!(*seen.lock(), vec![true]);
/// assert!(channel.current());
/// ```
pub struct LatestValueChannel<T> {
    gate: Gate,
    current: RwLock<T>,
    /// Bumped on every store.
    generation: AtomicU64,
    channel: EventChannel<T>,
}

impl<T: Clone + Send + Sync + 'static> LatestValueChannel<T> {
    /// Creates a channel holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_name("latest", initial)
    }

    /// Creates a named channel holding `initial`.
    #[must_use]
    pub fn with_name(name: &'static str, initial: T) -> Self {
        Self::with_gate(name, initial, Arc::new(ReentrantMutex::new(())))
    }

    /// Creates a channel that shares an update gate with other channels.
    pub(crate) fn with_gate(name: &'static str, initial: T, gate: Gate) -> Self {
        Self {
            gate,
            current: RwLock::new(initial),
            generation: AtomicU64::new(0),
            channel: EventChannel::with_name(name),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.channel.name()
    }

    /// Returns the most recently emitted value, or the initial one.
    #[must_use]
    pub fn current(&self) -> T {
        self.current.read().clone()
    }

    /// Stores `value` and delivers it to every subscriber.
    pub fn emit(&self, value: T) {
        let _gate = self.gate.lock();
        self.store(value.clone());
        self.notify(&value);
    }

    /// Replaces the stored value without notifying, returning the old one.
    ///
    /// Callers must hold the gate and follow up with [`notify`](Self::notify).
    pub(crate) fn store(&self, value: T) -> T {
        let previous = std::mem::replace(&mut *self.current.write(), value);
        self.generation.fetch_add(1, Ordering::AcqRel);
        previous
    }

    /// Delivers `value` to subscribers without storing it.
    ///
    /// The pass stops early if a callback stores a newer value, since the
    /// nested emission has already reached every subscriber.
    pub(crate) fn notify(&self, value: &T) -> usize {
        let _gate = self.gate.lock();
        let generation = self.generation.load(Ordering::Acquire);
        self.channel
            .dispatch_while(value, || self.generation.load(Ordering::Acquire) == generation)
    }

    /// Returns `true` if `id` is registered on this channel.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.channel.is_subscribed(id)
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscribable<T> for LatestValueChannel<T> {
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _gate = self.gate.lock();
        let callback: Callback<T> = Arc::new(callback);
        let id = self.channel.register(callback.clone());
        let value = self.current();
        invoke(self.channel.name(), id, &callback, &value);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for LatestValueChannel<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LatestValueChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestValueChannel")
            .field("current", &*self.current.read())
            .field("channel", &self.channel)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn initial_value_is_current() {
        let channel = LatestValueChannel::new(7u8);
        assert_eq!(channel.current(), 7);
    }

    #[test]
    fn emit_updates_current() {
        let channel = LatestValueChannel::new(false);
        channel.emit(true);
        assert!(channel.current());
        channel.emit(false);
        assert!(!channel.current());
    }

    #[test]
    fn subscribe_replays_exactly_once() {
        let channel = LatestValueChannel::new(3u8);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        channel.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn replay_precedes_later_emissions() {
        let channel = LatestValueChannel::new(1u8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        channel.subscribe(move |value: &u8| seen_clone.lock().push(*value));
        channel.emit(2);
        channel.emit(3);

        assert_eq!(*seen.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn late_subscriber_sees_only_latest() {
        let channel = LatestValueChannel::new(false);
        for value in [true, false, true] {
            channel.emit(value);
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        channel.subscribe(move |value: &bool| seen_clone.lock().push(*value));

        assert_eq!(*seen.lock(), vec![true]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let channel = LatestValueChannel::new(0u8);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = channel.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(channel.unsubscribe(id));
        channel.emit(1);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_emit_during_replay() {
        let channel = Arc::new(LatestValueChannel::new(0u8));
        let channel_clone = channel.clone();

        channel.subscribe(move |value: &u8| {
            if *value == 0 {
                channel_clone.emit(1);
            }
        });

        assert_eq!(channel.current(), 1);
    }

    #[test]
    fn nested_emit_supersedes_outer_pass() {
        let channel = Arc::new(LatestValueChannel::new(0u8));
        let channel_clone = channel.clone();
        channel.subscribe(move |value: &u8| {
            if *value == 1 {
                channel_clone.emit(2);
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        channel.subscribe(move |value: &u8| seen_clone.lock().push(*value));

        channel.emit(1);

        assert_eq!(*seen.lock(), vec![0, 2]);
        assert_eq!(channel.current(), 2);
    }

    #[test]
    fn panicking_replay_still_registers() {
        let channel = LatestValueChannel::new(0u8);
        let id = channel.subscribe(|value: &u8| assert_ne!(*value, 0));

        assert!(channel.is_subscribed(id));
        channel.emit(5);
        assert_eq!(channel.current(), 5);
    }

    #[test]
    fn store_does_not_notify() {
        let channel = LatestValueChannel::new(false);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        channel.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let previous = channel.store(true);
        assert!(!previous);
        assert!(channel.current());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert_eq!(channel.notify(&true), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn latest_debug() {
        let channel = LatestValueChannel::with_name("button_a", true);
        let debug = format!("{channel:?}");
        assert!(debug.contains("LatestValueChannel"));
        assert!(debug.contains("button_a"));
        assert!(debug.contains("true"));
    }
}

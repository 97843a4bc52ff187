// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel with synchronous callback delivery.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Subscribable, SubscriptionId};

/// Type alias for channel callbacks.
pub(crate) type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A typed broadcast channel.
///
/// Every value passed to [`emit`](Self::emit) is delivered synchronously to
/// each callback registered at that moment, in subscription order, before
/// `emit` returns. Nothing is buffered: a callback registered after an emit
/// never sees that value.
///
/// # Re-entrancy
///
/// The subscriber list is snapshotted before delivery and no lock is held
/// while a callback runs, so callbacks may subscribe, unsubscribe or emit
/// on the same channel. A callback removed while a pass is in flight is
/// skipped for the remainder of that pass.
///
/// # Panics in callbacks
///
/// A panicking callback does not stop the pass: the panic is caught,
/// logged at error level, and the remaining subscribers are still called.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use microbit_sim::subscription::{EventChannel, Subscribable};
///
/// let channel = EventChannel::new();
/// let total = Arc::new(AtomicU32::new(0));
/// let total_clone = total.clone();
///
/// channel.subscribe(move |value: &u32| {
///     total_clone.fetch_add(*value, Ordering::SeqCst);
/// });
///
/// channel.emit(2);
/// channel.emit(3);
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// ```
pub struct EventChannel<T> {
    /// Name used in log fields.
    name: &'static str,
    /// Registered callbacks in subscription order.
    subscribers: RwLock<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T: 'static> EventChannel<T> {
    /// Creates a new channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("channel")
    }

    /// Creates a new channel whose log lines carry `name`.
    #[must_use]
    pub fn with_name(name: &'static str) -> Self {
        Self {
            name,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Delivers `value` to every current subscriber.
    pub fn emit(&self, value: T) {
        self.dispatch(&value);
    }

    /// Delivers `value` by reference and returns how many callbacks ran.
    pub fn dispatch(&self, value: &T) -> usize {
        self.dispatch_while(value, || true)
    }

    /// Delivers `value` until `live` reports that it has been superseded.
    ///
    /// `live` is checked before each callback; once it returns `false` the
    /// rest of the pass is abandoned.
    pub(crate) fn dispatch_while(&self, value: &T, live: impl Fn() -> bool) -> usize {
        let snapshot = self.subscribers.read().clone();
        tracing::trace!(
            channel = self.name,
            subscribers = snapshot.len(),
            "Dispatching value"
        );

        let mut delivered = 0;
        for (id, callback) in &snapshot {
            if !live() {
                tracing::trace!(channel = self.name, delivered, "Pass superseded by a newer value");
                break;
            }
            // Removed by an earlier callback of this pass
            if !self.is_subscribed(*id) {
                continue;
            }
            invoke(self.name, *id, callback, value);
            delivered += 1;
        }
        delivered
    }

    /// Returns `true` if `id` is registered on this channel.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.read().iter().any(|(sub, _)| *sub == id)
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }

    /// Appends an already-boxed callback.
    pub(crate) fn register(&self, callback: Callback<T>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.write().push((id, callback));
        tracing::debug!(channel = self.name, subscription = %id, "Subscribed");
        id
    }
}

impl<T: 'static> Subscribable<T> for EventChannel<T> {
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(Arc::new(callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(pos) = subscribers.iter().position(|(sub, _)| *sub == id) else {
            return false;
        };
        subscribers.remove(pos);
        drop(subscribers);
        tracing::debug!(channel = self.name, subscription = %id, "Unsubscribed");
        true
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("subscriber_count", &self.subscribers.read().len())
            .finish()
    }
}

/// Runs one callback, containing any panic it raises.
pub(crate) fn invoke<T>(channel: &'static str, id: SubscriptionId, callback: &Callback<T>, value: &T) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(value))) {
        tracing::error!(
            channel,
            subscription = %id,
            panic = panic_message(payload.as_ref()),
            "Subscriber callback panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter so an ID never matches a subscription on another channel.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique across all channels of the process,
/// so handing an ID to the wrong channel is a harmless no-op.
///
/// # Examples
///
/// ```
/// use microbit_sim::subscription::{EventChannel, Subscribable};
///
/// let channel = EventChannel::<u8>::new();
/// let sub_id = channel.subscribe(|value| println!("{value}"));
///
/// // Later, unsubscribe
/// assert!(channel.unsubscribe(sub_id));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates the next subscription ID.
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

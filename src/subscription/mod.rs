// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device channels.
//!
//! This module provides the callback-based channels the device model is
//! built from.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`EventChannel`] - Broadcasts each emitted value to the current subscribers
//! - [`LatestValueChannel`] - Also stores the latest value and replays it on subscribe
//! - [`Subscribable`] - Trait for types that support subscriptions
//! - [`ChannelView`] / [`LatestView`] - Read-only handles given out by a device
//!
//! # Usage
//!
//! ```
//! use microbit_sim::{ButtonId, Device};
//! use microbit_sim::subscription::Subscribable;
//!
//! let device = Device::new();
//!
//! // Subscribe to button A; the current state is replayed immediately
//! let sub_id = device.on_button_a().subscribe(|pressed| {
//!     println!("Button A pressed: {pressed}");
//! });
//!
//! device.report_button_edge(ButtonId::A, true);
//!
//! // Later, unsubscribe
//! device.on_button_a().unsubscribe(sub_id);
//! ```
//!
//! # Delivery
//!
//! Delivery is synchronous: every callback has run by the time `emit`
//! returns. Callbacks run in subscription order and without any channel
//! lock held.

mod channel;
mod id;
mod latest;
mod subscribable;

pub use channel::EventChannel;
pub use id::SubscriptionId;
pub use latest::LatestValueChannel;
pub(crate) use latest::Gate;
pub use subscribable::{ChannelView, LatestView, Subscribable};

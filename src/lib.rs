// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `microbit_sim` - A reactive event model for a simulated micro:bit style board.
//!
//! The board has two push buttons (A and B), a 5x5 LED display, and
//! accelerometer and compass channels. Whatever captures user interaction
//! (a 3D viewport, a terminal UI, a test) reports raw button edges and
//! display patterns to a [`Device`]; the device turns them into a
//! consistent stream of semantic events that any number of observers can
//! subscribe to.
//!
//! # Channels
//!
//! - **Button A / Button B**: latest-value channels of `bool`
//! - **Buttons A+B**: derived latest-value channel, always `a && b`
//! - **Display**: plain channel of [`DisplayPattern`] strings
//! - **Accelerometer / Compass**: plain channels with no built-in producer
//!
//! Latest-value channels replay their current value to a new subscriber;
//! plain channels only deliver values emitted after subscribing.
//!
//! # Quick Start
//!
//! ```
//! use microbit_sim::{ButtonId, Device};
//! use microbit_sim::observer::EventLogger;
//! use microbit_sim::subscription::Subscribable;
//!
//! let device = Device::new();
//!
//! // Log everything the device does
//! let logger = EventLogger::attach(&device);
//!
//! // React to the combined state
//! device.on_button_ab().subscribe(|both| {
//!     if *both {
//!         println!("A+B held");
//!     }
//! });
//!
//! // Input from the presentation layer
//! device.report_button_edge(ButtonId::A, true);
//! device.report_button_edge(ButtonId::B, true);
//! device.publish_display("10101:01010:00100:01010:10101");
//!
//! assert!(device.on_button_ab().current());
//! logger.detach(&device);
//! ```
//!
//! # Features
//!
//! - `bus` (default): [`event::EventBus`], a tokio broadcast bridge for
//!   async consumers.

pub mod config;
mod device;
pub mod error;
pub mod event;
pub mod observer;
pub mod subscription;
pub mod types;

pub use config::{CombinedEmission, DeviceConfig};
pub use device::{Device, DeviceBuilder, EventSubscriptions};
pub use error::{Error, ParseError, Result, ValueError};
pub use event::{DeviceEvent, DeviceId, EventRecord};
pub use subscription::{
    ChannelView, EventChannel, LatestValueChannel, LatestView, Subscribable, SubscriptionId,
};
pub use types::{Acceleration, ButtonId, ButtonsSnapshot, CompassHeading, DisplayPattern, LedGrid};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed device events.
//!
//! [`DeviceEvent`] folds the six device channels into one enum so that a
//! single consumer (a logger, an async task) can follow everything a device
//! does. With the `bus` feature, [`EventBus`] forwards those events to tokio
//! broadcast receivers.
//!
//! # Examples
//!
//! ```
//! use microbit_sim::{ButtonId, Device};
//! use microbit_sim::event::DeviceEvent;
//!
//! let device = Device::new();
//! let subs = device.on_any_event(|event: &DeviceEvent| println!("{event}"));
//!
//! device.report_button_edge(ButtonId::A, true);
//! device.unsubscribe_all(&subs);
//! ```

mod device_event;
mod device_id;
#[cfg(feature = "bus")]
mod event_bus;

pub use device_event::{DeviceEvent, EventRecord};
pub use device_id::DeviceId;
#[cfg(feature = "bus")]
pub use event_bus::EventBus;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types carried by the device channels.
//!
//! # Types
//!
//! - [`ButtonId`] - Button identity (A or B)
//! - [`ButtonsSnapshot`] - Consistent view of both buttons and their combination
//! - [`DisplayPattern`] - Opaque LED display pattern
//! - [`LedGrid`] - Checked 5x5 LED matrix
//! - [`Acceleration`] - Three-axis accelerometer reading
//! - [`CompassHeading`] - Heading in degrees (0-360)

mod button;
mod display;
mod sensor;

pub use button::{ButtonId, ButtonsSnapshot};
pub use display::{DisplayPattern, GRID_SIZE, LIT, LedGrid, ROW_SEPARATOR, UNLIT};
pub use sensor::{Acceleration, CompassHeading};

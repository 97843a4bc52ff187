// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor reading shapes.
//!
//! The simulated board has no real sensors. These types only describe the
//! payloads of the accelerometer and compass channels so that a producer
//! outside the core can feed them.

use std::fmt;

use crate::error::ValueError;

/// A three-axis accelerometer reading.
///
/// # Examples
///
/// ```
/// use microbit_sim::types::Acceleration;
///
/// let reading = Acceleration::new(0.0, 0.0, -1024.0).unwrap();
/// assert_eq!(reading.z(), -1024.0);
/// assert!(Acceleration::new(f64::NAN, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawAcceleration")]
pub struct Acceleration {
    x: f64,
    y: f64,
    z: f64,
}

/// Unchecked wire shape of [`Acceleration`].
#[derive(serde::Deserialize)]
struct RawAcceleration {
    x: f64,
    y: f64,
    z: f64,
}

impl Acceleration {
    /// Creates a reading, rejecting non-finite axes.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFiniteAxis`] if any axis is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ValueError> {
        for (axis, value) in [('x', x), ('y', y), ('z', z)] {
            if !value.is_finite() {
                return Err(ValueError::NonFiniteAxis { axis, value });
            }
        }
        Ok(Self { x, y, z })
    }

    /// X axis.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Y axis.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Z axis.
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
}

impl TryFrom<RawAcceleration> for Acceleration {
    type Error = ValueError;

    fn try_from(raw: RawAcceleration) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y, raw.z)
    }
}

impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

/// A compass heading in degrees, within `[0, 360]`.
///
/// # Examples
///
/// ```
/// use microbit_sim::types::CompassHeading;
///
/// let north = CompassHeading::new(0.0).unwrap();
/// assert_eq!(north.degrees(), 0.0);
/// assert!(CompassHeading::new(361.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, serde::Serialize)]
#[serde(transparent)]
pub struct CompassHeading(f64);

impl CompassHeading {
    /// Largest accepted heading.
    pub const MAX: f64 = 360.0;

    /// Creates a heading.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidHeading`] if `degrees` is outside
    /// `[0, 360]` or not a number.
    pub fn new(degrees: f64) -> Result<Self, ValueError> {
        if (0.0..=Self::MAX).contains(&degrees) {
            Ok(Self(degrees))
        } else {
            Err(ValueError::InvalidHeading(degrees))
        }
    }

    /// Returns the heading in degrees.
    #[must_use]
    pub const fn degrees(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for CompassHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<f64> for CompassHeading {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> serde::Deserialize<'de> for CompassHeading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let degrees = f64::deserialize(deserializer)?;
        Self::new(degrees).map_err(serde::de::Error::custom)
    }
}

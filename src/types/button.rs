// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button identity and button state snapshot types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Identifies one of the two push buttons on the board.
///
/// # Examples
///
/// ```
/// use microbit_sim::types::ButtonId;
///
/// let a: ButtonId = "A".parse().unwrap();
/// assert_eq!(a, ButtonId::A);
/// assert_eq!(a.as_str(), "A");
///
/// // Identities are matched exactly
/// assert!("a".parse::<ButtonId>().is_err());
/// assert!("C".parse::<ButtonId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ButtonId {
    /// The left button.
    A,
    /// The right button.
    B,
}

impl ButtonId {
    /// Both buttons, in board order.
    pub const ALL: [ButtonId; 2] = [ButtonId::A, ButtonId::B];

    /// Returns the printed label of the button.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Returns the other button.
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(ValueError::InvalidButton(s.to_string())),
        }
    }
}

impl TryFrom<char> for ButtonId {
    type Error = ValueError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            _ => Err(ValueError::InvalidButton(c.to_string())),
        }
    }
}

/// A consistent view of both buttons and their combined state.
///
/// `ab` is always `a && b`; the snapshot is taken under the device's
/// update gate so no torn read is possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ButtonsSnapshot {
    /// Whether button A is held.
    pub a: bool,
    /// Whether button B is held.
    pub b: bool,
    /// Whether both buttons are held.
    pub ab: bool,
}

impl ButtonsSnapshot {
    /// Returns the state of a single button.
    #[must_use]
    pub const fn get(&self, id: ButtonId) -> bool {
        match id {
            ButtonId::A => self.a,
            ButtonId::B => self.b,
        }
    }

    /// Returns `true` if neither button is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.a && !self.b
    }
}

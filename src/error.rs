// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `microbit_sim` library.
//!
//! The event core itself never fails: emitting and subscribing are
//! infallible. Errors only arise at the edges, when a caller hands over
//! a value that cannot be represented (an unknown button name, a compass
//! heading outside a full turn) or asks for a strict parse of a display
//! pattern or configuration document.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing a pattern or configuration.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A button identity other than `A` or `B` was given.
    #[error("invalid button identity: {0:?}")]
    InvalidButton(String),

    /// A compass heading is outside the valid range (0-360 degrees).
    #[error("compass heading {0} is out of range [0, 360]")]
    InvalidHeading(f64),

    /// An accelerometer axis reading is NaN or infinite.
    #[error("accelerometer axis {axis} is not finite: {value}")]
    NonFiniteAxis {
        /// The axis name (`x`, `y` or `z`).
        axis: char,
        /// The offending value.
        value: f64,
    },
}

/// Errors related to parsing display patterns and configuration documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The pattern does not have the expected number of rows.
    #[error("expected {expected} rows, found {actual}")]
    RowCount {
        /// Required number of rows.
        expected: usize,
        /// Number of rows in the pattern.
        actual: usize,
    },

    /// A row does not have the expected number of cells.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        /// Zero-based row index.
        row: usize,
        /// Required number of cells.
        expected: usize,
        /// Number of cells in the row.
        actual: usize,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

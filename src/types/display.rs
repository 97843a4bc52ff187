// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED display pattern types.
//!
//! The board has a 5x5 LED matrix. Patterns travel through the event core
//! as opaque [`DisplayPattern`] strings; the textual convention is rows
//! separated by [`ROW_SEPARATOR`] with [`LIT`] marking an illuminated cell.
//! [`LedGrid`] is a strict, structured view of that convention for callers
//! that want one.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Number of rows and columns of the LED matrix.
pub const GRID_SIZE: usize = 5;

/// Character separating rows in a display pattern.
pub const ROW_SEPARATOR: char = ':';

/// Character marking a lit cell. Any other character is unlit.
pub const LIT: char = '1';

/// Character used for unlit cells when rendering a grid.
pub const UNLIT: char = '0';

/// An LED display pattern, forwarded verbatim.
///
/// No validation is applied: malformed patterns are accepted and passed on
/// unchanged. Use [`LedGrid::parse`] for a checked interpretation.
///
/// # Examples
///
/// ```
/// use microbit_sim::types::DisplayPattern;
///
/// let heart = DisplayPattern::new("01010:11111:11111:01110:00100");
/// assert_eq!(heart.as_str(), "01010:11111:11111:01110:00100");
///
/// // Anything goes
/// let odd = DisplayPattern::new("not a grid");
/// assert_eq!(odd.to_string(), "not a grid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DisplayPattern(String);

impl DisplayPattern {
    /// Creates a pattern from any string.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Returns the raw pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the pattern and returns the raw text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Interprets the pattern as a full 5x5 grid.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the pattern is not exactly 5 rows of
    /// 5 cells.
    pub fn to_grid(&self) -> Result<LedGrid, ParseError> {
        LedGrid::parse(&self.0)
    }
}

impl fmt::Display for DisplayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayPattern {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DisplayPattern {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&LedGrid> for DisplayPattern {
    fn from(grid: &LedGrid) -> Self {
        grid.to_pattern()
    }
}

impl AsRef<str> for DisplayPattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A checked 5x5 LED matrix.
///
/// # Examples
///
/// ```
/// use microbit_sim::types::LedGrid;
///
/// let grid = LedGrid::parse("10101:01010:00100:01010:10101").unwrap();
/// assert!(grid.is_lit(0, 0));
/// assert!(!grid.is_lit(0, 1));
/// assert_eq!(grid.lit_count(), 11);
/// assert_eq!(grid.to_pattern().as_str(), "10101:01010:00100:01010:10101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LedGrid {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl LedGrid {
    /// A grid with every LED off.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            cells: [[false; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// A grid with every LED on.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            cells: [[true; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Creates a grid from a row-major cell array.
    #[must_use]
    pub const fn from_cells(cells: [[bool; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Parses a pattern following the display convention.
    ///
    /// Each row must contain exactly 5 characters; [`LIT`] marks a lit
    /// cell and every other character is unlit.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::RowCount`] or [`ParseError::RowLength`] if the
    /// pattern does not describe a full grid.
    pub fn parse(pattern: &str) -> Result<Self, ParseError> {
        let rows: Vec<&str> = pattern.split(ROW_SEPARATOR).collect();
        if rows.len() != GRID_SIZE {
            return Err(ParseError::RowCount {
                expected: GRID_SIZE,
                actual: rows.len(),
            });
        }

        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        for (row, text) in rows.iter().enumerate() {
            let len = text.chars().count();
            if len != GRID_SIZE {
                return Err(ParseError::RowLength {
                    row,
                    expected: GRID_SIZE,
                    actual: len,
                });
            }
            for (col, c) in text.chars().enumerate() {
                cells[row][col] = c == LIT;
            }
        }

        Ok(Self { cells })
    }

    /// Returns whether the LED at `(row, col)` is lit.
    ///
    /// Out-of-range coordinates are reported as unlit.
    #[must_use]
    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Sets the LED at `(row, col)`. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, lit: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = lit;
        }
    }

    /// Returns the number of lit LEDs.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().flatten().filter(|lit| **lit).count()
    }

    /// Returns the row-major cell array.
    #[must_use]
    pub const fn cells(&self) -> &[[bool; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Renders the grid using the display convention.
    #[must_use]
    pub fn to_pattern(&self) -> DisplayPattern {
        let rows: Vec<String> = self
            .cells
            .iter()
            .map(|row| row.iter().map(|lit| if *lit { LIT } else { UNLIT }).collect())
            .collect();
        let mut buf = [0; 4];
        DisplayPattern(rows.join(ROW_SEPARATOR.encode_utf8(&mut buf)))
    }
}

impl FromStr for LedGrid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_pattern())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSS: &str = "10101:01010:00100:01010:10101";

    #[test]
    fn pattern_is_opaque() {
        let pattern = DisplayPattern::new("::garbage::");
        assert_eq!(pattern.as_str(), "::garbage::");
        assert!(pattern.to_grid().is_err());
    }

    #[test]
    fn pattern_from_string_types() {
        let a: DisplayPattern = CROSS.into();
        let b: DisplayPattern = CROSS.to_string().into();
        assert_eq!(a, b);
        assert_eq!(a.into_inner(), CROSS);
    }

    #[test]
    fn pattern_serializes_as_plain_string() {
        let json = serde_json::to_string(&DisplayPattern::new(CROSS)).unwrap();
        assert_eq!(json, format!("\"{CROSS}\""));
    }

    #[test]
    fn grid_parse_cross() {
        let grid = LedGrid::parse(CROSS).unwrap();
        assert_eq!(grid.lit_count(), 11);
        assert!(grid.is_lit(2, 2));
        assert!(!grid.is_lit(2, 1));
        assert!(grid.is_lit(4, 4));
    }

    #[test]
    fn grid_non_lit_markers_are_unlit() {
        let grid = LedGrid::parse("1x1.1:     :00000:9999 :11111").unwrap();
        assert_eq!(grid.lit_count(), 8);
        assert!(!grid.is_lit(0, 1));
    }

    #[test]
    fn grid_parse_wrong_row_count() {
        let err = LedGrid::parse("10101:01010").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowCount {
                expected: 5,
                actual: 2
            }
        ));
    }

    #[test]
    fn grid_parse_wrong_row_length() {
        let err = LedGrid::parse("10101:0101:00100:01010:10101").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowLength {
                row: 1,
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn grid_renders_back() {
        let grid: LedGrid = CROSS.parse().unwrap();
        assert_eq!(grid.to_pattern().as_str(), CROSS);
        assert_eq!(grid.to_string(), CROSS);
    }

    #[test]
    fn grid_set_and_bounds() {
        let mut grid = LedGrid::blank();
        grid.set(1, 3, true);
        grid.set(7, 7, true);
        assert!(grid.is_lit(1, 3));
        assert!(!grid.is_lit(7, 7));
        assert_eq!(grid.lit_count(), 1);
        assert_eq!(LedGrid::full().lit_count(), 25);
    }
}

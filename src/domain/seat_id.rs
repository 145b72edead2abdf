//! Seat identifier within a showtime's fixed auditorium grid.
//!
//! [`SeatId`] addresses one physical seat as a row letter (`A`–`H`) plus
//! a column number (`1`–`10`), rendered as `"A1"` … `"H10"`. The grid is
//! fixed at 8×10 for every showtime, so a seat id that parses is always
//! within bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReservationError;

/// One seat in a showtime's 8×10 auditorium grid.
///
/// Ordered row-major (`A1 < A2 < … < B1 < …`) so derived availability
/// sets iterate in display order. Two seat ids are equal iff row and
/// column match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    /// Zero-based row index (0 = `A` … 7 = `H`).
    row: u8,
    /// One-based column number (1–10).
    col: u8,
}

impl SeatId {
    /// Number of rows in the auditorium grid.
    pub const ROWS: u8 = 8;

    /// Number of columns in the auditorium grid.
    pub const COLS: u8 = 10;

    /// Total addressable seats per showtime.
    pub const CAPACITY: u16 = Self::ROWS as u16 * Self::COLS as u16;

    /// Creates a seat id from a row letter and a one-based column number.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::InvalidSeat`] if the row letter is
    /// outside `A`–`H` or the column is outside `1`–`10`.
    pub fn new(row_letter: char, col: u8) -> Result<Self, ReservationError> {
        let upper = row_letter.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() || upper as u8 >= b'A' + Self::ROWS {
            return Err(ReservationError::InvalidSeat(format!("{row_letter}{col}")));
        }
        if col == 0 || col > Self::COLS {
            return Err(ReservationError::InvalidSeat(format!("{row_letter}{col}")));
        }
        Ok(Self {
            row: upper as u8 - b'A',
            col,
        })
    }

    /// Returns the row letter (`A`–`H`).
    #[must_use]
    pub const fn row_letter(&self) -> char {
        (b'A' + self.row) as char
    }

    /// Returns the one-based column number.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.col
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col)
    }
}

impl FromStr for SeatId {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row_letter = chars
            .next()
            .ok_or_else(|| ReservationError::InvalidSeat(s.to_string()))?;
        let col: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| ReservationError::InvalidSeat(s.to_string()))?;
        Self::new(row_letter, col)
    }
}

impl TryFrom<String> for SeatId {
    type Error = ReservationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_corner_seats() {
        let Ok(first) = "A1".parse::<SeatId>() else {
            panic!("A1 should parse");
        };
        assert_eq!(first.row_letter(), 'A');
        assert_eq!(first.column(), 1);

        let Ok(last) = "H10".parse::<SeatId>() else {
            panic!("H10 should parse");
        };
        assert_eq!(last.row_letter(), 'H');
        assert_eq!(last.column(), 10);
    }

    #[test]
    fn rejects_out_of_grid() {
        assert!("I1".parse::<SeatId>().is_err());
        assert!("A0".parse::<SeatId>().is_err());
        assert!("A11".parse::<SeatId>().is_err());
        assert!("Z5".parse::<SeatId>().is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!("".parse::<SeatId>().is_err());
        assert!("A".parse::<SeatId>().is_err());
        assert!("1A".parse::<SeatId>().is_err());
        assert!("AA1".parse::<SeatId>().is_err());
    }

    #[test]
    fn lowercase_row_is_accepted() {
        let Ok(seat) = "c7".parse::<SeatId>() else {
            panic!("c7 should parse");
        };
        assert_eq!(seat.to_string(), "C7");
    }

    #[test]
    fn ordering_is_row_major() {
        let Ok(a2) = "A2".parse::<SeatId>() else {
            panic!("parse");
        };
        let Ok(a10) = "A10".parse::<SeatId>() else {
            panic!("parse");
        };
        let Ok(b1) = "B1".parse::<SeatId>() else {
            panic!("parse");
        };
        assert!(a2 < a10);
        assert!(a10 < b1);
    }

    #[test]
    fn capacity_matches_grid() {
        assert_eq!(SeatId::CAPACITY, 80);
    }

    #[test]
    fn serde_uses_string_form() {
        let Ok(seat) = "E5".parse::<SeatId>() else {
            panic!("parse");
        };
        let json = serde_json::to_string(&seat).ok();
        assert_eq!(json.as_deref(), Some("\"E5\""));

        let decoded: Option<SeatId> = serde_json::from_str("\"E5\"").ok();
        assert_eq!(decoded, Some(seat));
    }
}

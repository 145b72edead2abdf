//! Booking aggregate and its status lifecycle.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, SeatId, ShowtimeId, UserId};

/// Lifecycle status of a booking.
///
/// A booking is created `Confirmed` (there is no pending or held state)
/// and may transition exactly once to `Cancelled`. Cancelled bookings are
/// retained for history and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Seats count against availability.
    Confirmed,
    /// Seats have been released back to availability.
    Cancelled,
}

impl BookingStatus {
    /// Returns the lowercase wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// One user's claim on a set of seats for one showtime.
///
/// `seats` preserves the order the user selected (for display) with
/// duplicates removed; ordering is irrelevant to correctness. The total
/// amount is computed once at commit time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier (immutable after creation).
    pub id: BookingId,

    /// Owner of the booking; only this user may cancel it.
    pub user_id: UserId,

    /// Showtime the seats belong to.
    pub showtime_id: ShowtimeId,

    /// Claimed seats in selection order, deduplicated.
    pub seats: Vec<SeatId>,

    /// Seat count × per-seat price at commit time, in whole currency units.
    pub total_amount: i64,

    /// Current lifecycle status.
    pub status: BookingStatus,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a confirmed booking with a fresh id and the current time.
    #[must_use]
    pub fn confirmed(
        user_id: UserId,
        showtime_id: ShowtimeId,
        seats: Vec<SeatId>,
        total_amount: i64,
    ) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            showtime_id,
            seats,
            total_amount,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    /// Returns the booking's seats as an ordered set.
    #[must_use]
    pub fn seat_set(&self) -> BTreeSet<SeatId> {
        self.seats.iter().copied().collect()
    }

    /// Returns `true` if the booking currently counts against availability.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.status, BookingStatus::Confirmed)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn seats(ids: &[&str]) -> Vec<SeatId> {
        ids.iter()
            .map(|s| s.parse().unwrap_or_else(|_| panic!("bad seat {s}")))
            .collect()
    }

    #[test]
    fn confirmed_booking_starts_confirmed() {
        let booking = Booking::confirmed(UserId::new(), ShowtimeId::new(), seats(&["A1"]), 250);
        assert!(booking.is_confirmed());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.total_amount, 250);
    }

    #[test]
    fn seat_set_is_sorted_regardless_of_selection_order() {
        let booking = Booking::confirmed(
            UserId::new(),
            ShowtimeId::new(),
            seats(&["B2", "A1", "A10"]),
            750,
        );
        let ordered: Vec<String> = booking.seat_set().iter().map(ToString::to_string).collect();
        assert_eq!(ordered, vec!["A1", "A10", "B2"]);
        // Display order is preserved on the aggregate itself
        assert_eq!(booking.seats.first().map(ToString::to_string).as_deref(), Some("B2"));
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        assert_eq!("confirmed".parse::<BookingStatus>().ok(), Some(BookingStatus::Confirmed));
        assert_eq!("cancelled".parse::<BookingStatus>().ok(), Some(BookingStatus::Cancelled));
        assert!("held".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
    }
}

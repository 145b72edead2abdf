//! Seat-map DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SeatId;

/// Response body for `GET /showtimes/:id/seats`.
///
/// Carries everything a client needs to render the seat grid: the grid
/// shape and the currently booked seat ids. The snapshot may be stale by
/// the time the user confirms; the commit path re-checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeatMapResponse {
    /// Showtime the map belongs to.
    pub showtime_id: uuid::Uuid,
    /// Number of rows in the grid (rows are lettered from `A`).
    pub rows: u8,
    /// Number of columns in the grid (numbered from 1).
    pub cols: u8,
    /// Booked seat ids in grid order.
    pub booked_seats: Vec<String>,
    /// Seats still available (= rows × cols − booked).
    pub available: u16,
}

impl SeatMapResponse {
    /// Builds a seat map response from a derived booked-seat set.
    #[must_use]
    pub fn new(showtime_id: uuid::Uuid, booked: &std::collections::BTreeSet<SeatId>) -> Self {
        let booked_count = u16::try_from(booked.len()).unwrap_or(SeatId::CAPACITY);
        Self {
            showtime_id,
            rows: SeatId::ROWS,
            cols: SeatId::COLS,
            booked_seats: booked.iter().map(ToString::to_string).collect(),
            available: SeatId::CAPACITY.saturating_sub(booked_count),
        }
    }
}

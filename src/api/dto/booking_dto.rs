//! Booking request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Booking;

/// Request body for `POST /showtimes/:id/bookings`.
///
/// The user id comes from the (external) auth collaborator and the
/// per-seat price from the (external) catalog; the core trusts both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReserveRequest {
    /// Authenticated user making the booking.
    pub user_id: uuid::Uuid,
    /// Seat ids in selection order (e.g. `["A1", "A2"]`).
    pub seats: Vec<String>,
    /// Ticket price per seat in whole currency units.
    pub price_per_seat: i64,
}

/// Request body for `POST /bookings/:id/cancel`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelRequest {
    /// Authenticated user requesting the cancellation; must own the booking.
    pub user_id: uuid::Uuid,
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingHistoryParams {
    /// User whose bookings to list.
    pub user_id: uuid::Uuid,
}

/// A booking as returned by every booking endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// Booking identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Showtime the seats belong to.
    pub showtime_id: uuid::Uuid,
    /// Seat ids in selection order.
    pub seats: Vec<String>,
    /// Total amount in whole currency units.
    pub total_amount: i64,
    /// `"confirmed"` or `"cancelled"`.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            user_id: *booking.user_id.as_uuid(),
            showtime_id: *booking.showtime_id.as_uuid(),
            seats: booking.seats.iter().map(ToString::to_string).collect(),
            total_amount: booking.total_amount,
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at,
        }
    }
}

//! Reservation error types with HTTP status code mapping.
//!
//! [`ReservationError`] is the central error type for the service. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. Seat conflicts carry the exact contested seats so clients
//! can prune them from a pending selection without discarding the rest.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BookingId, SeatId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "seats already booked: A2",
///     "details": "A2"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ReservationError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details (comma-separated seat ids on conflict).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                 |
/// |-----------|------------------|-----------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request             |
/// | 2000–2099 | Not Found / Auth | 404 Not Found / 403 Forbidden |
/// | 2100–2199 | State Conflict   | 409 Conflict                |
/// | 3000–3999 | Server / Storage | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    /// Seat id is malformed or outside the 8×10 grid.
    #[error("invalid seat id: {0}")]
    InvalidSeat(String),

    /// Reservation request contained no seats.
    #[error("seat selection is empty")]
    EmptySelection,

    /// Per-seat price was negative.
    #[error("invalid ticket price: {0}")]
    InvalidPrice(i64),

    /// One or more requested seats are already held by a confirmed
    /// booking. The whole request is rejected; `seats` names exactly
    /// the contested subset.
    #[error("seats already booked: {}", format_seats(.seats))]
    SeatConflict {
        /// The contested seats, in grid order.
        seats: Vec<SeatId>,
    },

    /// Booking with the given id was not found.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Requester does not own the booking they tried to cancel.
    #[error("booking {0} belongs to another user")]
    NotBookingOwner(BookingId),

    /// Booking was already cancelled; repeated cancellation is reported,
    /// never a silent success.
    #[error("booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    /// Ledger unreachable or a transaction aborted for infrastructure
    /// reasons (not seat contention).
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Renders a seat list as comma-separated ids (`"A2, A3"`).
fn format_seats(seats: &[SeatId]) -> String {
    seats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReservationError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidSeat(_) => 1001,
            Self::EmptySelection => 1002,
            Self::InvalidPrice(_) => 1003,
            Self::BookingNotFound(_) => 2001,
            Self::NotBookingOwner(_) => 2002,
            Self::SeatConflict { .. } => 2101,
            Self::AlreadyCancelled(_) => 2102,
            Self::Storage(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSeat(_) | Self::EmptySelection | Self::InvalidPrice(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BookingNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotBookingOwner(_) => StatusCode::FORBIDDEN,
            Self::SeatConflict { .. } | Self::AlreadyCancelled(_) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the contested seats if this is a [`Self::SeatConflict`].
    #[must_use]
    pub fn conflict_seats(&self) -> Option<&[SeatId]> {
        match self {
            Self::SeatConflict { seats } => Some(seats),
            _ => None,
        }
    }
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = self.conflict_seats().map(format_seats);
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

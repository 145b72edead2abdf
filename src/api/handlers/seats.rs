//! Seat-map endpoint handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SeatMapResponse;
use crate::app_state::AppState;
use crate::domain::ShowtimeId;
use crate::error::{ErrorResponse, ReservationError};

/// `GET /showtimes/:id/seats` — Current seat map for a showtime.
///
/// # Errors
///
/// Returns [`ReservationError::Storage`] if the ledger is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/showtimes/{id}/seats",
    tag = "Seats",
    summary = "Get the seat map",
    description = "Returns the grid shape and the currently booked seat ids for a \
                   showtime. A snapshot for display only: the reserve endpoint \
                   re-derives availability atomically at commit time.",
    params(
        ("id" = uuid::Uuid, Path, description = "Showtime UUID"),
    ),
    responses(
        (status = 200, description = "Seat map", body = SeatMapResponse),
        (status = 500, description = "Ledger unreachable", body = ErrorResponse),
    )
)]
pub async fn get_seat_map(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ReservationError> {
    let booked = state
        .booking_service
        .booked_seats(ShowtimeId::from_uuid(id))
        .await?;

    Ok(Json(SeatMapResponse::new(id, &booked)))
}

/// Seat routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/showtimes/{id}/seats", get(get_seat_map))
}

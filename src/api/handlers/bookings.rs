//! Reservation and cancellation endpoint handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{BookingHistoryParams, BookingResponse, CancelRequest, ReserveRequest};
use crate::app_state::AppState;
use crate::domain::{BookingId, SeatId, ShowtimeId, UserId};
use crate::error::{ErrorResponse, ReservationError};

/// `POST /showtimes/:id/bookings` — Reserve seats for a showtime.
///
/// # Errors
///
/// Returns [`ReservationError`] on malformed seats, an empty selection,
/// a negative price, or seat contention.
#[utoipa::path(
    post,
    path = "/api/v1/showtimes/{id}/bookings",
    tag = "Bookings",
    summary = "Reserve seats",
    description = "Atomically reserves a seat set for a showtime. On contention the \
                   whole request is rejected and the error details name exactly the \
                   contested seats so the client can prune them and re-submit.",
    params(
        ("id" = uuid::Uuid, Path, description = "Showtime UUID"),
    ),
    request_body = ReserveRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Invalid seat id, empty selection, or negative price", body = ErrorResponse),
        (status = 409, description = "One or more seats already booked", body = ErrorResponse),
    )
)]
pub async fn reserve_seats(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ReserveRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    let seats = req
        .seats
        .iter()
        .map(|s| s.parse::<SeatId>())
        .collect::<Result<Vec<_>, _>>()?;

    let booking = state
        .booking_service
        .reserve(
            ShowtimeId::from_uuid(id),
            seats,
            UserId::from_uuid(req.user_id),
            req.price_per_seat,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(&booking))))
}

/// `POST /bookings/:id/cancel` — Cancel a booking, releasing its seats.
///
/// # Errors
///
/// Returns [`ReservationError`] if the booking is missing, owned by
/// another user, or already cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel a booking",
    description = "Transitions a confirmed booking to cancelled and releases its seats \
                   for re-booking. Repeated cancellation is reported, not silently accepted.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 403, description = "Booking owned by another user", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking already cancelled", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CancelRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    let booking = state
        .booking_service
        .cancel(BookingId::from_uuid(id), UserId::from_uuid(req.user_id))
        .await?;

    Ok(Json(BookingResponse::from(&booking)))
}

/// `GET /bookings?user_id=…` — List a user's bookings, newest first.
///
/// # Errors
///
/// Returns [`ReservationError::Storage`] if the ledger is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List a user's bookings",
    description = "Returns all of the user's bookings, newest first, including cancelled ones.",
    params(
        ("user_id" = uuid::Uuid, Query, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Booking history", body = Vec<BookingResponse>),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingHistoryParams>,
) -> Result<impl IntoResponse, ReservationError> {
    let bookings = state
        .booking_service
        .bookings_for_user(UserId::from_uuid(params.user_id))
        .await?;

    let body: Vec<BookingResponse> = bookings.iter().map(BookingResponse::from).collect();
    Ok(Json(body))
}

/// Booking routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/showtimes/{id}/bookings", post(reserve_seats))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        .route("/bookings", get(list_bookings))
}

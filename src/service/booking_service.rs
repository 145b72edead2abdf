//! Booking service: validation and orchestration of the reserve and
//! cancel protocols.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{Booking, BookingId, SeatId, ShowtimeId, UserId};
use crate::error::ReservationError;
use crate::ledger::ReservationLedger;

/// Orchestration layer for all reservation operations.
///
/// Stateless coordinator over an injected [`ReservationLedger`]. Request
/// validation happens here, before any ledger access; the atomic
/// check-and-commit itself is the ledger's responsibility so the
/// guarantee holds regardless of how many service instances exist.
#[derive(Debug, Clone)]
pub struct BookingService {
    ledger: Arc<dyn ReservationLedger>,
}

impl BookingService {
    /// Creates a new `BookingService` over the given ledger.
    #[must_use]
    pub fn new(ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { ledger }
    }

    /// Reserves `seats` for `user_id` on the given showtime.
    ///
    /// The seat list is deduplicated preserving first occurrence; the
    /// booking total is `seat count × price_per_seat`, computed here and
    /// never recomputed. On contention the whole request is rejected —
    /// a partial win is never granted — and the error names exactly the
    /// contested seats so the caller can prune them and re-submit.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::EmptySelection`] or
    /// [`ReservationError::InvalidPrice`] before any ledger access,
    /// [`ReservationError::SeatConflict`] on contention, and
    /// [`ReservationError::Storage`] on infrastructure failure.
    pub async fn reserve(
        &self,
        showtime_id: ShowtimeId,
        seats: Vec<SeatId>,
        user_id: UserId,
        price_per_seat: i64,
    ) -> Result<Booking, ReservationError> {
        if seats.is_empty() {
            return Err(ReservationError::EmptySelection);
        }
        if price_per_seat < 0 {
            return Err(ReservationError::InvalidPrice(price_per_seat));
        }

        let seats = dedup_preserving_order(seats);
        let seat_count = i64::try_from(seats.len())
            .map_err(|_| ReservationError::Internal("seat count overflow".to_string()))?;
        let total = seat_count.saturating_mul(price_per_seat);

        let booking = Booking::confirmed(user_id, showtime_id, seats, total);
        self.ledger.commit_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            %showtime_id,
            seats = booking.seats.len(),
            total = booking.total_amount,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancels a booking on behalf of `requester`, releasing its seats
    /// for re-booking.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BookingNotFound`],
    /// [`ReservationError::NotBookingOwner`],
    /// [`ReservationError::AlreadyCancelled`], or
    /// [`ReservationError::Storage`].
    pub async fn cancel(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<Booking, ReservationError> {
        let booking = self.ledger.cancel_booking(booking_id, requester).await?;
        tracing::info!(
            %booking_id,
            showtime_id = %booking.showtime_id,
            seats = booking.seats.len(),
            "booking cancelled"
        );
        Ok(booking)
    }

    /// Returns the currently booked seats for a showtime, for rendering
    /// a seat grid. The snapshot may be superseded by the fresh check
    /// the commit path performs.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    pub async fn booked_seats(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<BTreeSet<SeatId>, ReservationError> {
        self.ledger.booked_seats(showtime_id).await
    }

    /// Returns a booking by id, if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    pub async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, ReservationError> {
        self.ledger.find_booking(booking_id).await
    }

    /// Returns all of a user's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    pub async fn bookings_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Booking>, ReservationError> {
        self.ledger.bookings_for_user(user_id).await
    }
}

/// Collapses duplicate seats, keeping the first occurrence's position.
fn dedup_preserving_order(seats: Vec<SeatId>) -> Vec<SeatId> {
    let mut seen = BTreeSet::new();
    seats.into_iter().filter(|s| seen.insert(*s)).collect()
}

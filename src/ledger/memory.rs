//! In-memory ledger with a per-showtime exclusive section.
//!
//! [`InMemoryLedger`] keeps bookings in a `HashMap` where each showtime's
//! records sit behind their own [`tokio::sync::Mutex`]. Reserve and
//! cancel calls for the same showtime are strictly serialized; calls for
//! different showtimes never contend. This is the lock-based variant of
//! the commit protocol and the backing store for the test suite.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::ReservationLedger;
use crate::domain::{Booking, BookingId, BookingStatus, SeatId, ShowtimeId, UserId};
use crate::error::ReservationError;

/// Bookings for one showtime, guarded by that showtime's mutex.
#[derive(Debug, Default)]
struct ShowtimeRecords {
    bookings: Vec<Booking>,
}

impl ShowtimeRecords {
    /// Union of seat sets over confirmed bookings. Derived fresh on
    /// every call; never cached across the check-then-commit sequence.
    fn booked_seats(&self) -> BTreeSet<SeatId> {
        self.bookings
            .iter()
            .filter(|b| b.is_confirmed())
            .flat_map(|b| b.seats.iter().copied())
            .collect()
    }
}

/// In-memory [`ReservationLedger`] with per-showtime locking.
///
/// # Concurrency
///
/// - The outer map is behind an `RwLock` touched only long enough to
///   clone a showtime's `Arc<Mutex<..>>` handle.
/// - The whole check-and-commit (and cancel) sequence runs holding the
///   showtime's mutex, so no two calls are in the atomic section for
///   the same showtime concurrently.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    showtimes: RwLock<HashMap<ShowtimeId, Arc<Mutex<ShowtimeRecords>>>>,
    /// Booking id → owning showtime, so cancellation can find the right
    /// showtime section to lock.
    index: RwLock<HashMap<BookingId, ShowtimeId>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock handle for a showtime, creating it on first use.
    async fn showtime_section(&self, showtime_id: ShowtimeId) -> Arc<Mutex<ShowtimeRecords>> {
        if let Some(section) = self.showtimes.read().await.get(&showtime_id) {
            return Arc::clone(section);
        }
        let mut map = self.showtimes.write().await;
        Arc::clone(map.entry(showtime_id).or_default())
    }
}

#[async_trait]
impl ReservationLedger for InMemoryLedger {
    async fn booked_seats(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<BTreeSet<SeatId>, ReservationError> {
        let section = self.showtime_section(showtime_id).await;
        let records = section.lock().await;
        Ok(records.booked_seats())
    }

    async fn commit_booking(&self, booking: &Booking) -> Result<(), ReservationError> {
        let section = self.showtime_section(booking.showtime_id).await;
        let mut records = section.lock().await;

        let booked = records.booked_seats();
        let conflict: Vec<SeatId> = booking
            .seat_set()
            .intersection(&booked)
            .copied()
            .collect();
        if !conflict.is_empty() {
            return Err(ReservationError::SeatConflict { seats: conflict });
        }

        records.bookings.push(booking.clone());
        self.index
            .write()
            .await
            .insert(booking.id, booking.showtime_id);
        Ok(())
    }

    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, ReservationError> {
        let Some(showtime_id) = self.index.read().await.get(&booking_id).copied() else {
            return Ok(None);
        };
        let section = self.showtime_section(showtime_id).await;
        let records = section.lock().await;
        Ok(records.bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<Booking, ReservationError> {
        let Some(showtime_id) = self.index.read().await.get(&booking_id).copied() else {
            return Err(ReservationError::BookingNotFound(booking_id));
        };
        let section = self.showtime_section(showtime_id).await;
        let mut records = section.lock().await;

        let Some(booking) = records.bookings.iter_mut().find(|b| b.id == booking_id) else {
            return Err(ReservationError::BookingNotFound(booking_id));
        };
        if booking.user_id != requester {
            return Err(ReservationError::NotBookingOwner(booking_id));
        }
        if !booking.is_confirmed() {
            return Err(ReservationError::AlreadyCancelled(booking_id));
        }

        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, ReservationError> {
        let map = self.showtimes.read().await;
        let mut result = Vec::new();
        for section in map.values() {
            let records = section.lock().await;
            result.extend(
                records
                    .bookings
                    .iter()
                    .filter(|b| b.user_id == user_id)
                    .cloned(),
            );
        }
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

//! Reservation ledger: durable store of booking records.
//!
//! The ledger is the single source of truth for seat availability and
//! the only shared mutable state in the reservation core. It is passed
//! to the service layer as an explicit dependency so the commit protocol
//! stays testable in isolation.
//!
//! Two implementations exist:
//!
//! - [`PostgresLedger`]: seat claims decomposed one row per seat with a
//!   partial unique index on `(showtime_id, seat_id)`, so the storage
//!   engine itself rejects colliding commits. Correct across multiple
//!   gateway instances; the production wiring.
//! - [`InMemoryLedger`]: an exclusive async section keyed per showtime.
//!   Backs unit and property tests without a database.

pub mod memory;
pub mod postgres;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Booking, BookingId, SeatId, ShowtimeId, UserId};
use crate::error::ReservationError;

pub use memory::InMemoryLedger;
pub use postgres::PostgresLedger;

/// Durable store of booking records and their status lifecycle.
///
/// Every implementation must guarantee that [`commit_booking`] and
/// [`cancel_booking`] are strictly serialized per showtime: the
/// booked-seat check and the booking write behave as one atomic unit
/// with respect to every other call touching the same showtime. Calls
/// for different showtimes must not contend.
///
/// [`commit_booking`]: ReservationLedger::commit_booking
/// [`cancel_booking`]: ReservationLedger::cancel_booking
#[async_trait]
pub trait ReservationLedger: Send + Sync + std::fmt::Debug {
    /// Derives the set of currently booked seats for a showtime: the
    /// union of seat sets over all confirmed bookings.
    ///
    /// The result is a snapshot of ledger state at the instant of the
    /// call and carries no staleness guarantee; the commit path performs
    /// its own fresh derivation inside the atomic section.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    async fn booked_seats(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<BTreeSet<SeatId>, ReservationError>;

    /// Atomically checks the booking's seats against the current booked
    /// set for its showtime and appends it if none collide.
    ///
    /// A losing request is rejected in full, never partially granted.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::SeatConflict`] naming exactly the
    /// contested seats, or [`ReservationError::Storage`] on
    /// infrastructure failure.
    async fn commit_booking(&self, booking: &Booking) -> Result<(), ReservationError>;

    /// Looks up a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, ReservationError>;

    /// Transitions a confirmed booking to cancelled and releases its
    /// seats, atomically with respect to concurrent commits for the same
    /// showtime. Ownership and status checks happen inside the atomic
    /// section so racing cancellations cannot both report success.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BookingNotFound`],
    /// [`ReservationError::NotBookingOwner`],
    /// [`ReservationError::AlreadyCancelled`], or
    /// [`ReservationError::Storage`].
    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<Booking, ReservationError>;

    /// Returns all of a user's bookings, newest first, including
    /// cancelled ones.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Storage`] if the ledger is unreachable.
    async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, ReservationError>;
}

//! Domain layer: seat identity, booking aggregate, and id newtypes.
//!
//! This module contains the reservation core's domain model: seat ids
//! within the fixed auditorium grid, the booking aggregate with its
//! confirmed/cancelled lifecycle, and type-safe UUID newtypes for
//! showtimes, bookings, and users.

pub mod booking;
pub mod ids;
pub mod seat_id;

pub use booking::{Booking, BookingStatus};
pub use ids::{BookingId, ShowtimeId, UserId};
pub use seat_id::SeatId;

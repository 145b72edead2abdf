//! # boxoffice-gateway
//!
//! REST API for movie-ticket seat reservation under concurrent demand.
//!
//! The hard problem this service owns is seat contention: many clients
//! may try to claim overlapping seats for the same showtime at the same
//! time, and no seat may ever be held by two simultaneously confirmed
//! bookings. Catalog data (movie, showtime, ticket price) and user
//! authentication live in external collaborators — this service is the
//! reservation core and its thin HTTP surface.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingService (service/)   validation + orchestration
//!     │
//!     ├── ReservationLedger (ledger/) atomic check-and-commit
//!     │       ├── PostgresLedger     seat-claim rows + unique index
//!     │       └── InMemoryLedger     per-showtime mutex (tests)
//!     │
//!     └── Domain (domain/)           SeatId, Booking, id newtypes
//! ```
//!
//! ## Commit protocol
//!
//! A reservation recomputes the showtime's booked-seat set, intersects
//! it with the request, and either appends a confirmed booking or
//! rejects the whole request naming exactly the contested seats — all
//! inside one atomic section per showtime. Cancellation flips a booking
//! to cancelled and releases its seats through the same section, so a
//! freed seat is immediately re-bookable and never double-bookable.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod service;

//! Data Transfer Objects for REST request/response serialization.
//!
//! Seat ids cross the wire as their string form (`"A1"` … `"H10"`) and
//! are parsed at the handler boundary so malformed ids are rejected
//! before the core sees them.

pub mod booking_dto;
pub mod seat_dto;

pub use booking_dto::*;
pub use seat_dto::*;

//! Service layer: business logic orchestration.
//!
//! [`BookingService`] validates requests and drives the reserve and
//! cancel protocols against the injected [`crate::ledger::ReservationLedger`].

pub mod booking_service;

pub use booking_service::BookingService;

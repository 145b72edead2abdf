//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all reservation logic.
    pub booking_service: Arc<BookingService>,
}

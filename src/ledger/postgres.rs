//! PostgreSQL implementation of the reservation ledger.
//!
//! Bookings are stored two-tier: a `bookings` aggregate row keeps the
//! display-ordered seat array, and one `seat_claims` row per seat carries
//! the availability state. A partial unique index on
//! `(showtime_id, seat_id) WHERE NOT released` makes the storage engine
//! reject any commit that would double-book a seat, even when multiple
//! gateway instances run without a shared in-process lock.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ReservationLedger;
use crate::domain::{Booking, BookingId, BookingStatus, SeatId, ShowtimeId, UserId};
use crate::error::ReservationError;

/// A `bookings` table row before domain conversion.
type BookingRow = (Uuid, Uuid, Uuid, Vec<String>, i64, String, DateTime<Utc>);

const SELECT_BOOKING: &str =
    "SELECT id, user_id, showtime_id, seats, total_amount, status, created_at FROM bookings";

/// PostgreSQL-backed [`ReservationLedger`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Creates a ledger over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active claims among `seats` for a showtime, in grid order.
    async fn active_claims_among(
        &self,
        showtime_id: ShowtimeId,
        seats: &[String],
    ) -> Result<Vec<SeatId>, ReservationError> {
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT seat_id FROM seat_claims \
             WHERE showtime_id = $1 AND NOT released AND seat_id = ANY($2)",
        )
        .bind(showtime_id.as_uuid())
        .bind(seats)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        parse_seats(taken).map(|set| set.into_iter().collect())
    }
}

#[async_trait]
impl ReservationLedger for PostgresLedger {
    async fn booked_seats(
        &self,
        showtime_id: ShowtimeId,
    ) -> Result<BTreeSet<SeatId>, ReservationError> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT seat_id FROM seat_claims WHERE showtime_id = $1 AND NOT released",
        )
        .bind(showtime_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        parse_seats(rows)
    }

    async fn commit_booking(&self, booking: &Booking) -> Result<(), ReservationError> {
        let seat_strings: Vec<String> = booking.seats.iter().map(ToString::to_string).collect();

        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        // Conflict check inside the transaction. The partial unique
        // index below is the backstop for commits racing past this read.
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT seat_id FROM seat_claims \
             WHERE showtime_id = $1 AND NOT released AND seat_id = ANY($2)",
        )
        .bind(booking.showtime_id.as_uuid())
        .bind(&seat_strings)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_err)?;
        if !taken.is_empty() {
            let seats: Vec<SeatId> = parse_seats(taken)?.into_iter().collect();
            return Err(ReservationError::SeatConflict { seats });
        }

        sqlx::query(
            "INSERT INTO bookings (id, user_id, showtime_id, seats, total_amount, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_uuid())
        .bind(booking.showtime_id.as_uuid())
        .bind(&seat_strings)
        .bind(booking.total_amount)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        let claims = sqlx::query(
            "INSERT INTO seat_claims (booking_id, showtime_id, seat_id) \
             SELECT $1, $2, seat FROM UNNEST($3::text[]) AS seat",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.showtime_id.as_uuid())
        .bind(&seat_strings)
        .execute(&mut *tx)
        .await;

        match claims {
            Ok(_) => tx.commit().await.map_err(storage_err),
            Err(e) if is_unique_violation(&e) => {
                // A racing booking landed between the check and the
                // insert; the index aborted the whole transaction.
                // Re-derive the contested seats for the error report.
                let _ = tx.rollback().await;
                let mut seats = self
                    .active_claims_among(booking.showtime_id, &seat_strings)
                    .await?;
                if seats.is_empty() {
                    // The racing claim was released again before the
                    // re-read; report the full request rather than an
                    // empty conflict.
                    seats = booking.seat_set().into_iter().collect();
                }
                Err(ReservationError::SeatConflict { seats })
            }
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, ReservationError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} WHERE id = $1"))
                .bind(booking_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_err)?;

        row.map(row_to_booking).transpose()
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<Booking, ReservationError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        // Row lock serializes racing cancellations of the same booking.
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} WHERE id = $1 FOR UPDATE"))
                .bind(booking_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage_err)?;
        let Some(row) = row else {
            return Err(ReservationError::BookingNotFound(booking_id));
        };
        let mut booking = row_to_booking(row)?;

        if booking.user_id != requester {
            return Err(ReservationError::NotBookingOwner(booking_id));
        }
        if !booking.is_confirmed() {
            return Err(ReservationError::AlreadyCancelled(booking_id));
        }

        sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = $1")
            .bind(booking_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        sqlx::query("UPDATE seat_claims SET released = TRUE WHERE booking_id = $1")
            .bind(booking_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        booking.status = BookingStatus::Cancelled;
        Ok(booking)
    }

    async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, ReservationError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING} WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(row_to_booking).collect()
    }
}

/// Maps any sqlx failure into [`ReservationError::Storage`].
fn storage_err(e: sqlx::Error) -> ReservationError {
    ReservationError::Storage(e.to_string())
}

/// Returns `true` for PostgreSQL unique-constraint violations (SQLSTATE 23505).
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Parses stored seat id strings, rejecting anything outside the grid as
/// ledger corruption rather than a caller error.
fn parse_seats(raw: Vec<String>) -> Result<BTreeSet<SeatId>, ReservationError> {
    raw.into_iter()
        .map(|s| {
            s.parse::<SeatId>()
                .map_err(|_| ReservationError::Storage(format!("corrupt seat id in ledger: {s}")))
        })
        .collect()
}

/// Converts a `bookings` row into the domain aggregate.
fn row_to_booking(
    (id, user_id, showtime_id, seats, total_amount, status, created_at): BookingRow,
) -> Result<Booking, ReservationError> {
    let seats = seats
        .into_iter()
        .map(|s| {
            s.parse::<SeatId>()
                .map_err(|_| ReservationError::Storage(format!("corrupt seat id in ledger: {s}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let status = status
        .parse::<BookingStatus>()
        .map_err(ReservationError::Storage)?;

    Ok(Booking {
        id: BookingId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        showtime_id: ShowtimeId::from_uuid(showtime_id),
        seats,
        total_amount,
        status,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_seats_sorts_into_grid_order() {
        let raw = vec!["B1".to_string(), "A10".to_string(), "A2".to_string()];
        let Ok(parsed) = parse_seats(raw) else {
            panic!("valid seats should parse");
        };
        let ordered: Vec<String> = parsed.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, vec!["A2", "A10", "B1"]);
    }

    #[test]
    fn parse_seats_flags_corruption_as_storage_error() {
        let raw = vec!["A1".to_string(), "Z99".to_string()];
        assert!(matches!(
            parse_seats(raw),
            Err(ReservationError::Storage(_))
        ));
    }

    #[test]
    fn row_to_booking_rejects_unknown_status() {
        let row: BookingRow = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec!["A1".to_string()],
            250,
            "held".to_string(),
            Utc::now(),
        );
        assert!(matches!(
            row_to_booking(row),
            Err(ReservationError::Storage(_))
        ));
    }
}

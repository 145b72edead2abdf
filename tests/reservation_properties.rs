//! Concurrency properties of the reservation core.
//!
//! These tests drive the public library surface (BookingService over the
//! in-memory ledger) from many concurrent tasks and assert the
//! correctness properties the commit protocol guarantees: disjointness
//! of confirmed bookings, no lost updates, and complete conflict
//! reporting.

#![allow(clippy::panic)]

use std::collections::BTreeSet;
use std::sync::Arc;

use boxoffice_gateway::domain::{Booking, SeatId, ShowtimeId, UserId};
use boxoffice_gateway::error::ReservationError;
use boxoffice_gateway::ledger::InMemoryLedger;
use boxoffice_gateway::service::BookingService;

fn make_service() -> Arc<BookingService> {
    Arc::new(BookingService::new(Arc::new(InMemoryLedger::new())))
}

fn seats(ids: &[&str]) -> Vec<SeatId> {
    ids.iter()
        .map(|s| s.parse().unwrap_or_else(|_| panic!("bad seat {s}")))
        .collect()
}

/// Every seat of every confirmed booking, with a panic on any seat
/// claimed by two confirmed bookings.
fn assert_disjoint(bookings: &[Booking]) -> BTreeSet<SeatId> {
    let mut all = BTreeSet::new();
    for booking in bookings {
        for seat in &booking.seats {
            assert!(
                all.insert(*seat),
                "seat {seat} held by two confirmed bookings"
            );
        }
    }
    all
}

#[tokio::test]
async fn disjoint_concurrent_reserves_all_succeed() {
    // No lost updates: 8 tasks each reserve one full row of the same
    // showtime. All must succeed and the booked set must be their union.
    let service = make_service();
    let showtime = ShowtimeId::new();

    let mut handles = Vec::new();
    for row in ["A", "B", "C", "D", "E", "F", "G", "H"] {
        let service = Arc::clone(&service);
        let row_seats: Vec<SeatId> = (1..=10)
            .map(|col| {
                format!("{row}{col}")
                    .parse()
                    .unwrap_or_else(|_| panic!("bad seat"))
            })
            .collect();
        handles.push(tokio::spawn(async move {
            service.reserve(showtime, row_seats, UserId::new(), 250).await
        }));
    }

    let mut confirmed = Vec::new();
    for handle in handles {
        let Ok(result) = handle.await else {
            panic!("task panicked");
        };
        let Ok(booking) = result else {
            panic!("disjoint reserve must not conflict");
        };
        confirmed.push(booking);
    }

    let union = assert_disjoint(&confirmed);
    assert_eq!(union.len(), 80);

    let Ok(booked) = service.booked_seats(showtime).await else {
        panic!("seat map read failed");
    };
    assert_eq!(booked, union);
}

#[tokio::test]
async fn overlapping_concurrent_reserves_one_winner() {
    // Conflict completeness: two racing requests overlap on A2. Exactly
    // one wins; the loser's error lists precisely the overlap, and the
    // loser's non-contested seat is not granted to anyone.
    let service = make_service();
    let showtime = ShowtimeId::new();

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(
            async move { service.reserve(showtime, seats(&["A1", "A2"]), UserId::new(), 250).await },
        )
    };
    let second = {
        let service = Arc::clone(&service);
        tokio::spawn(
            async move { service.reserve(showtime, seats(&["A2", "A3"]), UserId::new(), 250).await },
        )
    };

    let (Ok(first), Ok(second)) = (first.await, second.await) else {
        panic!("task panicked");
    };

    let (winner, loser_err) = match (first, second) {
        (Ok(b), Err(e)) | (Err(e), Ok(b)) => (b, e),
        (Ok(_), Ok(_)) => panic!("overlapping requests must not both succeed"),
        (Err(_), Err(_)) => panic!("one of the requests must win"),
    };

    assert_eq!(loser_err.conflict_seats(), Some(seats(&["A2"]).as_slice()));

    let Ok(booked) = service.booked_seats(showtime).await else {
        panic!("seat map read failed");
    };
    assert_eq!(booked, winner.seat_set());
}

#[tokio::test]
async fn invariant_holds_across_mixed_reserve_and_cancel_storm() {
    // 20 tasks fight over 10 seats in reserve/cancel cycles; afterwards
    // no seat may be claimed by two confirmed bookings.
    let service = make_service();
    let showtime = ShowtimeId::new();

    let mut handles = Vec::new();
    for task in 0..20u8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let user = UserId::new();
            let col = u8::try_from(usize::from(task) % 10 + 1).unwrap_or(1);
            let target = seats(&[&format!("D{col}")]);
            let mut kept = Vec::new();
            for round in 0..5u8 {
                match service.reserve(showtime, target.clone(), user, 100).await {
                    Ok(booking) => {
                        if round % 2 == 0 {
                            let _ = service.cancel(booking.id, user).await;
                        } else {
                            kept.push(booking);
                        }
                    }
                    Err(ReservationError::SeatConflict { .. }) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            kept
        }));
    }

    let mut confirmed = Vec::new();
    for handle in handles {
        let Ok(kept) = handle.await else {
            panic!("task panicked");
        };
        confirmed.extend(kept);
    }

    // Survivors still confirmed in the ledger must be disjoint and match
    // the derived seat map exactly.
    let mut still_confirmed = Vec::new();
    for booking in confirmed {
        let Ok(Some(current)) = service.find_booking(booking.id).await else {
            panic!("committed booking must be findable");
        };
        if current.is_confirmed() {
            still_confirmed.push(current);
        }
    }
    let union = assert_disjoint(&still_confirmed);

    let Ok(booked) = service.booked_seats(showtime).await else {
        panic!("seat map read failed");
    };
    assert_eq!(booked, union);
}

#[tokio::test]
async fn cancellation_racing_reserve_never_loses_a_seat() {
    // A cancellation and a reservation racing on the same seat must
    // serialize: whatever the interleaving, the seat ends up held by at
    // most one confirmed booking.
    let service = make_service();
    let showtime = ShowtimeId::new();
    let owner = UserId::new();

    let Ok(original) = service.reserve(showtime, seats(&["G5"]), owner, 200).await else {
        panic!("initial reserve must succeed");
    };

    let cancel = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.cancel(original.id, owner).await })
    };
    let rebook = {
        let service = Arc::clone(&service);
        tokio::spawn(
            async move { service.reserve(showtime, seats(&["G5"]), UserId::new(), 200).await },
        )
    };

    let (Ok(cancel), Ok(rebook)) = (cancel.await, rebook.await) else {
        panic!("task panicked");
    };
    assert!(cancel.is_ok(), "owner cancellation must succeed");

    let Ok(booked) = service.booked_seats(showtime).await else {
        panic!("seat map read failed");
    };
    match rebook {
        // Rebook ran after the cancel: it owns the seat now.
        Ok(booking) => assert_eq!(booked, booking.seat_set()),
        // Rebook ran before the cancel and lost: seat is free now.
        Err(ReservationError::SeatConflict { seats }) => {
            assert_eq!(seats, self::seats(&["G5"]));
            assert!(booked.is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn repeated_concurrent_cancels_report_exactly_one_success() {
    let service = make_service();
    let owner = UserId::new();

    let Ok(booking) = service
        .reserve(ShowtimeId::new(), seats(&["A1"]), owner, 250)
        .await
    else {
        panic!("reserve must succeed");
    };

    let booking_id = booking.id;
    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(
            async move { service.cancel(booking_id, owner).await },
        ));
    }

    let mut successes = 0;
    let mut already = 0;
    for handle in handles {
        let Ok(result) = handle.await else {
            panic!("task panicked");
        };
        match result {
            Ok(_) => successes += 1,
            Err(ReservationError::AlreadyCancelled(_)) => already += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(already, 3);
}

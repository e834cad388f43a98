//! Reservation Manager Integration Test
//!
//! Exercises a full reservation round and the concurrency guarantees:
//! 1. Buyers and sellers reserve from many threads at once
//! 2. Racing duplicate reservations resolve to exactly one winner
//! 3. Racing takes on one reservation resolve to exactly one winner

use gridmarket_core::{MarketParticipant, Side};
use gridmarket_reservation::{ReservationError, ReservationManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn test_buyer_seller_scenario() {
    let manager = ReservationManager::new();
    let b1 = MarketParticipant::buyer("B1");
    let s1 = MarketParticipant::seller("S1");

    manager.make_reservation(&b1).unwrap();
    manager.make_reservation(&s1).unwrap();

    assert!(manager.has_market_formed());
    assert_eq!(manager.buyer_count(), 1);
    assert_eq!(manager.seller_count(), 1);

    assert!(manager.take_reservation(&b1).is_ok());
    assert!(matches!(
        manager.take_reservation(&b1),
        Err(ReservationError::AlreadyTaken { .. })
    ));
}

#[test]
fn test_concurrent_distinct_identities() {
    let manager = ReservationManager::new();

    thread::scope(|scope| {
        for i in 0..16 {
            let manager = &manager;
            scope.spawn(move || {
                let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                for j in 0..50 {
                    let participant = MarketParticipant::new(format!("agent-{i}-{j}"), side);
                    manager.make_reservation(&participant).unwrap();
                    manager.take_reservation(&participant).unwrap();
                }
            });
        }
    });

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.buyers, 400);
    assert_eq!(snapshot.sellers, 400);
    assert_eq!(snapshot.buyers_taken, 400);
    assert_eq!(snapshot.sellers_taken, 400);
}

#[test]
fn test_racing_duplicate_reservations() {
    let manager = ReservationManager::new();
    let wins = AtomicUsize::new(0);
    let duplicates = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                match manager.make_reservation(&MarketParticipant::seller("S1")) {
                    Ok(()) => wins.fetch_add(1, Ordering::SeqCst),
                    Err(ReservationError::DuplicateReservation { .. }) => {
                        duplicates.fetch_add(1, Ordering::SeqCst)
                    }
                    Err(other) => panic!("unexpected error: {other}"),
                };
            });
        }
    });

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert_eq!(duplicates.load(Ordering::SeqCst), 7);
    assert_eq!(manager.seller_count(), 1);
}

#[test]
fn test_racing_takes() {
    let manager = ReservationManager::new();
    let buyer = MarketParticipant::buyer("B1");
    manager.make_reservation(&buyer).unwrap();
    let wins = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                if manager.take_reservation(&buyer).is_ok() {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert!(manager.is_taken(&buyer));
}

#[test]
fn test_snapshot_serializes() {
    let manager = ReservationManager::new();
    manager
        .make_reservation(&MarketParticipant::buyer("B1"))
        .unwrap();

    let json = serde_json::to_value(manager.snapshot()).unwrap();
    assert_eq!(json["buyers"], 1);
    assert_eq!(json["sellers"], 0);
}

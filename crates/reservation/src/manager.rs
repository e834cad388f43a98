use std::collections::HashMap;

use gridmarket_core::{MarketParticipant, ParticipantId, Side};
use gridmarket_ports::{ReservationError, ReservationResult};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;

/// identity -> taken flag, one map per side
#[derive(Debug, Default)]
struct Reservations {
    buy: HashMap<ParticipantId, bool>,
    sell: HashMap<ParticipantId, bool>,
}

impl Reservations {
    fn side(&self, side: Side) -> &HashMap<ParticipantId, bool> {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut HashMap<ParticipantId, bool> {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}

/// Point-in-time view of the reservation book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationSnapshot {
    pub buyers: usize,
    pub sellers: usize,
    pub buyers_taken: usize,
    pub sellers_taken: usize,
}

/// Tracks which participants reserved a buy or sell slot this round
#[derive(Debug, Default)]
pub struct ReservationManager {
    reservations: Mutex<Reservations>,
}

impl ReservationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot on the participant's side
    ///
    /// Fails without side effects if the identity already holds a
    /// reservation on either side.
    pub fn make_reservation(&self, participant: &MarketParticipant) -> ReservationResult<()> {
        let mut book = self.reservations.lock();
        let identity = &participant.identity;
        let side = participant.side;

        if book.side(side).contains_key(identity) {
            warn!("[RESERVATION] Duplicate {} reservation by {}", side, identity);
            return Err(ReservationError::DuplicateReservation {
                identity: identity.clone(),
                side,
            });
        }

        if book.side(side.opposite()).contains_key(identity) {
            warn!(
                "[RESERVATION] {} tried to reserve as {} while reserved as {}",
                identity,
                side,
                side.opposite()
            );
            return Err(ReservationError::SideConflict {
                identity: identity.clone(),
                reserved: side.opposite(),
                requested: side,
            });
        }

        book.side_mut(side).insert(identity.clone(), false);
        debug!("[RESERVATION] {} reserved as {}", identity, side);
        Ok(())
    }

    /// Consume a previously made reservation
    pub fn take_reservation(&self, participant: &MarketParticipant) -> ReservationResult<()> {
        let mut book = self.reservations.lock();
        let identity = &participant.identity;
        let side = participant.side;

        match book.side_mut(side).get_mut(identity) {
            None => {
                warn!("[RESERVATION] {} took a {} reservation it never made", identity, side);
                Err(ReservationError::NoSuchReservation {
                    identity: identity.clone(),
                    side,
                })
            }
            Some(taken) if *taken => {
                warn!("[RESERVATION] {} took its {} reservation twice", identity, side);
                Err(ReservationError::AlreadyTaken {
                    identity: identity.clone(),
                    side,
                })
            }
            Some(taken) => {
                *taken = true;
                debug!("[RESERVATION] {} took its {} reservation", identity, side);
                Ok(())
            }
        }
    }

    /// At least one buyer and one seller hold a reservation, taken or not
    pub fn has_market_formed(&self) -> bool {
        let book = self.reservations.lock();
        !book.buy.is_empty() && !book.sell.is_empty()
    }

    pub fn buyer_count(&self) -> usize {
        self.reservations.lock().buy.len()
    }

    pub fn seller_count(&self) -> usize {
        self.reservations.lock().sell.len()
    }

    /// Participant holds a reservation on its side and has taken it
    pub fn is_taken(&self, participant: &MarketParticipant) -> bool {
        self.reservations
            .lock()
            .side(participant.side)
            .get(&participant.identity)
            .copied()
            .unwrap_or(false)
    }

    /// Identities that reserved `side` but never took the reservation, sorted
    pub fn untaken(&self, side: Side) -> Vec<ParticipantId> {
        let book = self.reservations.lock();
        let mut ids: Vec<ParticipantId> = book
            .side(side)
            .iter()
            .filter(|(_, taken)| !**taken)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn snapshot(&self) -> ReservationSnapshot {
        let book = self.reservations.lock();
        ReservationSnapshot {
            buyers: book.buy.len(),
            sellers: book.sell.len(),
            buyers_taken: book.buy.values().filter(|t| **t).count(),
            sellers_taken: book.sell.values().filter(|t| **t).count(),
        }
    }

    /// Drop every reservation (round boundary)
    pub fn clear(&self) {
        let mut book = self.reservations.lock();
        book.buy.clear();
        book.sell.clear();
    }
}

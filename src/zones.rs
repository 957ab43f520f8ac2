//! Zone tracking and card movement.
//!
//! The `ZoneMap` tracks where every card is and handles movement between
//! zones. A card's uid appears in exactly one zone across both seats at any
//! time: every move is remove-then-insert through [`ZoneMap::move_to`], and
//! the reverse index (`locations`) is updated in the same call.
//!
//! All zones keep insertion order. Order is rules-relevant for decks (draw
//! from the head), board lanes (tie-breaks scan in insertion order) and trap
//! zones (earlier-placed traps win); for hands it only keeps the UI stable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::card::CardUid;
use crate::core::seat::{Seat, SeatMap};

/// Maximum number of cards in a board lane.
pub const LANE_CAPACITY: usize = 5;

/// Ordered list of card handles in one zone.
///
/// Inline capacity covers every zone except decks and discards mid-match.
pub type ZoneList = SmallVec<[CardUid; 8]>;

/// The kinds of zone a seat owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Draw pile; the head is drawn first.
    Deck,
    Hand,
    /// Government board lane (capacity [`LANE_CAPACITY`]).
    Government,
    /// Public board lane (capacity [`LANE_CAPACITY`]).
    Public,
    /// Single-card slot for an ongoing government initiative.
    PermanentGovernment,
    /// Single-card slot for an ongoing public initiative.
    PermanentPublic,
    /// Transient slot an instant initiative passes through while resolving.
    InstantSlot,
    /// Face-down interventions, in placement order.
    Traps,
    Discard,
}

/// A zone of a specific seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneAddress {
    pub seat: Seat,
    pub kind: ZoneKind,
}

impl ZoneAddress {
    #[must_use]
    pub const fn new(seat: Seat, kind: ZoneKind) -> Self {
        Self { seat, kind }
    }
}

impl std::fmt::Display for ZoneAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.seat, self.kind)
    }
}

/// Ordered lists for every zone one seat owns.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SeatZones {
    deck: ZoneList,
    hand: ZoneList,
    government: ZoneList,
    public: ZoneList,
    permanent_government: ZoneList,
    permanent_public: ZoneList,
    instant: ZoneList,
    traps: ZoneList,
    discard: ZoneList,
}

impl SeatZones {
    fn list(&self, kind: ZoneKind) -> &ZoneList {
        match kind {
            ZoneKind::Deck => &self.deck,
            ZoneKind::Hand => &self.hand,
            ZoneKind::Government => &self.government,
            ZoneKind::Public => &self.public,
            ZoneKind::PermanentGovernment => &self.permanent_government,
            ZoneKind::PermanentPublic => &self.permanent_public,
            ZoneKind::InstantSlot => &self.instant,
            ZoneKind::Traps => &self.traps,
            ZoneKind::Discard => &self.discard,
        }
    }

    fn list_mut(&mut self, kind: ZoneKind) -> &mut ZoneList {
        match kind {
            ZoneKind::Deck => &mut self.deck,
            ZoneKind::Hand => &mut self.hand,
            ZoneKind::Government => &mut self.government,
            ZoneKind::Public => &mut self.public,
            ZoneKind::PermanentGovernment => &mut self.permanent_government,
            ZoneKind::PermanentPublic => &mut self.permanent_public,
            ZoneKind::InstantSlot => &mut self.instant,
            ZoneKind::Traps => &mut self.traps,
            ZoneKind::Discard => &mut self.discard,
        }
    }
}

/// Tracks card locations across both seats' zones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneMap {
    /// Reverse index: uid -> current zone.
    locations: FxHashMap<CardUid, ZoneAddress>,
    seats: SeatMap<SeatZones>,
}

impl Default for ZoneMap {
    fn default() -> Self {
        Self {
            locations: FxHashMap::default(),
            seats: SeatMap::with_default(),
        }
    }
}

impl ZoneMap {
    /// Create an empty zone map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly minted card to a zone (appended at the tail).
    ///
    /// Panics if the card is already tracked; minting the same uid twice is
    /// a programmer error.
    pub fn add(&mut self, uid: CardUid, addr: ZoneAddress) {
        if self.locations.contains_key(&uid) {
            panic!("{uid} already tracked by zone map");
        }
        self.locations.insert(uid, addr);
        self.seats[addr.seat].list_mut(addr.kind).push(uid);
    }

    /// Move a card to another zone (appended at the tail).
    ///
    /// Returns the old zone, or `None` if the card is not tracked.
    pub fn move_to(&mut self, uid: CardUid, addr: ZoneAddress) -> Option<ZoneAddress> {
        let old = self.locations.get(&uid).copied()?;
        if old == addr {
            return Some(old);
        }

        self.seats[old.seat].list_mut(old.kind).retain(|u| *u != uid);
        self.locations.insert(uid, addr);
        self.seats[addr.seat].list_mut(addr.kind).push(uid);

        Some(old)
    }

    /// Remove a card from tracking entirely.
    ///
    /// Returns the zone it was in, or `None` if not tracked.
    pub fn remove(&mut self, uid: CardUid) -> Option<ZoneAddress> {
        let addr = self.locations.remove(&uid)?;
        self.seats[addr.seat].list_mut(addr.kind).retain(|u| *u != uid);
        Some(addr)
    }

    /// Get the zone a card is in.
    #[must_use]
    pub fn address_of(&self, uid: CardUid) -> Option<ZoneAddress> {
        self.locations.get(&uid).copied()
    }

    /// Check if a card is in a specific zone.
    #[must_use]
    pub fn is_in(&self, uid: CardUid, addr: ZoneAddress) -> bool {
        self.locations.get(&uid) == Some(&addr)
    }

    #[must_use]
    pub fn contains(&self, uid: CardUid) -> bool {
        self.locations.contains_key(&uid)
    }

    /// Cards in a zone, in order.
    #[must_use]
    pub fn cards(&self, addr: ZoneAddress) -> &[CardUid] {
        self.seats[addr.seat].list(addr.kind)
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn len(&self, addr: ZoneAddress) -> usize {
        self.seats[addr.seat].list(addr.kind).len()
    }

    #[must_use]
    pub fn is_empty(&self, addr: ZoneAddress) -> bool {
        self.len(addr) == 0
    }

    /// The sole occupant of a single-card zone, if any.
    #[must_use]
    pub fn single(&self, addr: ZoneAddress) -> Option<CardUid> {
        self.cards(addr).first().copied()
    }

    /// Remove and return the head of a zone (deck draw).
    pub fn pop_head(&mut self, addr: ZoneAddress) -> Option<CardUid> {
        let list = self.seats[addr.seat].list_mut(addr.kind);
        if list.is_empty() {
            return None;
        }
        let uid = list.remove(0);
        self.locations.remove(&uid);
        Some(uid)
    }

    /// Total number of tracked cards.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Shuffle a zone's order in place.
    pub fn shuffle(&mut self, addr: ZoneAddress, rng: &mut crate::core::rng::MatchRng) {
        rng.shuffle(self.seats[addr.seat].list_mut(addr.kind));
    }
}

//! Match state: the single in-memory object graph for one play session.
//!
//! `MatchState` owns everything the rules read or write: the card arena,
//! zone map, per-seat economy counters, effect flags, the pending event
//! queue, the append-only log, and the command buffer used to hand turns to
//! the AI without re-entrant mutation.
//!
//! Every public operation of the engine takes `&mut MatchState` and either
//! commits a consistent mutation plus a log line, or leaves the state
//! untouched. There is no partially-applied state to observe.

use serde::{Deserialize, Serialize};

use crate::content::ContentSet;
use crate::core::card::{CardArena, CardUid, PoliticianCard, SpecialCard};
use crate::core::flags::EffectFlags;
use crate::core::rng::MatchRng;
use crate::core::seat::{Seat, SeatMap};
use crate::economy::BASE_AP;
use crate::events::MatchEvent;
use crate::zones::{ZoneAddress, ZoneKind, ZoneMap};

/// Where the match is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Turns are being taken.
    Playing,
    /// A seat reached two round wins; no further actions are valid.
    MatchOver(Seat),
}

/// A deferred instruction emitted by a transition, executed by the
/// embedding loop after the transition has committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// The named seat is AI-controlled and it is now their turn.
    AiTurn(Seat),
}

/// An influence change scheduled for the start-of-turn hook of a specific
/// round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredAdjustment {
    pub round: u32,
    pub target: CardUid,
    pub delta: i32,
}

/// Complete state of one match.
#[derive(Clone, Debug, Serialize)]
pub struct MatchState {
    /// Read-only content registry; not part of a snapshot.
    #[serde(skip)]
    pub content: ContentSet,

    /// Current round number (starts at 1).
    pub round: u32,

    /// Whose action is legal right now; the single arbiter of turn order.
    pub current: Seat,

    pub phase: MatchPhase,

    /// Per-seat action points, clamped to `0..=MAX_AP`.
    pub action_points: SeatMap<i32>,

    /// Actions taken this turn; the cap only gates positive-cost plays.
    pub actions_used: SeatMap<u32>,

    pub passed: SeatMap<bool>,

    /// Seats in the order they passed this round (first passer wins ties).
    pub pass_order: Vec<Seat>,

    pub rounds_won: SeatMap<u32>,

    pub flags: SeatMap<EffectFlags>,

    /// Which seats the AI plays.
    pub ai_controlled: SeatMap<bool>,

    /// UI-facing hand selection for the current seat. No rules weight;
    /// cleared whenever the hand can shift underneath it.
    pub selected_hand: Option<usize>,

    pub arena: CardArena,

    pub zones: ZoneMap,

    /// Events awaiting priority-ordered resolution.
    pub event_queue: Vec<MatchEvent>,

    /// Influence adjustments scheduled for future rounds.
    pub deferred: Vec<DeferredAdjustment>,

    /// Commands for the embedding loop (AI turn scheduling).
    pub commands: Vec<Command>,

    /// Human-readable match log; append-only, never pruned mid-match.
    pub log: im::Vector<String>,

    pub rng: MatchRng,
}

impl MatchState {
    /// Create a fresh match.
    ///
    /// Decks start empty; use [`crate::controller::start_match`] to build a
    /// playable match from deck lists.
    #[must_use]
    pub fn new(content: ContentSet, seed: u64) -> Self {
        Self {
            content,
            round: 1,
            current: Seat::One,
            phase: MatchPhase::Playing,
            action_points: SeatMap::with_value(BASE_AP),
            actions_used: SeatMap::with_value(0),
            passed: SeatMap::with_value(false),
            pass_order: Vec::new(),
            rounds_won: SeatMap::with_value(0),
            flags: SeatMap::with_default(),
            ai_controlled: SeatMap::with_value(false),
            selected_hand: None,
            arena: CardArena::new(),
            zones: ZoneMap::new(),
            event_queue: Vec::new(),
            deferred: Vec::new(),
            commands: Vec::new(),
            log: im::Vector::new(),
            rng: MatchRng::new(seed),
        }
    }

    /// Append a line to the match log.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push_back(line.into());
    }

    /// Shorthand for a zone address.
    #[must_use]
    pub fn zone(&self, seat: Seat, kind: ZoneKind) -> ZoneAddress {
        ZoneAddress::new(seat, kind)
    }

    #[must_use]
    pub fn hand(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Hand))
    }

    #[must_use]
    pub fn deck(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Deck))
    }

    #[must_use]
    pub fn government(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Government))
    }

    #[must_use]
    pub fn public_lane(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Public))
    }

    #[must_use]
    pub fn traps(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Traps))
    }

    #[must_use]
    pub fn discard(&self, seat: Seat) -> &[CardUid] {
        self.zones.cards(ZoneAddress::new(seat, ZoneKind::Discard))
    }

    /// The special card sitting in a permanent slot, if any.
    #[must_use]
    pub fn permanent(&self, seat: Seat, kind: ZoneKind) -> Option<&SpecialCard> {
        debug_assert!(matches!(
            kind,
            ZoneKind::PermanentGovernment | ZoneKind::PermanentPublic
        ));
        self.zones
            .single(ZoneAddress::new(seat, kind))
            .and_then(|uid| self.arena.special(uid))
    }

    /// Government politicians of a seat, in board order.
    pub fn government_politicians(&self, seat: Seat) -> impl Iterator<Item = &PoliticianCard> {
        self.government(seat)
            .iter()
            .filter_map(|&uid| self.arena.politician(uid))
    }

    /// Draw the head of a seat's deck into their hand.
    ///
    /// An empty deck is not an error: it logs and returns `None`.
    pub fn draw_to_hand(&mut self, seat: Seat) -> Option<CardUid> {
        let deck = ZoneAddress::new(seat, ZoneKind::Deck);
        match self.zones.pop_head(deck) {
            Some(uid) => {
                self.zones.add(uid, ZoneAddress::new(seat, ZoneKind::Hand));
                Some(uid)
            }
            None => {
                self.push_log(format!("{seat} cannot draw: deck is empty"));
                None
            }
        }
    }

    #[must_use]
    pub fn is_ai(&self, seat: Seat) -> bool {
        self.ai_controlled[seat]
    }

    /// Queue a command for the embedding loop.
    pub fn schedule(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Whether the match has a winner.
    #[must_use]
    pub fn winner(&self) -> Option<Seat> {
        match self.phase {
            MatchPhase::MatchOver(seat) => Some(seat),
            MatchPhase::Playing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;

    #[test]
    fn test_new_match_defaults() {
        let state = MatchState::new(ContentSet::standard(), 42);

        assert_eq!(state.round, 1);
        assert_eq!(state.current, Seat::One);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.action_points[Seat::One], BASE_AP);
        assert_eq!(state.rounds_won[Seat::Two], 0);
        assert!(state.log.is_empty());
        assert!(state.winner().is_none());
    }

    #[test]
    fn test_push_log_appends() {
        let mut state = MatchState::new(ContentSet::standard(), 42);

        state.push_log("first");
        state.push_log("second");

        assert_eq!(state.log.len(), 2);
        assert_eq!(state.log[0], "first");
        assert_eq!(state.log[1], "second");
    }

    #[test]
    fn test_draw_from_empty_deck_logs() {
        let mut state = MatchState::new(ContentSet::standard(), 42);

        assert_eq!(state.draw_to_hand(Seat::One), None);
        assert!(state.log.iter().any(|l| l.contains("deck is empty")));
        assert!(state.hand(Seat::One).is_empty());
    }

    #[test]
    fn test_snapshot_is_serializable() {
        let state = MatchState::new(ContentSet::standard(), 42);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"round\":1"));
    }
}

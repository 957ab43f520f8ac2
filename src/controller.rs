//! Turn and round control.
//!
//! The three entry points an embedding calls are [`start_match`],
//! [`play_card`], and [`pass_turn`]. Each validates everything before
//! mutating anything, so a rejected call leaves the state byte-identical.
//! A finished match rejects every action with [`PlayError::MatchOver`].
//!
//! Round resolution is reached in exactly one way: both seats have passed.
//! Scores are compared, the round is awarded (ties go to whoever passed
//! first), and either the match ends at two round wins or the boards reset
//! for the next round.

use thiserror::Error;

use crate::content::{build_deck, ContentError, ContentSet};
use crate::core::card::{Card, Lane, SpecialCategory};
use crate::core::seat::{Seat, SeatMap};
use crate::core::state::{Command, MatchPhase, MatchState};
use crate::economy::{self, BASE_AP};
use crate::effects::AuraKind;
use crate::events::{self, MatchEvent};
use crate::scoring;
use crate::traps;
use crate::zones::{ZoneAddress, ZoneKind, LANE_CAPACITY};

/// Cards drawn at match start and redrawn to at round start.
pub const OPENING_HAND: usize = 5;

/// Round wins needed to take the match.
pub const ROUNDS_TO_WIN: u32 = 2;

/// Rejection of a player action. The state is untouched when one of these
/// comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("the match is over")]
    MatchOver,

    #[error("it is not that seat's turn")]
    NotYourTurn,

    #[error("no card at that hand position")]
    InvalidHandIndex,

    #[error("not enough action points")]
    InsufficientAp,

    #[error("no more paid actions this turn")]
    ActionCapReached,

    #[error("that board row is full")]
    LaneFull,

    #[error("that permanent slot is occupied")]
    SlotOccupied,

    #[error("the card cannot go to that row")]
    InvalidLane,
}

/// Build and start a match: decks minted and shuffled, opening hands drawn,
/// round one opened.
pub fn start_match(
    content: ContentSet,
    seed: u64,
    deck_one: &[&str],
    deck_two: &[&str],
    ai_controlled: SeatMap<bool>,
) -> Result<MatchState, ContentError> {
    let mut state = MatchState::new(content, seed);
    state.ai_controlled = ai_controlled;

    build_deck(&mut state, Seat::One, deck_one)?;
    build_deck(&mut state, Seat::Two, deck_two)?;

    for seat in Seat::ALL {
        let deck = ZoneAddress::new(seat, ZoneKind::Deck);
        state.zones.shuffle(deck, &mut state.rng);
        for _ in 0..OPENING_HAND {
            state.draw_to_hand(seat);
        }
    }

    state.push_log("Match begins");
    state.event_queue.push(MatchEvent::RoundStart { round: 1 });
    events::resolve_queue(&mut state);

    if state.is_ai(state.current) {
        let seat = state.current;
        state.schedule(Command::AiTurn(seat));
    }

    Ok(state)
}

/// Play a card from hand.
///
/// `lane` is only meaningful for board cards; `None` lets the card pick its
/// natural destination. All checks run before any mutation.
pub fn play_card(
    state: &mut MatchState,
    seat: Seat,
    hand_index: usize,
    lane: Option<Lane>,
) -> Result<(), PlayError> {
    if state.phase != MatchPhase::Playing {
        return Err(PlayError::MatchOver);
    }
    if seat != state.current {
        return Err(PlayError::NotYourTurn);
    }

    let hand = state.hand(seat);
    let uid = *hand.get(hand_index).ok_or(PlayError::InvalidHandIndex)?;
    let card = state
        .arena
        .get(uid)
        .expect("hand card must exist in arena")
        .clone();

    let net = economy::net_cost(state, seat, &card);
    if net > 0 && state.actions_used[seat] >= economy::ACTION_CAP {
        return Err(PlayError::ActionCapReached);
    }
    if state.action_points[seat] < net {
        return Err(PlayError::InsufficientAp);
    }

    let destination = destination_for(state, seat, &card, lane)?;

    // Validation done; commit from here on.
    state.action_points[seat] -= net;
    state.actions_used[seat] += 1;
    if let Some(label) = economy::consume_discount(state, seat, &card) {
        state.push_log(format!("{seat} uses {label}"));
    }

    state.zones.move_to(uid, destination);
    // The played card shifts hand positions; any selection is stale.
    state.selected_hand = None;

    let event = match &card {
        Card::Politician(_) => {
            if state.flags[seat].next_gov_plus2 {
                state.flags[seat].next_gov_plus2 = false;
                if let Some(pol) = state.arena.politician_mut(uid) {
                    pol.temp_buffs += 2;
                }
                state.push_log(format!("{} enters with +2 influence", card.name()));
            }
            MatchEvent::PlayGov { seat, uid }
        }
        Card::Special(special) => match special.category {
            SpecialCategory::InstantInitiative | SpecialCategory::PermanentInitiative => {
                MatchEvent::PlayInitiative { seat, uid }
            }
            SpecialCategory::Intervention => MatchEvent::PlayIntervention { seat, uid },
            SpecialCategory::PublicCard => MatchEvent::PlayPublic { seat, uid },
        },
    };
    state.event_queue.push(event);
    events::resolve_queue(state);

    traps::on_board_check(state, seat);
    events::resolve_queue(state);

    Ok(())
}

/// Select (or clear) a hand card for the current seat.
///
/// Pure UI state: no rules consequence. An out-of-range index logs and
/// changes nothing.
pub fn select_hand_card(state: &mut MatchState, index: Option<usize>) {
    let seat = state.current;
    if let Some(i) = index {
        if i >= state.hand(seat).len() {
            state.push_log(format!("{seat} cannot select hand position {i}"));
            return;
        }
    }
    state.selected_hand = index;
}

/// Pass for the rest of the round.
///
/// When both seats have passed the round resolves immediately.
pub fn pass_turn(state: &mut MatchState, seat: Seat) -> Result<(), PlayError> {
    if state.phase != MatchPhase::Playing {
        return Err(PlayError::MatchOver);
    }
    if seat != state.current {
        return Err(PlayError::NotYourTurn);
    }

    state.passed[seat] = true;
    state.pass_order.push(seat);
    state.push_log(format!("{seat} passes"));

    next_turn(state);
    Ok(())
}

/// End the current seat's turn and hand play to whoever still acts.
pub fn next_turn(state: &mut MatchState) {
    if state.phase != MatchPhase::Playing {
        return;
    }

    if state.passed[Seat::One] && state.passed[Seat::Two] {
        resolve_round(state);
        return;
    }

    let opponent = state.current.opponent();
    if !state.passed[opponent] {
        state.current = opponent;
    }
    begin_turn(state);
}

/// Start-of-turn bookkeeping for the current seat.
fn begin_turn(state: &mut MatchState) {
    let seat = state.current;
    state.action_points[seat] = BASE_AP;
    state.actions_used[seat] = 0;
    state.selected_hand = None;

    // Shields granted in earlier rounds expire.
    let round = state.round;
    let gov: Vec<_> = state.government(seat).to_vec();
    for uid in gov {
        if let Some(pol) = state.arena.politician_mut(uid) {
            pol.ability_used_this_round = false;
            if pol.protected_until.is_some_and(|until| round > until) {
                pol.protected = false;
                pol.protected_until = None;
            }
        }
    }

    apply_deferred(state);

    state.push_log(format!("{seat} begins a turn with {BASE_AP} AP"));

    if state.is_ai(seat) {
        state.schedule(Command::AiTurn(seat));
    }
}

/// Apply influence adjustments whose round has arrived.
fn apply_deferred(state: &mut MatchState) {
    let round = state.round;
    let due: Vec<_> = state
        .deferred
        .iter()
        .copied()
        .filter(|adj| adj.round <= round)
        .collect();
    state.deferred.retain(|adj| adj.round > round);

    for adj in due {
        if let Some(pol) = state.arena.politician_mut(adj.target) {
            pol.influence += adj.delta;
            let line = format!("{} influence changes by {}", pol.name, adj.delta);
            state.push_log(line);
        }
    }
}

/// Score the round, award it, and either finish the match or reset for the
/// next round.
fn resolve_round(state: &mut MatchState) {
    let round = state.round;
    let one = scoring::score(state, Seat::One);
    let two = scoring::score(state, Seat::Two);
    state.push_log(format!("Round {round} scores: {one} to {two}"));

    let winner = if one > two {
        Seat::One
    } else if two > one {
        Seat::Two
    } else {
        let first_passer = state.pass_order.first().copied().unwrap_or(Seat::One);
        state.push_log(format!("Tie broken in favour of {first_passer}, who passed first"));
        first_passer
    };

    state.rounds_won[winner] += 1;
    state.push_log(format!("{winner} wins round {round}"));

    if state.rounds_won[winner] >= ROUNDS_TO_WIN {
        state.phase = MatchPhase::MatchOver(winner);
        state.push_log(format!("{winner} wins the match"));
        return;
    }

    state.event_queue.push(MatchEvent::RoundEnd { round });
    events::resolve_queue(state);

    // Redraw targets shrink while the opponent runs a news blackout;
    // compute them before the boards clear.
    let redraw_target: SeatMap<usize> =
        SeatMap::new(|seat| OPENING_HAND - usize::from(blackout_against(state, seat)));

    clear_boards(state);

    for seat in Seat::ALL {
        state.flags[seat].reset_for_round();
        state.passed[seat] = false;
        state.action_points[seat] = BASE_AP;
        state.actions_used[seat] = 0;
        while state.hand(seat).len() < redraw_target[seat] {
            if state.draw_to_hand(seat).is_none() {
                break;
            }
        }
    }
    state.pass_order.clear();

    state.round += 1;
    state.current = Seat::starter_for_round(state.round);

    let round = state.round;
    state.event_queue.push(MatchEvent::RoundStart { round });
    events::resolve_queue(state);

    begin_turn(state);
}

/// Whether the seat's opponent has an active news blackout in play.
fn blackout_against(state: &MatchState, seat: Seat) -> bool {
    state
        .public_lane(seat.opponent())
        .iter()
        .filter_map(|&uid| state.arena.special(uid))
        .any(|special| special.base == "news-blackout" && !special.deactivated)
}

/// Sweep every board zone into its owner's discard pile.
fn clear_boards(state: &mut MatchState) {
    const BOARD_ZONES: [ZoneKind; 6] = [
        ZoneKind::Government,
        ZoneKind::Public,
        ZoneKind::PermanentGovernment,
        ZoneKind::PermanentPublic,
        ZoneKind::InstantSlot,
        ZoneKind::Traps,
    ];

    for seat in Seat::ALL {
        for kind in BOARD_ZONES {
            let cards: Vec<_> = state.zones.cards(ZoneAddress::new(seat, kind)).to_vec();
            for uid in cards {
                if let Some(pol) = state.arena.politician_mut(uid) {
                    pol.reset_transients();
                }
                state
                    .zones
                    .move_to(uid, ZoneAddress::new(seat, ZoneKind::Discard));
            }
        }
    }
}

/// Destination zone for a card, after capacity and slot checks.
pub(crate) fn destination_for(
    state: &MatchState,
    seat: Seat,
    card: &Card,
    lane: Option<Lane>,
) -> Result<ZoneAddress, PlayError> {
    let addr = match card {
        Card::Politician(_) => {
            if lane == Some(Lane::Public) {
                return Err(PlayError::InvalidLane);
            }
            let addr = ZoneAddress::new(seat, ZoneKind::Government);
            if state.zones.len(addr) >= LANE_CAPACITY {
                return Err(PlayError::LaneFull);
            }
            addr
        }
        Card::Special(special) => match special.category {
            SpecialCategory::InstantInitiative => {
                if lane.is_some() {
                    return Err(PlayError::InvalidLane);
                }
                ZoneAddress::new(seat, ZoneKind::InstantSlot)
            }
            SpecialCategory::PermanentInitiative => {
                if lane.is_some() {
                    return Err(PlayError::InvalidLane);
                }
                let kind = match special.aura {
                    Some(AuraKind::ArchetypeBacking(_)) => ZoneKind::PermanentPublic,
                    Some(AuraKind::TierBonus(_) | AuraKind::Transparency) | None => {
                        ZoneKind::PermanentGovernment
                    }
                };
                let addr = ZoneAddress::new(seat, kind);
                if !state.zones.is_empty(addr) {
                    return Err(PlayError::SlotOccupied);
                }
                addr
            }
            SpecialCategory::Intervention => {
                if lane.is_some() {
                    return Err(PlayError::InvalidLane);
                }
                ZoneAddress::new(seat, ZoneKind::Traps)
            }
            SpecialCategory::PublicCard => {
                if lane == Some(Lane::Government) {
                    return Err(PlayError::InvalidLane);
                }
                let addr = ZoneAddress::new(seat, ZoneKind::Public);
                if state.zones.len(addr) >= LANE_CAPACITY {
                    return Err(PlayError::LaneFull);
                }
                addr
            }
        },
    };

    Ok(addr)
}

//! Heuristic opponent.
//!
//! Single-ply: the engine looks at the current board, scores every playable
//! hand card with fixed bands, and commits exactly one action per
//! invocation through the same public controller API a human uses. No
//! search, no look-ahead, no hidden state inspection beyond its own hand.
//!
//! The controller hands turns over via [`Command::AiTurn`] after the turn
//! switch has committed; [`run_pending`] drains those commands. The AI is
//! never invoked re-entrantly inside a transition.

use tracing::warn;

use crate::controller;
use crate::core::card::{Card, CardUid, SpecialCategory};
use crate::core::seat::Seat;
use crate::core::state::{Command, MatchPhase, MatchState};
use crate::economy::{self, ACTION_CAP};
use crate::scoring;
use crate::traps::TrapTrigger;

/// Influence deficit past which government plays get a catch-up bonus.
const BEHIND_THRESHOLD: i32 = 3;

const GOV_BASE: i32 = 50;
const GOV_PER_INFLUENCE: i32 = 2;
const GOV_CATCH_UP: i32 = 30;
const TRAP_BASE: i32 = 30;
const TRAP_HAS_TARGET: i32 = 40;
const INSTANT_BASE: i32 = 25;
const PERMANENT_BASE: i32 = 20;
const PUBLIC_BASE: i32 = 15;

/// Drain queued AI-turn commands in submission order, driving each
/// scheduled turn to its end.
pub fn run_pending(state: &mut MatchState) {
    while !state.commands.is_empty() {
        let Command::AiTurn(seat) = state.commands.remove(0);
        drive_turn(state, seat);
    }
}

/// Play out one full AI turn: act until the budget runs dry or nothing
/// qualifies, then pass.
pub fn drive_turn(state: &mut MatchState, seat: Seat) {
    loop {
        if state.phase != MatchPhase::Playing || state.current != seat {
            return;
        }
        if !take_action(state, seat) {
            return;
        }
    }
}

/// Take at most one action. Returns `true` if a card was played; `false`
/// means the seat passed (or could not act) and the turn is over.
pub fn take_action(state: &mut MatchState, seat: Seat) -> bool {
    if state.phase != MatchPhase::Playing || state.current != seat {
        return false;
    }

    if state.action_points[seat] <= 0 || state.actions_used[seat] >= ACTION_CAP {
        let _ = controller::pass_turn(state, seat);
        return false;
    }

    let Some(index) = best_candidate(state, seat) else {
        let _ = controller::pass_turn(state, seat);
        return false;
    };

    match controller::play_card(state, seat, index, None) {
        Ok(()) => true,
        Err(err) => {
            warn!(%seat, %err, "candidate play rejected; passing");
            let _ = controller::pass_turn(state, seat);
            false
        }
    }
}

/// Index of the best playable hand card, ties resolved by hand order.
fn best_candidate(state: &MatchState, seat: Seat) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;

    for (index, &uid) in state.hand(seat).iter().enumerate() {
        let Some(card) = state.arena.get(uid) else {
            continue;
        };
        if !economy::can_play(state, seat, card) {
            continue;
        }
        if controller::destination_for(state, seat, card, None).is_err() {
            continue;
        }

        let value = score_candidate(state, seat, card);
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index)
}

/// Fixed heuristic band for one candidate.
fn score_candidate(state: &MatchState, seat: Seat, card: &Card) -> i32 {
    match card {
        Card::Politician(pol) => {
            let mut value = GOV_BASE + GOV_PER_INFLUENCE * pol.influence;
            let deficit = scoring::score(state, seat.opponent()) - scoring::score(state, seat);
            if deficit > BEHIND_THRESHOLD {
                value += GOV_CATCH_UP;
            }
            value
        }
        Card::Special(special) => match special.category {
            SpecialCategory::Intervention => {
                let mut value = TRAP_BASE;
                if special
                    .trigger
                    .is_some_and(|t| trigger_has_target(state, seat.opponent(), t))
                {
                    value += TRAP_HAS_TARGET;
                }
                value
            }
            SpecialCategory::InstantInitiative => INSTANT_BASE,
            SpecialCategory::PermanentInitiative => PERMANENT_BASE,
            SpecialCategory::PublicCard => PUBLIC_BASE,
        },
    }
}

/// Whether the opponent's current board already offers a matching subject
/// for a trap trigger.
fn trigger_has_target(state: &MatchState, opponent: Seat, trigger: TrapTrigger) -> bool {
    match trigger {
        TrapTrigger::StrongGovernment { min_influence } => state
            .government_politicians(opponent)
            .any(|pol| !pol.deactivated && pol.effective_influence() >= min_influence),
        TrapTrigger::GovernmentRole(role) => state
            .government_politicians(opponent)
            .any(|pol| !pol.deactivated && pol.tag == role),
        TrapTrigger::PublicArchetype(tag) => {
            state.public_lane(opponent).iter().any(|&uid| {
                archetype_of(state, uid) == Some(tag)
            })
        }
        TrapTrigger::GovernmentMajority { count } => {
            state.government(opponent).len() >= count
        }
        TrapTrigger::AnyInitiative => false,
    }
}

fn archetype_of(state: &MatchState, uid: CardUid) -> Option<crate::core::card::ArchetypeTag> {
    let card = state.arena.get(uid)?;
    card.archetype()
        .or_else(|| state.content.archetype_for_name(card.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;
    use crate::core::seat::SeatMap;
    use crate::zones::{ZoneAddress, ZoneKind};

    fn ai_match() -> MatchState {
        let deck = crate::content::standard_deck();
        let mut ai = SeatMap::with_value(false);
        ai[Seat::Two] = true;
        controller::start_match(ContentSet::standard(), 42, &deck, &deck, ai).unwrap()
    }

    fn clear_hand(state: &mut MatchState, seat: Seat) {
        let hand: Vec<_> = state.hand(seat).to_vec();
        for uid in hand {
            state
                .zones
                .move_to(uid, ZoneAddress::new(seat, ZoneKind::Discard));
        }
    }

    fn give(state: &mut MatchState, seat: Seat, id: &str) {
        let uid = state.arena.alloc_uid();
        let card = state.content.instantiate(id, uid).unwrap();
        state.arena.insert(card);
        state.zones.add(uid, ZoneAddress::new(seat, ZoneKind::Hand));
    }

    fn place(state: &mut MatchState, seat: Seat, id: &str, kind: ZoneKind) {
        let uid = state.arena.alloc_uid();
        let card = state.content.instantiate(id, uid).unwrap();
        state.arena.insert(card);
        state.zones.add(uid, ZoneAddress::new(seat, kind));
    }

    #[test]
    fn test_no_ap_means_pass() {
        let mut state = ai_match();
        controller::pass_turn(&mut state, Seat::One).unwrap();
        state.action_points[Seat::Two] = 0;

        // The pass completes the round, so the pass flags are already
        // reset; round advancement is the observable outcome.
        assert!(!take_action(&mut state, Seat::Two));
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_empty_hand_means_pass() {
        let mut state = ai_match();
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);

        assert!(!take_action(&mut state, Seat::Two));
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_politician_beats_generic_initiative() {
        let mut state = ai_match();
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);
        give(&mut state, Seat::Two, "briefing");
        give(&mut state, Seat::Two, "chancellor");

        assert!(take_action(&mut state, Seat::Two));
        assert_eq!(state.government(Seat::Two).len(), 1);
    }

    #[test]
    fn test_armed_trap_preferred_when_target_exists() {
        let mut state = ai_match();
        // Matching boards keep the influence deficit under the catch-up
        // threshold, so the mayor stays at its flat band.
        place(&mut state, Seat::One, "chancellor", ZoneKind::Government);
        place(&mut state, Seat::Two, "chancellor", ZoneKind::Government);
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);
        give(&mut state, Seat::Two, "mayor");
        give(&mut state, Seat::Two, "leak-scandal");

        assert!(take_action(&mut state, Seat::Two));
        // 30 + 40 for the trap beats 50 + 4 for the mayor.
        assert_eq!(state.traps(Seat::Two).len(), 1);
        assert_eq!(state.government(Seat::Two).len(), 1);
    }

    #[test]
    fn test_trap_without_target_loses_to_politician() {
        let mut state = ai_match();
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);
        give(&mut state, Seat::Two, "mayor");
        give(&mut state, Seat::Two, "leak-scandal");

        assert!(take_action(&mut state, Seat::Two));
        assert_eq!(state.government(Seat::Two).len(), 1);
        assert!(state.traps(Seat::Two).is_empty());
    }

    #[test]
    fn test_occupied_slot_disqualifies_candidate() {
        let mut state = ai_match();
        place(&mut state, Seat::Two, "youth-quota", ZoneKind::PermanentGovernment);
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);
        give(&mut state, Seat::Two, "seniority-act");

        // Only candidate is unplayable; the AI passes instead of erroring,
        // which closes out the round.
        assert!(!take_action(&mut state, Seat::Two));
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_drive_turn_spends_budget_then_passes() {
        let mut state = ai_match();
        controller::pass_turn(&mut state, Seat::One).unwrap();
        clear_hand(&mut state, Seat::Two);
        give(&mut state, Seat::Two, "mayor");
        give(&mut state, Seat::Two, "professor");
        give(&mut state, Seat::Two, "union-leader");

        drive_turn(&mut state, Seat::Two);

        // Two paid plays, then the cap forces a pass and the round resolves.
        assert_eq!(state.round, 2);
        assert_eq!(state.rounds_won[Seat::Two], 1);
    }

    #[test]
    fn test_commands_run_in_submission_order() {
        let deck = crate::content::standard_deck();
        let mut state = controller::start_match(
            ContentSet::standard(),
            42,
            &deck,
            &deck,
            SeatMap::with_value(false),
        )
        .unwrap();
        clear_hand(&mut state, Seat::One);
        clear_hand(&mut state, Seat::Two);
        state.schedule(Command::AiTurn(Seat::One));
        state.schedule(Command::AiTurn(Seat::Two));

        run_pending(&mut state);

        // Front-first: seat one's command runs while it holds the turn and
        // passes; seat two's command then finds the turn handed over and
        // passes too, resolving the round. Back-first draining would hit
        // seat two's command out of turn and leave the round open.
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_run_pending_drains_commands() {
        let mut state = ai_match();
        clear_hand(&mut state, Seat::Two);
        controller::pass_turn(&mut state, Seat::One).unwrap();

        assert_eq!(state.commands, vec![Command::AiTurn(Seat::Two)]);
        run_pending(&mut state);

        assert!(state.commands.is_empty());
        assert!(state.passed[Seat::Two] || state.round > 1);
    }
}

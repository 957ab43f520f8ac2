//! Match events and the priority-ordered resolver.
//!
//! Plays do not resolve inline: the controller places the card, enqueues an
//! event, and lets [`resolve_queue`] drain the queue in priority order.
//! Interventions resolve before initiatives, which resolve before board
//! plays; within a band the queue keeps FIFO order (stable sort). Events
//! pushed while a handler runs are picked up on the next drain pass.
//!
//! A handler that fails logs the event's tag and is skipped; the resolver
//! never aborts a pass over one bad event.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::card::{CardUid, SpecialCategory};
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::effects::{self, EffectError};
use crate::traps;
use crate::zones::{ZoneAddress, ZoneKind};

/// A pending occurrence awaiting resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A face-down intervention was set.
    PlayIntervention { seat: Seat, uid: CardUid },
    /// An instant or permanent initiative was played.
    PlayInitiative { seat: Seat, uid: CardUid },
    /// A public card entered the public row.
    PlayPublic { seat: Seat, uid: CardUid },
    /// A politician entered the government row.
    PlayGov { seat: Seat, uid: CardUid },
    /// A card was deactivated by an effect.
    CardDisabled { uid: CardUid },
    /// A deactivated card came back.
    CardReactivated { uid: CardUid },
    RoundStart { round: u32 },
    RoundEnd { round: u32 },
}

impl MatchEvent {
    /// Resolution band; lower resolves first. FIFO within a band.
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            MatchEvent::PlayIntervention { .. } => 0,
            MatchEvent::PlayInitiative { .. } => 1,
            MatchEvent::PlayPublic { .. } | MatchEvent::PlayGov { .. } => 2,
            MatchEvent::CardDisabled { .. } | MatchEvent::CardReactivated { .. } => 3,
            MatchEvent::RoundStart { .. } | MatchEvent::RoundEnd { .. } => 4,
        }
    }

    /// Short label for log lines.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            MatchEvent::PlayIntervention { .. } => "play-intervention",
            MatchEvent::PlayInitiative { .. } => "play-initiative",
            MatchEvent::PlayPublic { .. } => "play-public",
            MatchEvent::PlayGov { .. } => "play-government",
            MatchEvent::CardDisabled { .. } => "card-disabled",
            MatchEvent::CardReactivated { .. } => "card-reactivated",
            MatchEvent::RoundStart { .. } => "round-start",
            MatchEvent::RoundEnd { .. } => "round-end",
        }
    }
}

/// Drain the event queue to empty, resolving in priority order.
pub fn resolve_queue(state: &mut MatchState) {
    while !state.event_queue.is_empty() {
        let mut batch = std::mem::take(&mut state.event_queue);
        batch.sort_by_key(MatchEvent::priority);

        for event in batch {
            if let Err(err) = handle(state, event) {
                warn!(event = event.tag(), %err, "event resolution failed");
                state.push_log(format!("{} could not resolve: {err}", event.tag()));
            }
        }
    }
}

fn handle(state: &mut MatchState, event: MatchEvent) -> Result<(), EffectError> {
    match event {
        MatchEvent::PlayIntervention { seat, uid } => {
            let name = card_name(state, uid)?;
            state.push_log(format!("{seat} sets {name} face down"));
        }
        MatchEvent::PlayInitiative { seat, uid } => {
            let name = card_name(state, uid)?;
            state.push_log(format!("{seat} plays {name}"));

            if !traps::on_card_played(state, seat, uid) {
                return Ok(());
            }

            let category = state
                .arena
                .special(uid)
                .ok_or(EffectError::MissingCard(uid))?
                .category;
            match category {
                SpecialCategory::InstantInitiative => {
                    effects::dispatch(state, seat, uid)?;
                    state
                        .zones
                        .move_to(uid, ZoneAddress::new(seat, ZoneKind::Discard));
                }
                SpecialCategory::PermanentInitiative => {
                    state.push_log(format!("{name} takes effect while it remains in play"));
                }
                SpecialCategory::Intervention | SpecialCategory::PublicCard => {
                    warn!(event = event.tag(), card = %name, "unexpected category");
                }
            }
        }
        MatchEvent::PlayPublic { seat, uid } => {
            let name = card_name(state, uid)?;
            state.push_log(format!("{seat} plays {name} to the public row"));

            if !traps::on_card_played(state, seat, uid) {
                return Ok(());
            }

            let has_effect = state
                .arena
                .special(uid)
                .ok_or(EffectError::MissingCard(uid))?
                .effect
                .is_some();
            if has_effect {
                effects::dispatch(state, seat, uid)?;
            }
        }
        MatchEvent::PlayGov { seat, uid } => {
            let name = card_name(state, uid)?;
            state.push_log(format!("{seat} seats {name} in the government row"));
            traps::on_card_played(state, seat, uid);
        }
        MatchEvent::CardDisabled { uid } => {
            let name = card_name(state, uid)?;
            state.push_log(format!("{name} is out of action"));
        }
        MatchEvent::CardReactivated { uid } => {
            match state.arena.get_mut(uid) {
                Some(crate::core::card::Card::Politician(pol)) => pol.deactivated = false,
                Some(crate::core::card::Card::Special(special)) => special.deactivated = false,
                None => return Err(EffectError::MissingCard(uid)),
            }
            let name = card_name(state, uid)?;
            state.push_log(format!("{name} is back in action"));
        }
        MatchEvent::RoundStart { round } => {
            state.push_log(format!("Round {round} begins"));
        }
        MatchEvent::RoundEnd { round } => {
            state.push_log(format!("Round {round} ends"));
        }
    }

    Ok(())
}

fn card_name(state: &MatchState, uid: CardUid) -> Result<String, EffectError> {
    state
        .arena
        .get(uid)
        .map(|card| card.name().to_string())
        .ok_or(EffectError::MissingCard(uid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;

    fn fresh_state() -> MatchState {
        MatchState::new(ContentSet::standard(), 42)
    }

    fn place(state: &mut MatchState, seat: Seat, id: &str, kind: ZoneKind) -> CardUid {
        let uid = state.arena.alloc_uid();
        let card = state.content.instantiate(id, uid).unwrap();
        state.arena.insert(card);
        state.zones.add(uid, ZoneAddress::new(seat, kind));
        uid
    }

    #[test]
    fn test_priority_bands() {
        let uid = CardUid(0);
        let seat = Seat::One;

        assert!(
            MatchEvent::PlayIntervention { seat, uid }.priority()
                < MatchEvent::PlayInitiative { seat, uid }.priority()
        );
        assert!(
            MatchEvent::PlayInitiative { seat, uid }.priority()
                < MatchEvent::PlayGov { seat, uid }.priority()
        );
        assert!(
            MatchEvent::PlayGov { seat, uid }.priority()
                < MatchEvent::CardDisabled { uid }.priority()
        );
        assert!(
            MatchEvent::CardDisabled { uid }.priority()
                < MatchEvent::RoundEnd { round: 1 }.priority()
        );
    }

    #[test]
    fn test_queue_resolves_by_priority_not_insertion() {
        let mut state = fresh_state();
        let gov = place(&mut state, Seat::One, "mayor", ZoneKind::Government);
        let trap = place(&mut state, Seat::One, "leak-scandal", ZoneKind::Traps);
        let instant = place(&mut state, Seat::One, "emergency-session", ZoneKind::InstantSlot);

        state.event_queue.push(MatchEvent::PlayGov { seat: Seat::One, uid: gov });
        state
            .event_queue
            .push(MatchEvent::PlayIntervention { seat: Seat::One, uid: trap });
        state
            .event_queue
            .push(MatchEvent::PlayInitiative { seat: Seat::One, uid: instant });

        resolve_queue(&mut state);

        let lines: Vec<&String> = state.log.iter().collect();
        let pos = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(pos("sets Leak Scandal") < pos("plays Emergency Session"));
        assert!(pos("plays Emergency Session") < pos("seats Mayor"));
    }

    #[test]
    fn test_fifo_within_a_band() {
        let mut state = fresh_state();
        let first = place(&mut state, Seat::One, "mayor", ZoneKind::Government);
        let second = place(&mut state, Seat::One, "professor", ZoneKind::Government);

        state
            .event_queue
            .push(MatchEvent::PlayGov { seat: Seat::One, uid: first });
        state
            .event_queue
            .push(MatchEvent::PlayGov { seat: Seat::One, uid: second });

        resolve_queue(&mut state);

        let lines: Vec<&String> = state.log.iter().collect();
        let pos = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(pos("Mayor") < pos("Professor"));
    }

    #[test]
    fn test_instant_resolves_then_discards() {
        let mut state = fresh_state();
        let instant = place(&mut state, Seat::One, "emergency-session", ZoneKind::InstantSlot);
        state.action_points[Seat::One] = 1;

        state
            .event_queue
            .push(MatchEvent::PlayInitiative { seat: Seat::One, uid: instant });
        resolve_queue(&mut state);

        assert_eq!(state.action_points[Seat::One], 2);
        assert!(state
            .zones
            .is_in(instant, ZoneAddress::new(Seat::One, ZoneKind::Discard)));
    }

    #[test]
    fn test_destroyed_initiative_never_fires() {
        let mut state = fresh_state();
        place(&mut state, Seat::Two, "budget-freeze", ZoneKind::Traps);
        let instant = place(&mut state, Seat::One, "emergency-session", ZoneKind::InstantSlot);
        state.action_points[Seat::One] = 1;

        state
            .event_queue
            .push(MatchEvent::PlayInitiative { seat: Seat::One, uid: instant });
        resolve_queue(&mut state);

        assert_eq!(state.action_points[Seat::One], 1);
        assert!(state
            .zones
            .is_in(instant, ZoneAddress::new(Seat::One, ZoneKind::Discard)));
    }

    #[test]
    fn test_missing_card_event_fails_soft() {
        let mut state = fresh_state();

        state.event_queue.push(MatchEvent::CardDisabled { uid: CardUid(999) });
        resolve_queue(&mut state);

        assert!(state.log.iter().any(|l| l.contains("could not resolve")));
    }

    #[test]
    fn test_reactivation_clears_flag() {
        let mut state = fresh_state();
        let pol = place(&mut state, Seat::One, "chancellor", ZoneKind::Government);
        state.arena.politician_mut(pol).unwrap().deactivated = true;

        state.event_queue.push(MatchEvent::CardReactivated { uid: pol });
        resolve_queue(&mut state);

        assert!(!state.arena.politician(pol).unwrap().deactivated);
    }
}

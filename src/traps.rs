//! Face-down interventions and their trigger evaluation.
//!
//! Interventions sit in the owner's trap zone until an opposing play
//! satisfies their trigger. Traps are scanned in placement order and each
//! one is evaluated against the board as it stands at that moment, so an
//! earlier trap can invalidate a later one by removing its subject. A trap
//! that springs is spent and moves to the discard pile; the scan keeps going
//! over the remaining traps.
//!
//! Trigger matching is kind-first: the closed [`TrapTrigger`] mapped at load
//! time decides. A legacy card that arrives without a mapping falls back to
//! the name table, and a card that matches neither simply never fires.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::card::{ArchetypeTag, Card, CardUid, RoleTag, SpecialCategory};
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::events::MatchEvent;
use crate::zones::{ZoneAddress, ZoneKind};

/// Predicate deciding when a face-down intervention springs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapTrigger {
    /// An opposing government card with at least this much influence enters.
    StrongGovernment { min_influence: i32 },
    /// An opposing government card with this role enters.
    GovernmentRole(RoleTag),
    /// An opposing public card of this archetype enters.
    PublicArchetype(ArchetypeTag),
    /// Any opposing initiative (instant or permanent) is played.
    AnyInitiative,
    /// The opposing government row reaches this many cards.
    GovernmentMajority { count: usize },
}

/// What a sprung trap does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapEffect {
    /// The subject stops contributing influence and abilities.
    Deactivate,
    /// Transient influence change on the subject.
    InfluenceDelta(i32),
    /// The subject goes back to its owner's hand, transients cleared.
    ReturnToHand,
    /// The subject moves to its owner's discard pile.
    Destroy,
    /// The acting seat discards a random card from hand.
    ForceDiscard,
    /// The acting seat cannot transfer influence this round.
    BlockTransfers,
}

/// Name-based fallback for legacy intervention templates. Checked only when
/// a card carries no explicit trigger mapping.
#[must_use]
pub fn fallback_for_name(name: &str) -> Option<(TrapTrigger, TrapEffect)> {
    match name {
        "Leak Scandal" => Some((
            TrapTrigger::StrongGovernment { min_influence: 5 },
            TrapEffect::Deactivate,
        )),
        "Smear Campaign" => Some((
            TrapTrigger::GovernmentRole(RoleTag::General),
            TrapEffect::InfluenceDelta(-2),
        )),
        "Counter Campaign" => Some((
            TrapTrigger::PublicArchetype(ArchetypeTag::Ngo),
            TrapEffect::Destroy,
        )),
        "Budget Freeze" => Some((TrapTrigger::AnyInitiative, TrapEffect::Destroy)),
        _ => None,
    }
}

/// Evaluate the defender's traps against a card the actor just played.
///
/// `uid` must already sit in its destination zone. Returns `true` if the
/// subject is still there after the scan; a `false` tells the caller not to
/// resolve the card's own effect.
pub fn on_card_played(state: &mut MatchState, actor: Seat, uid: CardUid) -> bool {
    let Some(origin) = state.zones.address_of(uid) else {
        return false;
    };

    let defender = actor.opponent();
    let armed: Vec<CardUid> = state.traps(defender).to_vec();

    for trap_uid in armed {
        let Some((trigger, effect, trap_name)) = trap_parts(state, trap_uid) else {
            continue;
        };

        // Re-check against the live board: an earlier trap may have moved
        // or deactivated the subject.
        if !state.zones.is_in(uid, origin) {
            break;
        }
        if !matches_play(state, trigger, uid, origin) {
            continue;
        }

        spring(state, defender, actor, trap_uid, &trap_name, effect, Some(uid));
    }

    state.zones.is_in(uid, origin)
}

/// Evaluate board-state triggers (government majority) after a play has
/// fully resolved.
pub fn on_board_check(state: &mut MatchState, actor: Seat) {
    let defender = actor.opponent();
    let armed: Vec<CardUid> = state.traps(defender).to_vec();

    for trap_uid in armed {
        let Some((trigger, effect, trap_name)) = trap_parts(state, trap_uid) else {
            continue;
        };

        let TrapTrigger::GovernmentMajority { count } = trigger else {
            continue;
        };
        if state.government(actor).len() < count {
            continue;
        }

        spring(state, defender, actor, trap_uid, &trap_name, effect, None);
    }
}

/// Apply a negative, card-targeted effect through the protection gate.
///
/// A shielded politician consumes its shield instead of taking the effect.
pub fn apply_negative(state: &mut MatchState, target: CardUid, effect: TrapEffect, source: &str) {
    if let Some(pol) = state.arena.politician_mut(target) {
        if pol.protected {
            pol.protected = false;
            pol.protected_until = None;
            let line = format!("{source}: {} is shielded; the effect is prevented", pol.name);
            state.push_log(line);
            return;
        }
    }

    let Some(addr) = state.zones.address_of(target) else {
        warn!(card = %target, "negative effect target is not on the board");
        return;
    };
    let owner = addr.seat;
    let name = match state.arena.get(target) {
        Some(card) => card.name().to_string(),
        None => target.to_string(),
    };

    match effect {
        TrapEffect::Deactivate => {
            match state.arena.get_mut(target) {
                Some(Card::Politician(pol)) => pol.deactivated = true,
                Some(Card::Special(special)) => special.deactivated = true,
                None => return,
            }
            state.event_queue.push(MatchEvent::CardDisabled { uid: target });
            state.push_log(format!("{source}: {name} is deactivated"));
        }
        TrapEffect::InfluenceDelta(delta) => {
            if let Some(pol) = state.arena.politician_mut(target) {
                if delta < 0 {
                    pol.temp_debuffs += -delta;
                } else {
                    pol.temp_buffs += delta;
                }
                state.push_log(format!("{source}: {name} influence changes by {delta}"));
            }
        }
        TrapEffect::ReturnToHand => {
            if let Some(pol) = state.arena.politician_mut(target) {
                pol.reset_transients();
            }
            state
                .zones
                .move_to(target, ZoneAddress::new(owner, ZoneKind::Hand));
            state.push_log(format!("{source}: {name} returns to {owner}'s hand"));
        }
        TrapEffect::Destroy => {
            if let Some(pol) = state.arena.politician_mut(target) {
                pol.reset_transients();
            }
            state
                .zones
                .move_to(target, ZoneAddress::new(owner, ZoneKind::Discard));
            state.push_log(format!("{source}: {name} is destroyed"));
        }
        TrapEffect::ForceDiscard | TrapEffect::BlockTransfers => {
            warn!(card = %target, "seat-targeted trap effect routed at a card");
        }
    }
}

/// The resolved trigger/effect pair of an armed trap.
fn trap_parts(state: &MatchState, trap_uid: CardUid) -> Option<(TrapTrigger, TrapEffect, String)> {
    let special = state.arena.special(trap_uid)?;
    if special.deactivated {
        return None;
    }

    match (special.trigger, special.trap_effect) {
        (Some(trigger), Some(effect)) => Some((trigger, effect, special.name.clone())),
        _ => {
            let (trigger, effect) = fallback_for_name(&special.name)?;
            Some((trigger, effect, special.name.clone()))
        }
    }
}

/// Whether a trigger matches a freshly played card in its destination zone.
fn matches_play(
    state: &MatchState,
    trigger: TrapTrigger,
    uid: CardUid,
    origin: ZoneAddress,
) -> bool {
    match trigger {
        TrapTrigger::StrongGovernment { min_influence } => {
            origin.kind == ZoneKind::Government
                && state
                    .arena
                    .politician(uid)
                    .is_some_and(|pol| pol.effective_influence() >= min_influence)
        }
        TrapTrigger::GovernmentRole(role) => {
            origin.kind == ZoneKind::Government
                && state.arena.politician(uid).is_some_and(|pol| pol.tag == role)
        }
        TrapTrigger::PublicArchetype(tag) => {
            origin.kind == ZoneKind::Public && archetype_of(state, uid) == Some(tag)
        }
        TrapTrigger::AnyInitiative => {
            matches!(
                origin.kind,
                ZoneKind::InstantSlot | ZoneKind::PermanentGovernment | ZoneKind::PermanentPublic
            ) && state.arena.special(uid).is_some_and(|s| {
                matches!(
                    s.category,
                    SpecialCategory::InstantInitiative | SpecialCategory::PermanentInitiative
                )
            })
        }
        // Board-state trigger; evaluated by `on_board_check` only.
        TrapTrigger::GovernmentMajority { .. } => false,
    }
}

/// Archetype of a card: the instance tag first, then the content registry's
/// name table.
fn archetype_of(state: &MatchState, uid: CardUid) -> Option<ArchetypeTag> {
    let card = state.arena.get(uid)?;
    card.archetype()
        .or_else(|| state.content.archetype_for_name(card.name()))
}

/// Spring one trap: apply its effect, spend it to the discard pile.
fn spring(
    state: &mut MatchState,
    defender: Seat,
    actor: Seat,
    trap_uid: CardUid,
    trap_name: &str,
    effect: TrapEffect,
    subject: Option<CardUid>,
) {
    state.push_log(format!("{defender}'s {trap_name} springs"));

    match effect {
        TrapEffect::ForceDiscard => force_discard(state, actor, trap_name),
        TrapEffect::BlockTransfers => {
            state.flags[actor].influence_transfer_blocked = true;
            state.push_log(format!("{trap_name}: {actor} cannot transfer influence this round"));
        }
        _ => {
            if let Some(target) = subject {
                apply_negative(state, target, effect, trap_name);
            }
        }
    }

    state
        .zones
        .move_to(trap_uid, ZoneAddress::new(defender, ZoneKind::Discard));
}

/// Discard a random card from the seat's hand. An empty hand logs and does
/// nothing.
fn force_discard(state: &mut MatchState, seat: Seat, source: &str) {
    let hand_len = state.hand(seat).len();
    if hand_len == 0 {
        state.push_log(format!("{source}: {seat} has no cards to discard"));
        return;
    }

    let index = state.rng.gen_range(0..hand_len);
    let uid = state.hand(seat)[index];
    let name = state
        .arena
        .get(uid)
        .map_or_else(|| uid.to_string(), |c| c.name().to_string());

    state
        .zones
        .move_to(uid, ZoneAddress::new(seat, ZoneKind::Discard));
    state.push_log(format!("{source}: {seat} discards {name}"));
}

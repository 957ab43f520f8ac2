//! Instant effect kinds and their dispatcher.
//!
//! `EffectKind` is a closed union: every special card is mapped to a kind
//! when its deck loads (see [`crate::content`]). The dispatcher still
//! tolerates a card that arrives without a mapping — legacy content falls
//! back to a name table, and a card that matches neither logs and does
//! nothing. One bad card never aborts the surrounding resolution pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::card::{ArchetypeTag, Card, CardUid, PoliticianCard, Tier};
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::economy::clamp_ap;
use crate::zones::{ZoneAddress, ZoneKind, LANE_CAPACITY};

/// Ongoing aura carried by a permanent initiative while slotted.
///
/// Auras never mutate state; the scoring engine reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuraKind {
    /// +1 influence to government cards of the matching tier.
    TierBonus(Tier),
    /// +1 influence to all government cards while a card of this archetype
    /// is on the owner's public row.
    ArchetypeBacking(ArchetypeTag),
    /// +1 influence to all government cards while the owner's public row
    /// holds no NGO or movement card.
    Transparency,
}

/// Instant effect of a special card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Draw one card; an empty deck logs and does nothing.
    Draw1,
    /// +1 AP, capped at `MAX_AP`.
    ApPlus1,
    /// AP delta, clamped to `0..=MAX_AP`.
    ApMod(i8),
    /// Draw one card, then the next government card played gains +2.
    ThinkTank,
    /// +2 influence to the own government card with strictly greatest
    /// influence; first found wins ties.
    SpinDoctor,
    /// Round-scoped +1 to every own government card.
    ScienceBonus,
    /// Round-scoped +1 to every own government card.
    HealthBonus,
    /// Round-scoped -1 to every opposing government card.
    MilitaryPenalty,
    /// Next initiative costs 0.
    GrantFreeInitiative,
    /// First government card this turn costs 0.
    GrantFirstGovernmentFree,
    /// Next initiative discounted by 1.
    GrantNgoDiscount,
    /// Next public card discounted by 1.
    GrantPlatformDiscount,
    /// Shield the strongest own government card until next round.
    Protect,
    /// Duplicate the strongest own government card with a fresh uid.
    BodyDouble,
    /// Passive marker; reduces the opponent's redraw at round end.
    NewsBlackout,
}

/// Internal inconsistency surfaced during effect resolution.
///
/// These are caught and logged by the queue resolver; they never cross the
/// engine boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("card {0} vanished during resolution")]
    MissingCard(CardUid),
}

/// Name-based fallback for legacy content whose templates predate the
/// effect-kind mapping. Checked only when a card carries no explicit kind.
#[must_use]
pub fn kind_for_name(name: &str) -> Option<EffectKind> {
    match name {
        "Intelligence Briefing" => Some(EffectKind::Draw1),
        "Emergency Session" => Some(EffectKind::ApPlus1),
        "Think Tank" => Some(EffectKind::ThinkTank),
        "Spin Doctor" => Some(EffectKind::SpinDoctor),
        "Science Funding" => Some(EffectKind::ScienceBonus),
        "Health Campaign" => Some(EffectKind::HealthBonus),
        _ => None,
    }
}

/// Resolve a special card's instant effect for the acting seat.
///
/// A card with no kind and no name-table match logs a warning and leaves
/// the state unchanged.
pub fn dispatch(state: &mut MatchState, seat: Seat, source: CardUid) -> Result<(), EffectError> {
    let (kind, name) = match state.arena.get(source) {
        Some(Card::Special(special)) => {
            let kind = special.effect.or_else(|| kind_for_name(&special.name));
            (kind, special.name.clone())
        }
        Some(Card::Politician(_)) | None => return Err(EffectError::MissingCard(source)),
    };

    match kind {
        Some(kind) => apply(state, seat, kind, &name),
        None => {
            warn!(card = %name, "no effect mapping for card");
            state.push_log(format!("{name} has no known effect; nothing happens"));
            Ok(())
        }
    }
}

/// Apply a single effect kind for the acting seat.
pub fn apply(
    state: &mut MatchState,
    seat: Seat,
    kind: EffectKind,
    source_name: &str,
) -> Result<(), EffectError> {
    match kind {
        EffectKind::Draw1 => {
            if state.draw_to_hand(seat).is_some() {
                state.push_log(format!("{seat} draws a card ({source_name})"));
            }
        }
        EffectKind::ApPlus1 => {
            let ap = clamp_ap(state.action_points[seat] + 1);
            state.action_points[seat] = ap;
            state.push_log(format!("{seat} gains 1 AP ({source_name}), now {ap}"));
        }
        EffectKind::ApMod(delta) => {
            let ap = clamp_ap(state.action_points[seat] + i32::from(delta));
            state.action_points[seat] = ap;
            state.push_log(format!("{seat} AP adjusted by {delta} ({source_name}), now {ap}"));
        }
        EffectKind::ThinkTank => {
            if state.draw_to_hand(seat).is_some() {
                state.push_log(format!("{seat} draws a card ({source_name})"));
            }
            state.flags[seat].next_gov_plus2 = true;
            state.push_log(format!("{seat}'s next government card gains +2 influence"));
        }
        EffectKind::SpinDoctor => match strongest_government(state, seat) {
            Some(uid) => {
                let pol = state
                    .arena
                    .politician_mut(uid)
                    .ok_or(EffectError::MissingCard(uid))?;
                pol.influence += 2;
                let line = format!(
                    "{source_name}: {} rises to {} influence",
                    pol.name, pol.influence
                );
                state.push_log(line);
            }
            None => {
                state.push_log(format!(
                    "{source_name}: no government card to boost; nothing happens"
                ));
            }
        },
        EffectKind::ScienceBonus => {
            state.flags[seat].science_initiative_bonus = true;
            state.push_log(format!("{seat}'s government gains +1 this round ({source_name})"));
        }
        EffectKind::HealthBonus => {
            state.flags[seat].health_initiative_bonus = true;
            state.push_log(format!("{seat}'s government gains +1 this round ({source_name})"));
        }
        EffectKind::MilitaryPenalty => {
            let opponent = seat.opponent();
            state.flags[opponent].military_initiative_penalty = true;
            state.push_log(format!(
                "{opponent}'s government suffers -1 this round ({source_name})"
            ));
        }
        EffectKind::GrantFreeInitiative => {
            state.flags[seat].free_initiative = true;
            state.push_log(format!("{seat}'s next initiative is free ({source_name})"));
        }
        EffectKind::GrantFirstGovernmentFree => {
            state.flags[seat].first_government_free = true;
            state.push_log(format!(
                "{seat}'s next government card is free ({source_name})"
            ));
        }
        EffectKind::GrantNgoDiscount => {
            state.flags[seat].ngo_initiative_discount = true;
            state.push_log(format!(
                "{seat}'s next initiative is discounted ({source_name})"
            ));
        }
        EffectKind::GrantPlatformDiscount => {
            state.flags[seat].platform_discount = true;
            state.push_log(format!(
                "{seat}'s next public card is discounted ({source_name})"
            ));
        }
        EffectKind::Protect => match strongest_government(state, seat) {
            Some(uid) => {
                let round = state.round;
                let pol = state
                    .arena
                    .politician_mut(uid)
                    .ok_or(EffectError::MissingCard(uid))?;
                pol.protected = true;
                pol.protected_until = Some(round + 1);
                let line = format!("{source_name}: {} is shielded", pol.name);
                state.push_log(line);
            }
            None => {
                state.push_log(format!(
                    "{source_name}: no government card to shield; nothing happens"
                ));
            }
        },
        EffectKind::BodyDouble => body_double(state, seat, source_name)?,
        EffectKind::NewsBlackout => {
            state.push_log(format!(
                "{source_name} will disrupt {}'s redraw this round",
                seat.opponent()
            ));
        }
    }

    Ok(())
}

/// The own non-deactivated government card with strictly greatest
/// influence; first found wins ties (stable over board order).
fn strongest_government(state: &MatchState, seat: Seat) -> Option<CardUid> {
    let mut best: Option<(CardUid, i32)> = None;
    for pol in state.government_politicians(seat) {
        if pol.deactivated {
            continue;
        }
        let influence = pol.effective_influence();
        match best {
            Some((_, top)) if influence <= top => {}
            _ => best = Some((pol.uid, influence)),
        }
    }
    best.map(|(uid, _)| uid)
}

/// Mint a fresh-uid duplicate of the strongest own government card.
fn body_double(state: &mut MatchState, seat: Seat, source_name: &str) -> Result<(), EffectError> {
    let lane = ZoneAddress::new(seat, ZoneKind::Government);
    if state.zones.len(lane) >= LANE_CAPACITY {
        state.push_log(format!("{source_name}: government row is full; nothing happens"));
        return Ok(());
    }

    let Some(uid) = strongest_government(state, seat) else {
        state.push_log(format!(
            "{source_name}: no government card to duplicate; nothing happens"
        ));
        return Ok(());
    };

    let original: PoliticianCard = state
        .arena
        .politician(uid)
        .ok_or(EffectError::MissingCard(uid))?
        .clone();

    let copy_uid = state.arena.alloc_uid();
    let mut copy = original;
    copy.uid = copy_uid;
    copy.reset_transients();
    let copy_name = copy.name.clone();

    state.arena.insert(Card::Politician(copy));
    state.zones.add(copy_uid, lane);
    state.push_log(format!("{source_name}: a double of {copy_name} enters the government row"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{build_deck, ContentSet};
    use crate::core::state::MatchState;
    use crate::economy::MAX_AP;

    fn fresh_state() -> MatchState {
        MatchState::new(ContentSet::standard(), 42)
    }

    fn put_on_government(state: &mut MatchState, seat: Seat, id: &str) -> CardUid {
        let uid = state.arena.alloc_uid();
        let card = state.content.instantiate(id, uid).unwrap();
        state.arena.insert(card);
        state
            .zones
            .add(uid, ZoneAddress::new(seat, ZoneKind::Government));
        uid
    }

    #[test]
    fn test_draw1_moves_single_card_to_hand() {
        let mut state = fresh_state();
        build_deck(&mut state, Seat::One, &["mayor"]).unwrap();

        apply(&mut state, Seat::One, EffectKind::Draw1, "Briefing").unwrap();

        assert_eq!(state.hand(Seat::One).len(), 1);
        assert!(state.deck(Seat::One).is_empty());
    }

    #[test]
    fn test_draw1_empty_deck_logs_and_leaves_state() {
        let mut state = fresh_state();

        apply(&mut state, Seat::One, EffectKind::Draw1, "Briefing").unwrap();

        assert!(state.hand(Seat::One).is_empty());
        assert!(state.deck(Seat::One).is_empty());
        assert!(state.log.iter().any(|l| l.contains("deck is empty")));
    }

    #[test]
    fn test_ap_plus1_caps_at_max() {
        let mut state = fresh_state();
        state.action_points[Seat::One] = MAX_AP;

        apply(&mut state, Seat::One, EffectKind::ApPlus1, "Session").unwrap();
        apply(&mut state, Seat::One, EffectKind::ApPlus1, "Session").unwrap();

        assert_eq!(state.action_points[Seat::One], MAX_AP);
    }

    #[test]
    fn test_ap_mod_clamps_low() {
        let mut state = fresh_state();
        state.action_points[Seat::One] = 1;

        apply(&mut state, Seat::One, EffectKind::ApMod(-3), "Austerity").unwrap();

        assert_eq!(state.action_points[Seat::One], 0);
    }

    #[test]
    fn test_spin_doctor_boosts_highest() {
        let mut state = fresh_state();
        let low = put_on_government(&mut state, Seat::One, "field-marshal"); // 5
        let high = put_on_government(&mut state, Seat::One, "chancellor"); // 6
        state.arena.politician_mut(low).unwrap().influence = 5;
        state.arena.politician_mut(high).unwrap().influence = 7;

        apply(&mut state, Seat::One, EffectKind::SpinDoctor, "Spin Doctor").unwrap();

        assert_eq!(state.arena.politician(low).unwrap().influence, 5);
        assert_eq!(state.arena.politician(high).unwrap().influence, 9);
    }

    #[test]
    fn test_spin_doctor_tie_goes_to_first() {
        let mut state = fresh_state();
        let first = put_on_government(&mut state, Seat::One, "field-marshal");
        let second = put_on_government(&mut state, Seat::One, "chief-justice");
        state.arena.politician_mut(first).unwrap().influence = 5;
        state.arena.politician_mut(second).unwrap().influence = 5;

        apply(&mut state, Seat::One, EffectKind::SpinDoctor, "Spin Doctor").unwrap();

        assert_eq!(state.arena.politician(first).unwrap().influence, 7);
        assert_eq!(state.arena.politician(second).unwrap().influence, 5);
    }

    #[test]
    fn test_spin_doctor_no_target_is_noop() {
        let mut state = fresh_state();

        apply(&mut state, Seat::One, EffectKind::SpinDoctor, "Spin Doctor").unwrap();

        assert!(state.log.iter().any(|l| l.contains("nothing happens")));
    }

    #[test]
    fn test_think_tank_draws_and_flags() {
        let mut state = fresh_state();
        build_deck(&mut state, Seat::One, &["mayor"]).unwrap();

        apply(&mut state, Seat::One, EffectKind::ThinkTank, "Think Tank").unwrap();

        assert_eq!(state.hand(Seat::One).len(), 1);
        assert!(state.flags[Seat::One].next_gov_plus2);
    }

    #[test]
    fn test_military_penalty_hits_opponent() {
        let mut state = fresh_state();

        apply(&mut state, Seat::One, EffectKind::MilitaryPenalty, "Embargo").unwrap();

        assert!(state.flags[Seat::Two].military_initiative_penalty);
        assert!(!state.flags[Seat::One].military_initiative_penalty);
    }

    #[test]
    fn test_body_double_mints_fresh_uid() {
        let mut state = fresh_state();
        let original = put_on_government(&mut state, Seat::One, "chancellor");

        apply(&mut state, Seat::One, EffectKind::BodyDouble, "Body Double").unwrap();

        let lane = state.government(Seat::One);
        assert_eq!(lane.len(), 2);
        assert_ne!(lane[1], original);
        assert_eq!(
            state.arena.politician(lane[1]).unwrap().name,
            state.arena.politician(original).unwrap().name
        );
    }

    #[test]
    fn test_body_double_respects_capacity() {
        let mut state = fresh_state();
        for _ in 0..LANE_CAPACITY {
            put_on_government(&mut state, Seat::One, "mayor");
        }

        apply(&mut state, Seat::One, EffectKind::BodyDouble, "Body Double").unwrap();

        assert_eq!(state.government(Seat::One).len(), LANE_CAPACITY);
        assert!(state.log.iter().any(|l| l.contains("row is full")));
    }

    #[test]
    fn test_dispatch_unmapped_card_fails_soft() {
        let mut state = fresh_state();
        let uid = state.arena.alloc_uid();
        let mut card = state.content.instantiate("protest-wave", uid).unwrap();
        // Public cards may legitimately carry no effect; exercise the
        // name-fallback miss path with an unmapped name.
        card.as_special_mut().unwrap().effect = None;
        state.arena.insert(card);
        state.zones.add(uid, ZoneAddress::new(Seat::One, ZoneKind::Public));

        dispatch(&mut state, Seat::One, uid).unwrap();

        assert!(state.log.iter().any(|l| l.contains("no known effect")));
    }

    #[test]
    fn test_name_fallback_resolves_legacy_cards() {
        assert_eq!(kind_for_name("Spin Doctor"), Some(EffectKind::SpinDoctor));
        assert_eq!(kind_for_name("Unknown Reform"), None);
    }
}

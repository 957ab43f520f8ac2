//! Round scoring.
//!
//! Scoring is a pure read: it sums the effective influence of a seat's
//! active government cards, then layers per-card aura and flag modifiers on
//! top. Nothing here mutates state, so the AI can score hypothetical boards
//! with the same code the round resolver uses.

use crate::core::card::{ArchetypeTag, PoliticianCard};
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::effects::AuraKind;
use crate::zones::ZoneKind;

/// A seat's current round score.
///
/// Deactivated government cards contribute nothing, modifiers included.
#[must_use]
pub fn score(state: &MatchState, seat: Seat) -> i32 {
    let gov_aura = active_aura(state, seat, ZoneKind::PermanentGovernment);
    let public_aura = active_aura(state, seat, ZoneKind::PermanentPublic);
    let flags = &state.flags[seat];

    let mut total = 0;
    for pol in state.government_politicians(seat) {
        if pol.deactivated {
            continue;
        }

        total += pol.effective_influence();
        total += aura_bonus(state, seat, gov_aura, pol);
        total += aura_bonus(state, seat, public_aura, pol);

        // Envoy: +1 while an NGO backs the public row. Independent of any
        // ArchetypeBacking aura, so the two stack.
        if pol.base == "envoy" && public_row_has(state, seat, ArchetypeTag::Ngo) {
            total += 1;
        }

        if flags.science_initiative_bonus {
            total += 1;
        }
        if flags.health_initiative_bonus {
            total += 1;
        }
        if flags.military_initiative_penalty {
            total -= 1;
        }
    }

    total
}

/// The aura in a permanent slot, unless the slotted card is deactivated.
fn active_aura(state: &MatchState, seat: Seat, kind: ZoneKind) -> Option<AuraKind> {
    let special = state.permanent(seat, kind)?;
    if special.deactivated {
        return None;
    }
    special.aura
}

/// Per-politician bonus from one aura.
fn aura_bonus(
    state: &MatchState,
    seat: Seat,
    aura: Option<AuraKind>,
    pol: &PoliticianCard,
) -> i32 {
    match aura {
        Some(AuraKind::TierBonus(tier)) if pol.tier == tier => 1,
        Some(AuraKind::ArchetypeBacking(tag)) if public_row_has(state, seat, tag) => 1,
        Some(AuraKind::Transparency)
            if !public_row_has(state, seat, ArchetypeTag::Ngo)
                && !public_row_has(state, seat, ArchetypeTag::Movement) =>
        {
            1
        }
        _ => 0,
    }
}

/// Whether the seat's public row holds an active card of this archetype.
fn public_row_has(state: &MatchState, seat: Seat, tag: ArchetypeTag) -> bool {
    state.public_lane(seat).iter().any(|&uid| {
        let Some(card) = state.arena.get(uid) else {
            return false;
        };
        if card.deactivated() {
            return false;
        }
        card.archetype()
            .or_else(|| state.content.archetype_for_name(card.name()))
            == Some(tag)
    })
}

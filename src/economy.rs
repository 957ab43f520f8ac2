//! Action-point economy.
//!
//! Every play is priced through [`net_cost`] and gated through
//! [`can_play`]. The two-action cap only applies to positive-cost plays;
//! zero-net-cost plays stay legal for the rest of the turn, which is an
//! intended combo mechanic and not an off-by-one.

use crate::core::card::{Card, SpecialCategory};
use crate::core::seat::Seat;
use crate::core::state::MatchState;

/// Action points a seat starts each of its turns with.
pub const BASE_AP: i32 = 2;

/// Hard ceiling on action points; deltas clamp here.
pub const MAX_AP: i32 = 4;

/// Positive-cost plays allowed per turn.
pub const ACTION_CAP: u32 = 2;

/// Clamp an AP total into the legal range.
#[must_use]
pub fn clamp_ap(value: i32) -> i32 {
    value.clamp(0, MAX_AP)
}

/// Net AP cost of playing a card, after active discounts. Never negative.
#[must_use]
pub fn net_cost(state: &MatchState, seat: Seat, card: &Card) -> i32 {
    let mut cost = i32::from(card.base_cost());
    let flags = &state.flags[seat];

    match card {
        Card::Politician(_) => {
            if flags.first_government_free {
                cost -= 1;
            }
        }
        Card::Special(special) => match special.category {
            SpecialCategory::InstantInitiative | SpecialCategory::PermanentInitiative => {
                if flags.free_initiative {
                    cost = 0;
                } else if flags.ngo_initiative_discount {
                    cost -= 1;
                }
            }
            SpecialCategory::PublicCard => {
                if flags.platform_discount {
                    cost -= 1;
                }
            }
            SpecialCategory::Intervention => {}
        },
    }

    cost.max(0)
}

/// Whether a seat may legally pay for and play a card right now.
///
/// Zero-net-cost plays are unlimited per turn, even once the action cap is
/// reached; positive-cost plays stop at [`ACTION_CAP`] regardless of
/// remaining AP.
#[must_use]
pub fn can_play(state: &MatchState, seat: Seat, card: &Card) -> bool {
    let net = net_cost(state, seat, card);
    state.action_points[seat] >= net && (state.actions_used[seat] < ACTION_CAP || net == 0)
}

/// Consume the discount flag that [`net_cost`] applied for this card, if
/// any. Returns the flag's log label.
///
/// Must mirror the selection order in `net_cost` exactly.
pub fn consume_discount(state: &mut MatchState, seat: Seat, card: &Card) -> Option<&'static str> {
    let flags = &mut state.flags[seat];

    match card {
        Card::Politician(_) => {
            if flags.first_government_free {
                flags.first_government_free = false;
                return Some("first government card free");
            }
        }
        Card::Special(special) => match special.category {
            SpecialCategory::InstantInitiative | SpecialCategory::PermanentInitiative => {
                if flags.free_initiative {
                    flags.free_initiative = false;
                    return Some("free initiative");
                }
                if flags.ngo_initiative_discount {
                    flags.ngo_initiative_discount = false;
                    return Some("NGO discount");
                }
            }
            SpecialCategory::PublicCard => {
                if flags.platform_discount {
                    flags.platform_discount = false;
                    return Some("platform discount");
                }
            }
            SpecialCategory::Intervention => {}
        },
    }

    None
}

//! Per-seat effect flags.
//!
//! A typed struct instead of an open map, so every producer and consumer of
//! a flag is a compile-checked field access. The one-shot vs round-scoped
//! split is part of the type, not a naming convention.

use serde::{Deserialize, Serialize};

/// Flag bag for one seat.
///
/// One-shot flags are cleared by the effect that reads them; round-scoped
/// flags last until round resolution. Everything resets at the round
/// boundary — no current flag is sticky across rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectFlags {
    // === One-shot (consumed by the first play that reads them) ===
    /// Next initiative costs 0.
    pub free_initiative: bool,
    /// NGO backing discounts the next initiative by 1.
    pub ngo_initiative_discount: bool,
    /// Media platform discounts the next public card by 1.
    pub platform_discount: bool,
    /// First government card this turn costs 0.
    pub first_government_free: bool,
    /// Next government card played gains +2 influence.
    pub next_gov_plus2: bool,
    /// Influence-moving effects against this seat are suppressed once.
    pub influence_transfer_blocked: bool,

    // === Round-scoped (read by scoring until the round resolves) ===
    /// +1 influence to every government card.
    pub science_initiative_bonus: bool,
    /// +1 influence to every government card.
    pub health_initiative_bonus: bool,
    /// -1 influence to every government card.
    pub military_initiative_penalty: bool,
}

impl EffectFlags {
    /// Clear everything at the round boundary.
    pub fn reset_for_round(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_all_clear() {
        let flags = EffectFlags::default();
        assert!(!flags.free_initiative);
        assert!(!flags.science_initiative_bonus);
        assert!(!flags.military_initiative_penalty);
    }

    #[test]
    fn test_reset_for_round() {
        let mut flags = EffectFlags {
            free_initiative: true,
            science_initiative_bonus: true,
            military_initiative_penalty: true,
            ..Default::default()
        };

        flags.reset_for_round();
        assert_eq!(flags, EffectFlags::default());
    }
}

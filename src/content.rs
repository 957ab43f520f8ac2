//! Base card templates and archetype membership.
//!
//! The engine never interprets content at dispatch time that it could have
//! validated at load time: every special card's base id must map to a
//! closed effect, aura, or trigger kind when a deck is built, and an
//! unmapped id fails the load with a [`ContentError`] instead of failing a
//! turn later.
//!
//! The registry is read-only from the engine's perspective. Unknown names
//! in archetype lookups are tolerated and treated as "no tags".

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::card::{
    ArchetypeTag, Card, CardUid, PoliticianCard, RoleTag, SpecialCard, SpecialCategory, Tier,
};
use crate::core::seat::Seat;
use crate::core::state::MatchState;
use crate::effects::{AuraKind, EffectKind};
use crate::traps::{TrapEffect, TrapTrigger};
use crate::zones::{ZoneAddress, ZoneKind};

/// Content loading / deck construction failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("unknown base card id `{0}`")]
    UnknownBase(String),

    #[error("special card `{0}` has no effect, aura, or trigger mapping")]
    UnmappedSpecial(String),

    #[error("intervention `{0}` is missing a trap payload")]
    MissingTrapEffect(String),
}

/// Template-specific data of a base card.
#[derive(Clone, Debug)]
pub enum BaseKind {
    Politician {
        influence: i32,
        tier: Tier,
        tag: RoleTag,
    },
    Special {
        category: SpecialCategory,
        effect: Option<EffectKind>,
        aura: Option<AuraKind>,
        trigger: Option<TrapTrigger>,
        trap_effect: Option<TrapEffect>,
        tag: Option<ArchetypeTag>,
    },
}

/// A base card template. Instances are minted from these when a deck is
/// built; the template itself never changes during a match.
#[derive(Clone, Debug)]
pub struct BaseCard {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u8,
    pub kind: BaseKind,
}

/// The read-only content registry the core consults by id and name.
#[derive(Clone, Debug)]
pub struct ContentSet {
    by_id: FxHashMap<&'static str, BaseCard>,
    /// Secondary name table for archetype membership lookups.
    archetype_by_name: FxHashMap<&'static str, ArchetypeTag>,
}

impl ContentSet {
    /// Build a registry from explicit templates.
    #[must_use]
    pub fn from_cards(cards: Vec<BaseCard>) -> Self {
        let mut by_id = FxHashMap::default();
        let mut archetype_by_name = FxHashMap::default();

        for card in cards {
            if let BaseKind::Special { tag: Some(tag), .. } = card.kind {
                archetype_by_name.insert(card.name, tag);
            }
            by_id.insert(card.id, card);
        }

        Self {
            by_id,
            archetype_by_name,
        }
    }

    /// The standard playable set.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_cards(standard_cards())
    }

    /// Look up a base card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BaseCard> {
        self.by_id.get(id)
    }

    /// Archetype membership by card name. Unknown names have no tags.
    #[must_use]
    pub fn archetype_for_name(&self, name: &str) -> Option<ArchetypeTag> {
        self.archetype_by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Mint a card instance from a template.
    ///
    /// Validates the special-card mapping: an id whose category demands an
    /// effect, aura, or trigger but has none fails here, at load time.
    pub fn instantiate(&self, id: &str, uid: CardUid) -> Result<Card, ContentError> {
        let base = self
            .get(id)
            .ok_or_else(|| ContentError::UnknownBase(id.to_string()))?;

        match &base.kind {
            BaseKind::Politician {
                influence,
                tier,
                tag,
            } => Ok(Card::Politician(PoliticianCard {
                base: base.id.to_string(),
                uid,
                name: base.name.to_string(),
                influence: *influence,
                tier: *tier,
                base_cost: base.cost,
                tag: *tag,
                protected: false,
                protected_until: None,
                deactivated: false,
                temp_buffs: 0,
                temp_debuffs: 0,
                ability_used_this_round: false,
            })),
            BaseKind::Special {
                category,
                effect,
                aura,
                trigger,
                trap_effect,
                tag,
            } => {
                match category {
                    SpecialCategory::InstantInitiative if effect.is_none() => {
                        return Err(ContentError::UnmappedSpecial(id.to_string()));
                    }
                    SpecialCategory::PermanentInitiative if aura.is_none() => {
                        return Err(ContentError::UnmappedSpecial(id.to_string()));
                    }
                    SpecialCategory::Intervention if trigger.is_none() => {
                        return Err(ContentError::UnmappedSpecial(id.to_string()));
                    }
                    SpecialCategory::Intervention if trap_effect.is_none() => {
                        return Err(ContentError::MissingTrapEffect(id.to_string()));
                    }
                    _ => {}
                }

                Ok(Card::Special(SpecialCard {
                    base: base.id.to_string(),
                    uid,
                    name: base.name.to_string(),
                    category: *category,
                    base_cost: base.cost,
                    effect: *effect,
                    aura: *aura,
                    trigger: *trigger,
                    trap_effect: *trap_effect,
                    tag: *tag,
                    deactivated: false,
                }))
            }
        }
    }
}

/// Build a seat's deck from a list of base ids.
///
/// Mints one instance per entry in order. Any invalid id fails the whole
/// load and leaves no cards behind for that call.
pub fn build_deck(state: &mut MatchState, seat: Seat, ids: &[&str]) -> Result<(), ContentError> {
    // Validate the whole list before minting anything.
    let content = state.content.clone();
    for id in ids {
        content.instantiate(id, CardUid(u32::MAX))?;
    }

    for id in ids {
        let uid = state.arena.alloc_uid();
        let card = content
            .instantiate(id, uid)
            .expect("validated above");
        state.arena.insert(card);
        state.zones.add(uid, ZoneAddress::new(seat, ZoneKind::Deck));
    }

    Ok(())
}

/// A reasonable 20-card deck from the standard set, for tests and demos.
#[must_use]
pub fn standard_deck() -> Vec<&'static str> {
    vec![
        "chancellor",
        "envoy",
        "field-marshal",
        "finance-minister",
        "professor",
        "surgeon-general",
        "chief-justice",
        "union-leader",
        "emergency-session",
        "briefing",
        "think-tank",
        "spin-doctor",
        "science-funding",
        "health-campaign",
        "youth-quota",
        "civic-platform",
        "relief-network",
        "media-platform",
        "leak-scandal",
        "counter-campaign",
    ]
}

fn politician(
    id: &'static str,
    name: &'static str,
    influence: i32,
    tier: Tier,
    tag: RoleTag,
) -> BaseCard {
    BaseCard {
        id,
        name,
        cost: 1,
        kind: BaseKind::Politician {
            influence,
            tier,
            tag,
        },
    }
}

fn instant(id: &'static str, name: &'static str, effect: EffectKind) -> BaseCard {
    BaseCard {
        id,
        name,
        cost: 1,
        kind: BaseKind::Special {
            category: SpecialCategory::InstantInitiative,
            effect: Some(effect),
            aura: None,
            trigger: None,
            trap_effect: None,
            tag: None,
        },
    }
}

fn permanent(id: &'static str, name: &'static str, aura: AuraKind) -> BaseCard {
    BaseCard {
        id,
        name,
        cost: 1,
        kind: BaseKind::Special {
            category: SpecialCategory::PermanentInitiative,
            effect: None,
            aura: Some(aura),
            trigger: None,
            trap_effect: None,
            tag: None,
        },
    }
}

fn public_card(
    id: &'static str,
    name: &'static str,
    tag: ArchetypeTag,
    effect: Option<EffectKind>,
) -> BaseCard {
    BaseCard {
        id,
        name,
        cost: 1,
        kind: BaseKind::Special {
            category: SpecialCategory::PublicCard,
            effect,
            aura: None,
            trigger: None,
            trap_effect: None,
            tag: Some(tag),
        },
    }
}

fn intervention(
    id: &'static str,
    name: &'static str,
    trigger: TrapTrigger,
    trap_effect: TrapEffect,
) -> BaseCard {
    BaseCard {
        id,
        name,
        cost: 1,
        kind: BaseKind::Special {
            category: SpecialCategory::Intervention,
            effect: None,
            aura: None,
            trigger: Some(trigger),
            trap_effect: Some(trap_effect),
            tag: None,
        },
    }
}

fn standard_cards() -> Vec<BaseCard> {
    vec![
        // Politicians
        politician("chancellor", "Chancellor", 6, Tier::Two, RoleTag::Minister),
        politician("envoy", "Envoy", 4, Tier::Two, RoleTag::Diplomat),
        politician("field-marshal", "Field Marshal", 5, Tier::Two, RoleTag::General),
        politician("chief-justice", "Chief Justice", 5, Tier::Two, RoleTag::Judge),
        politician("finance-minister", "Finance Minister", 3, Tier::One, RoleTag::Economist),
        politician("professor", "Professor", 2, Tier::One, RoleTag::Scientist),
        politician("surgeon-general", "Surgeon General", 2, Tier::One, RoleTag::Physician),
        politician("union-leader", "Union Leader", 3, Tier::One, RoleTag::Organizer),
        politician("mayor", "Mayor", 2, Tier::One, RoleTag::Organizer),
        // Instant initiatives
        instant("emergency-session", "Emergency Session", EffectKind::ApPlus1),
        instant("briefing", "Intelligence Briefing", EffectKind::Draw1),
        instant("think-tank", "Think Tank", EffectKind::ThinkTank),
        instant("spin-doctor", "Spin Doctor", EffectKind::SpinDoctor),
        instant("science-funding", "Science Funding", EffectKind::ScienceBonus),
        instant("health-campaign", "Health Campaign", EffectKind::HealthBonus),
        instant("arms-embargo", "Arms Embargo", EffectKind::MilitaryPenalty),
        instant("war-chest", "War Chest", EffectKind::ApMod(2)),
        instant("security-detail", "Security Detail", EffectKind::Protect),
        instant("grassroots-funding", "Grassroots Funding", EffectKind::GrantFreeInitiative),
        instant("party-list", "Party List", EffectKind::GrantFirstGovernmentFree),
        instant("body-double", "Body Double", EffectKind::BodyDouble),
        // Permanent initiatives
        permanent("youth-quota", "Youth Quota", AuraKind::TierBonus(Tier::One)),
        permanent("seniority-act", "Seniority Act", AuraKind::TierBonus(Tier::Two)),
        permanent(
            "civic-platform",
            "Civic Platform",
            AuraKind::ArchetypeBacking(ArchetypeTag::Ngo),
        ),
        permanent("transparency-act", "Transparency Act", AuraKind::Transparency),
        // Public cards
        public_card(
            "relief-network",
            "Relief Network",
            ArchetypeTag::Ngo,
            Some(EffectKind::GrantNgoDiscount),
        ),
        public_card("protest-wave", "Protest Wave", ArchetypeTag::Movement, None),
        public_card(
            "media-platform",
            "Media Platform",
            ArchetypeTag::Platform,
            Some(EffectKind::GrantPlatformDiscount),
        ),
        public_card(
            "news-blackout",
            "News Blackout",
            ArchetypeTag::Press,
            Some(EffectKind::NewsBlackout),
        ),
        // Interventions
        intervention(
            "leak-scandal",
            "Leak Scandal",
            TrapTrigger::StrongGovernment { min_influence: 5 },
            TrapEffect::Deactivate,
        ),
        intervention(
            "smear-campaign",
            "Smear Campaign",
            TrapTrigger::GovernmentRole(RoleTag::General),
            TrapEffect::InfluenceDelta(-2),
        ),
        intervention(
            "subpoena",
            "Subpoena",
            TrapTrigger::StrongGovernment { min_influence: 4 },
            TrapEffect::ReturnToHand,
        ),
        intervention(
            "counter-campaign",
            "Counter Campaign",
            TrapTrigger::PublicArchetype(ArchetypeTag::Ngo),
            TrapEffect::Destroy,
        ),
        intervention(
            "gag-order",
            "Gag Order",
            TrapTrigger::PublicArchetype(ArchetypeTag::Movement),
            TrapEffect::BlockTransfers,
        ),
        intervention(
            "budget-freeze",
            "Budget Freeze",
            TrapTrigger::AnyInitiative,
            TrapEffect::Destroy,
        ),
        intervention(
            "public-backlash",
            "Public Backlash",
            TrapTrigger::GovernmentMajority { count: 4 },
            TrapEffect::ForceDiscard,
        ),
    ]
}

//! Card instances and the card arena.
//!
//! Every card in a match is minted once from a base template and lives in
//! the `CardArena` until the match ends. Zones hold `CardUid` handles, never
//! card values, so a card can only ever be owned by one zone at a time.
//!
//! Politicians and specials share an id/uid/name header but carry different
//! mutable state, so `Card` is a tagged union rather than a single struct
//! with optional fields.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::effects::{AuraKind, EffectKind};
use crate::traps::{TrapEffect, TrapTrigger};

/// Unique identifier for a card instance.
///
/// Minted by the arena, never reused within a match. Duplicating effects
/// mint a fresh uid; there is no way to alias an existing instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardUid(pub u32);

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A politician's power class. Several auras key on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
}

/// A board row. Politicians occupy the government row, public cards the
/// public row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Government,
    Public,
}

/// Role label on a politician, used by aura and trap predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTag {
    Diplomat,
    Minister,
    General,
    Economist,
    Scientist,
    Physician,
    Judge,
    Organizer,
}

/// Archetype label on a public card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeTag {
    Ngo,
    Movement,
    Platform,
    Press,
}

/// What kind of special card this is; decides the destination zone on play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCategory {
    InstantInitiative,
    PermanentInitiative,
    Intervention,
    PublicCard,
}

/// A politician on a player's side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliticianCard {
    /// Base template id this instance was minted from.
    pub base: String,
    /// Unique per instance.
    pub uid: CardUid,
    pub name: String,
    /// Current influence; mutable by effects.
    pub influence: i32,
    pub tier: Tier,
    pub base_cost: u8,
    pub tag: RoleTag,
    /// Shield against the next negative effect.
    pub protected: bool,
    /// Round after which a shield expires, if any.
    pub protected_until: Option<u32>,
    pub deactivated: bool,
    /// Transient counters, cleared when the card leaves the board.
    pub temp_buffs: i32,
    pub temp_debuffs: i32,
    pub ability_used_this_round: bool,
}

impl PoliticianCard {
    /// Influence the scoring engine sees: base plus transient counters.
    #[must_use]
    pub fn effective_influence(&self) -> i32 {
        self.influence + self.temp_buffs - self.temp_debuffs
    }

    /// Clear transient state when the card leaves the board.
    pub fn reset_transients(&mut self) {
        self.protected = false;
        self.protected_until = None;
        self.deactivated = false;
        self.temp_buffs = 0;
        self.temp_debuffs = 0;
        self.ability_used_this_round = false;
    }
}

/// An initiative, intervention, or public card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCard {
    pub base: String,
    pub uid: CardUid,
    pub name: String,
    pub category: SpecialCategory,
    pub base_cost: u8,
    /// Instant effect fired when the card resolves, if any.
    pub effect: Option<EffectKind>,
    /// Ongoing aura while the card sits in a permanent slot, if any.
    pub aura: Option<AuraKind>,
    /// Trap predicate, for interventions.
    pub trigger: Option<TrapTrigger>,
    /// Trap payload applied when the trigger matches.
    pub trap_effect: Option<TrapEffect>,
    pub tag: Option<ArchetypeTag>,
    pub deactivated: bool,
}

/// A card instance: either a politician or a special.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Politician(PoliticianCard),
    Special(SpecialCard),
}

impl Card {
    #[must_use]
    pub fn uid(&self) -> CardUid {
        match self {
            Card::Politician(p) => p.uid,
            Card::Special(s) => s.uid,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Card::Politician(p) => &p.name,
            Card::Special(s) => &s.name,
        }
    }

    /// Base template id.
    #[must_use]
    pub fn base(&self) -> &str {
        match self {
            Card::Politician(p) => &p.base,
            Card::Special(s) => &s.base,
        }
    }

    #[must_use]
    pub fn base_cost(&self) -> u8 {
        match self {
            Card::Politician(p) => p.base_cost,
            Card::Special(s) => s.base_cost,
        }
    }

    #[must_use]
    pub fn deactivated(&self) -> bool {
        match self {
            Card::Politician(p) => p.deactivated,
            Card::Special(s) => s.deactivated,
        }
    }

    #[must_use]
    pub fn is_politician(&self) -> bool {
        matches!(self, Card::Politician(_))
    }

    #[must_use]
    pub fn as_politician(&self) -> Option<&PoliticianCard> {
        match self {
            Card::Politician(p) => Some(p),
            Card::Special(_) => None,
        }
    }

    pub fn as_politician_mut(&mut self) -> Option<&mut PoliticianCard> {
        match self {
            Card::Politician(p) => Some(p),
            Card::Special(_) => None,
        }
    }

    #[must_use]
    pub fn as_special(&self) -> Option<&SpecialCard> {
        match self {
            Card::Special(s) => Some(s),
            Card::Politician(_) => None,
        }
    }

    pub fn as_special_mut(&mut self) -> Option<&mut SpecialCard> {
        match self {
            Card::Special(s) => Some(s),
            Card::Politician(_) => None,
        }
    }

    /// Archetype tag carried on the card itself, if any.
    #[must_use]
    pub fn archetype(&self) -> Option<ArchetypeTag> {
        match self {
            Card::Special(s) => s.tag,
            Card::Politician(_) => None,
        }
    }
}

/// Arena of all card instances in a match.
///
/// Allocates uids and owns every `Card`. Zones refer to cards by uid, so
/// "exactly one zone owns a card" is enforced by the zone map's move API
/// rather than by discipline around shared references.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CardArena {
    cards: FxHashMap<CardUid, Card>,
    next_uid: u32,
}

impl CardArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next uid.
    pub fn alloc_uid(&mut self) -> CardUid {
        let uid = CardUid(self.next_uid);
        self.next_uid += 1;
        uid
    }

    /// Insert a minted card.
    ///
    /// Panics if a card with the same uid already exists; that is a
    /// programmer error, not a game-rule failure.
    pub fn insert(&mut self, card: Card) {
        let uid = card.uid();
        if self.cards.contains_key(&uid) {
            panic!("{uid} already exists in arena");
        }
        self.cards.insert(uid, card);
    }

    #[must_use]
    pub fn get(&self, uid: CardUid) -> Option<&Card> {
        self.cards.get(&uid)
    }

    pub fn get_mut(&mut self, uid: CardUid) -> Option<&mut Card> {
        self.cards.get_mut(&uid)
    }

    /// Get a politician by uid, if the uid names a politician.
    #[must_use]
    pub fn politician(&self, uid: CardUid) -> Option<&PoliticianCard> {
        self.cards.get(&uid).and_then(Card::as_politician)
    }

    pub fn politician_mut(&mut self, uid: CardUid) -> Option<&mut PoliticianCard> {
        self.cards.get_mut(&uid).and_then(Card::as_politician_mut)
    }

    /// Get a special by uid, if the uid names a special.
    #[must_use]
    pub fn special(&self, uid: CardUid) -> Option<&SpecialCard> {
        self.cards.get(&uid).and_then(Card::as_special)
    }

    pub fn special_mut(&mut self, uid: CardUid) -> Option<&mut SpecialCard> {
        self.cards.get_mut(&uid).and_then(Card::as_special_mut)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_politician(uid: CardUid) -> Card {
        Card::Politician(PoliticianCard {
            base: "chancellor".to_string(),
            uid,
            name: "Chancellor".to_string(),
            influence: 6,
            tier: Tier::Two,
            base_cost: 1,
            tag: RoleTag::Minister,
            protected: false,
            protected_until: None,
            deactivated: false,
            temp_buffs: 0,
            temp_debuffs: 0,
            ability_used_this_round: false,
        })
    }

    #[test]
    fn test_alloc_uid_unique() {
        let mut arena = CardArena::new();
        let a = arena.alloc_uid();
        let b = arena.alloc_uid();
        assert_ne!(a, b);
    }

    #[test]
    fn test_insert_and_get() {
        let mut arena = CardArena::new();
        let uid = arena.alloc_uid();
        arena.insert(sample_politician(uid));

        assert_eq!(arena.get(uid).unwrap().name(), "Chancellor");
        assert!(arena.politician(uid).is_some());
        assert!(arena.special(uid).is_none());
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_uid_panics() {
        let mut arena = CardArena::new();
        let uid = arena.alloc_uid();
        arena.insert(sample_politician(uid));
        arena.insert(sample_politician(uid));
    }

    #[test]
    fn test_effective_influence() {
        let uid = CardUid(0);
        let mut card = sample_politician(uid);
        let pol = card.as_politician_mut().unwrap();

        pol.temp_buffs = 2;
        pol.temp_debuffs = 1;
        assert_eq!(pol.effective_influence(), 7);

        pol.reset_transients();
        assert_eq!(pol.effective_influence(), 6);
    }

    #[test]
    fn test_card_accessors() {
        let card = sample_politician(CardUid(3));
        assert_eq!(card.uid(), CardUid(3));
        assert_eq!(card.base(), "chancellor");
        assert_eq!(card.base_cost(), 1);
        assert!(card.is_politician());
        assert!(!card.deactivated());
        assert_eq!(card.archetype(), None);
    }
}

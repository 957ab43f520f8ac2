//! Core types: seats, cards, flags, match state, RNG.

pub mod card;
pub mod flags;
pub mod rng;
pub mod seat;
pub mod state;

pub use card::{
    ArchetypeTag, Card, CardArena, CardUid, Lane, PoliticianCard, RoleTag, SpecialCard,
    SpecialCategory, Tier,
};
pub use flags::EffectFlags;
pub use rng::MatchRng;
pub use seat::{Seat, SeatMap};
pub use state::{Command, DeferredAdjustment, MatchPhase, MatchState};

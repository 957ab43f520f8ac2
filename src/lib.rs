//! Rules engine for a two-player, turn-based political card game.
//!
//! The engine owns match, round, and turn progression, the action-point
//! economy, card-effect resolution, face-down intervention triggers,
//! aura-based scoring, and a single-ply heuristic opponent. It owns no
//! rendering, persistence, or networking: an embedding drives it through
//! [`controller::play_card`], [`controller::pass_turn`], and the command
//! buffer, and reads back the full [`MatchState`] plus its append-only log.
//!
//! Every public operation either commits a consistent mutation and logs it,
//! or rejects before touching anything. Failures inside effect resolution
//! are contained per event; nothing panics past the engine boundary in
//! normal play.
//!
//! ```
//! use realpolitik::{ai, controller, content, Seat, SeatMap};
//!
//! let deck = content::standard_deck();
//! let mut ai_seats = SeatMap::with_value(false);
//! ai_seats[Seat::Two] = true;
//!
//! let mut state = controller::start_match(
//!     content::ContentSet::standard(),
//!     42,
//!     &deck,
//!     &deck,
//!     ai_seats,
//! )
//! .unwrap();
//!
//! controller::pass_turn(&mut state, Seat::One).unwrap();
//! ai::run_pending(&mut state);
//! ```

pub mod ai;
pub mod content;
pub mod controller;
pub mod core;
pub mod economy;
pub mod effects;
pub mod events;
pub mod scoring;
pub mod traps;
pub mod zones;

pub use content::{ContentError, ContentSet};
pub use controller::{PlayError, OPENING_HAND, ROUNDS_TO_WIN};
pub use core::{
    ArchetypeTag, Card, CardArena, CardUid, Command, EffectFlags, Lane, MatchPhase, MatchRng,
    MatchState, PoliticianCard, RoleTag, Seat, SeatMap, SpecialCard, SpecialCategory, Tier,
};
pub use economy::{ACTION_CAP, BASE_AP, MAX_AP};
pub use effects::{AuraKind, EffectKind};
pub use events::MatchEvent;
pub use traps::{TrapEffect, TrapTrigger};
pub use zones::{ZoneAddress, ZoneKind, ZoneMap, LANE_CAPACITY};

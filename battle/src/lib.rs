//! Battle domain model and reasoning for the rotom battle bot.
//!
//! # Overview
//!
//! `rotom-battle` sits between `rotom-protocol` (markup and wire format) and
//! the orchestration in `rotom-client`:
//!
//! ```text
//! rotom-protocol (markup, decision contract)
//!        │
//!        ▼
//! rotom-battle (domain types + matchups + legality) ← THIS CRATE
//!        │
//!        ▼
//! rotom-client (battle session, collaborators)
//! ```
//!
//! Everything here is synchronous and free of I/O.
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Type`] - Pokemon types with the effectiveness chart
//! - [`Status`] - Non-volatile status conditions
//! - [`Creature`] - One Pokemon as read from its tooltip
//! - [`Team`] - One player's team, active Pokemon and switch handles
//! - [`MoveOption`] - A move selectable this turn
//!
//! ## Reasoning
//! - [`effectiveness`] - Damage band of a type against a two-slot defender
//! - [`LegalActions`] - Actions offered at a decision point and decision validation
//!
//! ## State Tracking
//! - [`TrackedBattle`] - Turn log, Terastallization use and the previous decision
//!
//! # Example Usage
//!
//! ```ignore
//! use rotom_battle::{Type, effectiveness, parse_creature};
//!
//! let opponent = parse_creature(&tooltip_markup, true)?;
//! let band = effectiveness(Type::Water, opponent.type1, opponent.type2);
//! println!("Surf does {band}");
//! ```

pub mod query;
pub mod tracking;
pub mod types;

// Re-export main types at crate root for convenience
pub use query::{
    Effectiveness, IllegalDecision, LegalActions, ResourceUnavailable, TeraOffer, effectiveness,
    effectiveness_against,
};
pub use tracking::{BattleLog, TrackedBattle};
pub use types::{
    ControlHandle, Creature, CreatureFields, HeldItem, MoveOption, SpeedRange, Status, TYPE_CHART,
    Team, TeraType, Type, parse_creature,
};

// Re-export commonly used protocol types
pub use rotom_protocol::{Action, Decision, ParseError, TurnLogEntry};

//! Query helpers for battle decision making
//!
//! Type matchups used to annotate moves, and the legal-action check every
//! decision goes through before it is applied.

mod legal;
mod matchup;

pub use legal::{IllegalDecision, LegalActions, ResourceUnavailable, TeraOffer};
pub use matchup::{Effectiveness, effectiveness, effectiveness_against};

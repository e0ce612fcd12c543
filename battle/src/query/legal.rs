//! Legal action sets and decision validation

use std::collections::BTreeSet;

use rotom_protocol::{Action, Decision};
use thiserror::Error;

use crate::types::{MoveOption, Team, TeraType};

/// Terastallization availability at one decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeraOffer {
    /// The toggle is shown this turn
    Offered(Option<TeraType>),
    /// The toggle is not shown
    NotOffered,
    /// Already used earlier in the battle
    Consumed,
}

impl TeraOffer {
    pub fn is_offered(&self) -> bool {
        matches!(self, TeraOffer::Offered(_))
    }
}

/// Why a requested Terastallization cannot happen
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUnavailable {
    #[error("it was already used this battle")]
    Consumed,

    #[error("it is not offered this turn")]
    NotOffered,

    #[error("it can only accompany a move")]
    SwitchAction,
}

/// A decision that cannot be carried out
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalDecision {
    #[error("{0} is not available this turn")]
    UnavailableAction(Action),

    #[error("cannot Terastallize: {0}")]
    ResourceUnavailable(#[from] ResourceUnavailable),
}

/// Actions offered at one decision point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalActions {
    actions: BTreeSet<Action>,
    tera: TeraOffer,
}

impl LegalActions {
    pub fn new(actions: impl IntoIterator<Item = Action>, tera: TeraOffer) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            tera,
        }
    }

    /// Usable moves plus the team's switch targets
    pub fn from_options(moves: &[MoveOption], team: &Team, tera: TeraOffer) -> Self {
        let move_actions = moves.iter().filter_map(MoveOption::action);
        let switch_actions = team.switch_options().map(|(action, _)| action);
        Self::new(move_actions.chain(switch_actions), tera)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Offered actions in `Move 1..4`, `Switch 1..6` order
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied()
    }

    pub fn tera(&self) -> TeraOffer {
        self.tera
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check a decision against this turn's options
    pub fn validate(&self, decision: &Decision) -> Result<(), IllegalDecision> {
        if !self.contains(decision.action) {
            return Err(IllegalDecision::UnavailableAction(decision.action));
        }

        if decision.terastallize {
            match self.tera {
                TeraOffer::Consumed => return Err(ResourceUnavailable::Consumed.into()),
                TeraOffer::NotOffered => return Err(ResourceUnavailable::NotOffered.into()),
                TeraOffer::Offered(_) if decision.action.is_switch() => {
                    return Err(ResourceUnavailable::SwitchAction.into());
                }
                TeraOffer::Offered(_) => {}
            }
        }

        Ok(())
    }
}

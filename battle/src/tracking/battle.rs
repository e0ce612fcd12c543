//! TrackedBattle - the battle record kept across decision points

use rotom_protocol::{Decision, TeraToggle, TurnLogEntry};

use super::log::BattleLog;
use crate::query::TeraOffer;
use crate::types::{Team, TeraType};

/// A battle being played
///
/// Teams are rebuilt from markup at every decision point. The turn log,
/// Terastallization use and the previous decision carry over.
#[derive(Debug, Clone, Default)]
pub struct TrackedBattle {
    /// Cumulative turn log
    pub log: BattleLog,

    /// Our team as of the latest decision point
    pub me: Team,

    /// The opponent's revealed team as of the latest decision point
    pub opponent: Team,

    /// Terastallization has been spent
    terastallized: bool,

    /// One-turn lookback
    last_decision: Option<Decision>,

    /// Decisions applied so far
    decisions: u32,

    /// Whether the battle has ended
    pub ended: bool,
}

impl TrackedBattle {
    /// Create a new battle record
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a re-parsed log, returning the number of new lines
    pub fn update_log(&mut self, parsed: Vec<TurnLogEntry>) -> usize {
        self.log.merge(parsed)
    }

    /// Replace both teams with freshly gathered ones
    pub fn set_teams(&mut self, me: Team, opponent: Team) {
        self.me = me;
        self.opponent = opponent;
    }

    /// Terastallization state given what the controls panel shows
    pub fn tera_offer(&self, toggle: Option<&TeraToggle>) -> TeraOffer {
        if self.terastallized {
            return TeraOffer::Consumed;
        }
        match toggle {
            Some(toggle) => {
                TeraOffer::Offered(toggle.tera_type.as_deref().map(TeraType::from_name))
            }
            None => TeraOffer::NotOffered,
        }
    }

    /// Record a decision that was applied
    pub fn record_decision(&mut self, decision: Decision) {
        if decision.terastallize && decision.action.is_move() {
            self.terastallized = true;
        }
        self.decisions += 1;
        self.last_decision = Some(decision);
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last_decision.as_ref()
    }

    pub fn terastallized(&self) -> bool {
        self.terastallized
    }

    pub fn decisions(&self) -> u32 {
        self.decisions
    }

    /// Current turn number (0 = not started)
    pub fn turn(&self) -> u32 {
        self.log.current_turn()
    }

    /// Check if battle is in progress
    pub fn is_active(&self) -> bool {
        !self.ended
    }
}

#[cfg(test)]
mod tests {
    use rotom_protocol::Action;

    use super::*;
    use crate::types::Type;

    #[test]
    fn test_new_battle() {
        let battle = TrackedBattle::new();
        assert_eq!(battle.turn(), 0);
        assert!(battle.log.is_empty());
        assert!(battle.me.is_empty());
        assert!(battle.last_decision().is_none());
        assert!(!battle.terastallized());
        assert!(battle.is_active());
    }

    #[test]
    fn test_tera_offer() {
        let mut battle = TrackedBattle::new();
        let toggle = TeraToggle {
            tera_type: Some("Fairy".to_string()),
        };

        assert_eq!(battle.tera_offer(None), TeraOffer::NotOffered);
        assert_eq!(
            battle.tera_offer(Some(&toggle)),
            TeraOffer::Offered(Some(TeraType::Typed(Type::Fairy)))
        );

        battle.record_decision(Decision::new(Action::Move1, true, "now"));
        assert!(battle.terastallized());
        assert_eq!(battle.tera_offer(Some(&toggle)), TeraOffer::Consumed);
    }

    #[test]
    fn test_tera_with_switch_is_not_consumed() {
        let mut battle = TrackedBattle::new();
        battle.record_decision(Decision::new(Action::Switch2, true, ""));
        assert!(!battle.terastallized());
    }

    #[test]
    fn test_lookback_keeps_latest_decision() {
        let mut battle = TrackedBattle::new();
        battle.record_decision(Decision::new(Action::Move1, false, "first"));
        battle.record_decision(Decision::new(Action::Switch3, false, "second"));

        assert_eq!(battle.last_decision().map(|d| d.reason.as_str()), Some("second"));
        assert_eq!(battle.decisions(), 2);
    }

    #[test]
    fn test_update_log() {
        let mut battle = TrackedBattle::new();
        let mut turn = TurnLogEntry::new(1);
        turn.actions.push("Go!".to_string());

        assert_eq!(battle.update_log(vec![turn]), 1);
        assert_eq!(battle.turn(), 1);
    }
}

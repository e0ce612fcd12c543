//! Decision contract
//!
//! A decision maker answers every decision point with one [`Decision`]. The
//! JSON form is what structured-output decision makers produce; the record
//! form is what gets appended to the per-battle decision log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ParseError;

/// The closed set of actions a decision can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "Move 1")]
    Move1,
    #[serde(rename = "Move 2")]
    Move2,
    #[serde(rename = "Move 3")]
    Move3,
    #[serde(rename = "Move 4")]
    Move4,
    #[serde(rename = "Switch 1")]
    Switch1,
    #[serde(rename = "Switch 2")]
    Switch2,
    #[serde(rename = "Switch 3")]
    Switch3,
    #[serde(rename = "Switch 4")]
    Switch4,
    #[serde(rename = "Switch 5")]
    Switch5,
    #[serde(rename = "Switch 6")]
    Switch6,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Move1,
        Action::Move2,
        Action::Move3,
        Action::Move4,
        Action::Switch1,
        Action::Switch2,
        Action::Switch3,
        Action::Switch4,
        Action::Switch5,
        Action::Switch6,
    ];

    /// Action for a 1-based move slot
    pub fn for_move(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Action::Move1),
            2 => Some(Action::Move2),
            3 => Some(Action::Move3),
            4 => Some(Action::Move4),
            _ => None,
        }
    }

    /// Action for a 1-based party slot
    pub fn for_switch(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Action::Switch1),
            2 => Some(Action::Switch2),
            3 => Some(Action::Switch3),
            4 => Some(Action::Switch4),
            5 => Some(Action::Switch5),
            6 => Some(Action::Switch6),
            _ => None,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(
            self,
            Action::Move1 | Action::Move2 | Action::Move3 | Action::Move4
        )
    }

    pub fn is_switch(&self) -> bool {
        !self.is_move()
    }

    /// 1-based move or party slot
    pub fn slot(&self) -> u8 {
        match self {
            Action::Move1 | Action::Switch1 => 1,
            Action::Move2 | Action::Switch2 => 2,
            Action::Move3 | Action::Switch3 => 3,
            Action::Move4 | Action::Switch4 => 4,
            Action::Switch5 => 5,
            Action::Switch6 => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Move1 => "Move 1",
            Action::Move2 => "Move 2",
            Action::Move3 => "Move 3",
            Action::Move4 => "Move 4",
            Action::Switch1 => "Switch 1",
            Action::Switch2 => "Switch 2",
            Action::Switch3 => "Switch 3",
            Action::Switch4 => "Switch 4",
            Action::Switch5 => "Switch 5",
            Action::Switch6 => "Switch 6",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseError;

    /// Accepts "Move 2", "move 2" and "move2"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(' ', "");
        let action = if let Some(slot) = normalized.strip_prefix("move") {
            slot.parse().ok().and_then(Action::for_move)
        } else if let Some(slot) = normalized.strip_prefix("switch") {
            slot.parse().ok().and_then(Action::for_switch)
        } else {
            None
        };
        action.ok_or_else(|| ParseError::InvalidAction(s.trim().to_string()))
    }
}

/// One turn's decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,

    /// Spend the once-per-battle Terastallization with this move
    pub terastallize: bool,

    /// Short justification
    pub reason: String,
}

const ACTION_FIELD: &str = "Action:";
const TERA_FIELD: &str = "Terastallize:";
const REASON_FIELD: &str = "Reason:";

impl Decision {
    pub fn new(action: Action, terastallize: bool, reason: impl Into<String>) -> Self {
        Self {
            action,
            terastallize,
            reason: reason.into(),
        }
    }

    /// Serialize to the decision log record format
    ///
    /// ```text
    /// Action: Move 2
    /// Terastallize: false
    /// Reason: Make It Rain outdamages Great Tusk
    /// ```
    pub fn to_record(&self) -> String {
        format!(
            "{} {}\n{} {}\n{} {}\n",
            ACTION_FIELD,
            self.action,
            TERA_FIELD,
            self.terastallize,
            REASON_FIELD,
            escape(&self.reason)
        )
    }

    /// Parse one record (three lines) produced by [`Decision::to_record`]
    pub fn from_record(record: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = record.lines().filter(|l| !l.trim().is_empty()).collect();
        match lines.as_slice() {
            [action, tera, reason] => Self::from_lines(action, tera, reason),
            _ => Err(ParseError::InvalidFormat(format!(
                "expected 3 record lines, found {}",
                lines.len()
            ))),
        }
    }

    fn from_lines(action: &str, tera: &str, reason: &str) -> Result<Self, ParseError> {
        let action = field(action, ACTION_FIELD)?.parse()?;

        let tera_value = field(tera, TERA_FIELD)?;
        let terastallize = match tera_value.to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ParseError::InvalidValue {
                    field: TERA_FIELD.trim_end_matches(':').to_string(),
                    value: tera_value.to_string(),
                });
            }
        };

        let reason = reason
            .strip_prefix(REASON_FIELD)
            .ok_or_else(|| ParseError::MissingField(REASON_FIELD.to_string()))?;
        // A single separator space follows the label; the rest is the reason verbatim.
        let reason = unescape(reason.strip_prefix(' ').unwrap_or(reason));

        Ok(Self {
            action,
            terastallize,
            reason,
        })
    }
}

/// Parse every record of a decision log file, in order
pub fn parse_records(text: &str) -> Result<Vec<Decision>, ParseError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines
        .chunks(3)
        .map(|chunk| match chunk {
            [action, tera, reason] => Decision::from_lines(action, tera, reason),
            _ => Err(ParseError::InvalidFormat(
                "truncated decision record".to_string(),
            )),
        })
        .collect()
}

/// JSON schema of [`Decision`], for decision makers with structured output
pub fn decision_schema() -> Value {
    let actions: Vec<&str> = Action::ALL.iter().map(Action::as_str).collect();
    json!({
        "title": "Decision",
        "type": "object",
        "properties": {
            "action": {
                "type": "string",
                "enum": actions,
                "description": "The move to use (Move 1-4) or the Pokemon to switch to (Switch 1-6)."
            },
            "terastallize": {
                "type": "boolean",
                "description": "Whether to Terastallize this turn. Can only be used once per battle."
            },
            "reason": {
                "type": "string",
                "description": "Brief explanation for this decision."
            }
        },
        "required": ["action", "terastallize", "reason"],
        "additionalProperties": false
    })
}

fn field<'a>(line: &'a str, name: &str) -> Result<&'a str, ParseError> {
    line.strip_prefix(name)
        .map(str::trim)
        .ok_or_else(|| ParseError::MissingField(name.to_string()))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_str() {
        assert_eq!("Move 1".parse::<Action>(), Ok(Action::Move1));
        assert_eq!("switch 6".parse::<Action>(), Ok(Action::Switch6));
        assert_eq!(" Switch3 ".parse::<Action>(), Ok(Action::Switch3));
        assert_eq!(
            "Move 5".parse::<Action>(),
            Err(ParseError::InvalidAction("Move 5".to_string()))
        );
        assert!("Run".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_slots() {
        for action in Action::ALL {
            let rebuilt = if action.is_move() {
                Action::for_move(action.slot())
            } else {
                Action::for_switch(action.slot())
            };
            assert_eq!(rebuilt, Some(action));
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_decision_json_shape() {
        let decision = Decision::new(Action::Switch2, false, "Dondozo walls it");
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            json,
            json!({"action": "Switch 2", "terastallize": false, "reason": "Dondozo walls it"})
        );

        let parsed: Decision = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, decision);
    }

    #[test]
    fn test_decision_json_rejects_unknown_action() {
        let result = serde_json::from_value::<Decision>(
            json!({"action": "Move 7", "terastallize": false, "reason": ""}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_round_trip() {
        let decisions = [
            Decision::new(Action::Move2, true, "Tera Fairy flips the matchup"),
            Decision::new(Action::Switch5, false, ""),
            Decision::new(Action::Move4, false, "  spaced \\ out\nover two lines: yes  "),
        ];

        for decision in &decisions {
            assert_eq!(Decision::from_record(&decision.to_record()).as_ref(), Ok(decision));
        }

        let file: String = decisions.iter().map(Decision::to_record).collect();
        assert_eq!(parse_records(&file), Ok(decisions.to_vec()));
    }

    #[test]
    fn test_record_format() {
        let decision = Decision::new(Action::Move1, false, "KO range");
        assert_eq!(
            decision.to_record(),
            "Action: Move 1\nTerastallize: false\nReason: KO range\n"
        );
    }

    #[test]
    fn test_record_accepts_capitalized_booleans() {
        let decision =
            Decision::from_record("Action: Switch 1\nTerastallize: True\nReason: pivot").unwrap();
        assert!(decision.terastallize);
    }

    #[test]
    fn test_truncated_records() {
        assert!(parse_records("Action: Move 1\nTerastallize: false\n").is_err());
        assert_eq!(
            Decision::from_record("Action: Move 1\nTerastallize: maybe\nReason: x"),
            Err(ParseError::InvalidValue {
                field: "Terastallize".to_string(),
                value: "maybe".to_string(),
            })
        );
    }

    #[test]
    fn test_schema_lists_every_action() {
        let schema = decision_schema();
        let actions = schema["properties"]["action"]["enum"].as_array().unwrap();
        assert_eq!(actions.len(), 10);
        assert_eq!(actions[0], "Move 1");
        assert_eq!(actions[9], "Switch 6");
    }
}

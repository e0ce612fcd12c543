//! Markup parsing and decision contract types for the rotom battle bot.
//!
//! Everything the bot reads from the Showdown page arrives as an HTML
//! fragment: hover tooltips, the battle log panel and the battle controls.
//! This crate turns those fragments into plain records. Interpretation into
//! domain types happens in `rotom-battle`.

use thiserror::Error;

pub mod decision;
pub mod markup;

pub use decision::{Action, Decision, decision_schema, parse_records};
pub use markup::{
    ControlPanel, Health, IconLabel, MoveButton, SwitchButton, TeraToggle, Tooltip, TurnLogEntry,
    parse_controls, parse_icon_label, parse_turn_log,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Empty markup")]
    EmptyMarkup,

    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),

    #[error("Invalid turn header: {0}")]
    InvalidTurnHeader(String),

    #[error("Turn {found} does not follow turn {previous}")]
    TurnOrder { previous: u32, found: u32 },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

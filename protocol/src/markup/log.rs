//! Battle log panel parser

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use super::{clean_text, has_class};
use crate::ParseError;

const HISTORY: &str = "battle-history";
const SPACER: &str = "spacer";

/// Everything that happened during one turn, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLogEntry {
    /// Turn number (0 = team preview / lead selection)
    pub turn: u32,

    /// Action lines as displayed in the log
    pub actions: Vec<String>,
}

impl TurnLogEntry {
    pub fn new(turn: u32) -> Self {
        Self {
            turn,
            actions: Vec::new(),
        }
    }
}

/// Parse the battle log panel into per-turn entries
///
/// `<h2 class="battle-history">Turn N</h2>` starts turn N. Lines before the
/// first header are collected into turn 0, which is only emitted when it has
/// at least one action. Spacer lines and blank lines are dropped. A panel
/// with no log elements at all (bare text, a comment) is an empty log.
pub fn parse_turn_log(markup: &str) -> Result<Vec<TurnLogEntry>, ParseError> {
    if markup.trim().is_empty() {
        return Ok(Vec::new());
    }

    let html = Html::parse_fragment(markup);
    let mut log = Vec::new();
    let mut current = TurnLogEntry::new(0);

    for el in html.root_element().descendants().filter_map(ElementRef::wrap) {
        if !has_class(&el, HISTORY) || is_nested(&el) {
            continue;
        }

        match el.value().name() {
            "h2" => {
                let turn = parse_turn_header(&clean_text(&el))?;
                if turn <= current.turn {
                    return Err(ParseError::TurnOrder {
                        previous: current.turn,
                        found: turn,
                    });
                }
                let finished = std::mem::replace(&mut current, TurnLogEntry::new(turn));
                push_entry(&mut log, finished);
            }
            "div" if !has_class(&el, SPACER) => {
                let text = clean_text(&el);
                if !text.is_empty() {
                    current.actions.push(text);
                }
            }
            _ => {}
        }
    }

    push_entry(&mut log, current);
    Ok(log)
}

fn push_entry(log: &mut Vec<TurnLogEntry>, entry: TurnLogEntry) {
    if entry.turn > 0 || !entry.actions.is_empty() {
        log.push(entry);
    }
}

/// Log lines occasionally wrap other history elements; only the outermost counts
fn is_nested(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| has_class(&ancestor, HISTORY))
}

fn parse_turn_header(text: &str) -> Result<u32, ParseError> {
    text.strip_prefix("Turn")
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| ParseError::InvalidTurnHeader(text.to_string()))
}

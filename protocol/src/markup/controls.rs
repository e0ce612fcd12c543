//! Battle controls panel parser
//!
//! The controls panel holds the move buttons, the switch menu and the
//! Terastallize toggle for the current decision point. Buttons carry a
//! `data-tooltip` attribute that doubles as the handle used to click them.

use scraper::ElementRef;

use super::{clean_text, elements, has_class, parse_fragment, text_of};
use crate::ParseError;

const SWITCH_TOOLTIP_PREFIX: &str = "switchpokemon";
const WAITING_MARKER: &str = "Waiting for opponent";

/// A usable move button
#[derive(Debug, Clone, PartialEq)]
pub struct MoveButton {
    /// 1-based position among all move buttons, disabled ones included
    pub slot: u8,
    pub name: String,
    pub handle: String,
    pub pp_left: u32,
    /// Type label, if the button shows one
    pub move_type: Option<String>,
}

/// One entry of the switch menu
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchButton {
    /// 1-based party position
    pub slot: u8,
    pub name: String,
    pub handle: String,
    pub active: bool,
    pub fainted: bool,
    pub disabled: bool,
}

/// The Terastallize checkbox, present only when it can be used this turn
#[derive(Debug, Clone, PartialEq)]
pub struct TeraToggle {
    pub tera_type: Option<String>,
}

/// Everything the controls panel offers at one decision point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPanel {
    pub moves: Vec<MoveButton>,
    pub switches: Vec<SwitchButton>,
    pub terastallize: Option<TeraToggle>,
    /// The panel is showing "Waiting for opponent..."
    pub waiting: bool,
    /// The end-of-battle "Main menu" button is shown
    pub battle_over: bool,
}

/// Parse the battle controls panel
pub fn parse_controls(markup: &str) -> Result<ControlPanel, ParseError> {
    let html = parse_fragment(markup)?;
    let root = html.root_element();

    Ok(ControlPanel {
        moves: move_buttons(root),
        switches: switch_buttons(root),
        terastallize: tera_toggle(root),
        waiting: text_of(&root, " ").contains(WAITING_MARKER),
        battle_over: elements(root, "button")
            .any(|button| button.value().attr("name") == Some("closeAndMainMenu")),
    })
}

fn move_buttons(root: ElementRef<'_>) -> Vec<MoveButton> {
    elements(root, "button")
        .filter(|button| has_class(button, "movebutton"))
        .zip(1u8..)
        .filter(|(button, _)| button.value().attr("disabled").is_none())
        .filter_map(|(button, slot)| {
            let attrs = button.value();
            Some(MoveButton {
                slot,
                name: attrs.attr("data-move")?.trim().to_string(),
                handle: attrs.attr("data-tooltip")?.to_string(),
                pp_left: small_text(button, "pp")
                    .and_then(|pp| pp.split('/').next()?.trim().parse().ok())
                    .unwrap_or(0),
                move_type: small_text(button, "type").filter(|t| !t.is_empty()),
            })
        })
        .collect()
}

fn switch_buttons(root: ElementRef<'_>) -> Vec<SwitchButton> {
    elements(root, "button")
        .filter(|button| {
            button
                .value()
                .attr("data-tooltip")
                .is_some_and(|tooltip| tooltip.starts_with(SWITCH_TOOLTIP_PREFIX))
        })
        .zip(1u8..)
        .filter_map(|(button, slot)| {
            let attrs = button.value();
            // Unavailable entries read "Name,active" or "Name,fainted"; the
            // others carry their party index and show the name as text.
            let label = clean_text(&button);
            let (name, state) = match attrs.attr("value").and_then(|v| v.split_once(',')) {
                Some((name, state)) => (name.trim(), state.trim()),
                None => (label.as_str(), ""),
            };
            if name.is_empty() {
                return None;
            }

            Some(SwitchButton {
                slot,
                name: name.to_string(),
                handle: attrs.attr("data-tooltip")?.to_string(),
                active: state == "active",
                fainted: state == "fainted",
                disabled: has_class(&button, "disabled"),
            })
        })
        .collect()
}

fn tera_toggle(root: ElementRef<'_>) -> Option<TeraToggle> {
    elements(root, "input").find(|input| input.value().attr("name") == Some("terastallize"))?;

    let tera_type = elements(root, "label")
        .filter(|label| has_class(label, "megaevo"))
        .flat_map(|label| elements(label, "img"))
        .find_map(|img| img.value().attr("alt").map(str::to_string));

    Some(TeraToggle { tera_type })
}

fn small_text(button: ElementRef<'_>, class: &str) -> Option<String> {
    elements(button, "small")
        .find(|small| has_class(small, class))
        .map(|small| clean_text(&small))
}

/// Name and state read from an opponent party icon's `aria-label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLabel {
    pub name: String,
    pub active: bool,
    pub fainted: bool,
}

/// Parse an icon label such as `"Gholdengo (active)"` or `"Kingambit (fainted)"`
pub fn parse_icon_label(label: &str) -> IconLabel {
    let label = label.trim();
    let name = label.split(" (").next().unwrap_or(label).trim();

    IconLabel {
        name: name.to_string(),
        active: label.contains("(active)"),
        fainted: label.ends_with("(fainted)"),
    }
}

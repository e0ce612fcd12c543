//! HTML fragment parsers
//!
//! Each parser takes one self-contained fragment as served by the page and
//! walks it with `scraper`. Fields are extracted independently; a missing
//! section is never an error.

mod controls;
mod log;
mod tooltip;


use scraper::{ElementRef, Html};

use crate::ParseError;

pub use controls::{
    ControlPanel, IconLabel, MoveButton, SwitchButton, TeraToggle, parse_controls,
    parse_icon_label,
};
pub use log::{TurnLogEntry, parse_turn_log};
pub use tooltip::{Health, Tooltip};

/// Parse a fragment, rejecting input that carries no markup at all
pub(crate) fn parse_fragment(markup: &str) -> Result<Html, ParseError> {
    if markup.trim().is_empty() {
        return Err(ParseError::EmptyMarkup);
    }

    let html = Html::parse_fragment(markup);
    let has_elements = html
        .root_element()
        .descendants()
        .skip(1)
        .any(|node| node.value().is_element());

    if !has_elements {
        return Err(ParseError::InvalidMarkup(preview(markup)));
    }

    Ok(html)
}

/// All elements with the given tag name below `root`, in document order
pub(crate) fn elements<'a>(
    root: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

pub(crate) fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Concatenated text content, text nodes joined by `separator`
pub(crate) fn text_of(el: &ElementRef<'_>, separator: &str) -> String {
    el.text().collect::<Vec<_>>().join(separator)
}

/// Text content with whitespace runs collapsed and ends trimmed
pub(crate) fn clean_text(el: &ElementRef<'_>) -> String {
    text_of(el, "").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn preview(markup: &str) -> String {
    const MAX: usize = 40;
    let trimmed = markup.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

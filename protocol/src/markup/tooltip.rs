//! Hover tooltip extractors
//!
//! A tooltip describes one Pokemon. Its layout is roughly:
//!
//! ```text
//! <h2>Great Tusk <small>L84</small></h2>
//! <span class="textaligned-typeicons"><img alt="Ground"><img alt="Fighting"></span>
//! <p><small>HP:</small> 62.5% <span class="status brn">BRN</span></p>
//! <p><small>Possible abilities:</small> Protosynthesis</p>
//! <p><small>Spe</small> 214 to 264</p>
//! <p class="tooltip-section">&#8226; Headlong Rush<br>&#8226; Ice Spinner (7/16)</p>
//! ```
//!
//! Every extractor is independent and returns `None` (or an empty list) when
//! its section is missing. Only the first element carrying a label is read.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use super::{elements, has_class, parse_fragment, text_of};
use crate::ParseError;

static HP_PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+\.?\d*)%").unwrap());
static SPEED_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*to\s*(\d+)").unwrap());
static SPEED_EXACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSpe\s+(\d+)").unwrap());
static ABILITY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:possible abilities|ability):").unwrap());
static ITEM_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)item:").unwrap());
static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*\)").unwrap());
static TITLE_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static TITLE_LEVEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*L\d+\s*").unwrap());

const TYPE_ICONS: &str = "textaligned-typeicons";
const TERA_LABEL: &str = "Tera Type:";
const MOVE_BULLET: char = '•';

/// Health as displayed in the HP line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Health {
    Fainted,
    /// Remaining HP in percent
    Percent(f32),
}

/// A parsed tooltip fragment
#[derive(Debug)]
pub struct Tooltip {
    html: Html,
}

impl Tooltip {
    /// Parse a tooltip fragment
    ///
    /// Fails only when the input is blank or carries no markup.
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        Ok(Self {
            html: parse_fragment(markup)?,
        })
    }

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Pokemon name from the `<h2>` title, without gender or level markers
    pub fn title(&self) -> Option<String> {
        let heading = elements(self.root(), "h2").next()?;
        let raw = text_of(&heading, "");
        let name = TITLE_PARENTHETICAL.replace_all(raw.trim(), "");
        let name = TITLE_LEVEL.replace_all(&name, "");
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Type names in icon order
    pub fn types(&self) -> Vec<String> {
        self.root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| has_class(el, TYPE_ICONS))
            .map(|icons| icon_names(&icons))
            .unwrap_or_default()
    }

    /// Tera type shown after the "Tera Type:" label
    pub fn tera_type(&self) -> Option<String> {
        let mut seen_label = false;
        for node in self.root().descendants() {
            match node.value() {
                Node::Text(text) if !seen_label => {
                    seen_label = text.contains(TERA_LABEL);
                }
                Node::Element(el) if seen_label && el.name() == "span" => {
                    let Some(span) = ElementRef::wrap(node) else {
                        continue;
                    };
                    if has_class(&span, TYPE_ICONS) {
                        return icon_names(&span).into_iter().next();
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Health from the HP line; a fainted marker wins over any percentage
    pub fn health(&self) -> Option<Health> {
        let paragraph = self.hp_paragraph()?;
        let text = text_of(&paragraph, "");

        if text.to_lowercase().contains("(fainted)") {
            return Some(Health::Fainted);
        }

        HP_PERCENT
            .captures(&text)
            .and_then(|caps| caps[1].parse().ok())
            .map(Health::Percent)
    }

    /// Raw status code from the HP line (e.g. "BRN"), uppercased
    pub fn status_code(&self) -> Option<String> {
        let paragraph = self.hp_paragraph()?;
        let status = paragraph
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "span" && has_class(el, "status"))?;
        let code = text_of(&status, "").trim().to_uppercase();
        (!code.is_empty()).then_some(code)
    }

    /// Ability candidates from "Ability:" or "Possible abilities:"
    pub fn abilities(&self) -> Option<Vec<String>> {
        let paragraph = self.labelled_paragraph(|label| {
            let label = label.to_lowercase();
            label.contains("ability:") || label.contains("possible abilities:")
        })?;
        let text = text_of(&paragraph, " ");
        let value = labelled_value(&text, &ABILITY_LABEL)?;

        Some(
            value
                .split(',')
                .map(str::trim)
                .filter(|ability| !ability.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Speed bracket shown for opposing Pokemon ("214 to 264")
    pub fn speed_range(&self) -> Option<(u32, u32)> {
        let paragraph = self.labelled_paragraph(|label| label.contains("Spe"))?;
        let text = text_of(&paragraph, " ");
        let caps = SPEED_RANGE.captures(&text)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }

    /// Exact speed stat shown for our own Pokemon ("... / Spe 300")
    ///
    /// Read from the first paragraph carrying a "Spe" stat, so an ability
    /// line like "Speed Boost" is skipped.
    pub fn exact_speed(&self) -> Option<u32> {
        elements(self.root(), "p").find_map(|p| {
            let text = text_of(&p, " ");
            SPEED_EXACT.captures(&text)?[1].parse().ok()
        })
    }

    /// Revealed moves from the bulleted tooltip sections
    pub fn moves(&self) -> Vec<String> {
        let mut moves: Vec<String> = Vec::new();

        for section in elements(self.root(), "p").filter(|p| has_class(p, "tooltip-section")) {
            for line in text_of(&section, "\n").lines() {
                let Some(entry) = line.trim().strip_prefix(MOVE_BULLET) else {
                    continue;
                };
                let name = PARENTHETICAL.replace_all(entry, "");
                let name = name.trim();
                if !name.is_empty() && !moves.iter().any(|m| m == name) {
                    moves.push(name.to_string());
                }
            }
        }

        moves
    }

    /// Held item shown after "Item:"
    pub fn item(&self) -> Option<String> {
        let paragraph = self.labelled_paragraph(|label| label.contains("Item:"))?;
        let text = text_of(&paragraph, " ");
        let value = labelled_value(&text, &ITEM_LABEL)?;
        (!value.is_empty()).then(|| value.to_string())
    }

    fn hp_paragraph(&self) -> Option<ElementRef<'_>> {
        self.labelled_paragraph(|label| label.contains("HP:"))
    }

    /// First `<p>` with a `<small>` label accepted by `matches`
    fn labelled_paragraph(&self, matches: impl Fn(&str) -> bool) -> Option<ElementRef<'_>> {
        elements(self.root(), "p").find(|p| {
            p.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "small")
                .any(|small| matches(&text_of(&small, "")))
        })
    }
}

fn icon_names(container: &ElementRef<'_>) -> Vec<String> {
    elements(*container, "img")
        .filter_map(|img| img.value().attr("alt"))
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Value following `label` within its " / "-delimited segment
///
/// Our own tooltips put ability and item on one line:
/// `Ability: Intimidate / Item: Leftovers`.
fn labelled_value<'t>(text: &'t str, label: &Regex) -> Option<&'t str> {
    text.split('/').find_map(|segment| {
        let found = label.find(segment)?;
        Some(segment[found.end()..].trim())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_value_splits_segments() {
        let text = "Ability:  Intimidate /  Item:  Leftovers";
        assert_eq!(labelled_value(text, &ABILITY_LABEL), Some("Intimidate"));
        assert_eq!(labelled_value(text, &ITEM_LABEL), Some("Leftovers"));
    }

    #[test]
    fn test_labelled_value_missing_label() {
        assert_eq!(labelled_value("HP: 100%", &ITEM_LABEL), None);
    }

    #[test]
    fn test_title_strips_level_and_gender() {
        let tooltip = Tooltip::parse("<h2>Gholdengo (M) <small>L79</small></h2>").unwrap();
        assert_eq!(tooltip.title().as_deref(), Some("Gholdengo"));
    }

    #[test]
    fn test_blank_tooltip_is_rejected() {
        assert_eq!(Tooltip::parse("   ").unwrap_err(), ParseError::EmptyMarkup);
        assert!(matches!(
            Tooltip::parse("HP: 50%").unwrap_err(),
            ParseError::InvalidMarkup(_)
        ));
    }
}

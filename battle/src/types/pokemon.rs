//! Pokemon state types

use rotom_protocol::{Health, ParseError, Tooltip};

use super::pokemon_type::{TeraType, Type};
use super::status::Status;

/// Held item knowledge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeldItem {
    Known(String),
    /// Not revealed yet (opponent default)
    Unknown,
    /// Holding nothing (own default)
    None,
}

impl std::fmt::Display for HeldItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeldItem::Known(name) => write!(f, "{name}"),
            HeldItem::Unknown => write!(f, "Unknown"),
            HeldItem::None => write!(f, "No Item"),
        }
    }
}

/// Inclusive speed bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedRange {
    pub min: u32,
    pub max: u32,
}

impl SpeedRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn exact(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, speed: u32) -> bool {
        (self.min..=self.max).contains(&speed)
    }
}

impl std::fmt::Display for SpeedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_exact() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

/// Fields read from one tooltip, with defaults applied
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureFields {
    pub type1: Type,
    pub type2: Type,
    pub tera_type: TeraType,
    /// Percentage in [0, 100]
    pub hp: f32,
    pub fainted: bool,
    pub status: Option<Status>,
    pub abilities: Vec<String>,
    pub speed: SpeedRange,
    pub moves: Vec<String>,
    pub item: HeldItem,
}

impl CreatureFields {
    /// Values used for every section a tooltip does not show
    pub fn defaults(is_opponent: bool) -> Self {
        Self {
            type1: Type::NotSpecified,
            type2: Type::NotSpecified,
            tera_type: TeraType::default(),
            hp: 100.0,
            fainted: false,
            status: None,
            abilities: Vec::new(),
            speed: SpeedRange::default(),
            moves: Vec::new(),
            item: if is_opponent {
                HeldItem::Unknown
            } else {
                HeldItem::None
            },
        }
    }

    /// Combine the tooltip extractors
    ///
    /// Opponent tooltips show a speed range, own tooltips the exact stat.
    pub fn from_tooltip(tooltip: &Tooltip, is_opponent: bool) -> Self {
        let mut fields = Self::defaults(is_opponent);

        let types = tooltip.types();
        let mut types = types.iter().map(|name| Type::from_name(name));
        fields.type1 = types.next().unwrap_or(Type::NotSpecified);
        fields.type2 = types.next().unwrap_or(Type::NotSpecified);

        if let Some(tera) = tooltip.tera_type() {
            fields.tera_type = TeraType::from_name(&tera);
        }

        match tooltip.health() {
            Some(Health::Fainted) => {
                fields.fainted = true;
                fields.hp = 0.0;
            }
            Some(Health::Percent(hp)) => fields.hp = hp.clamp(0.0, 100.0),
            None => {}
        }

        fields.status = tooltip
            .status_code()
            .and_then(|code| Status::from_code(&code));

        if let Some(abilities) = tooltip.abilities() {
            fields.abilities = abilities;
        }

        let speed = if is_opponent {
            tooltip.speed_range().map(|(min, max)| SpeedRange::new(min, max))
        } else {
            tooltip.exact_speed().map(SpeedRange::exact)
        };
        if let Some(speed) = speed {
            fields.speed = speed;
        }

        fields.moves = tooltip.moves();

        if let Some(item) = tooltip.item() {
            fields.item = HeldItem::Known(item);
        }

        fields
    }
}

/// Parse a creature tooltip into normalized fields
///
/// Missing sections fall back to [`CreatureFields::defaults`]; only markup
/// that is blank or has no elements is an error.
pub fn parse_creature(markup: &str, is_opponent: bool) -> Result<CreatureFields, ParseError> {
    let tooltip = Tooltip::parse(markup)?;
    Ok(CreatureFields::from_tooltip(&tooltip, is_opponent))
}

/// A Pokemon as seen at one decision point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    pub name: String,

    /// Percentage in [0, 100]
    pub hp: f32,

    pub type1: Type,
    pub type2: Type,
    pub tera_type: TeraType,

    /// Candidate abilities; a single entry once revealed
    pub abilities: Vec<String>,

    /// Known moves in reveal order, no duplicates
    pub moves: Vec<String>,

    pub item: HeldItem,
    pub speed: SpeedRange,
    pub status: Option<Status>,
    pub fainted: bool,
}

impl Creature {
    pub fn new(name: impl Into<String>, fields: CreatureFields) -> Self {
        let mut creature = Self {
            name: name.into(),
            hp: 100.0,
            type1: Type::NotSpecified,
            type2: Type::NotSpecified,
            tera_type: TeraType::default(),
            abilities: Vec::new(),
            moves: Vec::new(),
            item: HeldItem::Unknown,
            speed: SpeedRange::default(),
            status: None,
            fainted: false,
        };
        creature.update(fields);
        creature
    }

    /// Parse a tooltip, falling back to `name` when it has no title
    pub fn from_tooltip(
        markup: &str,
        is_opponent: bool,
        name: &str,
    ) -> Result<Self, ParseError> {
        let tooltip = Tooltip::parse(markup)?;
        let name = tooltip.title().unwrap_or_else(|| name.to_string());
        Ok(Self::new(name, CreatureFields::from_tooltip(&tooltip, is_opponent)))
    }

    /// Apply freshly parsed fields; known moves only ever grow
    pub fn update(&mut self, fields: CreatureFields) {
        self.type1 = fields.type1;
        self.type2 = fields.type2;
        self.tera_type = fields.tera_type;
        self.fainted = fields.fainted;
        self.hp = if fields.fainted { 0.0 } else { fields.hp };
        self.status = fields.status;
        self.abilities = fields.abilities;
        self.speed = fields.speed;
        self.item = fields.item;
        for name in fields.moves {
            self.record_move(&name);
        }
    }

    /// Record a revealed move
    pub fn record_move(&mut self, move_name: &str) {
        if !self.moves.iter().any(|m| m == move_name) {
            self.moves.push(move_name.to_string());
        }
    }

    pub fn types(&self) -> [Type; 2] {
        [self.type1, self.type2]
    }

    /// Check if this Pokemon is alive
    pub fn is_alive(&self) -> bool {
        !self.fainted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPPONENT: &str = r#"
        <div class="tooltip">
          <h2>Kingambit <small>L80</small></h2>
          <span class="textaligned-typeicons"><img alt="Dark"><img alt="Steel"></span>
          <p><small>HP:</small> 37% <span class="status tox">TOX</span></p>
          <p><small>Possible abilities:</small> Defiant, Supreme Overlord, Pressure</p>
          <p><small>Spe</small> 140 to 203</p>
          <p><small>Tera Type:</small> <span class="textaligned-typeicons"><img alt="Stellar"></span></p>
          <p class="tooltip-section">&#8226; Kowtow Cleave<br>&#8226; Sucker Punch (3/8)</p>
        </div>"#;

    #[test]
    fn test_parse_opponent_creature() {
        let fields = parse_creature(OPPONENT, true).unwrap();

        assert_eq!(fields.type1, Type::Dark);
        assert_eq!(fields.type2, Type::Steel);
        assert_eq!(fields.tera_type, TeraType::Stellar);
        assert_eq!(fields.hp, 37.0);
        assert!(!fields.fainted);
        assert_eq!(fields.status, Some(Status::Poison));
        assert_eq!(fields.abilities, vec!["Defiant", "Supreme Overlord", "Pressure"]);
        assert_eq!(fields.speed, SpeedRange::new(140, 203));
        assert_eq!(fields.moves, vec!["Kowtow Cleave", "Sucker Punch"]);
        assert_eq!(fields.item, HeldItem::Unknown);
    }

    #[test]
    fn test_parse_own_creature() {
        let fields = parse_creature(
            r#"<h2>Dondozo</h2>
               <span class="textaligned-typeicons"><img alt="Water"></span>
               <p><small>HP:</small> 100.0% (411/411)</p>
               <p><small>Ability:</small> Unaware / <small>Item:</small> Leftovers</p>
               <p>Atk 236&nbsp;/ Def 266&nbsp;/ SpA 156&nbsp;/ SpD 166&nbsp;/ Spe 106</p>"#,
            false,
        )
        .unwrap();

        assert_eq!(fields.type1, Type::Water);
        assert_eq!(fields.type2, Type::NotSpecified);
        assert_eq!(fields.abilities, vec!["Unaware"]);
        assert_eq!(fields.item, HeldItem::Known("Leftovers".to_string()));
        assert_eq!(fields.speed, SpeedRange::exact(106));
        assert_eq!(fields.status, None);
    }

    #[test]
    fn test_fainted_creature_has_zero_hp() {
        let fields =
            parse_creature("<p><small>HP:</small> 0% (fainted)</p>", true).unwrap();
        assert!(fields.fainted);
        assert_eq!(fields.hp, 0.0);
    }

    #[test]
    fn test_defaults_for_bare_tooltip() {
        let fields = parse_creature("<div>Ditto</div>", false).unwrap();
        assert_eq!(fields, CreatureFields::defaults(false));
        assert_eq!(fields.hp, 100.0);
        assert_eq!(fields.item, HeldItem::None);
        assert_eq!(fields.speed, SpeedRange::new(0, 0));
    }

    #[test]
    fn test_unknown_status_code_is_none() {
        let fields = parse_creature(
            r#"<p><small>HP:</small> 80% <span class="status">???</span></p>"#,
            true,
        )
        .unwrap();
        assert_eq!(fields.status, None);
    }

    #[test]
    fn test_invalid_markup() {
        assert_eq!(parse_creature("   ", true), Err(ParseError::EmptyMarkup));
        assert!(parse_creature("just text", true).is_err());
    }

    #[test]
    fn test_creature_from_tooltip_uses_title() {
        let creature = Creature::from_tooltip(OPPONENT, true, "fallback").unwrap();
        assert_eq!(creature.name, "Kingambit");
        assert_eq!(creature.types(), [Type::Dark, Type::Steel]);

        let creature = Creature::from_tooltip("<p>?</p>", true, "Gholdengo").unwrap();
        assert_eq!(creature.name, "Gholdengo");
    }

    #[test]
    fn test_known_moves_only_grow() {
        let mut creature = Creature::new("Great Tusk", CreatureFields::defaults(true));
        creature.record_move("Headlong Rush");
        creature.record_move("Headlong Rush");

        let mut fields = CreatureFields::defaults(true);
        fields.moves = vec!["Ice Spinner".to_string(), "Headlong Rush".to_string()];
        creature.update(fields);

        assert_eq!(creature.moves, vec!["Headlong Rush", "Ice Spinner"]);
    }

    #[test]
    fn test_is_alive() {
        let mut fields = CreatureFields::defaults(true);
        fields.fainted = true;
        fields.hp = 40.0;
        let creature = Creature::new("Dondozo", fields);
        assert!(!creature.is_alive());
        assert_eq!(creature.hp, 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(HeldItem::None.to_string(), "No Item");
        assert_eq!(HeldItem::Unknown.to_string(), "Unknown");
        assert_eq!(SpeedRange::exact(291).to_string(), "291");
        assert_eq!(SpeedRange::new(264, 214).to_string(), "214 to 264");
    }
}

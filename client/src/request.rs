//! Decision requests
//!
//! A request is the text summary a decision maker reads, together with the
//! actions it may answer with.

use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rotom_battle::{
    Action, Creature, LegalActions, MoveOption, TeraOffer, TrackedBattle, Type,
    effectiveness_against,
};
use serde::Deserialize;
use serde_json::Value;

/// Which kind of decision point a request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Team preview: pick the lead
    LeadSelection,
    /// A regular turn, or a forced switch after a faint
    Turn,
}

/// Everything a decision maker gets for one decision point
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    pub kind: RequestKind,
    pub turn: u32,
    pub legal_actions: Vec<Action>,
    pub tera: TeraOffer,
    /// Why the previous answer for this decision point was rejected
    pub rejection: Option<String>,
    pub prompt: String,
}

impl DecisionRequest {
    /// JSON schema the answer must follow
    pub fn schema(&self) -> Value {
        rotom_protocol::decision_schema()
    }
}

/// Move classification file: `{"attack": ["Make It Rain", ...]}`
///
/// Names compare on letters and digits only, case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveClassifier {
    #[serde(default, rename = "attack", deserialize_with = "deserialize_ids")]
    attacking: Option<HashSet<String>>,
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Option<HashSet<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(Some(names.iter().map(|name| move_id(name)).collect()))
}

fn move_id(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl MoveClassifier {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid move classification JSON")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read move classes from {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Whether a move deals type-based damage
    ///
    /// Without a classification list every move counts as attacking.
    pub fn is_attack(&self, move_name: &str) -> bool {
        match &self.attacking {
            Some(ids) => ids.contains(&move_id(move_name)),
            None => true,
        }
    }

    /// Annotation for a move against the opposing active Pokemon
    pub fn annotate(&self, option: &MoveOption, defender: Option<&Creature>) -> Option<String> {
        if !self.is_attack(&option.name) {
            return Some("status move".to_string());
        }
        if option.move_type == Type::NotSpecified {
            return None;
        }
        defender.map(|defender| {
            effectiveness_against(option.move_type, defender)
                .descriptor()
                .to_string()
        })
    }
}

/// Builds decision requests from the battle record
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    classifier: MoveClassifier,
}

impl RequestBuilder {
    pub fn new(classifier: MoveClassifier) -> Self {
        Self { classifier }
    }

    /// Request for the first decision of a battle (switches only)
    pub fn lead(&self, battle: &TrackedBattle, legal: &LegalActions) -> DecisionRequest {
        let mut prompt = String::from("The battle has started!\n");
        write_team(&mut prompt, "Opponent's team", &battle.opponent.pokemon);
        write_team(&mut prompt, "Your team", &battle.me.pokemon);
        prompt.push_str("\nPick your lead. Answer with `Switch X`.\nAvailable switches:\n");
        write_switches(&mut prompt, battle);

        DecisionRequest {
            kind: RequestKind::LeadSelection,
            turn: battle.turn(),
            legal_actions: legal.actions().collect(),
            tera: legal.tera(),
            rejection: None,
            prompt,
        }
    }

    /// Request for a regular decision point
    pub fn turn(
        &self,
        battle: &TrackedBattle,
        moves: &[MoveOption],
        legal: &LegalActions,
    ) -> DecisionRequest {
        let mut prompt = String::from("Battle log so far:\n");
        for entry in battle.log.entries() {
            let _ = writeln!(prompt, "Turn {}: {}", entry.turn, entry.actions.join(" | "));
        }

        write_team(&mut prompt, "Opponent's team", &battle.opponent.pokemon);
        write_active(&mut prompt, "Opponent's active Pokemon", battle.opponent.active_pokemon());
        write_team(&mut prompt, "Your team", &battle.me.pokemon);
        write_active(&mut prompt, "Your active Pokemon", battle.me.active_pokemon());

        prompt.push_str("\nAnswer with `Move X` or `Switch X` from the options below.\n");
        match legal.tera() {
            TeraOffer::Offered(tera_type) => {
                let tera_type = tera_type.map(|t| t.to_string()).unwrap_or_default();
                let _ = writeln!(
                    prompt,
                    "You may also Terastallize into {} type with a move (once per battle).",
                    if tera_type.is_empty() { "its Tera" } else { tera_type.as_str() }
                );
            }
            TeraOffer::Consumed => prompt.push_str("Terastallization has already been used.\n"),
            TeraOffer::NotOffered => {}
        }

        prompt.push_str("\nAvailable moves:\n");
        let defender = battle.opponent.active_pokemon();
        for option in moves {
            let Some(action) = option.action().filter(|a| legal.contains(*a)) else {
                continue;
            };
            let _ = write!(
                prompt,
                "{action}: {} ({}, {} PP)",
                option.name, option.move_type, option.pp_left
            );
            if let Some(note) = self.classifier.annotate(option, defender) {
                let _ = write!(prompt, " - {note}");
            }
            prompt.push('\n');
        }

        prompt.push_str("\nAvailable switches:\n");
        write_switches(&mut prompt, battle);

        if let Some(last) = battle.last_decision() {
            let _ = writeln!(
                prompt,
                "\nYour previous decision: {} (Terastallize: {}). Reason: {}",
                last.action, last.terastallize, last.reason
            );
        }

        DecisionRequest {
            kind: RequestKind::Turn,
            turn: battle.turn(),
            legal_actions: legal.actions().collect(),
            tera: legal.tera(),
            rejection: None,
            prompt,
        }
    }

    /// The same request, telling the decision maker why its answer was refused
    pub fn retry(&self, request: &DecisionRequest, rejection: &str) -> DecisionRequest {
        let options: Vec<&str> = request.legal_actions.iter().map(Action::as_str).collect();
        let mut retried = request.clone();
        let _ = write!(
            retried.prompt,
            "\nYour previous answer was rejected: {rejection}. Choose one of: {}.\n",
            options.join(", ")
        );
        retried.rejection = Some(rejection.to_string());
        retried
    }
}

/// One-line summary of a Pokemon
pub fn describe(creature: &Creature) -> String {
    if creature.fainted {
        return format!("{} (fainted)", creature.name);
    }

    let mut text = format!("{}: {}", creature.name, creature.type1);
    if creature.type2.is_specified() {
        let _ = write!(text, "/{}", creature.type2);
    }
    let _ = write!(text, ", {:.1}% HP", creature.hp);
    if let Some(status) = creature.status {
        let _ = write!(text, ", {status}");
    }
    if !creature.abilities.is_empty() {
        let _ = write!(text, ", ability: {}", creature.abilities.join(" or "));
    }
    let _ = write!(text, ", item: {}", creature.item);
    let _ = write!(text, ", speed: {}", creature.speed);
    let _ = write!(text, ", tera type: {}", creature.tera_type);
    if !creature.moves.is_empty() {
        let _ = write!(text, ", moves: {}", creature.moves.join(", "));
    }
    text
}

fn write_team(prompt: &mut String, title: &str, team: &[Creature]) {
    let _ = writeln!(prompt, "\n{title}:");
    if team.is_empty() {
        prompt.push_str("- (unknown)\n");
    }
    for creature in team {
        let _ = writeln!(prompt, "- {}", describe(creature));
    }
}

fn write_active(prompt: &mut String, title: &str, active: Option<&Creature>) {
    match active {
        Some(creature) => {
            let _ = writeln!(prompt, "\n{title}: {}", describe(creature));
        }
        None => {
            let _ = writeln!(prompt, "\n{title}: none");
        }
    }
}

fn write_switches(prompt: &mut String, battle: &TrackedBattle) {
    let mut any = false;
    for (action, creature) in battle.me.switch_options() {
        let _ = writeln!(prompt, "{action}: {}", creature.name);
        any = true;
    }
    if !any {
        prompt.push_str("(none)\n");
    }
}

#[cfg(test)]
mod tests {
    use rotom_battle::{ControlHandle, CreatureFields, Decision, Team, TeraType};

    use super::*;

    fn creature(name: &str, type1: Type, type2: Type) -> Creature {
        let mut fields = CreatureFields::defaults(false);
        fields.type1 = type1;
        fields.type2 = type2;
        Creature::new(name, fields)
    }

    fn move_option(slot: u8, name: &str, move_type: Type) -> MoveOption {
        MoveOption {
            slot,
            name: name.to_string(),
            pp_left: 8,
            move_type,
            handle: ControlHandle::new(format!("move|{name}")),
        }
    }

    fn battle() -> TrackedBattle {
        let mut me = Team::new();
        me.add(creature("Gholdengo", Type::Steel, Type::Ghost));
        me.add(creature("Dondozo", Type::Water, Type::NotSpecified));
        me.set_handle("Dondozo", ControlHandle::new("switchpokemon|1"));
        me.set_active(0);

        let mut opponent = Team::new();
        opponent.add(creature("Great Tusk", Type::Ground, Type::Fighting));
        opponent.set_active(0);

        let mut battle = TrackedBattle::new();
        battle.set_teams(me, opponent);
        battle
    }

    #[test]
    fn test_classifier() {
        let classifier =
            MoveClassifier::from_json(r#"{"attack": ["Make It Rain", "U-turn"]}"#).unwrap();
        assert!(classifier.is_attack("make it rain"));
        assert!(classifier.is_attack("U-Turn"));
        assert!(!classifier.is_attack("Nasty Plot"));

        assert!(MoveClassifier::default().is_attack("Nasty Plot"));
        assert!(MoveClassifier::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_annotations() {
        let classifier = MoveClassifier::from_json(r#"{"attack": ["Shadow Ball", "Surf"]}"#)
            .unwrap();
        let defender = creature("Great Tusk", Type::Ground, Type::Fighting);

        let shadow_ball = move_option(1, "Shadow Ball", Type::Ghost);
        let surf = move_option(2, "Surf", Type::Water);
        let nasty_plot = move_option(3, "Nasty Plot", Type::Dark);

        assert_eq!(
            classifier.annotate(&shadow_ball, Some(&defender)).as_deref(),
            Some("normal damage")
        );
        assert_eq!(
            classifier.annotate(&surf, Some(&defender)).as_deref(),
            Some("double damage")
        );
        assert_eq!(
            classifier.annotate(&nasty_plot, Some(&defender)).as_deref(),
            Some("status move")
        );
        assert_eq!(classifier.annotate(&surf, None), None);
    }

    #[test]
    fn test_turn_request() {
        let mut battle = battle();
        battle.record_decision(Decision::new(Action::Move1, false, "chip damage"));

        let moves = vec![
            move_option(1, "Make It Rain", Type::Steel),
            move_option(2, "Shadow Ball", Type::Ghost),
        ];
        let legal = LegalActions::from_options(
            &moves,
            &battle.me,
            TeraOffer::Offered(Some(TeraType::Typed(Type::Fairy))),
        );
        let request = RequestBuilder::default().turn(&battle, &moves, &legal);

        assert_eq!(request.kind, RequestKind::Turn);
        assert_eq!(
            request.legal_actions,
            vec![Action::Move1, Action::Move2, Action::Switch2]
        );
        assert!(request.prompt.contains("Move 1: Make It Rain (Steel, 8 PP) - normal damage"));
        assert!(request.prompt.contains("Switch 2: Dondozo"));
        assert!(request.prompt.contains("Terastallize into Fairy type"));
        assert!(request.prompt.contains("Opponent's active Pokemon: Great Tusk: Ground/Fighting"));
        assert!(request.prompt.contains("Reason: chip damage"));
        assert_eq!(request.schema()["required"][0], "action");
    }

    #[test]
    fn test_lead_request() {
        let mut battle = battle();
        battle.me.clear_active();
        battle.me.set_handle("Gholdengo", ControlHandle::new("switchpokemon|0"));

        let legal = LegalActions::from_options(&[], &battle.me, TeraOffer::NotOffered);
        let request = RequestBuilder::default().lead(&battle, &legal);

        assert_eq!(request.kind, RequestKind::LeadSelection);
        assert_eq!(request.legal_actions, vec![Action::Switch1, Action::Switch2]);
        assert!(request.prompt.contains("Switch 1: Gholdengo"));
        assert!(!request.prompt.contains("Available moves"));
    }

    #[test]
    fn test_retry_mentions_rejection() {
        let battle = battle();
        let legal = LegalActions::from_options(&[], &battle.me, TeraOffer::NotOffered);
        let builder = RequestBuilder::default();
        let request = builder.turn(&battle, &[], &legal);

        let retried = builder.retry(&request, "Switch 5 is not available this turn");
        assert_eq!(
            retried.rejection.as_deref(),
            Some("Switch 5 is not available this turn")
        );
        assert!(retried.prompt.ends_with(
            "rejected: Switch 5 is not available this turn. Choose one of: Switch 2.\n"
        ));
    }

    #[test]
    fn test_describe() {
        let mut fields = CreatureFields::defaults(true);
        fields.type1 = Type::Water;
        fields.hp = 62.5;
        let dondozo = Creature::new("Dondozo", fields);
        assert_eq!(
            describe(&dondozo),
            "Dondozo: Water, 62.5% HP, item: Unknown, speed: 0, tera type: Not Specified"
        );

        let mut fields = CreatureFields::defaults(true);
        fields.fainted = true;
        assert_eq!(describe(&Creature::new("Kingambit", fields)), "Kingambit (fainted)");
    }
}

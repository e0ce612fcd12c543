//! One battle, from lead selection to the end screen

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rotom_battle::{
    ControlHandle, Creature, CreatureFields, Decision, LegalActions, MoveOption, Team,
    TrackedBattle, parse_creature,
};
use rotom_protocol::{ControlPanel, parse_controls, parse_icon_label, parse_turn_log};
use tokio::time::{Instant, sleep};

use crate::config::Config;
use crate::decision_log::DecisionLog;
use crate::request::{DecisionRequest, RequestBuilder};
use crate::surface::{ControlSurface, DecisionMaker, MarkupSource};

/// Icon label of an opposing Pokemon that has not been sent out yet
const UNREVEALED_ICON: &str = "Not revealed";

/// Drives one battle at a time through the page collaborators
pub struct BattleSession<M, C, D> {
    markup: M,
    controls: C,
    decider: D,
    requests: RequestBuilder,
    poll_interval: Duration,
    wait_timeout: Duration,
    max_attempts: u32,
}

impl<M, C, D> BattleSession<M, C, D>
where
    M: MarkupSource,
    C: ControlSurface,
    D: DecisionMaker,
{
    pub fn new(markup: M, controls: C, decider: D, config: &Config, requests: RequestBuilder) -> Self {
        Self {
            markup,
            controls,
            decider,
            requests,
            poll_interval: config.poll_interval,
            wait_timeout: config.wait_timeout,
            max_attempts: config.max_decision_attempts.max(1),
        }
    }

    pub fn into_parts(self) -> (M, C, D) {
        (self.markup, self.controls, self.decider)
    }

    /// Play until the end screen shows, recording decisions in `log`
    ///
    /// Fails only when a control cannot be invoked or the page stays
    /// unreadable for the whole wait timeout.
    pub async fn play(&mut self, log: &mut DecisionLog) -> Result<TrackedBattle> {
        let mut battle = TrackedBattle::new();
        tracing::info!(iteration = log.iteration(), "Battle started");

        while let Some(panel) = self.wait_for_decision_point().await? {
            self.refresh(&mut battle, &panel).await;

            let moves: Vec<MoveOption> = panel.moves.iter().map(MoveOption::from_button).collect();
            let tera = battle.tera_offer(panel.terastallize.as_ref());
            let legal = LegalActions::from_options(&moves, &battle.me, tera);
            if legal.is_empty() {
                tracing::debug!(turn = battle.turn(), "No selectable action offered");
                sleep(self.poll_interval).await;
                continue;
            }

            let request = if moves.is_empty() && battle.decisions() == 0 {
                self.requests.lead(&battle, &legal)
            } else {
                self.requests.turn(&battle, &moves, &legal)
            };

            let Some(decision) = self.solicit(&request, &legal).await else {
                sleep(self.poll_interval).await;
                continue;
            };

            self.apply(&decision, &moves, &battle.me).await?;

            if let Err(e) = log.append(&decision).await {
                tracing::error!(error = %e, "Failed to record decision");
            }
            battle.record_decision(decision);
        }

        battle.ended = true;
        let next = log.finish_battle();
        tracing::info!(
            decisions = battle.decisions(),
            turn = battle.turn(),
            next_iteration = next,
            "Battle finished"
        );
        Ok(battle)
    }

    /// Poll the controls until a choice is offered, `None` once the battle is over
    async fn wait_for_decision_point(&mut self) -> Result<Option<ControlPanel>> {
        let started = Instant::now();
        let mut last_read = Instant::now();
        let mut warned = false;

        loop {
            match self.read_controls().await {
                Ok(panel) => {
                    last_read = Instant::now();
                    if panel.battle_over {
                        return Ok(None);
                    }
                    if !panel.waiting && (!panel.moves.is_empty() || !panel.switches.is_empty()) {
                        return Ok(Some(panel));
                    }
                    match self.markup.battle_over().await {
                        Ok(true) => return Ok(None),
                        Ok(false) => {}
                        Err(e) => tracing::warn!(error = %e, "Battle-over check failed"),
                    }
                }
                Err(e) => {
                    if last_read.elapsed() >= self.wait_timeout {
                        return Err(e.context("Battle page stayed unreadable"));
                    }
                    tracing::warn!(error = %e, "Failed to read controls");
                }
            }

            if !warned && started.elapsed() >= self.wait_timeout {
                tracing::warn!(
                    waited_secs = started.elapsed().as_secs(),
                    "Still waiting for the opponent"
                );
                warned = true;
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn read_controls(&mut self) -> Result<ControlPanel> {
        let markup = self
            .markup
            .controls()
            .await
            .context("Failed to fetch controls")?;
        parse_controls(&markup).context("Failed to parse controls")
    }

    /// Re-read the log and both teams
    async fn refresh(&mut self, battle: &mut TrackedBattle, panel: &ControlPanel) {
        match self.read_log().await {
            Ok(entries) => {
                let added = battle.update_log(entries);
                if added > 0 {
                    tracing::debug!(turn = battle.turn(), added, "Battle log updated");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Battle log unavailable"),
        }

        let me = self.read_own_team(panel).await;
        let opponent = self.read_opponent_team().await;
        battle.set_teams(me, opponent);
    }

    async fn read_log(&mut self) -> Result<Vec<rotom_protocol::TurnLogEntry>> {
        let markup = self
            .markup
            .battle_log()
            .await
            .context("Failed to fetch battle log")?;
        parse_turn_log(&markup).context("Failed to parse battle log")
    }

    /// Our team in party order, from the switch menu
    async fn read_own_team(&mut self, panel: &ControlPanel) -> Team {
        let mut team = Team::new();

        for button in &panel.switches {
            let handle = ControlHandle::new(button.handle.clone());
            let tooltip = self.markup.tooltip(&handle).await;
            let mut creature = creature_from(tooltip, false, &button.name);
            if button.fainted {
                creature.fainted = true;
                creature.hp = 0.0;
            }

            let index = team.add(creature);
            if button.active {
                team.set_active(index);
            }
            if !button.disabled {
                team.set_handle(button.name.clone(), handle);
            }
        }

        team
    }

    /// The opponent's revealed, standing Pokemon
    async fn read_opponent_team(&mut self) -> Team {
        let mut team = Team::new();

        let labels = match self.markup.opponent_icons().await {
            Ok(labels) => labels,
            Err(e) => {
                tracing::warn!(error = %e, "Opponent icons unavailable");
                return team;
            }
        };

        for (index, label) in labels.iter().enumerate() {
            let icon = parse_icon_label(label);
            if icon.fainted || icon.name.is_empty() || icon.name == UNREVEALED_ICON {
                continue;
            }

            let tooltip = self.markup.opponent_tooltip(index).await;
            let creature = creature_from(tooltip, true, &icon.name);
            if !creature.is_alive() {
                continue;
            }

            let slot = team.add(creature);
            if icon.active {
                team.set_active(slot);
            }
        }

        team
    }

    /// Ask for a decision until a legal one comes back or attempts run out
    async fn solicit(&mut self, request: &DecisionRequest, legal: &LegalActions) -> Option<Decision> {
        let mut current = request.clone();

        for attempt in 1..=self.max_attempts {
            match self.decider.decide(&current).await {
                Ok(decision) => match legal.validate(&decision) {
                    Ok(()) => {
                        tracing::info!(
                            turn = request.turn,
                            action = %decision.action,
                            terastallize = decision.terastallize,
                            reason = %decision.reason,
                            "Decision accepted"
                        );
                        return Some(decision);
                    }
                    Err(e) => {
                        tracing::warn!(
                            attempt,
                            action = %decision.action,
                            terastallize = decision.terastallize,
                            error = %e,
                            "Decision rejected"
                        );
                        current = self.requests.retry(request, &e.to_string());
                    }
                },
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Decision maker failed");
                    current = request.clone();
                }
            }
        }

        tracing::warn!(
            attempts = self.max_attempts,
            turn = request.turn,
            "No legal decision, asking again"
        );
        None
    }

    /// Click the controls for an accepted decision
    async fn apply(&mut self, decision: &Decision, moves: &[MoveOption], team: &Team) -> Result<()> {
        if decision.action.is_move() {
            let option = moves
                .iter()
                .find(|m| m.action() == Some(decision.action))
                .ok_or_else(|| anyhow!("{} has no move button", decision.action))?;

            if decision.terastallize {
                self.controls
                    .toggle_terastallize()
                    .await
                    .context("Failed to toggle Terastallize")?;
            }
            self.controls
                .invoke(&option.handle)
                .await
                .with_context(|| format!("Failed to select {}", option.name))
        } else {
            let (creature, handle) = team
                .switch_target(decision.action)
                .ok_or_else(|| anyhow!("{} has no switch target", decision.action))?;
            self.controls
                .invoke(handle)
                .await
                .with_context(|| format!("Failed to switch to {}", creature.name))
        }
    }
}

/// Parse a fetched tooltip, falling back to defaults
fn creature_from(tooltip: Result<String>, is_opponent: bool, name: &str) -> Creature {
    let fields = tooltip.and_then(|markup| Ok(parse_creature(&markup, is_opponent)?));
    match fields {
        Ok(fields) => Creature::new(name, fields),
        Err(e) => {
            tracing::warn!(pokemon = name, error = %e, "Tooltip unavailable, using defaults");
            Creature::new(name, CreatureFields::defaults(is_opponent))
        }
    }
}

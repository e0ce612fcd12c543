//! Team (one player's side) state

use std::collections::HashMap;

use rotom_protocol::Action;

use super::moves::ControlHandle;
use super::pokemon::Creature;

/// One player's team at a decision point
///
/// Our team is populated in party order from the switch menu, so the roster
/// index is the switch slot minus one. The opponent's team only holds the
/// creatures revealed so far that are still standing.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    /// Pokemon on this team (party order)
    pub pokemon: Vec<Creature>,

    /// Index of the active Pokemon, never a fainted one
    active: Option<usize>,

    /// Switch button handles by Pokemon name
    handles: HashMap<String, ControlHandle>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Pokemon, returning its index
    pub fn add(&mut self, creature: Creature) -> usize {
        self.pokemon.push(creature);
        self.pokemon.len() - 1
    }

    /// Mark a Pokemon active
    ///
    /// Returns false (leaving no active Pokemon) when the index is out of
    /// range or the Pokemon has fainted.
    pub fn set_active(&mut self, index: usize) -> bool {
        match self.pokemon.get(index) {
            Some(creature) if creature.is_alive() => {
                self.active = Some(index);
                true
            }
            _ => {
                self.active = None;
                false
            }
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Get the active Pokemon
    pub fn active_pokemon(&self) -> Option<&Creature> {
        self.active
            .and_then(|idx| self.pokemon.get(idx))
            .filter(|creature| creature.is_alive())
    }

    /// Register the control that switches `name` in
    pub fn set_handle(&mut self, name: impl Into<String>, handle: ControlHandle) {
        self.handles.insert(name.into(), handle);
    }

    pub fn handle(&self, name: &str) -> Option<&ControlHandle> {
        self.handles.get(name)
    }

    /// Find Pokemon index by name
    pub fn find_pokemon(&self, name: &str) -> Option<usize> {
        self.pokemon.iter().position(|p| p.name == name)
    }

    /// Whether the Pokemon at `index` can be switched in right now
    pub fn can_switch_to(&self, index: usize) -> bool {
        self.active != Some(index)
            && self
                .pokemon
                .get(index)
                .is_some_and(|p| p.is_alive() && self.handles.contains_key(&p.name))
    }

    /// Switch actions available this turn, with their targets
    pub fn switch_options(&self) -> impl Iterator<Item = (Action, &Creature)> {
        self.pokemon
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.can_switch_to(*idx))
            .filter_map(|(idx, creature)| {
                let slot = u8::try_from(idx + 1).ok()?;
                Some((Action::for_switch(slot)?, creature))
            })
    }

    /// The Pokemon a switch action targets, if it is a legal target
    pub fn switch_target(&self, action: Action) -> Option<(&Creature, &ControlHandle)> {
        if !action.is_switch() {
            return None;
        }
        let idx = usize::from(action.slot()) - 1;
        if !self.can_switch_to(idx) {
            return None;
        }
        let creature = self.pokemon.get(idx)?;
        Some((creature, self.handles.get(&creature.name)?))
    }

    /// Count of non-fainted Pokemon
    pub fn alive_count(&self) -> usize {
        self.pokemon.iter().filter(|p| p.is_alive()).count()
    }

    /// Count of fainted Pokemon
    pub fn fainted_count(&self) -> usize {
        self.pokemon.iter().filter(|p| p.fainted).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }
}

//! Control handles and move options

use rotom_protocol::{Action, MoveButton};

use super::pokemon_type::Type;

/// Opaque identifier of an on-screen control (a button's `data-tooltip`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlHandle(pub String);

impl ControlHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ControlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A move that can be selected this turn
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOption {
    /// 1..=4
    pub slot: u8,
    pub name: String,
    pub pp_left: u32,
    pub move_type: Type,
    pub handle: ControlHandle,
}

impl MoveOption {
    pub fn from_button(button: &MoveButton) -> Self {
        Self {
            slot: button.slot,
            name: button.name.clone(),
            pp_left: button.pp_left,
            move_type: button
                .move_type
                .as_deref()
                .map(Type::from_name)
                .unwrap_or(Type::NotSpecified),
            handle: ControlHandle::new(button.handle.clone()),
        }
    }

    /// The action selecting this move, if the slot is in range
    pub fn action(&self) -> Option<Action> {
        Action::for_move(self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_option_from_button() {
        let option = MoveOption::from_button(&MoveButton {
            slot: 3,
            name: "Shadow Ball".to_string(),
            handle: "move|Shadow Ball".to_string(),
            pp_left: 20,
            move_type: Some("Ghost".to_string()),
        });

        assert_eq!(option.move_type, Type::Ghost);
        assert_eq!(option.action(), Some(Action::Move3));
        assert_eq!(option.handle.as_str(), "move|Shadow Ball");
    }

    #[test]
    fn test_untyped_button() {
        let option = MoveOption::from_button(&MoveButton {
            slot: 5,
            name: "Struggle".to_string(),
            handle: "move|Struggle".to_string(),
            pp_left: 0,
            move_type: None,
        });

        assert_eq!(option.move_type, Type::NotSpecified);
        assert_eq!(option.action(), None);
    }
}

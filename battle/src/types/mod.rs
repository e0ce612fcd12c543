//! Domain types for battle state

mod moves;
mod pokemon;
mod pokemon_type;
mod side;
mod status;

pub use moves::{ControlHandle, MoveOption};
pub use pokemon::{Creature, CreatureFields, HeldItem, SpeedRange, parse_creature};
pub use pokemon_type::{TYPE_CHART, TeraType, Type};
pub use side::Team;
pub use status::Status;

//! Battle record kept across decision points

mod battle;
mod log;

pub use battle::TrackedBattle;
pub use log::BattleLog;

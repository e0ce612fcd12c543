//! Battle session orchestration for the rotom battle bot.
//!
//! The page is reached through two collaborators, a [`MarkupSource`] that
//! returns HTML fragments and a [`ControlSurface`] that clicks controls.
//! Choices come from a [`DecisionMaker`]. A [`BattleSession`] ties them
//! together:
//!
//! ```ignore
//! use rotom_client::{
//!     BattleSession, Config, DecisionLog, ManualDecisionMaker, MoveClassifier, RequestBuilder,
//! };
//!
//! rotom_client::init_tracing();
//! let config = Config::from_env()?;
//! let mut log = DecisionLog::open(&config.decision_log_dir).await?;
//! let requests = RequestBuilder::new(match &config.move_classes {
//!     Some(path) => MoveClassifier::load(path).await?,
//!     None => MoveClassifier::default(),
//! });
//!
//! let mut session = BattleSession::new(page, page_controls, ManualDecisionMaker::stdio(), &config, requests);
//! let battle = session.play(&mut log).await?;
//! ```

mod config;
mod decision_log;
mod manual;
mod request;
mod session;
mod surface;

use tracing_subscriber::EnvFilter;

pub use config::Config;
pub use decision_log::DecisionLog;
pub use manual::{ManualDecisionMaker, parse_answer};
pub use request::{DecisionRequest, MoveClassifier, RequestBuilder, RequestKind, describe};
pub use session::BattleSession;
pub use surface::{ControlSurface, DecisionMaker, MarkupSource};

pub use rotom_battle::{Action, ControlHandle, Decision, TrackedBattle};

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`)
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

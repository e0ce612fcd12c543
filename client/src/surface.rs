//! Collaborators driving the battle page
//!
//! A browser driver implements [`MarkupSource`] and [`ControlSurface`]; an
//! LLM client or a human implements [`DecisionMaker`].
//!
//! # Example
//!
//! ```ignore
//! struct Browser { /* driver session */ }
//!
//! impl ControlSurface for Browser {
//!     async fn invoke(&mut self, handle: &ControlHandle) -> Result<()> {
//!         self.click(&format!("button[data-tooltip='{handle}']")).await
//!     }
//!
//!     async fn toggle_terastallize(&mut self) -> Result<()> {
//!         self.click("input[name=terastallize]").await
//!     }
//! }
//! ```

use anyhow::Result;
use rotom_battle::{ControlHandle, Decision};

use crate::request::DecisionRequest;

/// Raw markup of on-screen elements, one self-contained fragment per call
#[allow(async_fn_in_trait)]
pub trait MarkupSource {
    /// Markup of the battle controls panel
    async fn controls(&mut self) -> Result<String>;

    /// Markup of the battle history panel
    async fn battle_log(&mut self) -> Result<String>;

    /// Tooltip shown when hovering the control behind `handle`
    async fn tooltip(&mut self, handle: &ControlHandle) -> Result<String>;

    /// `aria-label`s of the opponent's party icons, in order
    async fn opponent_icons(&mut self) -> Result<Vec<String>>;

    /// Tooltip shown when hovering the opponent's party icon at `index`
    async fn opponent_tooltip(&mut self, index: usize) -> Result<String>;

    /// End-of-battle check for pages that announce the result outside the
    /// controls panel
    async fn battle_over(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Clickable controls on the battle page
#[allow(async_fn_in_trait)]
pub trait ControlSurface {
    async fn invoke(&mut self, handle: &ControlHandle) -> Result<()>;

    /// Flip the Terastallize checkbox
    async fn toggle_terastallize(&mut self) -> Result<()>;
}

/// Produces one decision per request
#[allow(async_fn_in_trait)]
pub trait DecisionMaker {
    async fn decide(&mut self, request: &DecisionRequest) -> Result<Decision>;
}

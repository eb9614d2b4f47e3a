//! The seam between the engine and whoever plays a seat: a bot, a script,
//! or a remote model. Agents only ever see the read-only `GameView`.

use thiserror::Error;

use crate::types::{Action, DecisionRequest, DecisionResponse, LogEntry, TurnContext};
use crate::view::GameView;

mod random;

pub use random::RandomAgent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent `{agent}` failed: {message}")]
    Failed { agent: String, message: String },
    #[error("agent `{agent}` cannot answer {request}")]
    Unsupported { agent: String, request: String },
}

pub trait PlayerAgent {
    fn name(&self) -> &str;

    fn request_dice_action(
        &mut self,
        view: &GameView,
        log: &[LogEntry],
        context: &TurnContext,
    ) -> Result<Action, AgentError>;

    fn request_decision(
        &mut self,
        view: &GameView,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse, AgentError>;

    /// Free-form reasoning shared once per turn, after the dice are rolled.
    fn strategic_assessment(
        &mut self,
        _view: &GameView,
        _log: &[LogEntry],
        _dice: &[u8],
    ) -> Option<String> {
        None
    }
}

//! The authoritative game: owns the state, the dice, and the log, and turns
//! agent inputs into resolved state transitions.
//!
//! Play is driven from outside. `advance` reports what the game needs next
//! (a dice action, a card decision, or nothing because the turn ended) and
//! `apply_action` / `apply_decision` feed the answers back in.

use tracing::debug;

use crate::config::GameConfig;
use crate::content::ContentPack;
use crate::deck::Decks;
use crate::dice::{DicePool, RollSource, SeededRolls};
use crate::report::ActionReport;
use crate::setup::GameSetup;
use crate::state::GameState;
use crate::types::*;
use crate::view::GameView;

mod actions;
mod advance;
mod arrival;
mod cards;
mod choices;
mod hash;
mod prompts;

#[cfg(test)]
mod test_support;

use arrival::SuspendedAction;
use prompts::PendingPrompt;

#[derive(Clone, Debug)]
struct TurnState {
    player: PlayerId,
    pool: DicePool,
    actions_taken: u32,
}

pub struct Game {
    seed: u64,
    content: ContentPack,
    config: GameConfig,
    rolls: Box<dyn RollSource>,
    state: GameState,
    log: Vec<LogEntry>,
    next_input_seq: u64,
    pending_prompt: Option<PendingPrompt>,
    turn: Option<TurnState>,
    // Action waiting on a card decision before its arrival can finish.
    suspended: Option<SuspendedAction>,
    last_report: Option<ActionReport>,
}

impl Game {
    pub fn new(
        seed: u64,
        content: &ContentPack,
        setup: GameSetup,
        config: GameConfig,
    ) -> Result<Self, GameError> {
        Self::with_rolls(seed, content, setup, config, Box::new(SeededRolls::new(seed)))
    }

    /// Like `new`, with every random outcome drawn from `rolls`.
    pub fn with_rolls(
        seed: u64,
        content: &ContentPack,
        setup: GameSetup,
        config: GameConfig,
        mut rolls: Box<dyn RollSource>,
    ) -> Result<Self, GameError> {
        let decks = Decks::build(content, rolls.as_mut());
        let state = setup.into_state(&config, decks)?;
        let mut game = Self {
            seed,
            content: content.clone(),
            config,
            rolls,
            state,
            log: Vec::new(),
            next_input_seq: 0,
            pending_prompt: None,
            turn: None,
            suspended: None,
            last_report: None,
        };
        let names: Vec<String> =
            game.state.turn_order.iter().map(|id| game.state.player_name(*id)).collect();
        game.push_log(LogKind::Turn, None, format!("game starts: {}", names.join(", ")));
        Ok(game)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state)
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn winner(&self) -> Option<&Victory> {
        self.state.winner.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.winner.is_some()
    }

    /// Report of the most recent fully resolved dice action.
    pub fn last_report(&self) -> Option<&ActionReport> {
        self.last_report.as_ref()
    }

    pub fn turn_context(&self) -> Option<TurnContext> {
        let turn = self.turn.as_ref()?;
        Some(TurnContext {
            round: self.state.round,
            player: self.state.player_name(turn.player),
            dice_rolled: turn.pool.rolled().to_vec(),
            dice_remaining: turn.pool.remaining().to_vec(),
            actions_taken: turn.actions_taken,
        })
    }

    /// Free-form reasoning an agent shared before acting. Logged, never acted on.
    pub fn record_assessment(&mut self, player: &str, text: &str) -> Result<(), GameError> {
        let Some(id) = self.state.player_by_name(player) else {
            return Err(GameError::UnknownPlayer(player.to_string()));
        };
        self.push_log(LogKind::Assessment, Some(id), text.to_string());
        self.next_input_seq += 1;
        Ok(())
    }

    fn push_log(&mut self, kind: LogKind, actor: Option<PlayerId>, message: String) {
        let actor = actor.map(|id| self.state.player_name(id));
        debug!(round = self.state.round, ?kind, actor = actor.as_deref(), "{message}");
        self.log.push(LogEntry { round: self.state.round, actor, kind, message });
    }
}

#[cfg(test)]
mod tests;

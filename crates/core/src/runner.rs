//! Binds one agent per seat to a `Game` and drives it: asks for dice
//! actions and decisions, feeds answers back, and journals every accepted
//! input so the game can be replayed.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::agent::{AgentError, PlayerAgent};
use crate::game::Game;
use crate::journal::{InputJournal, InputPayload};
use crate::journal_file::JournalWriter;
use crate::types::{AdvanceStopReason, GameError, Interrupt, Victory};
use crate::view::GameView;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("journal write failed: {0}")]
    Journal(#[from] io::Error),
    #[error("no agent plays `{0}`")]
    MissingAgent(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    TurnEnded { player: String, round: u32 },
    Finished(Victory),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Won(Victory),
    RoundLimitReached { rounds: u32 },
}

pub struct GameRunner {
    game: Game,
    agents: Vec<Box<dyn PlayerAgent>>,
    journal: InputJournal,
    journal_file: Option<JournalWriter>,
    round_limit: Option<u32>,
    started: bool,
}

impl GameRunner {
    /// Fails unless every seated player has exactly one agent with that name.
    pub fn new(game: Game, agents: Vec<Box<dyn PlayerAgent>>) -> Result<Self, RunnerError> {
        let state = game.state();
        let players: Vec<String> =
            state.turn_order.iter().map(|id| state.player_name(*id)).collect();
        for player in &players {
            if !agents.iter().any(|agent| agent.name() == player) {
                return Err(RunnerError::MissingAgent(player.clone()));
            }
        }
        let journal = InputJournal::new(game.seed())
            .with_players(players)
            .with_config(game.config().clone())
            .with_content_hash(game.content().content_hash());
        Ok(Self { game, agents, journal, journal_file: None, round_limit: None, started: false })
    }

    /// Also writes every accepted input to a hash-chained JSONL file.
    pub fn with_journal_file(mut self, path: &Path) -> Result<Self, RunnerError> {
        self.journal_file = Some(JournalWriter::create(path, &self.journal)?);
        Ok(self)
    }

    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.round_limit = Some(rounds);
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }

    pub fn start(&mut self) -> GameView {
        if !self.started {
            self.started = true;
            info!(seed = self.game.seed(), players = ?self.journal.players, "game started");
        }
        self.game.view()
    }

    /// Plays until the current player's turn ends or the game is won.
    pub fn execute_turn(&mut self) -> Result<TurnOutcome, RunnerError> {
        self.start();
        let mut assessed = false;
        loop {
            match self.game.advance().stop_reason {
                AdvanceStopReason::Finished(victory) => return Ok(TurnOutcome::Finished(victory)),
                AdvanceStopReason::TurnEnded { player, round } => {
                    let player = self.game.state().player_name(player);
                    debug!(%player, round, "turn finished");
                    return Ok(TurnOutcome::TurnEnded { player, round });
                }
                AdvanceStopReason::Interrupted(Interrupt::DiceAction {
                    prompt_id, context, ..
                }) => {
                    let index = self.agent_index(&context.player)?;
                    let view = self.game.view();
                    if !assessed {
                        assessed = true;
                        let text = self.agents[index].strategic_assessment(
                            &view,
                            self.game.log(),
                            &context.dice_remaining,
                        );
                        if let Some(text) = text {
                            self.game.record_assessment(&context.player, &text)?;
                            let player = context.player.clone();
                            self.record(InputPayload::Assessment { player, text })?;
                        }
                    }
                    let action = self.agents[index]
                        .request_dice_action(&view, self.game.log(), &context)
                        .inspect_err(|error| {
                            warn!(player = %context.player, %error, "agent failed")
                        })?;
                    self.game.apply_action(prompt_id, action.clone())?;
                    self.record(InputPayload::Action { prompt_id, action })?;
                }
                AdvanceStopReason::Interrupted(Interrupt::Decision { prompt_id, requests }) => {
                    for request in requests {
                        let player = request.player().to_string();
                        let index = self.agent_index(&player)?;
                        let view = self.game.view();
                        let response = self.agents[index]
                            .request_decision(&view, &request)
                            .inspect_err(|error| warn!(%player, %error, "agent failed"))?;
                        self.game.apply_decision(prompt_id, &player, response.clone())?;
                        self.record(InputPayload::Decision { prompt_id, player, response })?;
                    }
                }
            }
        }
    }

    pub fn run_to_completion(&mut self) -> Result<RunOutcome, RunnerError> {
        loop {
            match self.execute_turn()? {
                TurnOutcome::Finished(victory) => {
                    info!(
                        winner = %victory.winner_name,
                        kind = ?victory.kind,
                        round = self.game.round(),
                        "game finished"
                    );
                    return Ok(RunOutcome::Won(victory));
                }
                TurnOutcome::TurnEnded { .. } => {
                    if let Some(limit) = self.round_limit
                        && self.game.round() > limit
                    {
                        info!(rounds = limit, "round limit reached");
                        return Ok(RunOutcome::RoundLimitReached { rounds: limit });
                    }
                }
            }
        }
    }

    fn agent_index(&self, player: &str) -> Result<usize, RunnerError> {
        self.agents
            .iter()
            .position(|agent| agent.name() == player)
            .ok_or_else(|| RunnerError::MissingAgent(player.to_string()))
    }

    fn record(&mut self, payload: InputPayload) -> Result<(), RunnerError> {
        if let Some(writer) = self.journal_file.as_mut() {
            writer.append(self.game.round(), &payload)?;
        }
        self.journal.append(payload);
        Ok(())
    }
}

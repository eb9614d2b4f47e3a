//! Rebuilds a game from its setup and input journal.
//! Replays are exact: the same setup, seed and inputs reach the same
//! snapshot hash as the recorded game.

use thiserror::Error;
use tracing::debug;

use crate::{
    AdvanceStopReason, GameError, Victory,
    content::ContentPack,
    game::Game,
    journal::{InputJournal, InputPayload},
    setup::GameSetup,
};

#[derive(Debug, PartialEq, Error)]
pub enum ReplayError {
    #[error("journal was recorded against content {recorded:#x}, current content is {current:#x}")]
    ContentMismatch { recorded: u64, current: u64 },
    #[error("journal names no players")]
    NoPlayers,
    #[error("could not rebuild the game: {0}")]
    Setup(GameError),
    #[error("input {seq} was rejected: {error}")]
    InputRejected { seq: u64, error: GameError },
    #[error("{remaining} input(s) left after the game finished")]
    TrailingInputs { remaining: usize },
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    /// `None` when the journal stops before the game is decided.
    pub winner: Option<Victory>,
    pub final_snapshot_hash: u64,
    pub final_round: u32,
    pub inputs_applied: usize,
}

/// Replays a journal on the standard board for the players it names.
pub fn replay_standard(
    content: &ContentPack,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    if journal.players.is_empty() {
        return Err(ReplayError::NoPlayers);
    }
    let names: Vec<&str> = journal.players.iter().map(String::as_str).collect();
    let setup = GameSetup::standard(&names).map_err(ReplayError::Setup)?;
    replay_to_end(content, setup, journal)
}

pub fn replay_to_end(
    content: &ContentPack,
    setup: GameSetup,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    // A zero hash comes from journals built in memory without content metadata.
    let current = content.content_hash();
    if journal.content_hash != 0 && journal.content_hash != current {
        return Err(ReplayError::ContentMismatch { recorded: journal.content_hash, current });
    }
    let mut game = Game::new(journal.seed, content, setup, journal.config.clone())
        .map_err(ReplayError::Setup)?;
    let mut inputs = journal.inputs.iter();
    let mut applied = 0;

    loop {
        match game.advance().stop_reason {
            AdvanceStopReason::Finished(victory) => {
                let remaining = inputs.count();
                if remaining > 0 {
                    return Err(ReplayError::TrailingInputs { remaining });
                }
                return Ok(finish(&game, Some(victory), applied));
            }
            // Recordings stop between turns; rolling the next turn would diverge.
            AdvanceStopReason::TurnEnded { .. } if inputs.len() == 0 => {
                return Ok(finish(&game, None, applied));
            }
            AdvanceStopReason::TurnEnded { .. } => {}
            AdvanceStopReason::Interrupted(_) => {
                let Some(record) = inputs.next() else {
                    return Ok(finish(&game, None, applied));
                };
                let result = match &record.payload {
                    InputPayload::Action { prompt_id, action } => {
                        game.apply_action(*prompt_id, action.clone())
                    }
                    InputPayload::Decision { prompt_id, player, response } => {
                        game.apply_decision(*prompt_id, player, response.clone())
                    }
                    InputPayload::Assessment { player, text } => {
                        game.record_assessment(player, text)
                    }
                };
                result.map_err(|error| ReplayError::InputRejected { seq: record.seq, error })?;
                applied += 1;
                debug!(seq = record.seq, "replayed input");
            }
        }
    }
}

fn finish(game: &Game, winner: Option<Victory>, inputs_applied: usize) -> ReplayResult {
    ReplayResult {
        winner,
        final_snapshot_hash: game.snapshot_hash(),
        final_round: game.round(),
        inputs_applied,
    }
}

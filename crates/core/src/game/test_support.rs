//! Shared fixtures for the `game` test suites.

use super::*;
use crate::dice::ScriptedRolls;
use crate::setup::PlayerSetup;
use crate::state::{Board, Player};

/// Alice at (0,0) and Bob at (7,7) on an explored, empty 8x8 board.
pub(super) fn open_setup() -> GameSetup {
    GameSetup {
        board: Board::new(8, 8),
        players: vec![
            PlayerSetup::new("alice", "red", Pos::new(0, 0), OceanZone::NorthWest),
            PlayerSetup::new("bob", "blue", Pos::new(7, 7), OceanZone::SouthEast),
        ],
    }
}

/// The first values of `script` are the opening dice (two per player).
pub(super) fn scripted_game(setup: GameSetup, script: &[u8]) -> Game {
    let rolls = Box::new(ScriptedRolls::new(7, script.to_vec()));
    match Game::with_rolls(7, &ContentPack::default(), setup, GameConfig::default(), rolls) {
        Ok(game) => game,
        Err(err) => panic!("fixture setup is valid: {err}"),
    }
}

pub(super) fn dice_prompt(game: &mut Game) -> (ChoicePromptId, TurnContext) {
    match game.advance().stop_reason {
        AdvanceStopReason::Interrupted(Interrupt::DiceAction { prompt_id, context, .. }) => {
            (prompt_id, context)
        }
        other => panic!("expected a dice prompt, got {other:?}"),
    }
}

pub(super) fn decision_prompt(game: &mut Game) -> (ChoicePromptId, Vec<DecisionRequest>) {
    match game.advance().stop_reason {
        AdvanceStopReason::Interrupted(Interrupt::Decision { prompt_id, requests }) => {
            (prompt_id, requests)
        }
        other => panic!("expected a decision prompt, got {other:?}"),
    }
}

pub(super) fn step_to(die: u8, pos: Pos, intent: TileIntent) -> Action {
    Action::MoveChampion { die, champion: 0, path: vec![pos], intent }
}

pub(super) fn player<'a>(game: &'a Game, name: &str) -> &'a Player {
    match game.state.player_by_name(name).and_then(|id| game.state.players.get(id)) {
        Some(player) => player,
        None => panic!("no player named {name}"),
    }
}

pub(super) fn player_mut<'a>(game: &'a mut Game, name: &str) -> &'a mut Player {
    match game.state.player_by_name(name).and_then(|id| game.state.players.get_mut(id)) {
        Some(player) => player,
        None => panic!("no player named {name}"),
    }
}

/// Turns `pos` into an adventure tile whose next draw is `card`.
pub(super) fn rig_adventure(game: &mut Game, pos: Pos, card: &str) {
    let Some(index) = game.content.cards.iter().position(|candidate| candidate.id == card) else {
        panic!("no card {card}");
    };
    let tier = game.content.cards[index].tier;
    if let Some(tile) = game.state.board.tile_mut(pos) {
        tile.kind = TileKind::Adventure;
        tile.tier = tier;
        tile.adventure_tokens = 1;
    }
    game.state.decks.tiers[tier.index()].piles[0].push(index);
}

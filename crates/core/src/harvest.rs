//! Harvest resolution: which requested tiles pay out, and how much.

use serde::Serialize;

use crate::state::{GameState, Tile};
use crate::types::{GameError, PlayerId, Pos, ResourceBag};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HarvestRejection {
    Unclaimed,
    OpposingChampionPresent,
    /// Another player's claim without a champion of ours standing on it.
    NoBlockade,
    OwnerChampionPresent,
    Protected,
    AlreadyHarvested,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HarvestOutcome {
    pub budget: u32,
    /// Requested positions beyond the dice budget.
    pub truncated: Vec<Pos>,
    pub harvested: Vec<Pos>,
    pub blockaded: Vec<Pos>,
    pub skipped: Vec<(Pos, HarvestRejection)>,
    pub gained: ResourceBag,
}

/// A claim next to its owner's home cannot be blockaded.
pub fn is_protected(state: &GameState, tile: &Tile) -> bool {
    let Some(owner) = tile.claimed_by else {
        return false;
    };
    state.players.get(owner).is_some_and(|player| player.home.is_orthogonally_adjacent(tile.pos))
}

/// Resolves a harvest without mutating the state. Unknown positions are a
/// contract error; every other problem only skips the tile.
pub fn resolve_harvest(
    state: &GameState,
    player: PlayerId,
    requested: &[Pos],
    dice: &[u8],
) -> Result<HarvestOutcome, GameError> {
    if let Some(pos) = requested.iter().find(|pos| !state.board.in_bounds(**pos)) {
        return Err(GameError::UnknownTile(*pos));
    }

    let budget: u32 = dice.iter().map(|value| u32::from(*value)).sum();
    let keep = requested.len().min(budget as usize);
    let mut outcome = HarvestOutcome {
        budget,
        truncated: requested[keep..].to_vec(),
        ..HarvestOutcome::default()
    };

    for &pos in &requested[..keep] {
        let Some(tile) = state.board.tile(pos) else {
            return Err(GameError::UnknownTile(pos));
        };
        if outcome.harvested.contains(&pos) || outcome.skipped.iter().any(|(seen, _)| *seen == pos)
        {
            outcome.skipped.push((pos, HarvestRejection::AlreadyHarvested));
            continue;
        }
        match eligibility(state, player, tile) {
            Ok(blockade) => {
                outcome.harvested.push(pos);
                if blockade {
                    outcome.blockaded.push(pos);
                }
                outcome.gained.add(tile.yield_resources);
            }
            Err(reason) => outcome.skipped.push((pos, reason)),
        }
    }
    Ok(outcome)
}

/// `Ok(true)` when the harvest is a blockade of someone else's claim.
fn eligibility(state: &GameState, player: PlayerId, tile: &Tile) -> Result<bool, HarvestRejection> {
    match tile.claimed_by {
        None => Err(HarvestRejection::Unclaimed),
        Some(owner) if owner == player => {
            if state.opposing_champion_at(tile.pos, player).is_some() {
                Err(HarvestRejection::OpposingChampionPresent)
            } else {
                Ok(false)
            }
        }
        Some(owner) => {
            if !state.has_champion_at(tile.pos, player) {
                Err(HarvestRejection::NoBlockade)
            } else if state.has_champion_at(tile.pos, owner) {
                Err(HarvestRejection::OwnerChampionPresent)
            } else if is_protected(state, tile) {
                Err(HarvestRejection::Protected)
            } else {
                Ok(true)
            }
        }
    }
}

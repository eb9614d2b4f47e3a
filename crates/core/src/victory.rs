//! Victory conditions. Pure predicates over the state; the game decides when
//! to ask and what to do with the answer.

use crate::config::GameConfig;
use crate::state::GameState;
use crate::types::{PlayerId, TileKind, Victory, VictoryKind};

/// Fame, gold and starred-tile thresholds for one player, checked in that order.
pub fn threshold_met(
    state: &GameState,
    config: &GameConfig,
    player: PlayerId,
) -> Option<VictoryKind> {
    let owner = state.players.get(player)?;
    if owner.fame >= config.fame_to_win {
        return Some(VictoryKind::Fame);
    }
    if owner.resources.gold >= config.gold_to_win {
        return Some(VictoryKind::Gold);
    }
    if state.starred_claims_of(player) >= config.starred_tiles_to_win as usize {
        return Some(VictoryKind::StarredTiles);
    }
    None
}

fn stands_on_doomspire(state: &GameState, player: PlayerId) -> bool {
    let Some(owner) = state.players.get(player) else {
        return false;
    };
    owner.champions.iter().any(|champion| {
        state.board.tile(champion.pos).is_some_and(|tile| tile.kind == TileKind::Doomspire)
    })
}

/// First satisfied condition wins: a slain dragon, then thresholds for each
/// player in turn order starting from the active one.
pub fn check_victory(state: &GameState, config: &GameConfig) -> Option<Victory> {
    if let Some(slayer) = state.dragon_slayer {
        return Some(Victory {
            winner: slayer,
            winner_name: state.player_name(slayer),
            kind: VictoryKind::Combat,
        });
    }
    let count = state.turn_order.len();
    (0..count)
        .map(|offset| state.turn_order[(state.current + offset) % count])
        .filter(|player| {
            !config.threshold_victories_need_doomspire || stands_on_doomspire(state, *player)
        })
        .find_map(|player| {
            threshold_met(state, config, player).map(|kind| Victory {
                winner: player,
                winner_name: state.player_name(player),
                kind,
            })
        })
}

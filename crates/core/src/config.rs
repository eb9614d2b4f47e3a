//! Rule constants that tune a game without touching engine code.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fame_to_win: u32,
    pub gold_to_win: u32,
    pub starred_tiles_to_win: u32,
    pub dragon_base_might: u32,
    pub exploration_fame: u32,
    pub champion_victory_fame: u32,
    pub max_claims: u32,
    /// Resources given at a trader for one resource received.
    pub trader_rate: u32,
    pub mercenary_gold_cost: u32,
    pub temple_fame_cost: u32,
    /// Resources given per resource received on market day.
    pub market_day_rate: u32,
    /// When set, fame/gold/starred victories only count for a player whose
    /// champion stands on the doomspire tile.
    pub threshold_victories_need_doomspire: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fame_to_win: 15,
            gold_to_win: 20,
            starred_tiles_to_win: 3,
            dragon_base_might: 8,
            exploration_fame: 1,
            champion_victory_fame: 1,
            max_claims: 10,
            trader_rate: 2,
            mercenary_gold_cost: 3,
            temple_fame_cost: 2,
            market_day_rate: 2,
            threshold_victories_need_doomspire: true,
        }
    }
}

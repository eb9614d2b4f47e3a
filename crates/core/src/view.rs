//! Read-only snapshot handed to player agents.
//! Serializes cleanly to JSON so text-based agents can read it as-is.

use serde::Serialize;

use crate::state::{GameState, Tile};
use crate::types::{BoatId, ChampionId, OceanZone, Pos, ResourceBag, Tier, TileKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub round: u32,
    pub current_player: String,
    pub players: Vec<PlayerView>,
    pub tiles: Vec<TileView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub color: String,
    pub fame: u32,
    pub might: u32,
    pub resources: ResourceBag,
    pub claims: usize,
    pub max_claims: u32,
    pub home: Pos,
    pub champions: Vec<ChampionView>,
    pub boats: Vec<BoatView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChampionView {
    pub id: ChampionId,
    pub pos: Pos,
    pub items: Vec<String>,
    pub followers: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoatView {
    pub id: BoatId,
    pub zone: OceanZone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonsterView {
    pub name: String,
    pub might: u32,
    pub beast: bool,
}

/// Unexplored tiles only reveal where they are and how dangerous.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub pos: Pos,
    pub tier: Tier,
    pub explored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TileKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yields: Option<ResourceBag>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub starred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster: Option<MonsterView>,
    pub adventure_tokens: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl GameView {
    pub fn from_state(state: &GameState) -> Self {
        let players = state
            .turn_order
            .iter()
            .filter_map(|id| state.players.get(*id).map(|player| (*id, player)))
            .map(|(id, player)| PlayerView {
                name: player.name.clone(),
                color: player.color.clone(),
                fame: player.fame,
                might: player.might,
                resources: player.resources,
                claims: state.claims_of(id),
                max_claims: player.max_claims,
                home: player.home,
                champions: player
                    .champions
                    .iter()
                    .map(|champion| ChampionView {
                        id: champion.id,
                        pos: champion.pos,
                        items: champion.items.iter().map(|key| key.to_string()).collect(),
                        followers: champion.followers.iter().map(|key| key.to_string()).collect(),
                    })
                    .collect(),
                boats: player
                    .boats
                    .iter()
                    .map(|boat| BoatView { id: boat.id, zone: boat.zone })
                    .collect(),
            })
            .collect();

        Self {
            round: state.round,
            current_player: state.player_name(state.current_player()),
            players,
            tiles: state.board.tiles.iter().map(|tile| tile_view(state, tile)).collect(),
            winner: state.winner.as_ref().map(|victory| victory.winner_name.clone()),
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn tile(&self, pos: Pos) -> Option<&TileView> {
        self.tiles.iter().find(|tile| tile.pos == pos)
    }
}

fn tile_view(state: &GameState, tile: &Tile) -> TileView {
    if !tile.explored {
        return TileView {
            pos: tile.pos,
            tier: tile.tier,
            explored: false,
            kind: None,
            yields: None,
            starred: false,
            claimed_by: None,
            monster: None,
            adventure_tokens: 0,
            items: Vec::new(),
        };
    }
    TileView {
        pos: tile.pos,
        tier: tile.tier,
        explored: true,
        kind: Some(tile.kind),
        yields: (!tile.yield_resources.is_empty()).then_some(tile.yield_resources),
        starred: tile.starred,
        claimed_by: tile.claimed_by.map(|owner| state.player_name(owner)),
        monster: tile.monster.map(|monster| MonsterView {
            name: monster.name.to_string(),
            might: monster.might,
            beast: monster.beast,
        }),
        adventure_tokens: tile.adventure_tokens,
        items: tile.items.iter().map(|key| key.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::test_state;

    #[test]
    fn unexplored_tiles_hide_their_contents() {
        let (mut state, _, _) = test_state();
        let pos = Pos::new(2, 2);
        let tile = state.board.tile_mut(pos).unwrap();
        tile.explored = false;
        tile.kind = TileKind::Adventure;
        tile.adventure_tokens = 2;

        let view = GameView::from_state(&state);
        let hidden = view.tile(pos).unwrap();
        assert_eq!(hidden.kind, None);
        assert_eq!(hidden.adventure_tokens, 0);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["current_player"], "alice");
        assert_eq!(json["players"][1]["name"], "bob");
    }
}

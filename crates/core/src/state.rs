use serde::Serialize;
use slotmap::SlotMap;

use crate::content::Monster;
use crate::deck::Decks;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub pos: Pos,
    pub tier: Tier,
    pub kind: TileKind,
    pub explored: bool,
    pub yield_resources: ResourceBag,
    pub starred: bool,
    pub claimed_by: Option<PlayerId>,
    pub monster: Option<Monster>,
    pub adventure_tokens: u8,
    pub items: Vec<ItemKey>,
    /// Tiles sharing a group are explored together.
    pub group: Option<u8>,
}

impl Tile {
    pub fn new(pos: Pos, tier: Tier, kind: TileKind) -> Self {
        Self {
            pos,
            tier,
            kind,
            explored: false,
            yield_resources: ResourceBag::default(),
            starred: false,
            claimed_by: None,
            monster: None,
            adventure_tokens: 0,
            items: Vec::new(),
            group: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
}

impl Board {
    /// Builds a board of empty, explored tier-one tiles.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let mut tile = Tile::new(Pos::new(y as i32, x as i32), Tier::One, TileKind::Empty);
                tile.explored = true;
                tiles.push(tile);
            }
        }
        Self { width, height, tiles }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles.get(self.index(pos))
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        self.tiles.get_mut(idx)
    }

    pub fn doomspire(&self) -> Option<Pos> {
        self.tiles.iter().find(|tile| tile.kind == TileKind::Doomspire).map(|tile| tile.pos)
    }

    /// Positions revealed together with `pos`, including `pos` itself.
    pub fn group_members(&self, pos: Pos) -> Vec<Pos> {
        match self.tile(pos).and_then(|tile| tile.group) {
            Some(group) => self
                .tiles
                .iter()
                .filter(|tile| tile.group == Some(group))
                .map(|tile| tile.pos)
                .collect(),
            None => vec![pos],
        }
    }

    /// Edge tiles bordering an ocean zone. Each zone washes the two half-edges
    /// of its corner quadrant.
    pub fn is_coastal_to(&self, pos: Pos, zone: OceanZone) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let last_y = self.height as i32 - 1;
        let last_x = self.width as i32 - 1;
        let north_half = pos.y < (self.height as i32 + 1) / 2;
        let west_half = pos.x < (self.width as i32 + 1) / 2;
        match zone {
            OceanZone::NorthWest => (pos.y == 0 && west_half) || (pos.x == 0 && north_half),
            OceanZone::NorthEast => (pos.y == 0 && !west_half) || (pos.x == last_x && north_half),
            OceanZone::SouthEast => {
                (pos.y == last_y && !west_half) || (pos.x == last_x && !north_half)
            }
            OceanZone::SouthWest => (pos.y == last_y && west_half) || (pos.x == 0 && !north_half),
        }
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Champion {
    pub id: ChampionId,
    pub pos: Pos,
    pub items: Vec<ItemKey>,
    pub followers: Vec<ItemKey>,
}

pub const CHAMPION_ITEM_SLOTS: usize = 2;

impl Champion {
    pub fn new(id: ChampionId, pos: Pos) -> Self {
        Self { id, pos, items: Vec::new(), followers: Vec::new() }
    }

    pub fn has_free_slot(&self) -> bool {
        self.items.len() < CHAMPION_ITEM_SLOTS
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boat {
    pub id: BoatId,
    pub zone: OceanZone,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub fame: u32,
    pub might: u32,
    pub resources: ResourceBag,
    pub max_claims: u32,
    pub home: Pos,
    pub champions: Vec<Champion>,
    pub boats: Vec<Boat>,
}

impl Player {
    pub fn champion(&self, id: ChampionId) -> Option<&Champion> {
        self.champions.iter().find(|champion| champion.id == id)
    }

    pub fn champion_mut(&mut self, id: ChampionId) -> Option<&mut Champion> {
        self.champions.iter_mut().find(|champion| champion.id == id)
    }

    pub fn boat_mut(&mut self, id: BoatId) -> Option<&mut Boat> {
        self.boats.iter_mut().find(|boat| boat.id == id)
    }

    /// Healing after a lost fight costs one gold, or one fame when broke.
    pub fn pay_healing_cost(&mut self) -> HealingCost {
        if self.resources.try_spend(Resource::Gold, 1) {
            HealingCost::Gold
        } else if self.fame > 0 {
            self.fame -= 1;
            HealingCost::Fame
        } else {
            HealingCost::Nothing
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HealingCost {
    Gold,
    Fame,
    Nothing,
}

/// Everything the simulation mutates. Stages receive it explicitly.
#[derive(Clone, Debug)]
pub struct GameState {
    pub board: Board,
    pub players: SlotMap<PlayerId, Player>,
    pub turn_order: Vec<PlayerId>,
    pub current: usize,
    pub round: u32,
    pub decks: Decks,
    /// Set by a won dragon fight; the victory checker turns it into a win.
    pub dragon_slayer: Option<PlayerId>,
    pub winner: Option<Victory>,
}

impl GameState {
    pub fn current_player(&self) -> PlayerId {
        self.turn_order[self.current]
    }

    pub fn player_by_name(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().find(|(_, player)| player.name == name).map(|(id, _)| id)
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.players.get(id).map(|player| player.name.clone()).unwrap_or_default()
    }

    pub fn claims_of(&self, player: PlayerId) -> usize {
        self.board.tiles.iter().filter(|tile| tile.claimed_by == Some(player)).count()
    }

    pub fn starred_claims_of(&self, player: PlayerId) -> usize {
        self.board
            .tiles
            .iter()
            .filter(|tile| tile.claimed_by == Some(player) && tile.starred)
            .count()
    }

    /// Champions standing on `pos`, as (owner, champion id) pairs.
    pub fn champions_at(&self, pos: Pos) -> Vec<(PlayerId, ChampionId)> {
        let mut found = Vec::new();
        for &owner in &self.turn_order {
            let Some(player) = self.players.get(owner) else {
                continue;
            };
            for champion in player.champions.iter().filter(|champion| champion.pos == pos) {
                found.push((owner, champion.id));
            }
        }
        found
    }

    pub fn opposing_champion_at(
        &self,
        pos: Pos,
        player: PlayerId,
    ) -> Option<(PlayerId, ChampionId)> {
        self.champions_at(pos).into_iter().find(|(owner, _)| *owner != player)
    }

    pub fn has_champion_at(&self, pos: Pos, player: PlayerId) -> bool {
        self.champions_at(pos).iter().any(|(owner, _)| *owner == player)
    }

    /// Card ids that left the decks and are still on the table: carried items
    /// and followers, items lying on tiles, and monsters guarding tiles.
    pub fn cards_in_play(&self) -> Vec<ItemKey> {
        let carried = self.players.values().flat_map(|player| &player.champions).flat_map(
            |champion| champion.items.iter().chain(&champion.followers).copied(),
        );
        let on_board = self.board.tiles.iter().flat_map(|tile| {
            tile.items.iter().copied().chain(tile.monster.map(|monster| monster.id))
        });
        carried.chain(on_board).collect()
    }

    pub fn is_foreign_home(&self, pos: Pos, player: PlayerId) -> bool {
        self.players.iter().any(|(id, other)| id != player && other.home == pos)
    }

    pub fn send_champion_home(&mut self, player: PlayerId, champion: ChampionId) {
        if let Some(owner) = self.players.get_mut(player) {
            let home = owner.home;
            if let Some(champion) = owner.champion_mut(champion) {
                champion.pos = home;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coastal_tiles_follow_corner_quadrants() {
        let board = Board::new(8, 8);
        assert!(board.is_coastal_to(Pos::new(0, 0), OceanZone::NorthWest));
        assert!(board.is_coastal_to(Pos::new(0, 3), OceanZone::NorthWest));
        assert!(!board.is_coastal_to(Pos::new(0, 4), OceanZone::NorthWest));
        assert!(board.is_coastal_to(Pos::new(0, 4), OceanZone::NorthEast));
        assert!(board.is_coastal_to(Pos::new(5, 7), OceanZone::SouthEast));
        assert!(board.is_coastal_to(Pos::new(7, 2), OceanZone::SouthWest));
        assert!(!board.is_coastal_to(Pos::new(3, 3), OceanZone::NorthWest));
    }

    #[test]
    fn group_members_include_every_tile_of_the_group() {
        let mut board = Board::new(4, 4);
        for pos in [Pos::new(1, 1), Pos::new(1, 2), Pos::new(2, 1)] {
            board.tile_mut(pos).unwrap().group = Some(7);
        }
        let mut members = board.group_members(Pos::new(1, 2));
        members.sort();
        assert_eq!(members, vec![Pos::new(1, 1), Pos::new(1, 2), Pos::new(2, 1)]);
        assert_eq!(board.group_members(Pos::new(0, 0)), vec![Pos::new(0, 0)]);
    }
}

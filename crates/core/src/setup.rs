//! Game setup: the board and players the engine starts from.
//! Randomized board generation lives outside the engine; `standard` is a
//! fixed layout good enough for simulations and tests.

use std::collections::BTreeSet;
use std::iter;

use slotmap::SlotMap;

use crate::config::GameConfig;
use crate::deck::Decks;
use crate::state::{Board, Boat, Champion, GameState, Player, Tile};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct PlayerSetup {
    pub name: String,
    pub color: String,
    pub home: Pos,
    pub fame: u32,
    pub might: u32,
    pub resources: ResourceBag,
    /// Falls back to `GameConfig::max_claims`.
    pub max_claims: Option<u32>,
    pub champions: Vec<Pos>,
    pub boats: Vec<OceanZone>,
}

impl PlayerSetup {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        home: Pos,
        zone: OceanZone,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            home,
            fame: 0,
            might: 1,
            resources: ResourceBag::default(),
            max_claims: None,
            champions: vec![home],
            boats: vec![zone],
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameSetup {
    pub board: Board,
    pub players: Vec<PlayerSetup>,
}

const STANDARD_SIZE: usize = 8;

// H home, f/w/o/g resource (upper case: starred), a adventure, s oasis,
// t trader, m mercenary, p temple, D doomspire, A inner adventure, . empty.
const STANDARD_LAYOUT: [&str; STANDARD_SIZE] = [
    "Hfaw.afH",
    "wsfaopso",
    "aftOGmfa",
    ".aWDAao.",
    ".oaAAFa.",
    "agmGOtwa",
    "fsoawpsw",
    "Hwaf.aoH",
];

const SEATS: [(Pos, OceanZone, &str); 4] = [
    (Pos::new(0, 0), OceanZone::NorthWest, "red"),
    (Pos::new(7, 7), OceanZone::SouthEast, "blue"),
    (Pos::new(0, 7), OceanZone::NorthEast, "green"),
    (Pos::new(7, 0), OceanZone::SouthWest, "yellow"),
];

const INNER_GROUP: u8 = 0;

impl GameSetup {
    /// The fixed 8x8 board with up to four players seated in opposite corners first.
    pub fn standard(names: &[&str]) -> Result<Self, GameError> {
        if names.is_empty() || names.len() > SEATS.len() {
            return Err(GameError::InvalidSetup(format!(
                "standard board seats 1 to {} players, got {}",
                SEATS.len(),
                names.len()
            )));
        }
        let mut board = Board::new(STANDARD_SIZE, STANDARD_SIZE);
        for (y, row) in STANDARD_LAYOUT.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let pos = Pos::new(y as i32, x as i32);
                if let Some(slot) = board.tile_mut(pos) {
                    *slot = standard_tile(pos, symbol);
                }
            }
        }

        let players: Vec<PlayerSetup> = names
            .iter()
            .zip(SEATS)
            .map(|(name, (home, zone, color))| PlayerSetup::new(*name, color, home, zone))
            .collect();
        for (home, _, _) in SEATS.iter().skip(players.len()) {
            if let Some(tile) = board.tile_mut(*home) {
                tile.kind = TileKind::Empty;
            }
        }
        Ok(Self { board, players })
    }

    pub(crate) fn into_state(
        self,
        config: &GameConfig,
        decks: Decks,
    ) -> Result<GameState, GameError> {
        if self.players.is_empty() {
            return Err(GameError::InvalidSetup("a game needs at least one player".to_string()));
        }
        let mut names = BTreeSet::new();
        for player in &self.players {
            if !names.insert(player.name.as_str()) {
                return Err(GameError::InvalidSetup(format!(
                    "duplicate player name `{}`",
                    player.name
                )));
            }
            for pos in iter::once(&player.home).chain(&player.champions) {
                if !self.board.in_bounds(*pos) {
                    return Err(GameError::InvalidSetup(format!(
                        "`{}` has a position off the board: {pos:?}",
                        player.name
                    )));
                }
            }
        }

        let mut board = self.board;
        let mut players = SlotMap::with_key();
        let mut turn_order = Vec::with_capacity(self.players.len());
        for setup in self.players {
            if let Some(tile) = board.tile_mut(setup.home) {
                tile.kind = TileKind::Home;
                tile.explored = true;
            }
            let id = players.insert_with_key(|id| Player {
                id,
                name: setup.name,
                color: setup.color,
                fame: setup.fame,
                might: setup.might,
                resources: setup.resources,
                max_claims: setup.max_claims.unwrap_or(config.max_claims),
                home: setup.home,
                champions: setup
                    .champions
                    .iter()
                    .enumerate()
                    .map(|(index, pos)| Champion::new(index as ChampionId, *pos))
                    .collect(),
                boats: setup
                    .boats
                    .iter()
                    .enumerate()
                    .map(|(index, zone)| Boat { id: index as BoatId, zone: *zone })
                    .collect(),
            });
            turn_order.push(id);
        }

        Ok(GameState {
            board,
            players,
            turn_order,
            current: 0,
            round: 1,
            decks,
            dragon_slayer: None,
            winner: None,
        })
    }
}

fn tier_for(pos: Pos) -> Tier {
    let last = STANDARD_SIZE as i32 - 1;
    let ring = pos.y.min(pos.x).min(last - pos.y).min(last - pos.x);
    match ring {
        0 | 1 => Tier::One,
        2 => Tier::Two,
        _ => Tier::Three,
    }
}

fn standard_tile(pos: Pos, symbol: char) -> Tile {
    let tier = tier_for(pos);
    let kind = match symbol {
        'H' => TileKind::Home,
        'f' | 'w' | 'o' | 'g' | 'F' | 'W' | 'O' | 'G' => TileKind::Resource,
        'a' | 'A' => TileKind::Adventure,
        's' => TileKind::Oasis,
        't' => TileKind::Trader,
        'm' => TileKind::Mercenary,
        'p' => TileKind::Temple,
        'D' => TileKind::Doomspire,
        _ => TileKind::Empty,
    };
    let mut tile = Tile::new(pos, tier, kind);
    let last = STANDARD_SIZE as i32 - 1;
    tile.explored = pos.y == 0 || pos.x == 0 || pos.y == last || pos.x == last;
    let resource = match symbol.to_ascii_lowercase() {
        'f' => Some(Resource::Food),
        'w' => Some(Resource::Wood),
        'o' => Some(Resource::Ore),
        'g' => Some(Resource::Gold),
        _ => None,
    };
    if let (TileKind::Resource, Some(resource)) = (kind, resource) {
        tile.yield_resources = ResourceBag::single(resource, 1);
        tile.starred = symbol.is_ascii_uppercase();
    }
    tile.adventure_tokens = match kind {
        TileKind::Adventure => 2,
        TileKind::Oasis => 4,
        _ => 0,
    };
    if tier == Tier::Three {
        tile.group = Some(INNER_GROUP);
    }
    tile
}

/// Two players on an explored, empty 8x8 board: homes at (0,0) and (7,7),
/// one champion at home and one boat each, might 1, nothing else.
#[cfg(test)]
pub(crate) fn test_state() -> (GameState, PlayerId, PlayerId) {
    let setup = GameSetup {
        board: Board::new(STANDARD_SIZE, STANDARD_SIZE),
        players: vec![
            PlayerSetup::new("alice", "red", Pos::new(0, 0), OceanZone::NorthWest),
            PlayerSetup::new("bob", "blue", Pos::new(7, 7), OceanZone::SouthEast),
        ],
    };
    let state = match setup.into_state(&GameConfig::default(), Decks::default()) {
        Ok(state) => state,
        Err(err) => panic!("test setup is valid: {err}"),
    };
    let alice = state.turn_order[0];
    let bob = state.turn_order[1];
    (state, alice, bob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_seats_players_in_opposite_corners() {
        let setup = GameSetup::standard(&["alice", "bob"]).unwrap();
        assert_eq!(setup.players[0].home, Pos::new(0, 0));
        assert_eq!(setup.players[1].home, Pos::new(7, 7));
        assert_eq!(setup.board.tile(Pos::new(0, 7)).unwrap().kind, TileKind::Empty);
        assert_eq!(setup.board.doomspire(), Some(Pos::new(3, 3)));
        assert_eq!(setup.board.group_members(Pos::new(3, 3)).len(), 4);
    }

    #[test]
    fn standard_board_keeps_tile_invariants() {
        let setup = GameSetup::standard(&["a", "b", "c", "d"]).unwrap();
        for tile in &setup.board.tiles {
            if tile.adventure_tokens > 0 {
                assert!(tile.kind.carries_adventure_tokens(), "{:?}", tile.pos);
            }
            if tile.starred || !tile.yield_resources.is_empty() {
                assert_eq!(tile.kind, TileKind::Resource, "{:?}", tile.pos);
            }
        }
        let starred = setup.board.tiles.iter().filter(|tile| tile.starred).count();
        assert!(starred >= GameConfig::default().starred_tiles_to_win as usize);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let setup = GameSetup::standard(&["alice", "alice"]).unwrap();
        let err = setup.into_state(&GameConfig::default(), Decks::default()).unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup(_)));
    }
}

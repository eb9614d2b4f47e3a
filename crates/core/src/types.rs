use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    pub struct PlayerId;
}

pub type ChampionId = u8;
pub type BoatId = u8;
pub type ItemKey = &'static str;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn is_orthogonally_adjacent(self, other: Pos) -> bool {
        self.y.abs_diff(other.y) + self.x.abs_diff(other.x) == 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    pub fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Food,
    Wood,
    Ore,
    Gold,
}

impl Resource {
    pub const ALL: [Resource; 4] = [Resource::Food, Resource::Wood, Resource::Ore, Resource::Gold];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceBag {
    pub food: u32,
    pub wood: u32,
    pub ore: u32,
    pub gold: u32,
}

impl ResourceBag {
    pub const fn new(food: u32, wood: u32, ore: u32, gold: u32) -> Self {
        Self { food, wood, ore, gold }
    }

    pub const fn single(resource: Resource, amount: u32) -> Self {
        match resource {
            Resource::Food => Self::new(amount, 0, 0, 0),
            Resource::Wood => Self::new(0, amount, 0, 0),
            Resource::Ore => Self::new(0, 0, amount, 0),
            Resource::Gold => Self::new(0, 0, 0, amount),
        }
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Ore => self.ore,
            Resource::Gold => self.gold,
        }
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Food => &mut self.food,
            Resource::Wood => &mut self.wood,
            Resource::Ore => &mut self.ore,
            Resource::Gold => &mut self.gold,
        }
    }

    pub fn add(&mut self, other: ResourceBag) {
        for resource in Resource::ALL {
            *self.slot_mut(resource) += other.get(resource);
        }
    }

    pub fn gain(&mut self, resource: Resource, amount: u32) {
        *self.slot_mut(resource) += amount;
    }

    /// Removes up to `amount` and returns how much was actually removed.
    pub fn lose(&mut self, resource: Resource, amount: u32) -> u32 {
        let slot = self.slot_mut(resource);
        let removed = amount.min(*slot);
        *slot -= removed;
        removed
    }

    /// All-or-nothing spend.
    pub fn try_spend(&mut self, resource: Resource, amount: u32) -> bool {
        let slot = self.slot_mut(resource);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    pub fn total(&self) -> u32 {
        self.food + self.wood + self.ore + self.gold
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Home,
    Resource,
    Adventure,
    Oasis,
    Trader,
    Mercenary,
    Temple,
    Doomspire,
    Empty,
}

impl TileKind {
    /// Home, temple, trader and mercenary tiles are sanctuaries for champions.
    pub fn allows_champion_combat(self) -> bool {
        !matches!(self, TileKind::Home | TileKind::Temple | TileKind::Trader | TileKind::Mercenary)
    }

    pub fn carries_adventure_tokens(self) -> bool {
        matches!(self, TileKind::Adventure | TileKind::Oasis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OceanZone {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl OceanZone {
    pub const ALL: [OceanZone; 4] =
        [OceanZone::NorthWest, OceanZone::NorthEast, OceanZone::SouthEast, OceanZone::SouthWest];

    /// The ocean is a ring: each zone touches exactly two others.
    pub fn is_adjacent(self, other: OceanZone) -> bool {
        self.clockwise() == other || other.clockwise() == self
    }

    pub fn clockwise(self) -> OceanZone {
        match self {
            OceanZone::NorthWest => OceanZone::NorthEast,
            OceanZone::NorthEast => OceanZone::SouthEast,
            OceanZone::SouthEast => OceanZone::SouthWest,
            OceanZone::SouthWest => OceanZone::NorthWest,
        }
    }
}

// ---------------------------------------------------------------------------
// Agent-facing actions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    MoveChampion { die: u8, champion: ChampionId, path: Vec<Pos>, intent: TileIntent },
    MoveBoat { die: u8, boat: BoatId, path: Vec<OceanZone>, ferry: Option<Ferry> },
    Harvest { dice: Vec<u8>, tiles: Vec<Pos> },
}

impl Action {
    pub fn dice(&self) -> Vec<u8> {
        match self {
            Action::MoveChampion { die, .. } | Action::MoveBoat { die, .. } => vec![*die],
            Action::Harvest { dice, .. } => dice.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ferry {
    pub champion: ChampionId,
    pub drop_at: Pos,
    /// Applied when the champion lands.
    #[serde(default)]
    pub intent: TileIntent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub give: Resource,
    pub receive: Resource,
}

/// What the mover wants to do on the tile it comes to rest on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileIntent {
    #[serde(default)]
    pub claim_tile: bool,
    #[serde(default)]
    pub trade: Option<TradeOffer>,
    #[serde(default)]
    pub hire_mercenary: bool,
    #[serde(default)]
    pub visit_temple: bool,
    #[serde(default)]
    pub pick_up_item: Option<String>,
    #[serde(default)]
    pub adventure_pile: Option<u8>,
}

impl TileIntent {
    pub fn claim() -> Self {
        Self { claim_tile: true, ..Self::default() }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoicePromptId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetReason {
    HungryPests { food_loss: u32 },
    Thief { gold_loss: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNoTopic {
    HireWanderingMercenary { gold_cost: u32 },
}

/// One question for one player. Each kind carries only what that question needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionRequest {
    ItemToDrop { player: String, champion: ChampionId, carried: Vec<String>, found: String },
    TargetPlayer { player: String, reason: TargetReason, candidates: Vec<String> },
    MarketDay { player: String, give_amount: u32 },
    YesNo { player: String, topic: YesNoTopic },
}

impl DecisionRequest {
    pub fn player(&self) -> &str {
        match self {
            DecisionRequest::ItemToDrop { player, .. }
            | DecisionRequest::TargetPlayer { player, .. }
            | DecisionRequest::MarketDay { player, .. }
            | DecisionRequest::YesNo { player, .. } => player,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemDrop {
    /// Drop the carried item in this inventory slot and keep the found one.
    Carried(usize),
    /// Leave the found item on the tile.
    Found,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDayChoice {
    Trade(TradeOffer),
    Pass,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionResponse {
    DropItem(ItemDrop),
    TargetPlayer(String),
    MarketDay(MarketDayChoice),
    YesNo(bool),
}

// ---------------------------------------------------------------------------
// Turn loop results
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub round: u32,
    pub player: String,
    pub dice_rolled: Vec<u8>,
    pub dice_remaining: Vec<u8>,
    pub actions_taken: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interrupt {
    DiceAction { prompt_id: ChoicePromptId, player: PlayerId, context: TurnContext },
    /// Unanswered requests only; a batch may be answered in any order.
    Decision { prompt_id: ChoicePromptId, requests: Vec<DecisionRequest> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryKind {
    Combat,
    Fame,
    Gold,
    StarredTiles,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Victory {
    pub winner: PlayerId,
    pub winner_name: String,
    pub kind: VictoryKind,
}

#[derive(Clone, Debug)]
pub enum AdvanceStopReason {
    Interrupted(Interrupt),
    TurnEnded { player: PlayerId, round: u32 },
    Finished(Victory),
}

#[derive(Clone, Debug)]
pub struct AdvanceResult {
    pub stop_reason: AdvanceStopReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("die value {0} is not in the pool")]
    InvalidConsumption(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error("action used no dice")]
    NoDice,
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),
    #[error("player `{player}` has no champion {champion}")]
    UnknownChampion { player: String, champion: ChampionId },
    #[error("player `{player}` has no boat {boat}")]
    UnknownBoat { player: String, boat: BoatId },
    #[error("no tile at {0:?}")]
    UnknownTile(Pos),
    #[error("prompt id does not match the pending prompt")]
    PromptMismatch,
    #[error("response does not fit the pending request")]
    InvalidChoice,
    #[error("game already finished")]
    GameOver,
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
}

// ---------------------------------------------------------------------------
// Log sink
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    Turn,
    Dice,
    Assessment,
    Movement,
    Boat,
    Combat,
    Harvest,
    Exploration,
    Card,
    Event,
    Claim,
    Tile,
    Victory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub actor: Option<String>,
    pub kind: LogKind,
    pub message: String,
}

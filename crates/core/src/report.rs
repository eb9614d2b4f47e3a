//! Tagged outcomes for every resolved action. Soft rejections live here,
//! next to the successes, so agents and logs see why a request did nothing.

use serde::Serialize;

use crate::combat::{DragonFight, DuelOutcome, MonsterFight};
use crate::harvest::HarvestOutcome;
use crate::movement::{BoatPath, FerryOutcome, MovementOutcome};
use crate::types::{BoatId, ChampionId, Pos, Resource, ResourceBag, TargetReason, Tier, TradeOffer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ActionReport {
    /// `arrival` is `None` when the champion never left its cell.
    ChampionMoved {
        champion: ChampionId,
        movement: MovementOutcome,
        arrival: Option<ArrivalReport>,
    },
    BoatMoved {
        boat: BoatId,
        path: BoatPath,
        ferry: FerryOutcome,
        arrival: Option<ArrivalReport>,
    },
    Harvested(HarvestOutcome),
}

impl ActionReport {
    pub fn arrival(&self) -> Option<&ArrivalReport> {
        match self {
            ActionReport::ChampionMoved { arrival, .. }
            | ActionReport::BoatMoved { arrival, .. } => arrival.as_ref(),
            ActionReport::Harvested(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArrivalReport {
    pub player: String,
    pub champion: ChampionId,
    pub pos: Pos,
    pub steps: Vec<ArrivalStep>,
    pub halted: Option<ArrivalHalt>,
}

impl ArrivalReport {
    pub fn card(&self) -> Option<&CardOutcome> {
        self.steps.iter().find_map(|step| match step {
            ArrivalStep::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn claim(&self) -> Option<&ClaimOutcome> {
        self.steps.iter().find_map(|step| match step {
            ArrivalStep::Claim(claim) => Some(claim),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ArrivalStep {
    Exploration(ExplorationOutcome),
    ChampionCombat(DuelOutcome),
    TileMonster(MonsterFight),
    Card(CardOutcome),
    Decision(DecisionOutcome),
    SpecialTile(SpecialTileOutcome),
    Doomspire(DragonFight),
    Claim(ClaimOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ArrivalHalt {
    ChampionDefeated,
    /// A card moved the champion off the tile.
    ChampionDisplaced,
    GameWon,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ExplorationOutcome {
    AlreadyExplored,
    Explored { tiles: Vec<Pos>, fame: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardOutcome {
    pub card: String,
    pub name: String,
    pub tier: Tier,
    pub pile: usize,
    pub reshuffled: bool,
    pub effect: CardEffect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CardEffect {
    Monster(MonsterFight),
    Gold(u32),
    Fame(u32),
    Resources(ResourceBag),
    ItemTaken(String),
    /// Both item slots are full; the owner decides what to keep.
    ItemAwaitingSlot(String),
    FollowerJoined(String),
    MercenaryOffered { gold_cost: u32 },
    Event(EventOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum EventOutcome {
    TargetRequested(TargetReason),
    NoTarget,
    MarketDayOpened { players: usize },
    StormDrift { boats: usize },
    Landslide { returned_to: Pos },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DecisionOutcome {
    ItemKept { kept: String, dropped: String },
    ItemLeft { item: String },
    PlayerTargeted { target: String, reason: TargetReason, lost: u32 },
    MarketDay { trades: Vec<MarketTrade> },
    MercenaryHired { gold_paid: u32 },
    MercenaryDeclined,
    MercenaryUnaffordable { gold_cost: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarketTrade {
    pub player: String,
    pub result: TradeResult,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TradeResult {
    Traded { gave: Resource, amount: u32, received: Resource },
    Passed,
    Rejected(SpecialRejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpecialAction {
    Trade,
    HireMercenary,
    VisitTemple,
    PickUpItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpecialRejection {
    WrongTile,
    CannotAfford,
    SameResource,
    NoSuchItem,
    InventoryFull,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SpecialTileOutcome {
    Traded { offer: TradeOffer, gave: u32 },
    MercenaryHired { gold_paid: u32 },
    TempleVisited { fame_paid: u32 },
    ItemPickedUp(String),
    Rejected { action: SpecialAction, reason: SpecialRejection },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ClaimOutcome {
    Claimed(Pos),
    Rejected { pos: Pos, reason: ClaimRejection },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ClaimRejection {
    NotResourceTile,
    AlreadyOwned,
    ClaimedBy(String),
    ClaimLimitReached { limit: u32 },
}

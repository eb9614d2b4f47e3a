//! Path validation for champions and boats.
//! Both resolvers are pure: they read the state and describe where the mover
//! ends up. The game applies the result.

use serde::Serialize;

use crate::state::GameState;
use crate::types::{ChampionId, OceanZone, PlayerId, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    Arrived,
    BudgetExhausted,
    UnexploredTile,
    InvalidMove,
    OutOfBounds,
    ForeignHome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MovementOutcome {
    pub start: Pos,
    pub end: Pos,
    /// Cells entered, in order. Excludes the start cell.
    pub visited: Vec<Pos>,
    pub stop: StopReason,
    /// Set when `stop` is a rejection: the cell the mover refused to enter.
    pub rejected_at: Option<Pos>,
    pub budget_left: u8,
}

pub fn resolve_champion_path(
    state: &GameState,
    player: PlayerId,
    start: Pos,
    path: &[Pos],
    budget: u8,
) -> MovementOutcome {
    let steps = match path.first() {
        Some(first) if *first == start => &path[1..],
        _ => path,
    };

    let mut outcome = MovementOutcome {
        start,
        end: start,
        visited: Vec::new(),
        stop: StopReason::Arrived,
        rejected_at: None,
        budget_left: budget,
    };
    if budget == 0 {
        outcome.stop = StopReason::BudgetExhausted;
        return outcome;
    }

    for &next in steps {
        let rejection = if !outcome.end.is_orthogonally_adjacent(next) {
            Some(StopReason::InvalidMove)
        } else if !state.board.in_bounds(next) {
            Some(StopReason::OutOfBounds)
        } else if state.is_foreign_home(next, player) {
            Some(StopReason::ForeignHome)
        } else {
            None
        };
        if let Some(stop) = rejection {
            outcome.stop = stop;
            outcome.rejected_at = Some(next);
            return outcome;
        }

        outcome.end = next;
        outcome.visited.push(next);
        outcome.budget_left -= 1;

        let explored = state.board.tile(next).is_some_and(|tile| tile.explored);
        if !explored {
            outcome.stop = StopReason::UnexploredTile;
            return outcome;
        }
        if outcome.budget_left == 0 {
            outcome.stop = StopReason::BudgetExhausted;
            return outcome;
        }
    }
    outcome
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoatPath {
    pub start: OceanZone,
    pub end: OceanZone,
    /// Every zone the boat touched, start zone first.
    pub visited: Vec<OceanZone>,
    pub stop: StopReason,
    pub budget_left: u8,
}

impl BoatPath {
    pub fn touches_coast(&self, state: &GameState, pos: Pos) -> bool {
        self.visited.iter().any(|zone| state.board.is_coastal_to(pos, *zone))
    }
}

pub fn resolve_boat_path(start: OceanZone, path: &[OceanZone], budget: u8) -> BoatPath {
    let steps = match path.first() {
        Some(first) if *first == start => &path[1..],
        _ => path,
    };
    let mut outcome = BoatPath {
        start,
        end: start,
        visited: vec![start],
        stop: StopReason::Arrived,
        budget_left: budget,
    };
    if budget == 0 {
        outcome.stop = StopReason::BudgetExhausted;
        return outcome;
    }
    for &next in steps {
        if !outcome.end.is_adjacent(next) {
            outcome.stop = StopReason::InvalidMove;
            return outcome;
        }
        outcome.end = next;
        if !outcome.visited.contains(&next) {
            outcome.visited.push(next);
        }
        outcome.budget_left -= 1;
        if outcome.budget_left == 0 {
            outcome.stop = StopReason::BudgetExhausted;
            return outcome;
        }
    }
    outcome
}

/// What happened to the passenger of a boat move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FerryOutcome {
    NoPassenger,
    ChampionMoved { champion: ChampionId, from: Pos, to: Pos },
    ChampionNotReachable { champion: ChampionId, at: Pos },
    TargetNotReachable { champion: ChampionId, target: Pos },
}

pub fn plan_ferry(
    state: &GameState,
    player: PlayerId,
    boat: &BoatPath,
    champion: ChampionId,
    champion_pos: Pos,
    drop_at: Pos,
) -> FerryOutcome {
    if !boat.touches_coast(state, champion_pos) {
        return FerryOutcome::ChampionNotReachable { champion, at: champion_pos };
    }
    if !boat.touches_coast(state, drop_at) || state.is_foreign_home(drop_at, player) {
        return FerryOutcome::TargetNotReachable { champion, target: drop_at };
    }
    FerryOutcome::ChampionMoved { champion, from: champion_pos, to: drop_at }
}

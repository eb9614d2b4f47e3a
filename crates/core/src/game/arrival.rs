//! Tile arrival pipeline. Runs wherever a champion comes to rest, one stage at
//! a time, and can park mid-way while a card waits on a decision.

use super::prompts::PendingDecision;
use super::*;
use crate::combat;
use crate::movement::{BoatPath, FerryOutcome, MovementOutcome};
use crate::report::{
    ArrivalHalt, ArrivalReport, ArrivalStep, ClaimOutcome, ClaimRejection, ExplorationOutcome,
    SpecialAction, SpecialRejection, SpecialTileOutcome,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ArrivalContext {
    pub(super) player: PlayerId,
    pub(super) champion: ChampionId,
    pub(super) pos: Pos,
    pub(super) intent: TileIntent,
}

/// The dice action whose report is completed once arrival finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum ResolvingAction {
    Champion { champion: ChampionId, movement: MovementOutcome },
    Boat { boat: BoatId, path: BoatPath, ferry: FerryOutcome },
}

impl ResolvingAction {
    fn into_report(self, arrival: ArrivalReport) -> ActionReport {
        match self {
            ResolvingAction::Champion { champion, movement } => {
                ActionReport::ChampionMoved { champion, movement, arrival: Some(arrival) }
            }
            ResolvingAction::Boat { boat, path, ferry } => {
                ActionReport::BoatMoved { boat, path, ferry, arrival: Some(arrival) }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ArrivalStage {
    Exploration,
    ChampionCombat,
    Encounter,
    SpecialTile,
    Doomspire,
    Claim,
    Done,
}

impl ArrivalStage {
    fn following(self) -> ArrivalStage {
        match self {
            ArrivalStage::Exploration => ArrivalStage::ChampionCombat,
            ArrivalStage::ChampionCombat => ArrivalStage::Encounter,
            ArrivalStage::Encounter => ArrivalStage::SpecialTile,
            ArrivalStage::SpecialTile => ArrivalStage::Doomspire,
            ArrivalStage::Doomspire => ArrivalStage::Claim,
            ArrivalStage::Claim | ArrivalStage::Done => ArrivalStage::Done,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ArrivalRun {
    pub(super) context: ArrivalContext,
    pub(super) report: ArrivalReport,
    pub(super) next: ArrivalStage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct SuspendedAction {
    pub(super) action: ResolvingAction,
    pub(super) run: ArrivalRun,
}

pub(super) enum StageResult {
    Continue,
    Halt(ArrivalHalt),
    Suspend(PendingDecision),
}

impl Game {
    pub(super) fn drive_arrival(&mut self, action: ResolvingAction, context: ArrivalContext) {
        let report = ArrivalReport {
            player: self.state.player_name(context.player),
            champion: context.champion,
            pos: context.pos,
            steps: Vec::new(),
            halted: None,
        };
        let run = ArrivalRun { context, report, next: ArrivalStage::Exploration };
        self.continue_arrival(action, run);
    }

    pub(super) fn continue_arrival(&mut self, action: ResolvingAction, mut run: ArrivalRun) {
        while run.next != ArrivalStage::Done {
            let stage = run.next;
            run.next = stage.following();
            let result = match stage {
                ArrivalStage::Exploration => self.explore(&run.context, &mut run.report),
                ArrivalStage::ChampionCombat => self.champion_combat(&run.context, &mut run.report),
                ArrivalStage::Encounter => self.encounter(&run.context, &mut run.report),
                ArrivalStage::SpecialTile => self.special_tile(&run.context, &mut run.report),
                ArrivalStage::Doomspire => self.doomspire(&run.context, &mut run.report),
                ArrivalStage::Claim => self.claim(&run.context, &mut run.report),
                ArrivalStage::Done => StageResult::Continue,
            };
            match result {
                StageResult::Continue => {}
                StageResult::Halt(halt) => {
                    run.report.halted = Some(halt);
                    run.next = ArrivalStage::Done;
                }
                StageResult::Suspend(decision) => {
                    self.suspended = Some(SuspendedAction { action, run });
                    self.open_decision(decision);
                    return;
                }
            }
        }
        self.finish_action(action.into_report(run.report));
    }

    fn explore(&mut self, context: &ArrivalContext, report: &mut ArrivalReport) -> StageResult {
        let explored = self.state.board.tile(context.pos).is_none_or(|tile| tile.explored);
        if explored {
            report.steps.push(ArrivalStep::Exploration(ExplorationOutcome::AlreadyExplored));
            return StageResult::Continue;
        }
        let tiles = self.state.board.group_members(context.pos);
        for pos in &tiles {
            if let Some(tile) = self.state.board.tile_mut(*pos) {
                tile.explored = true;
            }
        }
        let fame = self.config.exploration_fame;
        if let Some(owner) = self.state.players.get_mut(context.player) {
            owner.fame += fame;
        }
        self.push_log(
            LogKind::Exploration,
            Some(context.player),
            format!("explores {} tile(s) at {:?}, +{fame} fame", tiles.len(), context.pos),
        );
        report.steps.push(ArrivalStep::Exploration(ExplorationOutcome::Explored { tiles, fame }));
        StageResult::Continue
    }

    fn champion_combat(
        &mut self,
        context: &ArrivalContext,
        report: &mut ArrivalReport,
    ) -> StageResult {
        let contested = self
            .state
            .board
            .tile(context.pos)
            .is_some_and(|tile| tile.kind.allows_champion_combat());
        if !contested {
            return StageResult::Continue;
        }
        let Some(defender) = self.state.opposing_champion_at(context.pos, context.player) else {
            return StageResult::Continue;
        };
        let duel = combat::duel(
            &mut self.state,
            &self.content,
            &self.config,
            self.rolls.as_mut(),
            (context.player, context.champion),
            defender,
        );
        let (winner, loser) = if duel.attacker_won {
            (&duel.attacker, &duel.defender)
        } else {
            (&duel.defender, &duel.attacker)
        };
        let message = format!(
            "{winner} beats {loser} at {:?} after {} tie(s); {loser} heals with {:?}",
            context.pos,
            duel.ties(),
            duel.healing
        );
        self.push_log(LogKind::Combat, Some(context.player), message);
        let attacker_won = duel.attacker_won;
        report.steps.push(ArrivalStep::ChampionCombat(duel));
        if attacker_won {
            StageResult::Continue
        } else {
            StageResult::Halt(ArrivalHalt::ChampionDefeated)
        }
    }

    fn encounter(&mut self, context: &ArrivalContext, report: &mut ArrivalReport) -> StageResult {
        let Some(tile) = self.state.board.tile(context.pos) else {
            return StageResult::Continue;
        };
        let tier = tile.tier;
        let has_token = tile.kind.carries_adventure_tokens() && tile.adventure_tokens > 0;

        if let Some(monster) = tile.monster {
            let fight = combat::fight_monster(
                &mut self.state,
                &self.content,
                self.rolls.as_mut(),
                context.player,
                context.champion,
                monster,
            );
            let won = fight.won;
            if won && let Some(tile) = self.state.board.tile_mut(context.pos) {
                tile.monster = None;
            }
            self.log_monster_fight(context.player, &fight);
            report.steps.push(ArrivalStep::TileMonster(fight));
            return if won {
                StageResult::Continue
            } else {
                StageResult::Halt(ArrivalHalt::ChampionDefeated)
            };
        }

        if has_token {
            if let Some(tile) = self.state.board.tile_mut(context.pos) {
                tile.adventure_tokens -= 1;
            }
            return self.draw_adventure(context, tier, report);
        }
        StageResult::Continue
    }

    pub(super) fn log_monster_fight(&mut self, player: PlayerId, fight: &combat::MonsterFight) {
        let message = if fight.won {
            format!(
                "defeats {} ({} + {} vs {}), +{} fame",
                fight.monster.name,
                fight.champion_might,
                fight.roll,
                fight.monster.might,
                fight.fame_gained
            )
        } else {
            format!(
                "loses to {} ({} + {} vs {}), heals with {:?}",
                fight.monster.name,
                fight.champion_might,
                fight.roll,
                fight.monster.might,
                fight.healing
            )
        };
        self.push_log(LogKind::Combat, Some(player), message);
    }

    fn special_tile(
        &mut self,
        context: &ArrivalContext,
        report: &mut ArrivalReport,
    ) -> StageResult {
        let Some(kind) = self.state.board.tile(context.pos).map(|tile| tile.kind) else {
            return StageResult::Continue;
        };
        let mut outcomes = Vec::new();
        if let Some(offer) = context.intent.trade {
            outcomes.push(self.trade(context.player, kind, offer));
        }
        if context.intent.hire_mercenary {
            outcomes.push(self.hire_mercenary(context.player, kind));
        }
        if context.intent.visit_temple {
            outcomes.push(self.visit_temple(context.player, kind));
        }
        if let Some(item) = &context.intent.pick_up_item {
            outcomes.push(self.pick_up_item(context, item));
        }
        for outcome in outcomes {
            self.push_log(LogKind::Tile, Some(context.player), format!("{outcome:?}"));
            report.steps.push(ArrivalStep::SpecialTile(outcome));
        }
        StageResult::Continue
    }

    fn trade(&mut self, player: PlayerId, kind: TileKind, offer: TradeOffer) -> SpecialTileOutcome {
        let rejected =
            |reason| SpecialTileOutcome::Rejected { action: SpecialAction::Trade, reason };
        if kind != TileKind::Trader {
            return rejected(SpecialRejection::WrongTile);
        }
        if offer.give == offer.receive {
            return rejected(SpecialRejection::SameResource);
        }
        let rate = self.config.trader_rate;
        let Some(owner) = self.state.players.get_mut(player) else {
            return rejected(SpecialRejection::CannotAfford);
        };
        if !owner.resources.try_spend(offer.give, rate) {
            return rejected(SpecialRejection::CannotAfford);
        }
        owner.resources.gain(offer.receive, 1);
        SpecialTileOutcome::Traded { offer, gave: rate }
    }

    fn hire_mercenary(&mut self, player: PlayerId, kind: TileKind) -> SpecialTileOutcome {
        let rejected =
            |reason| SpecialTileOutcome::Rejected { action: SpecialAction::HireMercenary, reason };
        if kind != TileKind::Mercenary {
            return rejected(SpecialRejection::WrongTile);
        }
        let cost = self.config.mercenary_gold_cost;
        let Some(owner) = self.state.players.get_mut(player) else {
            return rejected(SpecialRejection::CannotAfford);
        };
        if !owner.resources.try_spend(Resource::Gold, cost) {
            return rejected(SpecialRejection::CannotAfford);
        }
        owner.might += 1;
        SpecialTileOutcome::MercenaryHired { gold_paid: cost }
    }

    fn visit_temple(&mut self, player: PlayerId, kind: TileKind) -> SpecialTileOutcome {
        let rejected =
            |reason| SpecialTileOutcome::Rejected { action: SpecialAction::VisitTemple, reason };
        if kind != TileKind::Temple {
            return rejected(SpecialRejection::WrongTile);
        }
        let cost = self.config.temple_fame_cost;
        match self.state.players.get_mut(player) {
            Some(owner) if owner.fame >= cost => {
                owner.fame -= cost;
                owner.might += 1;
                SpecialTileOutcome::TempleVisited { fame_paid: cost }
            }
            _ => rejected(SpecialRejection::CannotAfford),
        }
    }

    fn pick_up_item(&mut self, context: &ArrivalContext, item: &str) -> SpecialTileOutcome {
        let rejected =
            |reason| SpecialTileOutcome::Rejected { action: SpecialAction::PickUpItem, reason };
        let Some(key) = self.content.item_key(item) else {
            return rejected(SpecialRejection::NoSuchItem);
        };
        let lying_here =
            self.state.board.tile(context.pos).is_some_and(|tile| tile.items.contains(&key));
        if !lying_here {
            return rejected(SpecialRejection::NoSuchItem);
        }
        let Some(champion) = self
            .state
            .players
            .get_mut(context.player)
            .and_then(|owner| owner.champion_mut(context.champion))
        else {
            return rejected(SpecialRejection::NoSuchItem);
        };
        if !champion.has_free_slot() {
            return rejected(SpecialRejection::InventoryFull);
        }
        champion.items.push(key);
        if let Some(tile) = self.state.board.tile_mut(context.pos)
            && let Some(index) = tile.items.iter().position(|candidate| *candidate == key)
        {
            tile.items.remove(index);
        }
        SpecialTileOutcome::ItemPickedUp(key.to_string())
    }

    fn doomspire(&mut self, context: &ArrivalContext, report: &mut ArrivalReport) -> StageResult {
        let on_doomspire =
            self.state.board.tile(context.pos).is_some_and(|tile| tile.kind == TileKind::Doomspire);
        if !on_doomspire {
            return StageResult::Continue;
        }
        let fight = combat::fight_dragon(
            &mut self.state,
            &self.content,
            &self.config,
            self.rolls.as_mut(),
            context.player,
            context.champion,
        );
        let halt = match &fight {
            combat::DragonFight::ThresholdMet(kind) => {
                self.push_log(
                    LogKind::Combat,
                    Some(context.player),
                    format!("reaches the dragon with a {kind:?} victory in hand"),
                );
                ArrivalHalt::GameWon
            }
            combat::DragonFight::Fought { champion_might, roll, dragon_might, won, .. } => {
                let verdict = if *won { "slays" } else { "is driven off by" };
                self.push_log(
                    LogKind::Combat,
                    Some(context.player),
                    format!("{verdict} the dragon ({champion_might} + {roll} vs {dragon_might})"),
                );
                if *won { ArrivalHalt::GameWon } else { ArrivalHalt::ChampionDefeated }
            }
        };
        report.steps.push(ArrivalStep::Doomspire(fight));
        StageResult::Halt(halt)
    }

    fn claim(&mut self, context: &ArrivalContext, report: &mut ArrivalReport) -> StageResult {
        if !context.intent.claim_tile {
            return StageResult::Continue;
        }
        let pos = context.pos;
        let rejection = match self.state.board.tile(pos) {
            None => Some(ClaimRejection::NotResourceTile),
            Some(tile) if tile.kind != TileKind::Resource => Some(ClaimRejection::NotResourceTile),
            Some(tile) => match tile.claimed_by {
                Some(owner) if owner == context.player => Some(ClaimRejection::AlreadyOwned),
                Some(owner) => Some(ClaimRejection::ClaimedBy(self.state.player_name(owner))),
                None => {
                    let limit = self
                        .state
                        .players
                        .get(context.player)
                        .map_or(0, |owner| owner.max_claims);
                    (self.state.claims_of(context.player) >= limit as usize)
                        .then_some(ClaimRejection::ClaimLimitReached { limit })
                }
            },
        };

        let outcome = match rejection {
            Some(reason) => ClaimOutcome::Rejected { pos, reason },
            None => {
                if let Some(tile) = self.state.board.tile_mut(pos) {
                    tile.claimed_by = Some(context.player);
                }
                ClaimOutcome::Claimed(pos)
            }
        };
        self.push_log(LogKind::Claim, Some(context.player), format!("{outcome:?}"));
        report.steps.push(ArrivalStep::Claim(outcome));
        StageResult::Continue
    }
}

//! Adventure card draws and per-type dispatch.
//!
//! Handlers that need an answer from a player do not block: they hand a
//! `PendingDecision` back to the arrival pipeline, which parks until
//! `apply_decision` has every answer.

use tracing::debug;

use super::arrival::{ArrivalContext, StageResult};
use super::prompts::{PendingDecision, PendingEffect};
use super::*;
use crate::combat;
use crate::content::{Card, CardKind, EncounterKind, EventKind, Monster, TreasureEffect};
use crate::report::{ArrivalHalt, ArrivalReport, ArrivalStep, CardEffect, CardOutcome, EventOutcome};

impl Game {
    pub(super) fn draw_adventure(
        &mut self,
        context: &ArrivalContext,
        tier: Tier,
        report: &mut ArrivalReport,
    ) -> StageResult {
        let preferred = context.intent.adventure_pile.map_or(0, usize::from);
        let in_play = self.state.cards_in_play();
        let drawn =
            self.state.decks.draw(&self.content, tier, preferred, &in_play, self.rolls.as_mut());
        let Some((drawn, card)) = drawn.and_then(|drawn| {
            self.content.card(drawn.index).copied().map(|card| (drawn, card))
        }) else {
            let message = format!("no {tier:?} cards to draw");
            self.push_log(LogKind::Card, Some(context.player), message);
            return StageResult::Continue;
        };
        debug!(card = card.id, pile = drawn.pile, reshuffled = drawn.reshuffled, "card drawn");
        let reshuffle_note = if drawn.reshuffled { " after a reshuffle" } else { "" };
        self.push_log(
            LogKind::Card,
            Some(context.player),
            format!("draws {} from pile {}{reshuffle_note}", card.name, drawn.pile),
        );

        let (effect, result) = match card.kind {
            CardKind::Monster(monster) => self.card_monster(context, monster),
            CardKind::Treasure(treasure) => self.card_treasure(context, &card, treasure),
            CardKind::Event(event) => self.card_event(context, event),
            CardKind::Encounter(encounter) => self.card_encounter(context, encounter),
            CardKind::Follower(_) => self.card_follower(context, &card),
        };
        report.steps.push(ArrivalStep::Card(CardOutcome {
            card: card.id.to_string(),
            name: card.name.to_string(),
            tier,
            pile: drawn.pile,
            reshuffled: drawn.reshuffled,
            effect,
        }));
        result
    }

    /// A drawn monster is fought on the spot and stays on the tile if it wins.
    fn card_monster(
        &mut self,
        context: &ArrivalContext,
        monster: Monster,
    ) -> (CardEffect, StageResult) {
        let fight = combat::fight_monster(
            &mut self.state,
            &self.content,
            self.rolls.as_mut(),
            context.player,
            context.champion,
            monster,
        );
        self.log_monster_fight(context.player, &fight);
        if fight.won {
            return (CardEffect::Monster(fight), StageResult::Continue);
        }
        if let Some(tile) = self.state.board.tile_mut(context.pos) {
            tile.monster = Some(monster);
        }
        (CardEffect::Monster(fight), StageResult::Halt(ArrivalHalt::ChampionDefeated))
    }

    fn card_treasure(
        &mut self,
        context: &ArrivalContext,
        card: &Card,
        treasure: TreasureEffect,
    ) -> (CardEffect, StageResult) {
        let player_name = self.state.player_name(context.player);
        let Some(owner) = self.state.players.get_mut(context.player) else {
            return (CardEffect::Gold(0), StageResult::Continue);
        };
        match treasure {
            TreasureEffect::Gold(amount) => {
                owner.resources.gain(Resource::Gold, amount);
                (CardEffect::Gold(amount), StageResult::Continue)
            }
            TreasureEffect::Fame(amount) => {
                owner.fame += amount;
                (CardEffect::Fame(amount), StageResult::Continue)
            }
            TreasureEffect::Carriable { .. } => {
                let Some(champion) = owner.champion_mut(context.champion) else {
                    let effect = CardEffect::ItemAwaitingSlot(card.id.to_string());
                    return (effect, StageResult::Continue);
                };
                if champion.has_free_slot() {
                    champion.items.push(card.id);
                    return (CardEffect::ItemTaken(card.id.to_string()), StageResult::Continue);
                }
                let request = DecisionRequest::ItemToDrop {
                    player: player_name,
                    champion: context.champion,
                    carried: champion.items.iter().map(|item| item.to_string()).collect(),
                    found: card.id.to_string(),
                };
                let effect = PendingEffect::ItemSlot {
                    player: context.player,
                    champion: context.champion,
                    pos: context.pos,
                    found: card.id,
                };
                (
                    CardEffect::ItemAwaitingSlot(card.id.to_string()),
                    StageResult::Suspend(PendingDecision::new(vec![request], effect)),
                )
            }
        }
    }

    fn card_event(
        &mut self,
        context: &ArrivalContext,
        event: EventKind,
    ) -> (CardEffect, StageResult) {
        match event {
            EventKind::HungryPests { food_loss } => {
                self.target_event(context, TargetReason::HungryPests { food_loss })
            }
            EventKind::Thief { gold_loss } => {
                self.target_event(context, TargetReason::Thief { gold_loss })
            }
            EventKind::MarketDay => {
                let rate = self.config.market_day_rate;
                let requests: Vec<DecisionRequest> = self
                    .state
                    .turn_order
                    .iter()
                    .map(|id| DecisionRequest::MarketDay {
                        player: self.state.player_name(*id),
                        give_amount: rate,
                    })
                    .collect();
                let players = requests.len();
                let decision = PendingDecision::new(requests, PendingEffect::MarketDay { rate });
                (
                    CardEffect::Event(EventOutcome::MarketDayOpened { players }),
                    StageResult::Suspend(decision),
                )
            }
            EventKind::SuddenStorm => {
                let mut boats = 0;
                for (_, player) in self.state.players.iter_mut() {
                    for boat in &mut player.boats {
                        boat.zone = boat.zone.clockwise();
                        boats += 1;
                    }
                }
                self.push_log(
                    LogKind::Event,
                    Some(context.player),
                    format!("a storm drifts {boats} boat(s) clockwise"),
                );
                (CardEffect::Event(EventOutcome::StormDrift { boats }), StageResult::Continue)
            }
            EventKind::Landslide => {
                self.state.send_champion_home(context.player, context.champion);
                let returned_to =
                    self.state.players.get(context.player).map_or(context.pos, |owner| owner.home);
                self.push_log(
                    LogKind::Event,
                    Some(context.player),
                    format!(
                        "a landslide sweeps champion {} home to {returned_to:?}",
                        context.champion
                    ),
                );
                (
                    CardEffect::Event(EventOutcome::Landslide { returned_to }),
                    StageResult::Halt(ArrivalHalt::ChampionDisplaced),
                )
            }
        }
    }

    /// Asks the drawer to pick one of the other players.
    fn target_event(
        &mut self,
        context: &ArrivalContext,
        reason: TargetReason,
    ) -> (CardEffect, StageResult) {
        let candidates: Vec<String> = self
            .state
            .turn_order
            .iter()
            .filter(|id| **id != context.player)
            .map(|id| self.state.player_name(*id))
            .collect();
        if candidates.is_empty() {
            let message = format!("{reason:?} finds no target");
            self.push_log(LogKind::Event, Some(context.player), message);
            return (CardEffect::Event(EventOutcome::NoTarget), StageResult::Continue);
        }
        let request = DecisionRequest::TargetPlayer {
            player: self.state.player_name(context.player),
            reason,
            candidates,
        };
        let decision = PendingDecision::new(vec![request], PendingEffect::Target { reason });
        (CardEffect::Event(EventOutcome::TargetRequested(reason)), StageResult::Suspend(decision))
    }

    fn card_encounter(
        &mut self,
        context: &ArrivalContext,
        encounter: EncounterKind,
    ) -> (CardEffect, StageResult) {
        match encounter {
            EncounterKind::Fame(amount) => {
                if let Some(owner) = self.state.players.get_mut(context.player) {
                    owner.fame += amount;
                }
                (CardEffect::Fame(amount), StageResult::Continue)
            }
            EncounterKind::Resources(bag) => {
                if let Some(owner) = self.state.players.get_mut(context.player) {
                    owner.resources.add(bag);
                }
                (CardEffect::Resources(bag), StageResult::Continue)
            }
            EncounterKind::WanderingMercenary { gold_cost } => {
                let request = DecisionRequest::YesNo {
                    player: self.state.player_name(context.player),
                    topic: YesNoTopic::HireWanderingMercenary { gold_cost },
                };
                let effect =
                    PendingEffect::WanderingMercenary { player: context.player, gold_cost };
                (
                    CardEffect::MercenaryOffered { gold_cost },
                    StageResult::Suspend(PendingDecision::new(vec![request], effect)),
                )
            }
        }
    }

    fn card_follower(
        &mut self,
        context: &ArrivalContext,
        card: &Card,
    ) -> (CardEffect, StageResult) {
        if let Some(champion) = self
            .state
            .players
            .get_mut(context.player)
            .and_then(|owner| owner.champion_mut(context.champion))
        {
            champion.followers.push(card.id);
        }
        (CardEffect::FollowerJoined(card.id.to_string()), StageResult::Continue)
    }
}

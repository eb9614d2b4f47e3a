//! Decision entry point and the effects of fully answered decisions.
//! A batch (market day) accepts answers in any order and resolves once
//! the last one arrives.

use tracing::debug;

use super::prompts::{PendingDecision, PendingEffect, PendingPromptKind};
use super::*;
use crate::report::{ArrivalStep, DecisionOutcome, MarketTrade, SpecialRejection, TradeResult};

impl Game {
    pub fn apply_decision(
        &mut self,
        prompt_id: ChoicePromptId,
        player: &str,
        response: DecisionResponse,
    ) -> Result<(), GameError> {
        if self.state.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let Some(prompt) = &self.pending_prompt else {
            return Err(GameError::PromptMismatch);
        };
        if prompt.id != prompt_id {
            return Err(GameError::PromptMismatch);
        }
        let PendingPromptKind::Decision(decision) = &prompt.kind else {
            return Err(GameError::PromptMismatch);
        };
        if self.state.player_by_name(player).is_none() {
            return Err(GameError::UnknownPlayer(player.to_string()));
        }
        let Some(slot) = decision
            .requests
            .iter()
            .position(|pending| pending.answer.is_none() && pending.request.player() == player)
        else {
            return Err(GameError::InvalidChoice);
        };
        validate_response(&decision.requests[slot].request, &response)?;

        debug!(player, ?response, "decision answered");
        let mut complete = false;
        if let Some(prompt) = self.pending_prompt.as_mut()
            && let PendingPromptKind::Decision(decision) = &mut prompt.kind
        {
            decision.requests[slot].answer = Some(response);
            complete = decision.is_complete();
        }
        self.next_input_seq += 1;
        if complete {
            self.resolve_decision();
        }
        Ok(())
    }

    fn resolve_decision(&mut self) {
        let decision = match self.pending_prompt.take() {
            Some(PendingPrompt { kind: PendingPromptKind::Decision(decision), .. }) => decision,
            other => {
                self.pending_prompt = other;
                return;
            }
        };
        let actor = self.suspended.as_ref().map(|suspended| suspended.run.context.player);
        let outcome = self.apply_effect(decision);
        self.push_log(LogKind::Card, actor, format!("{outcome:?}"));

        if let Some(mut suspended) = self.suspended.take() {
            suspended.run.report.steps.push(ArrivalStep::Decision(outcome));
            self.continue_arrival(suspended.action, suspended.run);
        }
    }

    fn apply_effect(&mut self, decision: PendingDecision) -> DecisionOutcome {
        let answers: Vec<(DecisionRequest, DecisionResponse)> = decision
            .requests
            .into_iter()
            .filter_map(|pending| pending.answer.map(|answer| (pending.request, answer)))
            .collect();
        match decision.effect {
            PendingEffect::ItemSlot { player, champion, pos, found } => {
                let drop = answers.iter().find_map(|(_, answer)| match answer {
                    DecisionResponse::DropItem(drop) => Some(*drop),
                    _ => None,
                });
                let drop = drop.unwrap_or(ItemDrop::Found);
                self.resolve_item_slot(player, champion, pos, found, drop)
            }
            PendingEffect::Target { reason } => {
                let target = answers.iter().find_map(|(_, answer)| match answer {
                    DecisionResponse::TargetPlayer(name) => Some(name.clone()),
                    _ => None,
                });
                self.resolve_target(reason, target.unwrap_or_default())
            }
            PendingEffect::MarketDay { rate } => self.resolve_market_day(rate, &answers),
            PendingEffect::WanderingMercenary { player, gold_cost } => {
                let hire = answers
                    .iter()
                    .any(|(_, answer)| matches!(answer, DecisionResponse::YesNo(true)));
                if !hire {
                    return DecisionOutcome::MercenaryDeclined;
                }
                match self.state.players.get_mut(player) {
                    Some(owner) => {
                        if !owner.resources.try_spend(Resource::Gold, gold_cost) {
                            return DecisionOutcome::MercenaryUnaffordable { gold_cost };
                        }
                        owner.might += 1;
                        DecisionOutcome::MercenaryHired { gold_paid: gold_cost }
                    }
                    None => DecisionOutcome::MercenaryUnaffordable { gold_cost },
                }
            }
        }
    }

    /// The item not kept is left lying on the tile.
    fn resolve_item_slot(
        &mut self,
        player: PlayerId,
        champion: ChampionId,
        pos: Pos,
        found: ItemKey,
        drop: ItemDrop,
    ) -> DecisionOutcome {
        let swapped = match drop {
            ItemDrop::Carried(index) => self
                .state
                .players
                .get_mut(player)
                .and_then(|owner| owner.champion_mut(champion))
                .filter(|carrier| index < carrier.items.len())
                .map(|carrier| {
                    let dropped = carrier.items.remove(index);
                    carrier.items.push(found);
                    dropped
                }),
            ItemDrop::Found => None,
        };
        let left = swapped.unwrap_or(found);
        if let Some(tile) = self.state.board.tile_mut(pos) {
            tile.items.push(left);
        }
        match swapped {
            Some(dropped) => {
                DecisionOutcome::ItemKept { kept: found.to_string(), dropped: dropped.to_string() }
            }
            None => DecisionOutcome::ItemLeft { item: found.to_string() },
        }
    }

    fn resolve_target(&mut self, reason: TargetReason, target: String) -> DecisionOutcome {
        let (resource, amount) = match reason {
            TargetReason::HungryPests { food_loss } => (Resource::Food, food_loss),
            TargetReason::Thief { gold_loss } => (Resource::Gold, gold_loss),
        };
        let lost = self
            .state
            .player_by_name(&target)
            .and_then(|id| self.state.players.get_mut(id))
            .map_or(0, |victim| victim.resources.lose(resource, amount));
        DecisionOutcome::PlayerTargeted { target, reason, lost }
    }

    /// Trades settle in turn order so shared outcomes never depend on
    /// the order answers arrived in.
    fn resolve_market_day(
        &mut self,
        rate: u32,
        answers: &[(DecisionRequest, DecisionResponse)],
    ) -> DecisionOutcome {
        let mut trades = Vec::new();
        for id in self.state.turn_order.clone() {
            let name = self.state.player_name(id);
            let choice = answers.iter().find_map(|(request, answer)| match answer {
                DecisionResponse::MarketDay(choice) if request.player() == name => Some(*choice),
                _ => None,
            });
            let Some(choice) = choice else {
                continue;
            };
            let result = match choice {
                MarketDayChoice::Pass => TradeResult::Passed,
                MarketDayChoice::Trade(offer) if offer.give == offer.receive => {
                    TradeResult::Rejected(SpecialRejection::SameResource)
                }
                MarketDayChoice::Trade(offer) => match self.state.players.get_mut(id) {
                    Some(trader) => {
                        if trader.resources.try_spend(offer.give, rate) {
                            trader.resources.gain(offer.receive, 1);
                            TradeResult::Traded {
                                gave: offer.give,
                                amount: rate,
                                received: offer.receive,
                            }
                        } else {
                            TradeResult::Rejected(SpecialRejection::CannotAfford)
                        }
                    }
                    None => TradeResult::Rejected(SpecialRejection::CannotAfford),
                },
            };
            trades.push(MarketTrade { player: name, result });
        }
        DecisionOutcome::MarketDay { trades }
    }
}

/// Shape checks only. Whether a trade is affordable is decided at resolution.
fn validate_response(
    request: &DecisionRequest,
    response: &DecisionResponse,
) -> Result<(), GameError> {
    let valid = match (request, response) {
        (DecisionRequest::ItemToDrop { carried, .. }, DecisionResponse::DropItem(drop)) => {
            match drop {
                ItemDrop::Carried(index) => *index < carried.len(),
                ItemDrop::Found => true,
            }
        }
        (
            DecisionRequest::TargetPlayer { candidates, .. },
            DecisionResponse::TargetPlayer(name),
        ) => candidates.contains(name),
        (DecisionRequest::MarketDay { .. }, DecisionResponse::MarketDay(_)) => true,
        (DecisionRequest::YesNo { .. }, DecisionResponse::YesNo(_)) => true,
        _ => false,
    };
    if valid { Ok(()) } else { Err(GameError::InvalidChoice) }
}

//! Prompt state and interrupt conversion for agent-facing requests.
//! It does not own the gameplay consequences of accepted answers.

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PendingRequest {
    pub(super) request: DecisionRequest,
    pub(super) answer: Option<DecisionResponse>,
}

/// What an answered decision does once every request has an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum PendingEffect {
    ItemSlot { player: PlayerId, champion: ChampionId, pos: Pos, found: ItemKey },
    Target { reason: TargetReason },
    MarketDay { rate: u32 },
    WanderingMercenary { player: PlayerId, gold_cost: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PendingDecision {
    pub(super) requests: Vec<PendingRequest>,
    pub(super) effect: PendingEffect,
}

impl PendingDecision {
    pub(super) fn new(requests: Vec<DecisionRequest>, effect: PendingEffect) -> Self {
        Self {
            requests: requests
                .into_iter()
                .map(|request| PendingRequest { request, answer: None })
                .collect(),
            effect,
        }
    }

    pub(super) fn is_complete(&self) -> bool {
        self.requests.iter().all(|pending| pending.answer.is_some())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum PendingPromptKind {
    DiceAction,
    Decision(PendingDecision),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PendingPrompt {
    pub(super) id: ChoicePromptId,
    pub(super) kind: PendingPromptKind,
}

impl Game {
    pub(super) fn interrupt_dice_action(&mut self) -> AdvanceResult {
        let prompt = PendingPrompt {
            id: ChoicePromptId(self.next_input_seq),
            kind: PendingPromptKind::DiceAction,
        };
        self.pending_prompt = Some(prompt.clone());
        let interrupt = self.prompt_to_interrupt(&prompt);
        AdvanceResult { stop_reason: AdvanceStopReason::Interrupted(interrupt) }
    }

    pub(super) fn open_decision(&mut self, decision: PendingDecision) {
        self.pending_prompt = Some(PendingPrompt {
            id: ChoicePromptId(self.next_input_seq),
            kind: PendingPromptKind::Decision(decision),
        });
    }

    pub(super) fn prompt_to_interrupt(&self, prompt: &PendingPrompt) -> Interrupt {
        match &prompt.kind {
            PendingPromptKind::DiceAction => {
                let player = self.turn.as_ref().map_or_else(
                    || self.state.current_player(),
                    |turn| turn.player,
                );
                Interrupt::DiceAction {
                    prompt_id: prompt.id,
                    player,
                    context: self.turn_context().unwrap_or_else(|| TurnContext {
                        round: self.state.round,
                        player: self.state.player_name(player),
                        dice_rolled: Vec::new(),
                        dice_remaining: Vec::new(),
                        actions_taken: 0,
                    }),
                }
            }
            PendingPromptKind::Decision(decision) => Interrupt::Decision {
                prompt_id: prompt.id,
                requests: decision
                    .requests
                    .iter()
                    .filter(|pending| pending.answer.is_none())
                    .map(|pending| pending.request.clone())
                    .collect(),
            },
        }
    }
}

//! Turn loop: rolling the pool, asking for actions, passing the turn.

use tracing::info;

use super::*;
use crate::victory;

impl Game {
    pub fn advance(&mut self) -> AdvanceResult {
        if let Some(victory) = &self.state.winner {
            return AdvanceResult { stop_reason: AdvanceStopReason::Finished(victory.clone()) };
        }
        if let Some(prompt) = &self.pending_prompt {
            return AdvanceResult {
                stop_reason: AdvanceStopReason::Interrupted(self.prompt_to_interrupt(prompt)),
            };
        }

        match self.turn.as_ref().map(|turn| turn.pool.has_remaining()) {
            None => {
                self.begin_turn();
                self.interrupt_dice_action()
            }
            Some(true) => self.interrupt_dice_action(),
            Some(false) => self.end_turn(),
        }
    }

    fn begin_turn(&mut self) {
        let player = self.state.current_player();
        let champions = self.state.players.get(player).map_or(0, |owner| owner.champions.len());
        let pool = DicePool::roll(1 + champions, self.rolls.as_mut());
        self.push_log(LogKind::Turn, Some(player), format!("round {} begins", self.state.round));
        self.push_log(LogKind::Dice, Some(player), format!("rolled {:?}", pool.rolled()));
        self.turn = Some(TurnState { player, pool, actions_taken: 0 });
    }

    fn end_turn(&mut self) -> AdvanceResult {
        let round = self.state.round;
        let player = match self.turn.take() {
            Some(turn) => turn.player,
            None => self.state.current_player(),
        };
        self.push_log(LogKind::Turn, Some(player), "turn ends".to_string());

        self.state.current = (self.state.current + 1) % self.state.turn_order.len();
        if self.state.current == 0 {
            self.state.round += 1;
        }
        AdvanceResult { stop_reason: AdvanceStopReason::TurnEnded { player, round } }
    }

    /// Runs the victory checker and records the first winner it reports.
    pub(super) fn check_victory(&mut self) {
        if self.state.winner.is_some() {
            return;
        }
        if let Some(victory) = victory::check_victory(&self.state, &self.config) {
            info!(
                winner = %victory.winner_name,
                kind = ?victory.kind,
                round = self.state.round,
                "game won"
            );
            self.push_log(
                LogKind::Victory,
                Some(victory.winner),
                format!("wins by {:?}", victory.kind),
            );
            self.state.winner = Some(victory);
            self.pending_prompt = None;
            self.suspended = None;
        }
    }
}

//! Dice actions: validation, dice consumption, and resolution.
//! Every contract check runs before the first mutation, so a rejected
//! action leaves the game exactly as it was.

use tracing::debug;

use super::arrival::{ArrivalContext, ResolvingAction};
use super::prompts::PendingPromptKind;
use super::*;
use crate::harvest::{HarvestOutcome, resolve_harvest};
use crate::movement::{FerryOutcome, plan_ferry, resolve_boat_path, resolve_champion_path};

impl Game {
    pub fn apply_action(
        &mut self,
        prompt_id: ChoicePromptId,
        action: Action,
    ) -> Result<(), GameError> {
        if self.state.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let Some(prompt) = &self.pending_prompt else {
            return Err(GameError::PromptMismatch);
        };
        if prompt.id != prompt_id || prompt.kind != PendingPromptKind::DiceAction {
            return Err(GameError::PromptMismatch);
        }
        let Some(turn) = &self.turn else {
            return Err(GameError::PromptMismatch);
        };
        let player = turn.player;

        let dice = action.dice();
        if dice.is_empty() {
            return Err(GameError::NoDice);
        }
        let mut pool = turn.pool.clone();
        pool.consume_many(&dice)?;
        let harvest = self.validate_action(player, &action)?;

        if let Some(turn) = self.turn.as_mut() {
            turn.pool = pool;
            turn.actions_taken += 1;
        }
        self.pending_prompt = None;
        self.next_input_seq += 1;
        debug!(?action, "applying dice action");

        match action {
            Action::MoveChampion { die, champion, path, intent } => {
                self.move_champion(player, champion, die, &path, intent);
            }
            Action::MoveBoat { die, boat, path, ferry } => {
                self.move_boat(player, boat, die, &path, ferry);
            }
            Action::Harvest { .. } => {
                if let Some(outcome) = harvest {
                    self.harvest(player, outcome);
                }
            }
        }
        Ok(())
    }

    /// Contract checks. A harvest is resolved here since resolving it is
    /// also how unknown tiles are found.
    fn validate_action(
        &self,
        player: PlayerId,
        action: &Action,
    ) -> Result<Option<HarvestOutcome>, GameError> {
        let Some(owner) = self.state.players.get(player) else {
            return Err(GameError::UnknownPlayer(format!("{player:?}")));
        };
        match action {
            Action::MoveChampion { champion, .. } => {
                if owner.champion(*champion).is_none() {
                    return Err(GameError::UnknownChampion {
                        player: owner.name.clone(),
                        champion: *champion,
                    });
                }
                Ok(None)
            }
            Action::MoveBoat { boat, ferry, .. } => {
                if !owner.boats.iter().any(|candidate| candidate.id == *boat) {
                    return Err(GameError::UnknownBoat { player: owner.name.clone(), boat: *boat });
                }
                if let Some(ferry) = ferry
                    && owner.champion(ferry.champion).is_none()
                {
                    return Err(GameError::UnknownChampion {
                        player: owner.name.clone(),
                        champion: ferry.champion,
                    });
                }
                Ok(None)
            }
            Action::Harvest { dice, tiles } => {
                resolve_harvest(&self.state, player, tiles, dice).map(Some)
            }
        }
    }

    fn move_champion(
        &mut self,
        player: PlayerId,
        champion: ChampionId,
        die: u8,
        path: &[Pos],
        intent: TileIntent,
    ) {
        let Some(start) = self
            .state
            .players
            .get(player)
            .and_then(|owner| owner.champion(champion))
            .map(|champion| champion.pos)
        else {
            return;
        };
        let movement = resolve_champion_path(&self.state, player, start, path, die);
        if let Some(moved) =
            self.state.players.get_mut(player).and_then(|owner| owner.champion_mut(champion))
        {
            moved.pos = movement.end;
        }
        let mut message = format!(
            "champion {champion} moves {:?} -> {:?} ({:?})",
            movement.start, movement.end, movement.stop
        );
        if let Some(refused) = movement.rejected_at {
            message.push_str(&format!(", refused {refused:?}"));
        }
        self.push_log(LogKind::Movement, Some(player), message);

        // Arrival needs the champion to come to rest on a new tile.
        if movement.visited.is_empty() {
            self.finish_action(ActionReport::ChampionMoved { champion, movement, arrival: None });
            return;
        }
        let context = ArrivalContext { player, champion, pos: movement.end, intent };
        self.drive_arrival(ResolvingAction::Champion { champion, movement }, context);
    }

    fn move_boat(
        &mut self,
        player: PlayerId,
        boat: BoatId,
        die: u8,
        path: &[OceanZone],
        ferry: Option<Ferry>,
    ) {
        let Some(start) = self
            .state
            .players
            .get(player)
            .and_then(|owner| owner.boats.iter().find(|candidate| candidate.id == boat))
            .map(|boat| boat.zone)
        else {
            return;
        };
        let boat_path = resolve_boat_path(start, path, die);
        if let Some(moved) =
            self.state.players.get_mut(player).and_then(|owner| owner.boat_mut(boat))
        {
            moved.zone = boat_path.end;
        }
        self.push_log(
            LogKind::Boat,
            Some(player),
            format!(
                "boat {boat} sails {:?} -> {:?} ({:?})",
                boat_path.start, boat_path.end, boat_path.stop
            ),
        );

        let Some(ferry) = ferry else {
            self.finish_action(ActionReport::BoatMoved {
                boat,
                path: boat_path,
                ferry: FerryOutcome::NoPassenger,
                arrival: None,
            });
            return;
        };
        let champion_pos = self
            .state
            .players
            .get(player)
            .and_then(|owner| owner.champion(ferry.champion))
            .map(|champion| champion.pos);
        let Some(champion_pos) = champion_pos else {
            return;
        };

        let outcome = plan_ferry(
            &self.state,
            player,
            &boat_path,
            ferry.champion,
            champion_pos,
            ferry.drop_at,
        );
        let landing = match outcome {
            FerryOutcome::ChampionMoved { to, .. } => Some(to),
            _ => None,
        };
        let Some(to) = landing else {
            self.push_log(LogKind::Boat, Some(player), format!("ferry refused: {outcome:?}"));
            self.finish_action(ActionReport::BoatMoved {
                boat,
                path: boat_path,
                ferry: outcome,
                arrival: None,
            });
            return;
        };

        if let Some(moved) =
            self.state.players.get_mut(player).and_then(|owner| owner.champion_mut(ferry.champion))
        {
            moved.pos = to;
        }
        self.push_log(
            LogKind::Boat,
            Some(player),
            format!("ferries champion {} to {to:?}", ferry.champion),
        );
        let context =
            ArrivalContext { player, champion: ferry.champion, pos: to, intent: ferry.intent };
        let action = ResolvingAction::Boat { boat, path: boat_path, ferry: outcome };
        self.drive_arrival(action, context);
    }

    fn harvest(&mut self, player: PlayerId, outcome: HarvestOutcome) {
        if let Some(owner) = self.state.players.get_mut(player) {
            owner.resources.add(outcome.gained);
        }
        let mut message =
            format!("harvests {:?} from {} tile(s)", outcome.gained, outcome.harvested.len());
        if !outcome.truncated.is_empty() {
            message.push_str(&format!(", {} over budget", outcome.truncated.len()));
        }
        for (pos, reason) in &outcome.skipped {
            message.push_str(&format!(", skipped {pos:?} ({reason:?})"));
        }
        self.push_log(LogKind::Harvest, Some(player), message);
        self.finish_action(ActionReport::Harvested(outcome));
    }

    pub(super) fn finish_action(&mut self, report: ActionReport) {
        self.last_report = Some(report);
        self.check_victory();
    }
}

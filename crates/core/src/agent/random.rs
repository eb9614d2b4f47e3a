use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use super::{AgentError, PlayerAgent};
use crate::types::{
    Action, DecisionRequest, DecisionResponse, ItemDrop, LogEntry, MarketDayChoice, Pos, Resource,
    TileIntent, TileKind, TradeOffer, TurnContext,
};
use crate::view::{GameView, PlayerView};

const STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Plays uniformly random, mostly legal moves. Seeded, so a game between
/// random agents is as reproducible as the engine itself.
pub struct RandomAgent {
    name: String,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self { name: name.into(), rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    fn pick(&mut self, bound: usize) -> usize {
        (self.rng.next_u64() % bound.max(1) as u64) as usize
    }

    fn me<'a>(&self, view: &'a GameView) -> Result<&'a PlayerView, AgentError> {
        view.player(&self.name).ok_or_else(|| AgentError::Failed {
            agent: self.name.clone(),
            message: "not seated in this game".to_string(),
        })
    }

    /// A random walk of up to `die` steps that never enters a foreign home
    /// and stops on the first unexplored tile.
    fn wander(&mut self, view: &GameView, me: &PlayerView, start: Pos, die: u8) -> Vec<Pos> {
        let foreign_homes: Vec<Pos> = view
            .players
            .iter()
            .filter(|other| other.name != me.name)
            .map(|other| other.home)
            .collect();
        let mut path = Vec::new();
        let mut at = start;
        for _ in 0..die {
            let options: Vec<Pos> = STEPS
                .iter()
                .map(|(dy, dx)| Pos::new(at.y + dy, at.x + dx))
                .filter(|next| view.tile(*next).is_some() && !foreign_homes.contains(next))
                .collect();
            if options.is_empty() {
                break;
            }
            at = options[self.pick(options.len())];
            path.push(at);
            if view.tile(at).is_some_and(|tile| !tile.explored) {
                break;
            }
        }
        path
    }
}

impl PlayerAgent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_dice_action(
        &mut self,
        view: &GameView,
        _log: &[LogEntry],
        context: &TurnContext,
    ) -> Result<Action, AgentError> {
        let me = self.me(view)?.clone();
        let Some(&die) = context.dice_remaining.get(self.pick(context.dice_remaining.len())) else {
            return Err(AgentError::Failed {
                agent: self.name.clone(),
                message: "no dice left".to_string(),
            });
        };

        let claimed: Vec<Pos> = view
            .tiles
            .iter()
            .filter(|tile| tile.claimed_by.as_deref() == Some(me.name.as_str()))
            .map(|tile| tile.pos)
            .collect();
        if !claimed.is_empty() && self.pick(3) == 0 {
            return Ok(Action::Harvest { dice: vec![die], tiles: claimed });
        }

        if let Some(boat) = me.boats.first()
            && self.pick(8) == 0
        {
            let path = vec![boat.zone.clockwise()];
            return Ok(Action::MoveBoat { die, boat: boat.id, path, ferry: None });
        }

        let Some(champion) = me.champions.get(self.pick(me.champions.len())) else {
            return Err(AgentError::Failed {
                agent: self.name.clone(),
                message: "no champions".to_string(),
            });
        };
        let path = self.wander(view, &me, champion.pos, die);
        let end = path.last().copied().unwrap_or(champion.pos);
        let destination = view.tile(end);
        let intent = TileIntent {
            claim_tile: destination.is_some_and(|tile| {
                tile.kind == Some(TileKind::Resource)
                    && tile.claimed_by.is_none()
                    && me.claims < me.max_claims as usize
            }),
            visit_temple: me.fame >= 4
                && destination.is_some_and(|tile| tile.kind == Some(TileKind::Temple)),
            adventure_pile: Some(self.pick(3) as u8),
            ..TileIntent::default()
        };
        Ok(Action::MoveChampion { die, champion: champion.id, path, intent })
    }

    fn request_decision(
        &mut self,
        _view: &GameView,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse, AgentError> {
        let response = match request {
            DecisionRequest::ItemToDrop { carried, .. } => {
                let choice = self.pick(carried.len() + 1);
                DecisionResponse::DropItem(if choice < carried.len() {
                    ItemDrop::Carried(choice)
                } else {
                    ItemDrop::Found
                })
            }
            DecisionRequest::TargetPlayer { candidates, .. } => {
                let Some(target) = candidates.get(self.pick(candidates.len())) else {
                    return Err(AgentError::Unsupported {
                        agent: self.name.clone(),
                        request: "a target request without candidates".to_string(),
                    });
                };
                DecisionResponse::TargetPlayer(target.clone())
            }
            DecisionRequest::MarketDay { .. } => {
                let give = Resource::ALL[self.pick(Resource::ALL.len())];
                let receive = Resource::ALL[self.pick(Resource::ALL.len())];
                DecisionResponse::MarketDay(if give == receive {
                    MarketDayChoice::Pass
                } else {
                    MarketDayChoice::Trade(TradeOffer { give, receive })
                })
            }
            DecisionRequest::YesNo { .. } => DecisionResponse::YesNo(self.pick(2) == 0),
        };
        Ok(response)
    }
}

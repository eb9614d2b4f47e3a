//! Fights between champions, monsters and the dragon.
//! Every loser's consequences (sent home, healing paid) are applied here so
//! callers only decide what happens to the tile afterwards.

use serde::Serialize;
use tracing::debug;

use crate::config::GameConfig;
use crate::content::{ContentPack, Monster};
use crate::dice::RollSource;
use crate::state::{GameState, HealingCost};
use crate::types::{ChampionId, PlayerId, ResourceBag, VictoryKind};
use crate::victory;

/// Might a champion brings to a fight: the owner's might plus carried items
/// and followers. Beast-only followers help only against beasts.
pub fn champion_might(
    state: &GameState,
    content: &ContentPack,
    player: PlayerId,
    champion: ChampionId,
    opponent: Option<&Monster>,
) -> u32 {
    let Some(owner) = state.players.get(player) else {
        return 0;
    };
    let Some(champion) = owner.champion(champion) else {
        return owner.might;
    };
    let against_beast = opponent.is_some_and(|monster| monster.beast);
    let items: u32 = champion.items.iter().map(|key| content.item_might_bonus(key)).sum();
    let followers: u32 = champion
        .followers
        .iter()
        .filter_map(|key| content.follower(key))
        .filter(|follower| !follower.beasts_only || against_beast)
        .map(|follower| follower.might_bonus)
        .sum();
    owner.might + items + followers
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DuelRound {
    pub attacker_roll: u8,
    pub defender_roll: u8,
    pub attacker_total: u32,
    pub defender_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuelOutcome {
    pub attacker: String,
    pub defender: String,
    /// Every exchange, tied ones included. The last one is decisive.
    pub rounds: Vec<DuelRound>,
    pub attacker_won: bool,
    pub fame_awarded: u32,
    pub healing: HealingCost,
}

impl DuelOutcome {
    pub fn ties(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }
}

/// Champion against champion. Exact ties are rerolled until broken.
pub fn duel(
    state: &mut GameState,
    content: &ContentPack,
    config: &GameConfig,
    rolls: &mut dyn RollSource,
    attacker: (PlayerId, ChampionId),
    defender: (PlayerId, ChampionId),
) -> DuelOutcome {
    let attacker_might = champion_might(state, content, attacker.0, attacker.1, None);
    let defender_might = champion_might(state, content, defender.0, defender.1, None);

    let mut rounds = Vec::new();
    let attacker_won = loop {
        let attacker_roll = rolls.roll_d3();
        let defender_roll = rolls.roll_d3();
        let round = DuelRound {
            attacker_roll,
            defender_roll,
            attacker_total: attacker_might + u32::from(attacker_roll),
            defender_total: defender_might + u32::from(defender_roll),
        };
        rounds.push(round);
        if round.attacker_total != round.defender_total {
            break round.attacker_total > round.defender_total;
        }
        debug!(
            attacker = round.attacker_total,
            defender = round.defender_total,
            "duel tied, rerolling"
        );
    };

    let (winner, loser) = if attacker_won { (attacker, defender) } else { (defender, attacker) };
    if let Some(player) = state.players.get_mut(winner.0) {
        player.fame += config.champion_victory_fame;
    }
    let healing = defeat(state, loser.0, loser.1);

    DuelOutcome {
        attacker: state.player_name(attacker.0),
        defender: state.player_name(defender.0),
        rounds,
        attacker_won,
        fame_awarded: config.champion_victory_fame,
        healing,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonsterFight {
    pub monster: Monster,
    pub champion_might: u32,
    pub roll: u8,
    pub won: bool,
    pub fame_gained: u32,
    pub reward: ResourceBag,
    pub healing: Option<HealingCost>,
}

/// Champion against a monster. Ties favour the champion.
pub fn fight_monster(
    state: &mut GameState,
    content: &ContentPack,
    rolls: &mut dyn RollSource,
    player: PlayerId,
    champion: ChampionId,
    monster: Monster,
) -> MonsterFight {
    let might = champion_might(state, content, player, champion, Some(&monster));
    let roll = rolls.roll_d3();
    let won = might + u32::from(roll) >= monster.might;
    let mut fight = MonsterFight {
        monster,
        champion_might: might,
        roll,
        won,
        fame_gained: 0,
        reward: ResourceBag::default(),
        healing: None,
    };
    if won {
        if let Some(owner) = state.players.get_mut(player) {
            owner.fame += monster.fame;
            owner.resources.add(monster.reward);
        }
        fight.fame_gained = monster.fame;
        fight.reward = monster.reward;
    } else {
        fight.healing = Some(defeat(state, player, champion));
    }
    fight
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DragonFight {
    /// A victory threshold was already met; no dice are rolled.
    ThresholdMet(VictoryKind),
    Fought {
        champion_might: u32,
        roll: u8,
        dragon_roll: u8,
        dragon_might: u32,
        won: bool,
        healing: Option<HealingCost>,
    },
}

pub fn fight_dragon(
    state: &mut GameState,
    content: &ContentPack,
    config: &GameConfig,
    rolls: &mut dyn RollSource,
    player: PlayerId,
    champion: ChampionId,
) -> DragonFight {
    if let Some(kind) = victory::threshold_met(state, config, player) {
        return DragonFight::ThresholdMet(kind);
    }
    let dragon_roll = rolls.roll_d3();
    let dragon_might = config.dragon_base_might + u32::from(dragon_roll);
    let might = champion_might(state, content, player, champion, None);
    let roll = rolls.roll_d3();
    let won = might + u32::from(roll) >= dragon_might;
    let healing = if won {
        state.dragon_slayer = Some(player);
        None
    } else {
        Some(defeat(state, player, champion))
    };
    DragonFight::Fought { champion_might: might, roll, dragon_roll, dragon_might, won, healing }
}

fn defeat(state: &mut GameState, player: PlayerId, champion: ChampionId) -> HealingCost {
    state.send_champion_home(player, champion);
    state.players.get_mut(player).map_or(HealingCost::Nothing, |owner| owner.pay_healing_cost())
}

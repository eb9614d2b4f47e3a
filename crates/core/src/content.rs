//! Static card and monster tables. The engine only reads these.

use std::hash::Hasher;

use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::types::{ItemKey, ResourceBag, Tier};

pub mod keys {
    pub const MONSTER_WOLF: &str = "monster_wolf";
    pub const MONSTER_GOBLIN: &str = "monster_goblin";
    pub const MONSTER_BANDIT: &str = "monster_bandit";
    pub const MONSTER_GIANT_RAT: &str = "monster_giant_rat";
    pub const MONSTER_TROLL: &str = "monster_troll";
    pub const MONSTER_OGRE: &str = "monster_ogre";
    pub const MONSTER_CAVE_BEAR: &str = "monster_cave_bear";
    pub const MONSTER_WRAITH: &str = "monster_wraith";
    pub const MONSTER_DRAKE: &str = "monster_drake";
    pub const MONSTER_LICH: &str = "monster_lich";

    pub const TREASURE_PURSE: &str = "treasure_purse";
    pub const TREASURE_CHEST: &str = "treasure_chest";
    pub const TREASURE_LAUREL: &str = "treasure_laurel";
    pub const ITEM_RUSTY_SWORD: &str = "item_rusty_sword";
    pub const ITEM_IRON_SHIELD: &str = "item_iron_shield";
    pub const ITEM_RUNE_BLADE: &str = "item_rune_blade";
    pub const ITEM_DRAGONBANE: &str = "item_dragonbane";

    pub const EVENT_HUNGRY_PESTS: &str = "event_hungry_pests";
    pub const EVENT_THIEF: &str = "event_thief";
    pub const EVENT_MARKET_DAY: &str = "event_market_day";
    pub const EVENT_SUDDEN_STORM: &str = "event_sudden_storm";
    pub const EVENT_LANDSLIDE: &str = "event_landslide";

    pub const ENCOUNTER_OLD_SAGE: &str = "encounter_old_sage";
    pub const ENCOUNTER_LOST_CARAVAN: &str = "encounter_lost_caravan";
    pub const ENCOUNTER_WANDERING_MERCENARY: &str = "encounter_wandering_mercenary";

    pub const FOLLOWER_SQUIRE: &str = "follower_squire";
    pub const FOLLOWER_HOUND: &str = "follower_hound";
    pub const FOLLOWER_BATTLE_MAGE: &str = "follower_battle_mage";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Monster {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: Tier,
    pub might: u32,
    pub fame: u32,
    pub reward: ResourceBag,
    pub beast: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Biome {
    Plains,
    Forest,
    Mountain,
    Desert,
    Swamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EventKind {
    HungryPests { food_loss: u32 },
    Thief { gold_loss: u32 },
    MarketDay,
    SuddenStorm,
    Landslide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TreasureEffect {
    Gold(u32),
    Fame(u32),
    Carriable { might_bonus: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EncounterKind {
    Fame(u32),
    Resources(ResourceBag),
    WanderingMercenary { gold_cost: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Follower {
    pub might_bonus: u32,
    pub beasts_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CardKind {
    Monster(Monster),
    Event(EventKind),
    Treasure(TreasureEffect),
    Encounter(EncounterKind),
    Follower(Follower),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: Tier,
    pub biome: Biome,
    pub kind: CardKind,
}

#[derive(Clone, Debug)]
pub struct ContentPack {
    pub cards: Vec<Card>,
}

const fn monster(
    id: &'static str,
    name: &'static str,
    tier: Tier,
    might: u32,
    fame: u32,
    reward: ResourceBag,
    beast: bool,
) -> Monster {
    Monster { id, name, tier, might, fame, reward, beast }
}

pub const WOLF: Monster =
    monster(keys::MONSTER_WOLF, "Wolf", Tier::One, 3, 1, ResourceBag::new(1, 0, 0, 0), true);
pub const GOBLIN: Monster =
    monster(keys::MONSTER_GOBLIN, "Goblin", Tier::One, 4, 1, ResourceBag::new(0, 0, 0, 1), false);
pub const BANDIT: Monster =
    monster(keys::MONSTER_BANDIT, "Bandit", Tier::One, 4, 1, ResourceBag::new(0, 0, 0, 2), false);
pub const GIANT_RAT: Monster = monster(
    keys::MONSTER_GIANT_RAT,
    "Giant Rat",
    Tier::One,
    2,
    1,
    ResourceBag::new(0, 0, 0, 0),
    true,
);
pub const TROLL: Monster =
    monster(keys::MONSTER_TROLL, "Troll", Tier::Two, 6, 2, ResourceBag::new(0, 0, 2, 0), false);
pub const OGRE: Monster =
    monster(keys::MONSTER_OGRE, "Ogre", Tier::Two, 7, 2, ResourceBag::new(0, 2, 0, 1), false);
pub const CAVE_BEAR: Monster = monster(
    keys::MONSTER_CAVE_BEAR,
    "Cave Bear",
    Tier::Two,
    6,
    2,
    ResourceBag::new(2, 0, 0, 0),
    true,
);
pub const WRAITH: Monster =
    monster(keys::MONSTER_WRAITH, "Wraith", Tier::Three, 8, 3, ResourceBag::new(0, 0, 0, 2), false);
pub const DRAKE: Monster =
    monster(keys::MONSTER_DRAKE, "Drake", Tier::Three, 9, 4, ResourceBag::new(0, 0, 2, 3), true);
pub const LICH: Monster =
    monster(keys::MONSTER_LICH, "Lich", Tier::Three, 10, 5, ResourceBag::new(0, 0, 0, 4), false);

fn card(id: &'static str, name: &'static str, tier: Tier, biome: Biome, kind: CardKind) -> Card {
    Card { id, name, tier, biome, kind }
}

fn monster_card(monster: Monster, biome: Biome) -> Card {
    card(monster.id, monster.name, monster.tier, biome, CardKind::Monster(monster))
}

impl ContentPack {
    pub fn build_default() -> Self {
        use Biome::*;

        let cards = vec![
            // Tier one
            monster_card(WOLF, Forest),
            monster_card(WOLF, Plains),
            monster_card(GOBLIN, Mountain),
            monster_card(BANDIT, Plains),
            monster_card(GIANT_RAT, Swamp),
            card(
                keys::TREASURE_PURSE,
                "Lost Purse",
                Tier::One,
                Plains,
                CardKind::Treasure(TreasureEffect::Gold(2)),
            ),
            card(
                keys::ITEM_RUSTY_SWORD,
                "Rusty Sword",
                Tier::One,
                Mountain,
                CardKind::Treasure(TreasureEffect::Carriable { might_bonus: 1 }),
            ),
            card(
                keys::ITEM_IRON_SHIELD,
                "Iron Shield",
                Tier::One,
                Forest,
                CardKind::Treasure(TreasureEffect::Carriable { might_bonus: 1 }),
            ),
            card(
                keys::EVENT_HUNGRY_PESTS,
                "Hungry Pests",
                Tier::One,
                Plains,
                CardKind::Event(EventKind::HungryPests { food_loss: 1 }),
            ),
            card(
                keys::EVENT_MARKET_DAY,
                "Market Day",
                Tier::One,
                Plains,
                CardKind::Event(EventKind::MarketDay),
            ),
            card(
                keys::ENCOUNTER_OLD_SAGE,
                "Old Sage",
                Tier::One,
                Forest,
                CardKind::Encounter(EncounterKind::Fame(1)),
            ),
            card(
                keys::FOLLOWER_HOUND,
                "Hunting Hound",
                Tier::One,
                Forest,
                CardKind::Follower(Follower { might_bonus: 2, beasts_only: true }),
            ),
            // Tier two
            monster_card(TROLL, Mountain),
            monster_card(OGRE, Swamp),
            monster_card(CAVE_BEAR, Forest),
            monster_card(GOBLIN, Mountain),
            card(
                keys::TREASURE_CHEST,
                "Buried Chest",
                Tier::Two,
                Desert,
                CardKind::Treasure(TreasureEffect::Gold(4)),
            ),
            card(
                keys::ITEM_RUNE_BLADE,
                "Rune Blade",
                Tier::Two,
                Mountain,
                CardKind::Treasure(TreasureEffect::Carriable { might_bonus: 2 }),
            ),
            card(
                keys::EVENT_THIEF,
                "Thief in the Night",
                Tier::Two,
                Swamp,
                CardKind::Event(EventKind::Thief { gold_loss: 2 }),
            ),
            card(
                keys::EVENT_SUDDEN_STORM,
                "Sudden Storm",
                Tier::Two,
                Desert,
                CardKind::Event(EventKind::SuddenStorm),
            ),
            card(
                keys::ENCOUNTER_LOST_CARAVAN,
                "Lost Caravan",
                Tier::Two,
                Desert,
                CardKind::Encounter(EncounterKind::Resources(ResourceBag::new(1, 1, 1, 0))),
            ),
            card(
                keys::ENCOUNTER_WANDERING_MERCENARY,
                "Wandering Mercenary",
                Tier::Two,
                Plains,
                CardKind::Encounter(EncounterKind::WanderingMercenary { gold_cost: 2 }),
            ),
            card(
                keys::FOLLOWER_SQUIRE,
                "Loyal Squire",
                Tier::Two,
                Plains,
                CardKind::Follower(Follower { might_bonus: 1, beasts_only: false }),
            ),
            // Tier three
            monster_card(WRAITH, Swamp),
            monster_card(DRAKE, Mountain),
            monster_card(LICH, Desert),
            monster_card(TROLL, Mountain),
            card(
                keys::TREASURE_LAUREL,
                "Hero's Laurel",
                Tier::Three,
                Plains,
                CardKind::Treasure(TreasureEffect::Fame(2)),
            ),
            card(
                keys::ITEM_DRAGONBANE,
                "Dragonbane",
                Tier::Three,
                Mountain,
                CardKind::Treasure(TreasureEffect::Carriable { might_bonus: 3 }),
            ),
            card(
                keys::EVENT_LANDSLIDE,
                "Landslide",
                Tier::Three,
                Mountain,
                CardKind::Event(EventKind::Landslide),
            ),
            card(
                keys::EVENT_THIEF,
                "Thief in the Night",
                Tier::Three,
                Swamp,
                CardKind::Event(EventKind::Thief { gold_loss: 3 }),
            ),
            card(
                keys::ENCOUNTER_OLD_SAGE,
                "Old Sage",
                Tier::Three,
                Forest,
                CardKind::Encounter(EncounterKind::Fame(2)),
            ),
            card(
                keys::FOLLOWER_BATTLE_MAGE,
                "Battle Mage",
                Tier::Three,
                Desert,
                CardKind::Follower(Follower { might_bonus: 2, beasts_only: false }),
            ),
        ];
        Self { cards }
    }

    /// Identifies the card list a journal was recorded against.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for card in &self.cards {
            hasher.write(card.id.as_bytes());
            hasher.write_u8(card.tier.index() as u8);
        }
        hasher.finish()
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn card_indices_for_tier(&self, tier: Tier) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.tier == tier)
            .map(|(index, _)| index)
            .collect()
    }

    /// Might granted by a carried item; unknown keys grant nothing.
    pub fn item_might_bonus(&self, key: &str) -> u32 {
        self.cards
            .iter()
            .find_map(|card| match card.kind {
                CardKind::Treasure(TreasureEffect::Carriable { might_bonus }) if card.id == key => {
                    Some(might_bonus)
                }
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn follower(&self, key: &str) -> Option<Follower> {
        self.cards.iter().find_map(|card| match card.kind {
            CardKind::Follower(follower) if card.id == key => Some(follower),
            _ => None,
        })
    }

    /// Resolves a free-form item name from an agent to the static key.
    pub fn item_key(&self, name: &str) -> Option<ItemKey> {
        self.cards
            .iter()
            .find(|card| {
                matches!(card.kind, CardKind::Treasure(TreasureEffect::Carriable { .. }))
                    && card.id == name
            })
            .map(|card| card.id)
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

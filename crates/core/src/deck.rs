//! Tiered adventure decks: three piles per tier, reshuffled when a tier runs dry.

use crate::content::ContentPack;
use crate::dice::RollSource;
use crate::types::{ItemKey, Tier};

pub const PILES_PER_TIER: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierDeck {
    /// Card indices into `ContentPack::cards`; the top of a pile is its last element.
    pub piles: [Vec<usize>; PILES_PER_TIER],
}

impl TierDeck {
    pub fn is_exhausted(&self) -> bool {
        self.piles.iter().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.piles.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decks {
    pub tiers: [TierDeck; 3],
    pub reshuffles: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawnCard {
    pub index: usize,
    pub pile: usize,
    pub reshuffled: bool,
}

impl Decks {
    pub fn build(content: &ContentPack, rolls: &mut dyn RollSource) -> Self {
        let mut decks = Decks::default();
        for tier in Tier::ALL {
            decks.deal_tier(content, tier, &[], rolls);
        }
        decks
    }

    fn deal_tier(
        &mut self,
        content: &ContentPack,
        tier: Tier,
        in_play: &[ItemKey],
        rolls: &mut dyn RollSource,
    ) {
        // One copy is held back per card in play; duplicates share an id.
        let mut held = in_play.to_vec();
        let mut cards: Vec<usize> = content
            .card_indices_for_tier(tier)
            .into_iter()
            .filter(|&index| {
                let Some(card) = content.card(index) else {
                    return false;
                };
                match held.iter().position(|id| *id == card.id) {
                    Some(found) => {
                        held.swap_remove(found);
                        false
                    }
                    None => true,
                }
            })
            .collect();
        shuffle(&mut cards, rolls);
        let deck = &mut self.tiers[tier.index()];
        deck.piles = Default::default();
        for (position, card) in cards.into_iter().enumerate() {
            deck.piles[position % PILES_PER_TIER].push(card);
        }
    }

    /// Draws the top card of `preferred` (or the next non-empty pile after it).
    /// An exhausted tier is rebuilt from every card of that tier except those
    /// named in `in_play`.
    pub fn draw(
        &mut self,
        content: &ContentPack,
        tier: Tier,
        preferred: usize,
        in_play: &[ItemKey],
        rolls: &mut dyn RollSource,
    ) -> Option<DrawnCard> {
        let mut reshuffled = false;
        if self.tiers[tier.index()].is_exhausted() {
            self.deal_tier(content, tier, in_play, rolls);
            self.reshuffles += 1;
            reshuffled = true;
        }
        let deck = &mut self.tiers[tier.index()];
        let start = preferred % PILES_PER_TIER;
        (0..PILES_PER_TIER).map(|offset| (start + offset) % PILES_PER_TIER).find_map(|pile| {
            deck.piles[pile].pop().map(|index| DrawnCard { index, pile, reshuffled })
        })
    }
}

fn shuffle(cards: &mut [usize], rolls: &mut dyn RollSource) {
    for i in (1..cards.len()).rev() {
        let j = rolls.next_index(i + 1);
        cards.swap(i, j);
    }
}

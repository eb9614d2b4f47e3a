//! Stable snapshot hashing for deterministic verification.
//! Players are hashed in turn order so slot keys never leak into the value.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.next_input_seq);
        hasher.write_u32(self.state.round);
        hasher.write_usize(self.state.current);

        for id in &self.state.turn_order {
            let Some(player) = self.state.players.get(*id) else {
                continue;
            };
            hasher.write(player.name.as_bytes());
            hasher.write_u32(player.fame);
            hasher.write_u32(player.might);
            for resource in Resource::ALL {
                hasher.write_u32(player.resources.get(resource));
            }
            for champion in &player.champions {
                hasher.write_u8(champion.id);
                hash_pos(&mut hasher, champion.pos);
                for item in champion.items.iter().chain(&champion.followers) {
                    hasher.write(item.as_bytes());
                }
            }
            for boat in &player.boats {
                hasher.write_u8(boat.id);
                hasher.write_u8(boat.zone as u8);
            }
        }

        for tile in &self.state.board.tiles {
            hasher.write_u8(u8::from(tile.explored));
            hasher.write_u8(tile.adventure_tokens);
            let owner = tile.claimed_by.and_then(|id| self.seat_of(id));
            hasher.write_usize(owner.map_or(0, |seat| seat + 1));
            if let Some(monster) = &tile.monster {
                hasher.write(monster.id.as_bytes());
            }
            for item in &tile.items {
                hasher.write(item.as_bytes());
            }
        }

        for deck in &self.state.decks.tiers {
            for pile in &deck.piles {
                hasher.write_usize(pile.len());
                for card in pile {
                    hasher.write_usize(*card);
                }
            }
        }
        hasher.write_u32(self.state.decks.reshuffles);

        hasher.write_usize(self.log.len());
        if let Some(turn) = &self.turn {
            for die in turn.pool.remaining() {
                hasher.write_u8(*die);
            }
        }
        let slayer = self.state.dragon_slayer.and_then(|id| self.seat_of(id));
        hasher.write_usize(slayer.map_or(0, |seat| seat + 1));
        if let Some(victory) = &self.state.winner {
            hasher.write(victory.winner_name.as_bytes());
            hasher.write_u8(victory.kind as u8);
        }
        hasher.finish()
    }

    fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.state.turn_order.iter().position(|id| *id == player)
    }
}

fn hash_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.y);
    hasher.write_i32(pos.x);
}

use glam::Vec2;
use horde_core::{Event, Item, NpcVariant};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FIRE_CORE_CHANCE: f64 = 0.75;
const KILL_DROPS: [(Item, f64); 3] = [(Item::Core, 0.1), (Item::Flesh, 0.8), (Item::Teeth, 0.4)];
const SHELF_CHANCE: f64 = 0.2;

/// Item left in the arena for the player to collect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootDrop {
    /// Item dropped.
    pub item: Item,
    /// Where the item lies.
    pub position: Vec2,
}

/// Rolls item drops for kills, destroyed obstacles and searched shelves.
#[derive(Debug)]
pub struct LootTable {
    rng: ChaCha8Rng,
}

impl LootTable {
    /// Creates a loot table drawing rolls from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Appends the drops produced by `events` to `out`, in event order.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<LootDrop>) {
        for event in events {
            match *event {
                Event::NpcKilled {
                    position, variant, ..
                } => self.roll_kill(position, variant, out),
                Event::ObstacleDestroyed {
                    material, center, ..
                } => out.push(LootDrop {
                    item: material.salvage(),
                    position: center,
                }),
                Event::ShelfSearched { center, .. } => self.roll_shelf(center, out),
                _ => {}
            }
        }
    }

    fn roll_kill(&mut self, position: Vec2, variant: NpcVariant, out: &mut Vec<LootDrop>) {
        if variant == NpcVariant::Fire && self.rng.gen_bool(FIRE_CORE_CHANCE) {
            out.push(LootDrop {
                item: Item::FireCore,
                position,
            });
        }
        for (item, chance) in KILL_DROPS {
            if self.rng.gen_bool(chance) {
                out.push(LootDrop { item, position });
            }
        }
    }

    fn roll_shelf(&mut self, position: Vec2, out: &mut Vec<LootDrop>) {
        if !self.rng.gen_bool(SHELF_CHANCE) {
            return;
        }
        if let Some(&item) = Item::CRAFTING_MATERIALS.choose(&mut self.rng) {
            out.push(LootDrop { item, position });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::{Material, NpcId, ObstacleId};

    fn kill(variant: NpcVariant) -> Event {
        Event::NpcKilled {
            npc: NpcId::new(0),
            position: Vec2::new(5.0, 6.0),
            variant,
        }
    }

    #[test]
    fn destroyed_obstacles_always_drop_salvage() {
        let mut table = LootTable::new(0);
        let mut out = Vec::new();

        table.handle(
            &[Event::ObstacleDestroyed {
                obstacle: ObstacleId::new(3),
                material: Material::Steel,
                center: Vec2::new(60.0, 20.0),
            }],
            &mut out,
        );

        assert_eq!(
            out,
            vec![LootDrop {
                item: Item::SteelPlates,
                position: Vec2::new(60.0, 20.0),
            }]
        );
    }

    #[test]
    fn only_fire_variants_drop_fire_cores() {
        let mut table = LootTable::new(17);
        let mut normal = Vec::new();
        let mut fire = Vec::new();

        for _ in 0..200 {
            table.handle(&[kill(NpcVariant::Normal)], &mut normal);
            table.handle(&[kill(NpcVariant::Fire)], &mut fire);
        }

        assert!(normal.iter().all(|drop| drop.item != Item::FireCore));
        let cores = fire
            .iter()
            .filter(|drop| drop.item == Item::FireCore)
            .count();
        assert!((110..=190).contains(&cores), "fire cores: {cores}");
        assert!(fire.iter().all(|drop| drop.position == Vec2::new(5.0, 6.0)));
    }

    #[test]
    fn kill_drop_rates_follow_the_table() {
        let mut table = LootTable::new(99);
        let mut out = Vec::new();
        for _ in 0..1000 {
            table.handle(&[kill(NpcVariant::Normal)], &mut out);
        }

        let count = |item: Item| out.iter().filter(|drop| drop.item == item).count();
        assert!((50..=150).contains(&count(Item::Core)));
        assert!((740..=860).contains(&count(Item::Flesh)));
        assert!((340..=460).contains(&count(Item::Teeth)));
    }

    #[test]
    fn shelves_rarely_yield_crafting_materials() {
        let mut table = LootTable::new(5);
        let mut out = Vec::new();
        for index in 0..500 {
            table.handle(
                &[Event::ShelfSearched {
                    obstacle: ObstacleId::new(index),
                    center: Vec2::ZERO,
                }],
                &mut out,
            );
        }

        assert!((60..=140).contains(&out.len()), "shelf drops: {}", out.len());
        assert!(out
            .iter()
            .all(|drop| Item::CRAFTING_MATERIALS.contains(&drop.item)));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick entry point that wires the world and the pure systems together.
//!
//! Each call to [`Simulation::step`] advances time, moves the player, runs
//! the behavior state machine, resolves combat, advances projectiles, spawns
//! waves and rolls loot, in that order. Events produced along the way are
//! handed to an [`Observer`] once the tick has been fully resolved.

use glam::Vec2;
use horde_core::{
    ArenaBounds, Command, Equipment, Event, Health, Material, NpcId, NpcVariant, ObstacleId,
    ObstaclePlacement, PlayerInput, ProjectileKind, Rect, SearchError,
};
use horde_system_behavior::Behavior;
use horde_system_combat::{Combat, LootDrop, LootTable};
use horde_system_spawning::{self as spawning, Spawning};
use horde_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const LAYOUT_STREAM: u64 = 1;
const PLACEMENT_STREAM: u64 = 2;
const BEHAVIOR_STREAM: u64 = 3;
const SPAWNING_STREAM: u64 = 4;
const LOOT_STREAM: u64 = 5;

/// Tunable parameters of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed every random stream is derived from.
    pub seed: u64,
    /// Arena width in world units.
    pub arena_width: f32,
    /// Arena height in world units.
    pub arena_height: f32,
    /// NPCs per wave.
    pub wave_size: u32,
    /// Ticks between waves; zero spawns only the opening wave.
    pub wave_interval_ticks: u32,
    /// Probability that a spawned NPC is the fire variant.
    pub fire_variant_chance: f64,
    /// Equipment the player starts with.
    pub starting_equipment: Equipment,
}

impl Config {
    /// Arena bounds described by the configuration.
    #[must_use]
    pub fn bounds(&self) -> ArenaBounds {
        ArenaBounds::new(self.arena_width, self.arena_height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            arena_width: 2400.0,
            arena_height: 1600.0,
            wave_size: 5,
            wave_interval_ticks: 600,
            fire_variant_chance: 0.2,
            starting_equipment: Equipment::default(),
        }
    }
}

/// Receives gameplay callbacks after each tick, in event order.
pub trait Observer {
    /// An NPC died at `position`.
    fn on_kill(&mut self, _npc: NpcId, _position: Vec2, _variant: NpcVariant) {}

    /// An obstacle was destroyed; its salvage lies at `center`.
    fn on_obstacle_destroyed(
        &mut self,
        _obstacle: ObstacleId,
        _material: Material,
        _center: Vec2,
    ) {
    }

    /// The player was struck and has `remaining` health left.
    fn on_player_hit(&mut self, _remaining: Health) {}
}

impl Observer for () {}

/// Authoritative world plus the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    behavior: Behavior,
    combat: Combat,
    spawning: Spawning,
    loot: LootTable,
    pending: Vec<Event>,
    // Shelf search events whose loot was rolled when the search happened.
    searched: Vec<Event>,
    events: Vec<Event>,
    commands: Vec<Command>,
    drops: Vec<LootDrop>,
}

impl Simulation {
    /// Creates a simulation on a freshly generated store layout.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(stream_seed(config.seed, LAYOUT_STREAM));
        let layout = spawning::generate_store_layout(config.bounds(), &mut rng);
        Self::from_layout(config, layout)
    }

    /// Creates a simulation on the provided obstacle layout.
    #[must_use]
    pub fn from_layout(config: &Config, obstacles: Vec<ObstaclePlacement>) -> Self {
        let seed = config.seed;
        let mut simulation = Self {
            world: World::new(),
            behavior: Behavior::new(stream_seed(seed, BEHAVIOR_STREAM)),
            combat: Combat::new(),
            spawning: Spawning::new(spawning::Config::new(
                config.wave_size,
                config.wave_interval_ticks,
                config.fire_variant_chance,
                stream_seed(seed, SPAWNING_STREAM),
            )),
            loot: LootTable::new(stream_seed(seed, LOOT_STREAM)),
            pending: Vec::new(),
            searched: Vec::new(),
            events: Vec::new(),
            commands: Vec::new(),
            drops: Vec::new(),
        };

        let bounds = config.bounds();
        simulation.apply(Command::ConfigureArena { bounds, obstacles });

        let rects: Vec<Rect> = query::obstacle_view(&simulation.world)
            .iter()
            .map(|obstacle| obstacle.rect())
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(stream_seed(seed, PLACEMENT_STREAM));
        let position = spawning::random_open_position(bounds, &rects, &mut rng);
        simulation.apply(Command::PlacePlayer {
            position,
            equipment: config.starting_equipment,
        });
        log::info!(
            "arena {}x{} ready with {} obstacles",
            bounds.width(),
            bounds.height(),
            rects.len()
        );

        simulation
    }

    /// Applies a command outside the tick loop.
    ///
    /// The resulting events are delivered to the systems with the next tick.
    pub fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }

    /// Advances the simulation by one tick without callbacks.
    pub fn step(&mut self, input: &PlayerInput) -> &[Event] {
        self.step_with(input, &mut ())
    }

    /// Advances the simulation by one tick and reports to `observer`.
    ///
    /// Returns every event produced during the tick, including those of
    /// commands applied since the previous tick.
    pub fn step_with<O: Observer + ?Sized>(
        &mut self,
        input: &PlayerInput,
        observer: &mut O,
    ) -> &[Event] {
        self.events.clear();
        self.events.append(&mut self.searched);
        let rolled = self.events.len();
        self.events.append(&mut self.pending);
        self.drops.clear();

        world::apply(&mut self.world, Command::Tick, &mut self.events);
        world::apply(
            &mut self.world,
            Command::MovePlayer {
                movement: input.movement,
                facing: input.facing,
            },
            &mut self.events,
        );

        let player = query::player(&self.world);
        self.behavior.handle(
            &self.events,
            &query::npc_view(&self.world),
            player.as_ref(),
            &query::obstacle_view(&self.world),
            query::bounds(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        let player = query::player(&self.world);
        self.combat.handle(
            &self.events,
            input,
            player.as_ref(),
            &query::npc_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(&mut self.world, Command::StepProjectiles, &mut self.events);

        self.spawning.handle(
            &self.events,
            query::bounds(&self.world),
            &query::obstacle_view(&self.world),
            &mut self.commands,
        );
        let spawned = self.commands.len();
        self.flush_commands();
        if spawned > 0 {
            log::info!(
                "wave of {spawned} npcs entered at tick {}",
                query::tick(&self.world)
            );
        }

        self.loot.handle(&self.events[rolled..], &mut self.drops);

        for event in &self.events {
            match *event {
                Event::NpcKilled {
                    npc,
                    position,
                    variant,
                } => observer.on_kill(npc, position, variant),
                Event::ObstacleDestroyed {
                    obstacle,
                    material,
                    center,
                } => observer.on_obstacle_destroyed(obstacle, material, center),
                Event::PlayerHit { remaining, .. } => observer.on_player_hit(remaining),
                _ => {}
            }
        }

        &self.events
    }

    /// Searches a shelf and returns the loot it yielded.
    ///
    /// The search events reach the systems with the next tick but do not
    /// roll loot again.
    pub fn search_shelf(&mut self, obstacle: ObstacleId) -> Result<Vec<LootDrop>, SearchError> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SearchShelf { obstacle },
            &mut events,
        );
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::ShelfSearchRejected { reason, .. } => Some(*reason),
            _ => None,
        }) {
            return Err(reason);
        }

        let mut drops = Vec::new();
        self.loot.handle(&events, &mut drops);
        self.searched.extend(events);
        Ok(drops)
    }

    /// Loot dropped during the most recent tick.
    #[must_use]
    pub fn drops(&self) -> &[LootDrop] {
        &self.drops
    }

    /// Where a projectile fired now from the player's equipment would stop.
    #[must_use]
    pub fn aim_preview(&self) -> Option<Vec2> {
        let player = query::player(&self.world)?;
        let kind = match player.equipment {
            Equipment::Bow => ProjectileKind::Arrow,
            Equipment::FireballSpell { .. } => ProjectileKind::Fireball,
            Equipment::Unarmed | Equipment::Melee { .. } => return None,
        };
        query::aim_preview(&self.world, player.position, player.facing, kind)
    }

    /// Whether the player has died or was never placed.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::player(&self.world).map_or(true, |player| player.health.is_depleted())
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

fn stream_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_distinct() {
        let seeds: Vec<u64> = [
            LAYOUT_STREAM,
            PLACEMENT_STREAM,
            BEHAVIOR_STREAM,
            SPAWNING_STREAM,
            LOOT_STREAM,
        ]
        .into_iter()
        .map(|stream| stream_seed(42, stream))
        .collect();

        for (index, seed) in seeds.iter().enumerate() {
            assert!(!seeds[index + 1..].contains(seed));
        }
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: Config = toml::from_str("seed = 7\nwave_size = 2").expect("config parses");

        assert_eq!(config.seed, 7);
        assert_eq!(config.wave_size, 2);
        assert_eq!(config.arena_width, 2400.0);
        assert_eq!(config.starting_equipment, Equipment::default());
    }

    #[test]
    fn equipment_parses_from_tables() {
        let config: Config = toml::from_str(
            "[starting_equipment]\nkind = \"fireball_spell\"\nlevel = 3",
        )
        .expect("config parses");

        assert_eq!(
            config.starting_equipment,
            Equipment::FireballSpell { level: 3 }
        );
    }
}

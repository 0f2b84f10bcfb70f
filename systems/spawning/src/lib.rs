#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system: arena layouts, the spawn door and NPC waves.

mod layout;

pub use layout::generate_store_layout;

use glam::Vec2;
use horde_core::{
    geometry::circles_overlap, ArenaBounds, Command, Event, NpcVariant, ObstacleView, Rect,
    NPC_RADIUS, PLACEMENT_ATTEMPTS, TILE_SIZE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    wave_size: u32,
    wave_interval_ticks: u32,
    fire_variant_chance: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// A zero interval spawns only the opening wave. The fire chance is
    /// clamped to `[0, 1]`.
    #[must_use]
    pub const fn new(
        wave_size: u32,
        wave_interval_ticks: u32,
        fire_variant_chance: f64,
        rng_seed: u64,
    ) -> Self {
        Self {
            wave_size,
            wave_interval_ticks,
            fire_variant_chance,
            rng_seed,
        }
    }
}

/// Pure system that emits NPC waves at the spawn door.
#[derive(Debug)]
pub struct Spawning {
    wave_size: u32,
    wave_interval_ticks: u32,
    fire_variant_chance: f64,
    rng: ChaCha8Rng,
    next_wave: Option<u32>,
    door: Option<Vec2>,
    obstacle_rects: Vec<Rect>,
    placed: Vec<Vec2>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let chance = config.fire_variant_chance;
        let fire_variant_chance = if (0.0..=1.0).contains(&chance) {
            chance
        } else if chance > 1.0 {
            1.0
        } else {
            0.0
        };

        Self {
            wave_size: config.wave_size,
            wave_interval_ticks: config.wave_interval_ticks,
            fire_variant_chance,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            next_wave: Some(0),
            door: None,
            obstacle_rects: Vec::new(),
            placed: Vec::new(),
        }
    }

    /// Door the current arena's waves enter through, once chosen.
    #[must_use]
    pub fn door(&self) -> Option<Vec2> {
        self.door
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// A configured arena forgets the door and schedules an opening wave on
    /// the next tick; later waves follow every `wave_interval_ticks` ticks.
    pub fn handle(
        &mut self,
        events: &[Event],
        bounds: ArenaBounds,
        obstacles: &ObstacleView,
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::ArenaConfigured { .. } => {
                    self.door = None;
                    self.next_wave = Some(0);
                }
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }
        if !ticked {
            return;
        }

        match self.next_wave {
            None => {}
            Some(0) => {
                self.obstacle_rects.clear();
                self.obstacle_rects
                    .extend(obstacles.iter().map(|obstacle| obstacle.rect()));
                self.spawn_wave(bounds, out);
                self.next_wave = self.wave_interval_ticks.checked_sub(1);
            }
            Some(remaining) => self.next_wave = Some(remaining - 1),
        }
    }

    fn spawn_wave(&mut self, bounds: ArenaBounds, out: &mut Vec<Command>) {
        let door = match self.door {
            Some(door) => door,
            None => {
                let door = spawn_door(bounds, &self.obstacle_rects, &mut self.rng);
                log::debug!("spawn door placed at ({:.1}, {:.1})", door.x, door.y);
                self.door = Some(door);
                door
            }
        };
        let entry = Vec2::new(
            door.x.max(1.0).min(bounds.width() - 1.0),
            door.y.max(1.0).min(bounds.height() - 1.0),
        );

        self.placed.clear();
        for _ in 0..self.wave_size {
            let mut position = self.near(entry, bounds);
            for _ in 1..PLACEMENT_ATTEMPTS {
                if !self.crowded(position) {
                    break;
                }
                position = self.near(entry, bounds);
            }
            self.placed.push(position);

            let variant = if self.rng.gen_bool(self.fire_variant_chance) {
                NpcVariant::Fire
            } else {
                NpcVariant::Normal
            };
            out.push(Command::SpawnNpc { position, variant });
        }
    }

    /// Uniform point within half a tile of `entry`, kept one unit inside the arena.
    fn near(&mut self, entry: Vec2, bounds: ArenaBounds) -> Vec2 {
        let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
        let distance = self.rng.gen::<f32>() * TILE_SIZE * 0.5;
        let offset = Vec2::from_angle(angle) * distance;
        Vec2::new(
            (entry.x + offset.x).max(1.0).min(bounds.width() - 1.0),
            (entry.y + offset.y).max(1.0).min(bounds.height() - 1.0),
        )
    }

    fn crowded(&self, position: Vec2) -> bool {
        blocked(position, &self.obstacle_rects)
            || self
                .placed
                .iter()
                .any(|&other| circles_overlap(other, position, NPC_RADIUS))
    }
}

/// Picks a point on one of the arena's four edges for NPCs to enter through.
///
/// A candidate is kept when neither the door nor the point one tile inward
/// is blocked by an obstacle; after the bounded attempts the last candidate
/// is used regardless.
pub fn spawn_door<R: Rng>(bounds: ArenaBounds, obstacles: &[Rect], rng: &mut R) -> Vec2 {
    let mut candidate = edge_point(bounds, rng);
    for _ in 1..PLACEMENT_ATTEMPTS {
        let (door, inward) = candidate;
        if !blocked(door, obstacles) && !blocked(inward, obstacles) {
            break;
        }
        candidate = edge_point(bounds, rng);
    }
    candidate.0
}

/// Samples a uniform arena point whose NPC-sized circle avoids the obstacles.
///
/// After the bounded attempts the last sample is accepted even if blocked.
pub fn random_open_position<R: Rng>(
    bounds: ArenaBounds,
    obstacles: &[Rect],
    rng: &mut R,
) -> Vec2 {
    let mut sample = || {
        Vec2::new(
            rng.gen::<f32>() * bounds.width(),
            rng.gen::<f32>() * bounds.height(),
        )
    };
    let mut candidate = sample();
    for _ in 1..PLACEMENT_ATTEMPTS {
        if !blocked(candidate, obstacles) {
            break;
        }
        candidate = sample();
    }
    candidate
}

/// Door point and the point one tile inward from it.
fn edge_point<R: Rng>(bounds: ArenaBounds, rng: &mut R) -> (Vec2, Vec2) {
    let width = bounds.width();
    let height = bounds.height();
    let along = rng.gen::<f32>();
    match rng.gen_range(0..4) {
        0 => (
            Vec2::new(along * width, 0.0),
            Vec2::new(along * width, TILE_SIZE),
        ),
        1 => (
            Vec2::new(along * width, height),
            Vec2::new(along * width, height - TILE_SIZE),
        ),
        2 => (
            Vec2::new(0.0, along * height),
            Vec2::new(TILE_SIZE, along * height),
        ),
        _ => (
            Vec2::new(width, along * height),
            Vec2::new(width - TILE_SIZE, along * height),
        ),
    }
}

fn blocked(position: Vec2, obstacles: &[Rect]) -> bool {
    obstacles
        .iter()
        .any(|rect| rect.overlaps_circle(position, NPC_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::TileCoord;

    fn on_edge(point: Vec2, bounds: ArenaBounds) -> bool {
        point.x == 0.0
            || point.y == 0.0
            || point.x == bounds.width()
            || point.y == bounds.height()
    }

    #[test]
    fn doors_lie_on_the_arena_edge() {
        let bounds = ArenaBounds::new(800.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for _ in 0..100 {
            let door = spawn_door(bounds, &[], &mut rng);
            assert!(on_edge(door, bounds), "door {door:?} is not on an edge");
        }
    }

    #[test]
    fn doors_avoid_walled_edges() {
        let bounds = ArenaBounds::from_tiles(10, 10);
        let walls: Vec<Rect> = (0..10)
            .map(|column| Rect::of_tile(TileCoord::new(column, 0)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        for _ in 0..20 {
            let door = spawn_door(bounds, &walls, &mut rng);
            assert!(door.y > 0.0, "door {door:?} sits in the wall");
            assert!(!blocked(door, &walls));
        }
    }

    #[test]
    fn fully_walled_arenas_still_get_a_door() {
        let bounds = ArenaBounds::from_tiles(2, 2);
        let walls: Vec<Rect> = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .into_iter()
            .map(|(column, row)| Rect::of_tile(TileCoord::new(column, row)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let door = spawn_door(bounds, &walls, &mut rng);

        assert!(on_edge(door, bounds));
    }

    #[test]
    fn open_positions_avoid_obstacles() {
        let bounds = ArenaBounds::from_tiles(5, 5);
        let walls: Vec<Rect> = [(1, 1), (2, 2), (3, 3)]
            .into_iter()
            .map(|(column, row)| Rect::of_tile(TileCoord::new(column, row)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        for _ in 0..50 {
            let position = random_open_position(bounds, &walls, &mut rng);
            assert!(!blocked(position, &walls));
        }
    }

    #[test]
    fn invalid_fire_chances_are_clamped() {
        assert_eq!(Spawning::new(Config::new(1, 1, 4.0, 0)).fire_variant_chance, 1.0);
        assert_eq!(Spawning::new(Config::new(1, 1, -1.0, 0)).fire_variant_chance, 0.0);
        assert_eq!(Spawning::new(Config::new(1, 1, f64::NAN, 0)).fire_variant_chance, 0.0);
    }
}

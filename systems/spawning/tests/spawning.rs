use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use glam::Vec2;
use horde_core::{
    ArenaBounds, Command, Event, Material, NpcVariant, ObstaclePlacement, TileCoord, TILE_SIZE,
};
use horde_system_spawning::{generate_store_layout, Config, Spawning};
use horde_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn configured_world(
    bounds: ArenaBounds,
    obstacles: Vec<ObstaclePlacement>,
) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena { bounds, obstacles },
        &mut events,
    );
    (world, events)
}

/// Advances the world one tick, applies the spawn commands and returns them.
fn tick(world: &mut World, spawning: &mut Spawning, mut events: Vec<Event>) -> Vec<Command> {
    world::apply(world, Command::Tick, &mut events);
    let mut commands = Vec::new();
    spawning.handle(
        &events,
        query::bounds(world),
        &query::obstacle_view(world),
        &mut commands,
    );
    let mut spawned = Vec::new();
    for command in commands.iter().cloned() {
        world::apply(world, command, &mut spawned);
    }
    commands
}

fn positions(commands: &[Command]) -> Vec<Vec2> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnNpc { position, .. } => *position,
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn opening_wave_enters_near_the_door() {
    let bounds = ArenaBounds::new(800.0, 600.0);
    let (mut world, events) = configured_world(bounds, Vec::new());
    let mut spawning = Spawning::new(Config::new(4, 100, 0.0, 0x1234_5678));

    let commands = tick(&mut world, &mut spawning, events);

    assert_eq!(commands.len(), 4);
    let door = spawning.door().expect("door chosen with the first wave");
    let entry = Vec2::new(
        door.x.clamp(1.0, bounds.width() - 1.0),
        door.y.clamp(1.0, bounds.height() - 1.0),
    );
    for position in positions(&commands) {
        assert!(position.distance(entry) <= TILE_SIZE * 0.5 + 1e-3);
        assert!(position.x >= 1.0 && position.x <= bounds.width() - 1.0);
        assert!(position.y >= 1.0 && position.y <= bounds.height() - 1.0);
    }
    assert!(commands.iter().all(|command| matches!(
        command,
        Command::SpawnNpc {
            variant: NpcVariant::Normal,
            ..
        }
    )));
    assert_eq!(query::npc_view(&world).len(), 4);
}

#[test]
fn waves_repeat_on_the_interval() {
    let (mut world, events) = configured_world(ArenaBounds::new(800.0, 600.0), Vec::new());
    let mut spawning = Spawning::new(Config::new(2, 10, 0.0, 9));

    let mut waves = Vec::new();
    let mut pending = events;
    for _ in 0..25 {
        let commands = tick(&mut world, &mut spawning, std::mem::take(&mut pending));
        if !commands.is_empty() {
            waves.push(query::tick(&world));
        }
    }

    assert_eq!(waves, vec![1, 11, 21]);
    assert_eq!(query::npc_view(&world).len(), 6);
}

#[test]
fn zero_interval_spawns_only_the_opening_wave() {
    let (mut world, events) = configured_world(ArenaBounds::new(800.0, 600.0), Vec::new());
    let mut spawning = Spawning::new(Config::new(3, 0, 0.0, 9));

    let first = tick(&mut world, &mut spawning, events);
    let later: usize = (0..50)
        .map(|_| tick(&mut world, &mut spawning, Vec::new()).len())
        .sum();

    assert_eq!(first.len(), 3);
    assert_eq!(later, 0);
}

#[test]
fn certain_fire_chance_spawns_fire_variants() {
    let (mut world, events) = configured_world(ArenaBounds::new(800.0, 600.0), Vec::new());
    let mut spawning = Spawning::new(Config::new(5, 10, 1.0, 3));

    let commands = tick(&mut world, &mut spawning, events);

    assert!(commands.iter().all(|command| matches!(
        command,
        Command::SpawnNpc {
            variant: NpcVariant::Fire,
            ..
        }
    )));
}

#[test]
fn wave_members_avoid_each_other_when_there_is_room() {
    let (mut world, events) = configured_world(ArenaBounds::new(800.0, 600.0), Vec::new());
    let mut spawning = Spawning::new(Config::new(2, 10, 0.0, 21));

    let placed = positions(&tick(&mut world, &mut spawning, events));

    assert_eq!(placed.len(), 2);
    assert!(placed[0].distance(placed[1]) >= 20.0);
}

#[test]
fn reconfiguring_the_arena_restarts_the_waves() {
    let bounds = ArenaBounds::new(800.0, 600.0);
    let (mut world, events) = configured_world(bounds, Vec::new());
    let mut spawning = Spawning::new(Config::new(1, 100, 0.0, 5));
    let _ = tick(&mut world, &mut spawning, events);
    assert!(tick(&mut world, &mut spawning, Vec::new()).is_empty());

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            bounds,
            obstacles: vec![ObstaclePlacement::new(TileCoord::new(3, 3), Material::Wood)],
        },
        &mut events,
    );
    let commands = tick(&mut world, &mut spawning, events);

    assert_eq!(commands.len(), 1);
    assert_eq!(query::npc_view(&world).len(), 1);
}

#[test]
fn generated_layouts_configure_cleanly() {
    let bounds = ArenaBounds::new(2400.0, 1600.0);
    let layout = generate_store_layout(bounds, &mut ChaCha8Rng::seed_from_u64(0x5eed));
    let expected = layout.len();

    let (world, events) = configured_world(bounds, layout);

    assert_eq!(
        events,
        vec![Event::ArenaConfigured {
            bounds,
            obstacles: expected,
        }]
    );
    assert_eq!(query::obstacle_view(&world).len(), expected);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
}

fn replay() -> u64 {
    let bounds = ArenaBounds::new(1600.0, 1200.0);
    let layout = generate_store_layout(bounds, &mut ChaCha8Rng::seed_from_u64(77));
    let (mut world, events) = configured_world(bounds, layout);
    let mut spawning = Spawning::new(Config::new(5, 30, 0.3, 0x4d59_5df4_d0f3_3173));

    let mut hasher = DefaultHasher::new();
    let mut pending = events;
    for _ in 0..120 {
        for command in tick(&mut world, &mut spawning, std::mem::take(&mut pending)) {
            if let Command::SpawnNpc { position, variant } = command {
                position.x.to_bits().hash(&mut hasher);
                position.y.to_bits().hash(&mut hasher);
                variant.hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

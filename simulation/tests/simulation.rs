use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use glam::Vec2;
use horde_core::{
    Command, Equipment, Event, Health, Item, Material, MeleeWeapon, NpcId, NpcVariant, ObstacleId,
    ObstaclePlacement, PlayerInput, SearchError, TileCoord,
};
use horde_simulation::{Config, Observer, Simulation};
use horde_world::query;

#[derive(Default)]
struct Tally {
    kills: Vec<NpcVariant>,
    destroyed: Vec<(Material, Vec2)>,
    hits: Vec<Health>,
}

impl Observer for Tally {
    fn on_kill(&mut self, _npc: NpcId, _position: Vec2, variant: NpcVariant) {
        self.kills.push(variant);
    }

    fn on_obstacle_destroyed(&mut self, _obstacle: ObstacleId, material: Material, center: Vec2) {
        self.destroyed.push((material, center));
    }

    fn on_player_hit(&mut self, remaining: Health) {
        self.hits.push(remaining);
    }
}

fn quiet_config() -> Config {
    Config {
        wave_size: 0,
        arena_width: 800.0,
        arena_height: 600.0,
        ..Config::default()
    }
}

fn swing_east() -> PlayerInput {
    PlayerInput {
        facing: Vec2::X,
        use_pressed: true,
        ..PlayerInput::default()
    }
}

#[test]
fn opening_wave_arrives_on_the_first_tick() {
    let config = Config {
        wave_size: 3,
        ..Config::default()
    };
    let mut simulation = Simulation::new(&config);

    let events = simulation.step(&PlayerInput::default()).to_vec();

    assert!(matches!(events.first(), Some(Event::ArenaConfigured { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PlayerPlaced { .. })));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::NpcSpawned { .. }))
            .count(),
        3
    );
    assert_eq!(query::npc_view(simulation.world()).len(), 3);
    assert!(!simulation.is_over());
}

#[test]
fn observer_hears_kills_and_contact_hits() {
    let mut simulation = Simulation::from_layout(&quiet_config(), Vec::new());
    simulation.apply(Command::PlacePlayer {
        position: Vec2::new(200.0, 200.0),
        equipment: Equipment::Melee {
            weapon: MeleeWeapon::Axe,
            damage: 2,
        },
    });
    simulation.apply(Command::SpawnNpc {
        position: Vec2::new(220.0, 200.0),
        variant: NpcVariant::Fire,
    });
    let mut tally = Tally::default();

    let _ = simulation.step_with(&swing_east(), &mut tally);

    assert_eq!(tally.kills, vec![NpcVariant::Fire]);
    assert_eq!(tally.hits, vec![Health::new(9)]);
    assert!(query::npc_view(simulation.world()).is_empty());
}

#[test]
fn destroyed_obstacles_report_and_drop_salvage() {
    let layout = vec![ObstaclePlacement::new(
        TileCoord::new(5, 5),
        Material::Plastic,
    )];
    let mut simulation = Simulation::from_layout(&quiet_config(), layout);
    simulation.apply(Command::PlacePlayer {
        position: Vec2::new(185.0, 220.0),
        equipment: Equipment::Melee {
            weapon: MeleeWeapon::ReinforcedAxe,
            damage: 10,
        },
    });
    let mut tally = Tally::default();

    let _ = simulation.step_with(&swing_east(), &mut tally);

    assert_eq!(
        tally.destroyed,
        vec![(Material::Plastic, Vec2::new(220.0, 220.0))]
    );
    assert!(simulation.drops().iter().any(|drop| {
        drop.item == Item::PlasticFragments && drop.position == Vec2::new(220.0, 220.0)
    }));
    assert!(query::obstacle_view(simulation.world()).is_empty());

    let _ = simulation.step(&PlayerInput::default());
    assert!(simulation.drops().is_empty());
}

#[test]
fn shelves_can_be_searched_once() {
    let layout = vec![ObstaclePlacement::new(TileCoord::new(2, 2), Material::Wood)];
    let mut simulation = Simulation::from_layout(&quiet_config(), layout);
    let shelf = query::obstacle_view(simulation.world())
        .iter()
        .next()
        .map(|obstacle| obstacle.id)
        .expect("shelf exists");

    let drops = simulation.search_shelf(shelf).expect("first search succeeds");
    assert!(drops.len() <= 1);
    assert_eq!(
        simulation.search_shelf(shelf),
        Err(SearchError::AlreadySearched)
    );
    assert_eq!(
        simulation.search_shelf(ObstacleId::new(99)),
        Err(SearchError::MissingObstacle)
    );

    let events = simulation.step(&PlayerInput::default());
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ShelfSearched { .. })));
}

#[test]
fn shelf_loot_is_rolled_once_per_search() {
    let layout: Vec<ObstaclePlacement> = (0..15)
        .flat_map(|column| {
            (0..10).map(move |row| {
                ObstaclePlacement::new(TileCoord::new(column, row), Material::Wood)
            })
        })
        .collect();
    let mut simulation = Simulation::from_layout(&quiet_config(), layout);
    let shelves: Vec<ObstacleId> = query::obstacle_view(simulation.world())
        .iter()
        .map(|obstacle| obstacle.id)
        .collect();
    assert_eq!(shelves.len(), 150);

    let mut searched_drops = 0;
    for shelf in shelves {
        searched_drops += simulation.search_shelf(shelf).expect("search succeeds").len();

        let events = simulation.step(&PlayerInput::default());
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ShelfSearched { .. })));
        assert!(simulation
            .drops()
            .iter()
            .all(|drop| !Item::CRAFTING_MATERIALS.contains(&drop.item)));
    }

    assert!(searched_drops > 0);
}

#[test]
fn aim_preview_follows_ranged_equipment() {
    let mut simulation = Simulation::from_layout(&quiet_config(), Vec::new());
    simulation.apply(Command::PlacePlayer {
        position: Vec2::new(100.0, 100.0),
        equipment: Equipment::Bow,
    });

    let preview = simulation.aim_preview().expect("bows have a preview");
    assert!(preview.x > 100.0);
    assert_eq!(preview.y, 100.0);

    simulation.apply(Command::PlacePlayer {
        position: Vec2::new(100.0, 100.0),
        equipment: Equipment::Unarmed,
    });
    assert_eq!(simulation.aim_preview(), None);
}

#[test]
fn identical_seeds_replay_identically() {
    let config = Config {
        seed: 99,
        wave_size: 6,
        wave_interval_ticks: 120,
        arena_width: 1200.0,
        arena_height: 800.0,
        ..Config::default()
    };

    assert_eq!(replay(&config), replay(&config));
}

fn replay(config: &Config) -> u64 {
    let mut simulation = Simulation::new(config);
    let mut hasher = DefaultHasher::new();

    for tick in 0..400_u32 {
        let angle = tick as f32 * 0.05;
        let input = PlayerInput {
            movement: Vec2::from_angle(angle),
            facing: Vec2::from_angle(-angle),
            use_pressed: tick % 15 == 0,
            aim_held: false,
        };
        let events = simulation.step(&input);
        format!("{events:?}").hash(&mut hasher);
        format!("{:?}", simulation.drops()).hash(&mut hasher);
    }

    hasher.finish()
}

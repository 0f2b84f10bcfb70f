use glam::Vec2;
use horde_core::{
    ArenaBounds, Command, Equipment, Event, NpcVariant, PlayerInput, ProjectileKind,
    ProjectileLaunch, PLAYER_MAX_HEALTH,
};
use horde_system_combat::Combat;
use horde_world::{self as world, query, World};

struct Harness {
    world: World,
    combat: Combat,
}

impl Harness {
    fn new(equipment: Equipment) -> Self {
        let mut harness = Self {
            world: World::new(),
            combat: Combat::new(),
        };
        let _ = harness.apply(Command::ConfigureArena {
            bounds: ArenaBounds::new(400.0, 400.0),
            obstacles: Vec::new(),
        });
        let _ = harness.apply(Command::PlacePlayer {
            position: Vec2::new(100.0, 100.0),
            equipment,
        });
        harness
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn spawn(&mut self, position: Vec2) {
        let _ = self.apply(Command::SpawnNpc {
            position,
            variant: NpcVariant::Normal,
        });
    }

    /// Advances one tick and returns the commands and the events they caused.
    fn tick(&mut self, input: PlayerInput) -> (Vec<Command>, Vec<Event>) {
        let events = self.apply(Command::Tick);
        let mut commands = Vec::new();
        let player = query::player(&self.world);
        self.combat.handle(
            &events,
            &input,
            player.as_ref(),
            &query::npc_view(&self.world),
            &mut commands,
        );
        let mut caused = Vec::new();
        for command in commands.iter().cloned() {
            caused.extend(self.apply(command));
        }
        (commands, caused)
    }
}

fn press() -> PlayerInput {
    PlayerInput {
        use_pressed: true,
        ..PlayerInput::default()
    }
}

fn aim() -> PlayerInput {
    PlayerInput {
        aim_held: true,
        ..PlayerInput::default()
    }
}

#[test]
fn use_swings_the_bat_and_respects_the_cooldown() {
    let mut harness = Harness::new(Equipment::default());
    harness.spawn(Vec2::new(120.0, 100.0));

    let (commands, events) = harness.tick(press());
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::Swing { .. }));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::NpcDamaged { .. })));

    let (commands, _) = harness.tick(press());
    assert!(commands.is_empty());

    for _ in 0..8 {
        let _ = harness.tick(PlayerInput::default());
    }
    let (commands, events) = harness.tick(press());
    assert!(matches!(commands.as_slice(), [Command::Swing { .. }]));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::NpcKilled { .. })));
}

#[test]
fn releasing_the_bow_looses_an_arrow() {
    let mut harness = Harness::new(Equipment::Bow);

    let (commands, _) = harness.tick(aim());
    assert!(commands.is_empty());
    let (commands, _) = harness.tick(aim());
    assert!(commands.is_empty());

    let (commands, events) = harness.tick(PlayerInput::default());
    assert_eq!(
        commands,
        vec![Command::FireProjectile {
            launch: ProjectileLaunch::arrow(Vec2::new(100.0, 100.0), Vec2::X),
        }]
    );
    assert!(matches!(
        events.as_slice(),
        [Event::ProjectileFired {
            kind: ProjectileKind::Arrow,
            ..
        }]
    ));

    let (commands, _) = harness.tick(PlayerInput::default());
    assert!(commands.is_empty());
}

#[test]
fn bow_ignores_the_use_action() {
    let mut harness = Harness::new(Equipment::Bow);

    let (commands, _) = harness.tick(press());

    assert!(commands.is_empty());
}

#[test]
fn fireball_casts_wait_for_the_cast_cooldown() {
    let mut harness = Harness::new(Equipment::FireballSpell { level: 1 });

    let (commands, _) = harness.tick(press());
    assert!(matches!(
        commands.as_slice(),
        [Command::FireProjectile { .. }]
    ));
    assert_eq!(query::projectiles(&harness.world).len(), 1);

    let (commands, _) = harness.tick(press());
    assert!(commands.is_empty());
}

#[test]
fn touching_npcs_attack_once_per_immunity_window() {
    let mut harness = Harness::new(Equipment::Unarmed);
    harness.spawn(Vec2::new(110.0, 100.0));
    harness.spawn(Vec2::new(100.0, 112.0));

    let (commands, events) = harness.tick(PlayerInput::default());
    assert_eq!(
        commands
            .iter()
            .filter(|command| matches!(command, Command::NpcAttack { .. }))
            .count(),
        2
    );
    let hits: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerHit { .. }))
        .collect();
    assert_eq!(hits.len(), 1);

    let (commands, _) = harness.tick(PlayerInput::default());
    assert!(commands.is_empty());

    let remaining = query::player(&harness.world).map(|player| player.health.get());
    assert_eq!(remaining, Some(PLAYER_MAX_HEALTH.get() - 1));
}

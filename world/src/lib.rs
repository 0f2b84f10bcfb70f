#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Horde simulation.
//!
//! The world owns every mutable collection of the arena: obstacles, NPCs, the
//! player, projectiles and explosions. It changes only through [`apply`] and
//! reports each change as an [`Event`]. Pure read access lives in [`query`],
//! and the stateless pathfinding and visibility helpers are exposed through
//! [`navigation`] and [`sight`] for systems that plan against snapshots.

mod avoidance;
mod combat;
pub mod navigation;
mod obstacles;
mod player;
pub mod sight;

use glam::Vec2;
use horde_core::{
    ArenaBounds, BehaviorState, Command, Event, Health, NpcId, NpcSnapshot, NpcVariant,
    NPC_MAX_HEALTH,
};

use combat::{Explosion, Projectile};
use obstacles::ObstacleRegistry;
use player::Player;

/// Represents the authoritative Horde world state.
#[derive(Debug)]
pub struct World {
    bounds: ArenaBounds,
    obstacles: ObstacleRegistry,
    npcs: Vec<Npc>,
    player: Option<Player>,
    projectiles: Vec<Projectile>,
    explosions: Vec<Explosion>,
    next_npc_id: u32,
    next_projectile_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with a zero-sized arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bounds: ArenaBounds::new(0.0, 0.0),
            obstacles: ObstacleRegistry::default(),
            npcs: Vec::new(),
            player: None,
            projectiles: Vec::new(),
            explosions: Vec::new(),
            next_npc_id: 0,
            next_projectile_id: 0,
            tick_index: 0,
        }
    }

    fn npc_index(&self, npc: NpcId) -> Option<usize> {
        self.npcs.iter().position(|candidate| candidate.id == npc)
    }

    fn npc_mut(&mut self, npc: NpcId) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|candidate| candidate.id == npc)
    }

    fn advance_timers(&mut self) {
        for npc in &mut self.npcs {
            npc.attack_cooldown = npc.attack_cooldown.saturating_sub(1);
        }
        if let Some(player) = self.player.as_mut() {
            player.decay_timers();
        }
        self.obstacles.decay_flashes();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { bounds, obstacles } => {
            world.bounds = bounds;
            world.obstacles.configure(obstacles);
            world.npcs.clear();
            world.projectiles.clear();
            world.explosions.clear();
            out_events.push(Event::ArenaConfigured {
                bounds,
                obstacles: world.obstacles.len(),
            });
        }
        Command::PlacePlayer {
            position,
            equipment,
        } => {
            world.player = Some(Player::new(position, equipment));
            out_events.push(Event::PlayerPlaced { position });
        }
        Command::SpawnNpc { position, variant } => {
            let npc = NpcId::new(world.next_npc_id);
            world.next_npc_id = world.next_npc_id.wrapping_add(1);
            world.npcs.push(Npc::new(npc, position, variant));
            out_events.push(Event::NpcSpawned {
                npc,
                position,
                variant,
            });
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.advance_timers();
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::MovePlayer { movement, facing } => {
            let bounds = world.bounds;
            let Some(player) = world.player.as_mut() else {
                return;
            };
            if let Some(from) = player.walk(movement, facing, bounds, &world.obstacles) {
                out_events.push(Event::PlayerMoved {
                    from,
                    to: player.position,
                });
            }
        }
        Command::TriggerNpc { npc } => {
            if let Some(target) = world.npc_mut(npc) {
                if target.state == BehaviorState::Wandering {
                    target.state = BehaviorState::Chasing;
                    target.wander_destination = None;
                    target.idle_ticks = 0;
                    out_events.push(Event::NpcTriggered { npc });
                }
            }
        }
        Command::WaitNpc { npc } => {
            if let Some(target) = world.npc_mut(npc) {
                target.idle_ticks = target.idle_ticks.saturating_sub(1);
            }
        }
        Command::SetWanderDestination { npc, destination } => {
            if let Some(target) = world.npc_mut(npc) {
                if target.state == BehaviorState::Wandering {
                    target.wander_destination = Some(destination);
                }
            }
        }
        Command::RestNpc { npc, idle_ticks } => {
            if let Some(target) = world.npc_mut(npc) {
                target.wander_destination = None;
                target.idle_ticks = idle_ticks;
            }
        }
        Command::SteerNpc { npc, toward, speed } => {
            let Some(index) = world.npc_index(npc) else {
                return;
            };
            let Some(from) =
                avoidance::steer(&mut world.npcs, index, toward, speed, &world.obstacles)
            else {
                return;
            };
            if let Some(moved) = world.npcs.get(index) {
                out_events.push(Event::NpcMoved {
                    npc,
                    from,
                    to: moved.position,
                });
            }
        }
        Command::NpcAttack { npc } => world.npc_attack(npc, out_events),
        Command::Swing { strike } => world.swing(strike, out_events),
        Command::FireProjectile { launch } => world.fire(launch, out_events),
        Command::StepProjectiles => world.step_projectiles(out_events),
        Command::SearchShelf { obstacle } => world.obstacles.search(obstacle, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use horde_core::{
        ArenaBounds, ExplosionSnapshot, NpcView, ObstacleView, PlayerSnapshot, ProjectileKind,
        ProjectileSnapshot, TileCoord,
    };

    use super::World;
    use crate::{navigation, sight};

    /// Dimensions of the arena.
    #[must_use]
    pub fn bounds(world: &World) -> ArenaBounds {
        world.bounds
    }

    /// Index of the most recent tick.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the NPCs in the arena.
    #[must_use]
    pub fn npc_view(world: &World) -> NpcView {
        NpcView::from_snapshots(world.npcs.iter().map(super::Npc::snapshot).collect())
    }

    /// Captures a read-only view of the obstacles in the arena.
    #[must_use]
    pub fn obstacle_view(world: &World) -> ObstacleView {
        ObstacleView::from_snapshots(
            world
                .obstacles
                .iter()
                .map(|obstacle| obstacle.snapshot())
                .collect(),
        )
    }

    /// Snapshot of the player, if one was placed.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| player.snapshot())
    }

    /// Snapshots of the live projectiles in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Snapshots of the live explosions in spawn order.
    #[must_use]
    pub fn explosions(world: &World) -> Vec<ExplosionSnapshot> {
        world
            .explosions
            .iter()
            .map(|explosion| explosion.snapshot())
            .collect()
    }

    /// Reports whether the segment clears every obstacle grown by `radius`.
    #[must_use]
    pub fn has_line_of_sight(world: &World, start: Vec2, end: Vec2, radius: f32) -> bool {
        sight::has_line_of_sight(start, end, world.obstacles.rects(), radius)
    }

    /// Shortest tile path from `start` to `goal` avoiding obstacles and the
    /// tiles occupied by `blockers`.
    #[must_use]
    pub fn find_path<B>(world: &World, start: Vec2, goal: Vec2, blockers: B) -> Vec<TileCoord>
    where
        B: IntoIterator<Item = Vec2>,
    {
        navigation::find_path(start, goal, world.bounds, world.obstacles.tiles(), blockers)
    }

    /// Point where a projectile of `kind` fired from `origin` along
    /// `direction` would stop. Returns `None` for a zero-length direction.
    #[must_use]
    pub fn aim_preview(
        world: &World,
        origin: Vec2,
        direction: Vec2,
        kind: ProjectileKind,
    ) -> Option<Vec2> {
        world.preview(origin, direction, kind)
    }
}

#[derive(Clone, Debug)]
struct Npc {
    id: NpcId,
    position: Vec2,
    facing: Vec2,
    health: Health,
    variant: NpcVariant,
    state: BehaviorState,
    wander_destination: Option<Vec2>,
    idle_ticks: u32,
    attack_cooldown: u32,
}

impl Npc {
    fn new(id: NpcId, position: Vec2, variant: NpcVariant) -> Self {
        Self {
            id,
            position,
            facing: Vec2::X,
            health: NPC_MAX_HEALTH,
            variant,
            state: BehaviorState::Wandering,
            wander_destination: None,
            idle_ticks: 0,
            attack_cooldown: 0,
        }
    }

    fn snapshot(&self) -> NpcSnapshot {
        NpcSnapshot {
            id: self.id,
            position: self.position,
            facing: self.facing,
            health: self.health,
            variant: self.variant,
            state: self.state,
            wander_destination: self.wander_destination,
            idle_ticks: self.idle_ticks,
            attack_cooldown: self.attack_cooldown,
        }
    }
}

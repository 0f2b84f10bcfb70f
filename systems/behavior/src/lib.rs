#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! NPC behavior state machine.
//!
//! Every tick each NPC either wanders between random destinations or chases
//! the player. A wandering NPC that comes within trigger distance of the
//! player while seeing it switches to chasing for the rest of its life. The
//! system only reads snapshots and answers with steering commands; the world
//! resolves collisions when it applies them.

use glam::Vec2;
use horde_core::{
    ArenaBounds, BehaviorState, Command, Event, NpcSnapshot, NpcView, ObstacleView,
    PlayerSnapshot, Rect, TileCoord, CHASE_SPEED, NPC_RADIUS, PLACEMENT_ATTEMPTS, SIGHT_PADDING,
    TRIGGER_DISTANCE, WANDER_ARRIVAL_DISTANCE, WANDER_IDLE_MAX_TICKS, WANDER_IDLE_MIN_TICKS,
    WANDER_SPEED,
};
use horde_world::{navigation::PathSearch, sight};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that reacts to world ticks and emits NPC behavior commands.
#[derive(Debug)]
pub struct Behavior {
    rng: ChaCha8Rng,
    search: PathSearch,
    obstacle_rects: Vec<Rect>,
    obstacle_tiles: Vec<TileCoord>,
    blockers: Vec<Vec2>,
}

impl Behavior {
    /// Creates a behavior system drawing wander choices from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            search: PathSearch::new(),
            obstacle_rects: Vec::new(),
            obstacle_tiles: Vec::new(),
            blockers: Vec::new(),
        }
    }

    /// Consumes world events and immutable views to emit behavior commands.
    ///
    /// NPCs are processed in identifier order. Nothing is emitted unless the
    /// events contain a tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        npcs: &NpcView,
        player: Option<&PlayerSnapshot>,
        obstacles: &ObstacleView,
        bounds: ArenaBounds,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.obstacle_rects.clear();
        self.obstacle_rects
            .extend(obstacles.iter().map(|obstacle| obstacle.rect()));
        self.obstacle_tiles.clear();
        self.obstacle_tiles
            .extend(obstacles.iter().map(|obstacle| obstacle.tile));
        self.blockers.clear();
        self.blockers.extend(npcs.iter().map(|npc| npc.position));

        let target = player.map(|player| player.position);
        for npc in npcs.iter() {
            match npc.state {
                BehaviorState::Wandering => self.wander_or_notice(npc, target, bounds, out),
                BehaviorState::Chasing => {
                    if let Some(target) = target {
                        self.chase(npc, target, bounds, out);
                    }
                }
            }
        }
    }

    fn wander_or_notice(
        &mut self,
        npc: &NpcSnapshot,
        target: Option<Vec2>,
        bounds: ArenaBounds,
        out: &mut Vec<Command>,
    ) {
        if let Some(target) = target {
            if npc.position.distance(target) <= TRIGGER_DISTANCE && self.sees(npc.position, target)
            {
                out.push(Command::TriggerNpc { npc: npc.id });
                self.chase(npc, target, bounds, out);
                return;
            }
        }

        self.wander(npc, bounds, out);
    }

    fn chase(
        &mut self,
        npc: &NpcSnapshot,
        target: Vec2,
        bounds: ArenaBounds,
        out: &mut Vec<Command>,
    ) {
        let toward = if self.sees(npc.position, target) {
            target
        } else {
            self.next_waypoint(npc.position, target, bounds).unwrap_or(target)
        };

        out.push(Command::SteerNpc {
            npc: npc.id,
            toward,
            speed: CHASE_SPEED,
        });
    }

    fn wander(&mut self, npc: &NpcSnapshot, bounds: ArenaBounds, out: &mut Vec<Command>) {
        if npc.idle_ticks > 0 {
            out.push(Command::WaitNpc { npc: npc.id });
            return;
        }

        let destination = match npc.wander_destination {
            Some(destination) => destination,
            None => {
                let destination = self.sample_destination(bounds);
                out.push(Command::SetWanderDestination {
                    npc: npc.id,
                    destination,
                });
                destination
            }
        };

        if npc.position.distance(destination) < WANDER_ARRIVAL_DISTANCE {
            out.push(Command::RestNpc {
                npc: npc.id,
                idle_ticks: self
                    .rng
                    .gen_range(WANDER_IDLE_MIN_TICKS..=WANDER_IDLE_MAX_TICKS),
            });
            return;
        }

        let toward = self
            .next_waypoint(npc.position, destination, bounds)
            .unwrap_or(destination);
        out.push(Command::SteerNpc {
            npc: npc.id,
            toward,
            speed: WANDER_SPEED,
        });
    }

    fn sees(&self, from: Vec2, to: Vec2) -> bool {
        sight::has_line_of_sight(from, to, self.obstacle_rects.iter().copied(), SIGHT_PADDING)
    }

    /// Centre of the second tile of a fresh path, if a usable path exists.
    fn next_waypoint(&mut self, from: Vec2, to: Vec2, bounds: ArenaBounds) -> Option<Vec2> {
        let path = self.search.find_path(
            from,
            to,
            bounds,
            self.obstacle_tiles.iter().copied(),
            self.blockers.iter().copied(),
        );
        path.get(1).map(TileCoord::center)
    }

    /// Uniform point in the arena, resampled while it overlaps an obstacle.
    /// The last sample is accepted once the attempts run out.
    fn sample_destination(&mut self, bounds: ArenaBounds) -> Vec2 {
        let mut candidate = self.sample_point(bounds);
        for _ in 1..PLACEMENT_ATTEMPTS {
            if !self.overlaps_obstacle(candidate) {
                break;
            }
            candidate = self.sample_point(bounds);
        }
        candidate
    }

    fn sample_point(&mut self, bounds: ArenaBounds) -> Vec2 {
        Vec2::new(
            self.rng.gen::<f32>() * bounds.width(),
            self.rng.gen::<f32>() * bounds.height(),
        )
    }

    fn overlaps_obstacle(&self, point: Vec2) -> bool {
        self.obstacle_rects
            .iter()
            .any(|rect| rect.overlaps_circle(point, NPC_RADIUS))
    }
}

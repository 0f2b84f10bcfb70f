//! Local collision avoidance for NPC movement.
//!
//! Obstacles are hard constraints: a step that would overlap one is rolled
//! back. Other NPCs are soft constraints resolved afterwards by a radial
//! separation push that is itself discarded if it would enter an obstacle.

use glam::Vec2;
use horde_core::{geometry, NPC_RADIUS, SEPARATION_DISTANCE};

use crate::{obstacles::ObstacleRegistry, Npc};

/// Moves the NPC at `index` one step toward `toward`.
///
/// Returns the position before the step when the NPC ends up somewhere new.
pub(crate) fn steer(
    npcs: &mut [Npc],
    index: usize,
    toward: Vec2,
    speed: f32,
    obstacles: &ObstacleRegistry,
) -> Option<Vec2> {
    let npc = npcs.get_mut(index)?;
    let step = geometry::step_towards(npc.position, toward, speed)?;
    let previous = npc.position;
    npc.facing = step.facing;

    let stepped = if obstacles.overlaps_circle(step.position, NPC_RADIUS) {
        previous
    } else {
        step.position
    };
    let resolved = separate(npcs, index, stepped, obstacles);

    let npc = npcs.get_mut(index)?;
    npc.position = resolved;
    (resolved != previous).then_some(previous)
}

/// Pushes `position` out of every NPC other than `index` that sits closer than
/// the separation distance. NPCs sharing the exact position are skipped.
fn separate(npcs: &[Npc], index: usize, position: Vec2, obstacles: &ObstacleRegistry) -> Vec2 {
    npcs.iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .fold(position, |current, (_, other)| {
            let offset = current - other.position;
            let distance = offset.length();
            if distance <= 0.0 || distance >= SEPARATION_DISTANCE {
                return current;
            }
            let push = offset / distance * (SEPARATION_DISTANCE - distance);
            displace(current, push, obstacles)
        })
}

/// Applies `displacement` unless the displaced NPC would overlap an obstacle.
pub(crate) fn displace(position: Vec2, displacement: Vec2, obstacles: &ObstacleRegistry) -> Vec2 {
    let candidate = position + displacement;
    if obstacles.overlaps_circle(candidate, NPC_RADIUS) {
        position
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::{Material, NpcId, NpcVariant, ObstaclePlacement, TileCoord};

    fn npc(id: u32, position: Vec2) -> Npc {
        Npc::new(NpcId::new(id), position, NpcVariant::Normal)
    }

    fn walls(tiles: &[(i32, i32)]) -> ObstacleRegistry {
        let mut registry = ObstacleRegistry::default();
        registry.configure(
            tiles
                .iter()
                .map(|&(column, row)| {
                    ObstaclePlacement::new(TileCoord::new(column, row), Material::Steel)
                })
                .collect(),
        );
        registry
    }

    #[test]
    fn step_into_obstacle_is_rolled_back() {
        let mut npcs = vec![npc(0, Vec2::new(29.5, 20.0))];
        let moved = steer(&mut npcs, 0, Vec2::new(60.0, 20.0), 1.0, &walls(&[(1, 0)]));

        assert_eq!(moved, None);
        assert_eq!(npcs[0].position, Vec2::new(29.5, 20.0));
        assert_eq!(npcs[0].facing, Vec2::X);
    }

    #[test]
    fn crowded_npcs_are_pushed_apart() {
        let mut npcs = vec![npc(0, Vec2::new(100.0, 100.0)), npc(1, Vec2::new(110.0, 100.0))];
        let moved = steer(&mut npcs, 0, Vec2::new(100.0, 0.0), 1.0, &walls(&[]));

        assert_eq!(moved, Some(Vec2::new(100.0, 100.0)));
        let gap = npcs[0].position.distance(npcs[1].position);
        assert!((gap - SEPARATION_DISTANCE).abs() < 1e-4);
        assert_eq!(npcs[1].position, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn separation_never_pushes_into_obstacles() {
        let registry = walls(&[(0, 2)]);
        let mut npcs = vec![npc(0, Vec2::new(50.0, 91.0)), npc(1, Vec2::new(60.0, 91.0))];

        let _ = steer(&mut npcs, 0, Vec2::new(50.0, 200.0), 0.5, &registry);

        assert!(!registry.overlaps_circle(npcs[0].position, NPC_RADIUS));
    }

    #[test]
    fn zero_length_step_leaves_npc_untouched() {
        let mut npcs = vec![npc(0, Vec2::new(10.0, 10.0))];
        let moved = steer(&mut npcs, 0, Vec2::new(10.0, 10.0), 1.0, &walls(&[]));

        assert_eq!(moved, None);
        assert_eq!(npcs[0].facing, Vec2::X);
    }
}

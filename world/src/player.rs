//! Player state and movement.

use glam::Vec2;
use horde_core::{
    ArenaBounds, Equipment, Health, PlayerSnapshot, PLAYER_MAX_HEALTH, PLAYER_RADIUS,
    PLAYER_SPEED,
};

use crate::obstacles::ObstacleRegistry;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) facing: Vec2,
    pub(crate) health: Health,
    pub(crate) immunity_ticks: u32,
    pub(crate) swing_cooldown: u32,
    pub(crate) cast_cooldown: u32,
    pub(crate) equipment: Equipment,
}

impl Player {
    pub(crate) fn new(position: Vec2, equipment: Equipment) -> Self {
        Self {
            position,
            facing: Vec2::X,
            health: PLAYER_MAX_HEALTH,
            immunity_ticks: 0,
            swing_cooldown: 0,
            cast_cooldown: 0,
            equipment,
        }
    }

    /// Walks one step along `movement`, refusing steps that enter an obstacle.
    ///
    /// Returns the previous position when the player moved.
    pub(crate) fn walk(
        &mut self,
        movement: Vec2,
        facing: Vec2,
        bounds: ArenaBounds,
        obstacles: &ObstacleRegistry,
    ) -> Option<Vec2> {
        if let Some(facing) = facing.try_normalize() {
            self.facing = facing;
        }

        let direction = movement.try_normalize()?;
        let previous = self.position;
        let next = bounds.clamp(previous + direction * PLAYER_SPEED);
        if next == previous || obstacles.overlaps_circle(next, PLAYER_RADIUS) {
            return None;
        }

        self.position = next;
        Some(previous)
    }

    pub(crate) fn decay_timers(&mut self) {
        self.immunity_ticks = self.immunity_ticks.saturating_sub(1);
        self.swing_cooldown = self.swing_cooldown.saturating_sub(1);
        self.cast_cooldown = self.cast_cooldown.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            facing: self.facing,
            health: self.health,
            immunity_ticks: self.immunity_ticks,
            swing_cooldown: self.swing_cooldown,
            cast_cooldown: self.cast_cooldown,
            equipment: self.equipment,
        }
    }
}

//! Registry of destructible obstacles.

use glam::Vec2;
use horde_core::{
    Event, Material, ObstacleId, ObstaclePlacement, ObstacleSnapshot, Rect, SearchError,
    TileCoord, Tool, OBSTACLE_FLASH_TICKS,
};

#[derive(Clone, Debug)]
pub(crate) struct Obstacle {
    pub(crate) id: ObstacleId,
    pub(crate) tile: TileCoord,
    pub(crate) material: Material,
    pub(crate) hit_points: u32,
    pub(crate) flash_ticks: u32,
    pub(crate) opened: bool,
}

impl Obstacle {
    fn new(id: ObstacleId, placement: ObstaclePlacement) -> Self {
        Self {
            id,
            tile: placement.tile,
            material: placement.material,
            hit_points: placement.material.max_hit_points(),
            flash_ticks: 0,
            opened: false,
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::of_tile(self.tile)
    }

    pub(crate) fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            id: self.id,
            tile: self.tile,
            material: self.material,
            hit_points: self.hit_points,
            flash_ticks: self.flash_ticks,
            opened: self.opened,
        }
    }
}

/// Obstacles in insertion order. Removal keeps the order of the survivors.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleRegistry {
    /// Replaces every obstacle, dropping placements that repeat a tile.
    pub(crate) fn configure(&mut self, placements: Vec<ObstaclePlacement>) {
        self.obstacles.clear();
        self.next_id = 0;
        for placement in placements {
            if self
                .obstacles
                .iter()
                .any(|obstacle| obstacle.tile == placement.tile)
            {
                continue;
            }
            let id = ObstacleId::new(self.next_id);
            self.next_id = self.next_id.saturating_add(1);
            self.obstacles.push(Obstacle::new(id, placement));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter()
    }

    pub(crate) fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles.iter().map(Obstacle::rect)
    }

    pub(crate) fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.obstacles.iter().map(|obstacle| obstacle.tile)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    /// Reports whether a circle strictly overlaps any obstacle.
    pub(crate) fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.rects().any(|rect| rect.overlaps_circle(center, radius))
    }

    /// Index of the first obstacle a circle overlaps.
    pub(crate) fn first_overlapping(&self, center: Vec2, radius: f32) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|obstacle| obstacle.rect().overlaps_circle(center, radius))
    }

    /// Applies a hit with `tool` to the obstacle at `index`.
    ///
    /// Tools missing from the material's allow-list leave the obstacle
    /// untouched. Destroyed obstacles are removed immediately, so sweeps that
    /// hit several obstacles must walk indices back to front.
    pub(crate) fn strike(
        &mut self,
        index: usize,
        tool: Tool,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(obstacle) = self.obstacles.get_mut(index) else {
            return;
        };
        if !obstacle.material.is_damaged_by(tool) {
            log::trace!(
                "{:?} shrugs off {:?} at {:?}",
                obstacle.material,
                tool,
                obstacle.tile
            );
            return;
        }

        obstacle.hit_points = obstacle.hit_points.saturating_sub(damage);
        obstacle.flash_ticks = OBSTACLE_FLASH_TICKS;

        if obstacle.hit_points > 0 {
            out_events.push(Event::ObstacleDamaged {
                obstacle: obstacle.id,
                remaining: obstacle.hit_points,
            });
            return;
        }

        let destroyed = self.obstacles.remove(index);
        log::debug!(
            "obstacle {} ({:?}) destroyed at {:?}",
            destroyed.id.get(),
            destroyed.material,
            destroyed.tile
        );
        out_events.push(Event::ObstacleDestroyed {
            obstacle: destroyed.id,
            material: destroyed.material,
            center: destroyed.tile.center(),
        });
    }

    /// Decays every damage flash by one tick.
    pub(crate) fn decay_flashes(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.flash_ticks = obstacle.flash_ticks.saturating_sub(1);
        }
    }

    /// Consumes the loot roll of a shelf.
    pub(crate) fn search(&mut self, id: ObstacleId, out_events: &mut Vec<Event>) {
        let Some(obstacle) = self.obstacles.iter_mut().find(|obstacle| obstacle.id == id) else {
            log::debug!("search of missing obstacle {}", id.get());
            out_events.push(Event::ShelfSearchRejected {
                obstacle: id,
                reason: SearchError::MissingObstacle,
            });
            return;
        };

        if obstacle.opened {
            out_events.push(Event::ShelfSearchRejected {
                obstacle: id,
                reason: SearchError::AlreadySearched,
            });
            return;
        }

        obstacle.opened = true;
        out_events.push(Event::ShelfSearched {
            obstacle: id,
            center: obstacle.tile.center(),
        });
    }
}

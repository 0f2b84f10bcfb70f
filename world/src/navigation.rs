//! Breadth-first tile pathfinder used by NPC steering.

use std::collections::VecDeque;

use glam::Vec2;
use horde_core::{ArenaBounds, TileCoord};

const UNVISITED: u32 = u32::MAX;

/// Expansion order of the 4-connected search: east, west, south, north.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Reusable breadth-first search over the arena's tile grid.
///
/// The search keeps its dense scratch buffers between calls so callers that
/// recompute paths every tick do not reallocate. Paths are never cached: every
/// call sees the obstacle set exactly as provided.
#[derive(Clone, Debug, Default)]
pub struct PathSearch {
    columns: i32,
    rows: i32,
    blocked: Vec<bool>,
    parents: Vec<u32>,
    queue: VecDeque<TileCoord>,
}

impl PathSearch {
    /// Creates a search with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the shortest 4-connected tile path from `start` to `goal`.
    ///
    /// Tiles listed in `obstacles` and tiles containing any of the `blockers`
    /// positions are impassable, except that a blocker standing on the start
    /// tile is ignored. The returned path begins with the start tile and ends
    /// with the goal tile. An empty path means the goal cannot be reached,
    /// including when either endpoint lies outside the grid.
    pub fn find_path<O, B>(
        &mut self,
        start: Vec2,
        goal: Vec2,
        bounds: ArenaBounds,
        obstacles: O,
        blockers: B,
    ) -> Vec<TileCoord>
    where
        O: IntoIterator<Item = TileCoord>,
        B: IntoIterator<Item = Vec2>,
    {
        let start_tile = TileCoord::containing(start);
        let goal_tile = TileCoord::containing(goal);
        if !bounds.contains_tile(start_tile) || !bounds.contains_tile(goal_tile) {
            return Vec::new();
        }

        self.reset(bounds);

        for tile in obstacles {
            self.block(tile);
        }
        for position in blockers {
            let tile = TileCoord::containing(position);
            if tile != start_tile {
                self.block(tile);
            }
        }

        let Some(start_index) = self.index(start_tile) else {
            return Vec::new();
        };
        self.parents[start_index] = start_index as u32;
        self.queue.push_back(start_tile);

        while let Some(tile) = self.queue.pop_front() {
            if tile == goal_tile {
                break;
            }

            let Some(current) = self.index(tile) else {
                continue;
            };

            for (columns, rows) in DIRECTIONS {
                let neighbor = tile.offset(columns, rows);
                let Some(next) = self.index(neighbor) else {
                    continue;
                };
                if self.blocked[next] || self.parents[next] != UNVISITED {
                    continue;
                }

                self.parents[next] = current as u32;
                self.queue.push_back(neighbor);
            }
        }

        self.reconstruct(start_index, goal_tile)
    }

    fn reset(&mut self, bounds: ArenaBounds) {
        self.columns = bounds.columns();
        self.rows = bounds.rows();
        let cell_count = usize::try_from(self.columns)
            .ok()
            .zip(usize::try_from(self.rows).ok())
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .unwrap_or(0);

        self.blocked.clear();
        self.blocked.resize(cell_count, false);
        self.parents.clear();
        self.parents.resize(cell_count, UNVISITED);
        self.queue.clear();
    }

    fn block(&mut self, tile: TileCoord) {
        if let Some(index) = self.index(tile) {
            self.blocked[index] = true;
        }
    }

    fn reconstruct(&self, start_index: usize, goal: TileCoord) -> Vec<TileCoord> {
        let Some(mut index) = self.index(goal) else {
            return Vec::new();
        };
        if self.parents[index] == UNVISITED {
            return Vec::new();
        }

        let mut path = vec![goal];
        while index != start_index {
            let parent = self.parents[index] as usize;
            path.push(self.tile_at(parent));
            index = parent;
        }
        path.reverse();
        path
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() < 0
            || tile.row() < 0
            || tile.column() >= self.columns
            || tile.row() >= self.rows
        {
            return None;
        }

        let column = usize::try_from(tile.column()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn tile_at(&self, index: usize) -> TileCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        TileCoord::new((index % width) as i32, (index / width) as i32)
    }
}

/// One-shot convenience wrapper around [`PathSearch::find_path`].
pub fn find_path<O, B>(
    start: Vec2,
    goal: Vec2,
    bounds: ArenaBounds,
    obstacles: O,
    blockers: B,
) -> Vec<TileCoord>
where
    O: IntoIterator<Item = TileCoord>,
    B: IntoIterator<Item = Vec2>,
{
    PathSearch::new().find_path(start, goal, bounds, obstacles, blockers)
}

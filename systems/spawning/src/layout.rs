use std::collections::HashSet;

use horde_core::{ArenaBounds, Material, ObstaclePlacement, TileCoord};
use rand::Rng;

const CROSS_PIECE_CHANCE: f64 = 0.4;

/// Generates a store floor plan of shelf aisles and small rooms.
///
/// Vertical aisles run every `max(6, columns / 4)` tiles from column 2 and
/// horizontal aisles every `max(8, rows / 5)` tiles from row 4, both broken
/// into short segments. Some vertical aisles get a 3x2 cross-piece and one or
/// two rooms with a doorway in their bottom wall are added. Every wall tile
/// draws a random material and each tile appears at most once.
pub fn generate_store_layout<R: Rng>(
    bounds: ArenaBounds,
    rng: &mut R,
) -> Vec<ObstaclePlacement> {
    let mut plan = FloorPlan {
        columns: bounds.columns(),
        rows: bounds.rows(),
        rng,
        placements: Vec::new(),
    };
    let columns = plan.columns;
    let rows = plan.rows;
    if columns <= 0 || rows <= 0 {
        return Vec::new();
    }

    let vertical_spacing = (columns / 4).max(6) as usize;
    let aisles: Vec<i32> = (2..columns - 2).step_by(vertical_spacing).collect();
    for &column in &aisles {
        let mut row = 2;
        while row < rows - 4 {
            let length = plan.rng.gen_range(4..=6);
            plan.vertical(column, row, (row + length - 1).min(rows - 4));
            row += length + plan.rng.gen_range(3..=4);
        }
    }

    let horizontal_spacing = (rows / 5).max(8) as usize;
    for row in (4..rows - 3).step_by(horizontal_spacing) {
        let mut column = 2;
        while column < columns - 4 {
            let length = plan.rng.gen_range(4..=6);
            plan.horizontal(row, column, (column + length - 1).min(columns - 4));
            column += length + plan.rng.gen_range(4..=6);
        }
    }

    for &column in &aisles {
        if plan.rng.gen_bool(CROSS_PIECE_CHANCE) {
            let row = 2 + plan.rng.gen_range(0..(rows - 8).max(1));
            plan.horizontal(row, column - 1, column + 1);
            plan.horizontal(row + 1, column - 1, column + 1);
        }
    }

    let rooms = plan.rng.gen_range(1..=2);
    for _ in 0..rooms {
        let width = plan.rng.gen_range(3..=5).min(columns - 2);
        let height = plan.rng.gen_range(3..=5).min(rows - 2);
        if width < 3 || height < 3 {
            continue;
        }
        let column = 1 + plan.rng.gen_range(0..columns - width - 1);
        let row = 1 + plan.rng.gen_range(0..rows - height - 1);
        plan.room(column, row, width, height);
    }

    let mut seen = HashSet::new();
    plan.placements.retain(|placement| seen.insert(placement.tile));
    plan.placements
}

struct FloorPlan<'a, R> {
    columns: i32,
    rows: i32,
    rng: &'a mut R,
    placements: Vec<ObstaclePlacement>,
}

impl<R: Rng> FloorPlan<'_, R> {
    fn wall(&mut self, column: i32, row: i32) {
        let material = Material::ALL[self.rng.gen_range(0..Material::ALL.len())];
        self.placements
            .push(ObstaclePlacement::new(TileCoord::new(column, row), material));
    }

    fn vertical(&mut self, column: i32, first_row: i32, last_row: i32) {
        let column = column.clamp(0, self.columns - 1);
        let first_row = first_row.clamp(0, self.rows - 1);
        let last_row = last_row.clamp(0, self.rows - 1);
        for row in first_row..=last_row {
            self.wall(column, row);
        }
    }

    fn horizontal(&mut self, row: i32, first_column: i32, last_column: i32) {
        let row = row.clamp(0, self.rows - 1);
        let first_column = first_column.clamp(0, self.columns - 1);
        let last_column = last_column.clamp(0, self.columns - 1);
        for column in first_column..=last_column {
            self.wall(column, row);
        }
    }

    fn room(&mut self, column: i32, row: i32, width: i32, height: i32) {
        let doorway = TileCoord::new(column + width / 2, row + height - 1);
        for x in column..column + width {
            for y in row..row + height {
                let edge =
                    x == column || x == column + width - 1 || y == row || y == row + height - 1;
                if edge && TileCoord::new(x, y) != doorway {
                    self.wall(x, y);
                }
            }
        }
    }
}

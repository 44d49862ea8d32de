//! Brick grid geometry
//!
//! The grid is fixed: 10 columns by 6 rows of 64x32 cells, cell (0, 0) centred
//! at (112, 100). Each row has its own brick colour.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A cell of the brick grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub col: u8,
    pub row: u8,
}

impl GridCell {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Cell containing `pos`, or `None` outside the grid
    pub fn at(pos: Vec2) -> Option<Self> {
        let fx = ((pos.x - GRID_ORIGIN_X) / CELL_WIDTH).floor();
        let fy = ((pos.y - GRID_ORIGIN_Y) / CELL_HEIGHT).floor();
        if fx < 0.0 || fy < 0.0 || fx >= GRID_COLUMNS as f32 || fy >= GRID_ROWS as f32 {
            return None;
        }
        Some(Self::new(fx as u8, fy as u8))
    }

    /// Cell at a row-major index (0..60)
    pub fn from_index(index: usize) -> Option<Self> {
        let cols = GRID_COLUMNS as usize;
        if index >= cols * GRID_ROWS as usize {
            return None;
        }
        Some(Self::new((index % cols) as u8, (index / cols) as u8))
    }

    /// Pixel position of the cell centre
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            GRID_FIRST_CENTER_X + self.col as f32 * CELL_WIDTH,
            GRID_FIRST_CENTER_Y + self.row as f32 * CELL_HEIGHT,
        )
    }

    pub fn color(&self) -> BrickColor {
        BrickColor::for_row(self.row)
    }

    /// Every cell, row-major
    pub fn all() -> impl Iterator<Item = GridCell> {
        (0..GRID_ROWS).flat_map(|row| (0..GRID_COLUMNS).map(move |col| GridCell::new(col, row)))
    }
}

/// Brick colours, one per grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Blue,
    Red,
    Green,
    Yellow,
    Silver,
    Purple,
}

impl BrickColor {
    pub const ROWS: [BrickColor; 6] = [
        BrickColor::Blue,
        BrickColor::Red,
        BrickColor::Green,
        BrickColor::Yellow,
        BrickColor::Silver,
        BrickColor::Purple,
    ];

    pub fn for_row(row: u8) -> Self {
        Self::ROWS[row as usize % Self::ROWS.len()]
    }

    /// Atlas frame this colour is drawn with
    pub fn frame(&self) -> &'static str {
        match self {
            BrickColor::Blue => "blue1",
            BrickColor::Red => "red1",
            BrickColor::Green => "green1",
            BrickColor::Yellow => "yellow1",
            BrickColor::Silver => "silver1",
            BrickColor::Purple => "purple1",
        }
    }
}

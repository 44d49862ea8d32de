//! Brick Mender - breakout with a repair crew
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, repair state machine)
//! - `scene`: Preloader/Game scene lifecycle driving the simulation
//! - `assets`: Atlas frames and audio clips registered by the Preloader
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound effects for game events
//! - `platform`: Browser/native platform abstraction (keyboard input)
//! - `tuning` / `settings` / `config`: Data-driven balance and preferences

pub mod assets;
pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (y grows downward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Walls sit just outside the playfield; the floor is open
    pub const WALL_THICKNESS: f32 = 32.0;

    /// Brick grid: 10 columns x 6 rows of 64x32 cells
    pub const GRID_COLUMNS: u8 = 10;
    pub const GRID_ROWS: u8 = 6;
    pub const CELL_WIDTH: f32 = 64.0;
    pub const CELL_HEIGHT: f32 = 32.0;
    /// Centre of cell (0, 0)
    pub const GRID_FIRST_CENTER_X: f32 = 112.0;
    pub const GRID_FIRST_CENTER_Y: f32 = 100.0;
    /// Top-left corner of cell (0, 0)
    pub const GRID_ORIGIN_X: f32 = GRID_FIRST_CENTER_X - CELL_WIDTH / 2.0;
    pub const GRID_ORIGIN_Y: f32 = GRID_FIRST_CENTER_Y - CELL_HEIGHT / 2.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 11.0;
    /// Height the ball is parked at while waiting to launch
    pub const BALL_SERVE_Y: f32 = 500.0;

    /// Paddle defaults - the paddle only moves horizontally
    pub const PADDLE_Y: f32 = 550.0;
    pub const PADDLE_WIDTH: f32 = 104.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;

    /// Hero defaults (ball2 sprite drawn at 2x scale)
    pub const HERO_RADIUS: f32 = 22.0;
    pub const HERO_SPAWN_Y: f32 = 350.0;
    pub const HERO_SPAWN_MIN_X: f32 = 100.0;
    pub const HERO_SPAWN_MAX_X: f32 = 700.0;

    /// Decoy must fall below this before a restart is accepted
    pub const DEATH_RESTART_Y: f32 = 650.0;
}

/// Rectangle centred on `center` with the given half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod repair;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionRule, Contact, circle_aabb, circle_circle, classify, detect_contacts,
    reflect_velocity,
};
pub use grid::{BrickColor, GridCell};
pub use repair::{RepairPhase, RepairState, RepairStep};
pub use state::{
    Ball, BallState, Brick, Collidable, Decoy, GameEvent, GamePhase, GameState, Hero, Paddle,
    Stats, Wall,
};
pub use tick::{TickInput, tick};

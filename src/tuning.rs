//! Data-driven game balance
//!
//! Every gameplay number that is a design choice rather than a layout fact lives
//! here. Missing keys in a config document fall back to the defaults below.

use serde::Deserialize;

use crate::consts::{GRID_COLUMNS, GRID_ROWS, SIM_DT};
use crate::error::{GameError, GameResult};

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    /// Fraction of the paddle-to-ball x error closed each frame
    pub paddle_pursuit: f32,
    /// Horizontal ball speed per pixel of offset from the paddle centre
    pub paddle_deflection_scale: f32,
    /// Range of the rightward nudge applied on a dead-centre paddle hit
    pub center_bias_min: f32,
    pub center_bias_max: f32,

    // === Ball ===
    /// Seconds the ball waits above the paddle before launching
    pub launch_delay_secs: f32,
    /// Launch horizontal speed magnitude range (sign picked at random)
    pub launch_speed_x_min: f32,
    pub launch_speed_x_max: f32,
    /// Launch vertical speed (upward)
    pub launch_speed_y: f32,

    // === Hero ===
    pub hero_speed: f32,
    /// Ball touching the hero wipes the whole brick set
    pub hero_strike_clears_bricks: bool,

    // === Repair ===
    /// Progress added per repair key press; 1.0 completes a brick
    pub repair_increment: f32,
    /// Hero must move this far from a fresh brick before it collides again
    pub repair_release_x: f32,
    pub repair_release_y: f32,

    // === Level ===
    /// Bricks placed row-major from cell (0, 0) at level start
    pub initial_brick_count: usize,

    // === Death animation ===
    pub decoy_hop_speed: f32,
    pub decoy_gravity: f32,
    pub decoy_spin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_pursuit: 0.1,
            paddle_deflection_scale: 10.0,
            center_bias_min: 2.0,
            center_bias_max: 10.0,

            launch_delay_secs: 1.0,
            launch_speed_x_min: 50.0,
            launch_speed_x_max: 150.0,
            launch_speed_y: 300.0,

            hero_speed: 400.0,
            hero_strike_clears_bricks: true,

            repair_increment: 0.11,
            repair_release_x: 42.0,
            repair_release_y: 24.0,

            initial_brick_count: 36,

            decoy_hop_speed: 300.0,
            decoy_gravity: 900.0,
            decoy_spin: 6.0,
        }
    }
}

impl Tuning {
    /// Launch delay expressed in simulation ticks
    pub fn launch_delay_ticks(&self) -> u32 {
        (self.launch_delay_secs / SIM_DT).round() as u32
    }

    /// Number of repair presses needed to finish one brick
    pub fn presses_per_repair(&self) -> u32 {
        let mut progress = 0.0_f32;
        let mut presses = 0;
        while progress < 1.0 {
            progress += self.repair_increment;
            presses += 1;
        }
        presses
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> GameResult<()> {
        check(
            "paddle_pursuit",
            self.paddle_pursuit,
            self.paddle_pursuit > 0.0 && self.paddle_pursuit <= 1.0,
            "(0.0, 1.0]",
        )?;
        check(
            "center_bias_min",
            self.center_bias_min,
            self.center_bias_min > 0.0 && self.center_bias_min < self.center_bias_max,
            "(0.0, center_bias_max)",
        )?;
        check(
            "launch_delay_secs",
            self.launch_delay_secs,
            self.launch_delay_secs >= 0.0,
            "[0.0, inf)",
        )?;
        check(
            "launch_speed_x_min",
            self.launch_speed_x_min,
            self.launch_speed_x_min >= 0.0 && self.launch_speed_x_min < self.launch_speed_x_max,
            "[0.0, launch_speed_x_max)",
        )?;
        check(
            "launch_speed_y",
            self.launch_speed_y,
            self.launch_speed_y > 0.0,
            "(0.0, inf)",
        )?;
        check(
            "hero_speed",
            self.hero_speed,
            self.hero_speed >= 0.0,
            "[0.0, inf)",
        )?;
        check(
            "repair_increment",
            self.repair_increment,
            self.repair_increment > 0.0 && self.repair_increment <= 1.0,
            "(0.0, 1.0]",
        )?;
        check(
            "paddle_deflection_scale",
            self.paddle_deflection_scale,
            self.paddle_deflection_scale.is_finite(),
            "finite",
        )?;
        check(
            "repair_release_x",
            self.repair_release_x,
            self.repair_release_x.is_finite() && self.repair_release_x >= 0.0,
            "[0.0, inf)",
        )?;
        check(
            "repair_release_y",
            self.repair_release_y,
            self.repair_release_y.is_finite() && self.repair_release_y >= 0.0,
            "[0.0, inf)",
        )?;
        // The decoy must come back down or restart is never offered
        check(
            "decoy_gravity",
            self.decoy_gravity,
            self.decoy_gravity.is_finite() && self.decoy_gravity > 0.0,
            "(0.0, inf)",
        )?;
        check(
            "decoy_hop_speed",
            self.decoy_hop_speed,
            self.decoy_hop_speed.is_finite() && self.decoy_hop_speed >= 0.0,
            "[0.0, inf)",
        )?;
        let max_bricks = GRID_COLUMNS as usize * GRID_ROWS as usize;
        check(
            "initial_brick_count",
            self.initial_brick_count as f32,
            (1..=max_bricks).contains(&self.initial_brick_count),
            "[1, 60]",
        )?;
        Ok(())
    }
}

fn check(field: &'static str, value: f32, ok: bool, expected: &'static str) -> GameResult<()> {
    if ok {
        Ok(())
    } else {
        Err(GameError::InvalidTuning {
            field,
            value,
            expected,
        })
    }
}

//! Game state and core simulation types
//!
//! Everything the Game scene mutates lives in [`GameState`]; frame updates and
//! collision handlers receive it explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{BrickColor, GridCell};
use super::repair::RepairState;
use crate::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Brick set emptied; waiting for restart
    GameOver,
}

/// Ball serve state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Parked above the paddle, launches when the countdown hits zero
    Held { launch_in_ticks: u32 },
    /// Free-moving
    Free,
    /// Frozen after game over
    Stopped,
}

/// A side of the playfield that bounces the ball. The floor is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
}

impl Wall {
    pub const ALL: [Wall; 3] = [Wall::Left, Wall::Right, Wall::Top];

    /// Wall body, sitting just outside the playfield
    pub fn aabb(&self) -> Aabb {
        let t = WALL_THICKNESS;
        match self {
            Wall::Left => Aabb::new(
                Vec2::new(-t / 2.0, WORLD_HEIGHT / 2.0),
                Vec2::new(t, WORLD_HEIGHT + 2.0 * t),
            ),
            Wall::Right => Aabb::new(
                Vec2::new(WORLD_WIDTH + t / 2.0, WORLD_HEIGHT / 2.0),
                Vec2::new(t, WORLD_HEIGHT + 2.0 * t),
            ),
            Wall::Top => Aabb::new(
                Vec2::new(WORLD_WIDTH / 2.0, -t / 2.0),
                Vec2::new(WORLD_WIDTH + 2.0 * t, t),
            ),
        }
    }
}

/// What a physics body is, fixed when the body is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collidable {
    Ball,
    Brick(u32),
    Paddle,
    Wall(Wall),
    Hero,
}

/// A brick occupying one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub cell: GridCell,
    pub pos: Vec2,
    pub color: BrickColor,
    /// Built by the repair mechanic rather than placed at level start
    pub repaired: bool,
}

impl Brick {
    pub fn new(id: u32, cell: GridCell, repaired: bool) -> Self {
        Self {
            id,
            cell,
            pos: cell.center(),
            color: cell.color(),
            repaired,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(CELL_WIDTH, CELL_HEIGHT))
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Stopped,
        }
    }

    /// Outside the playfield: below it, or past either side
    pub fn is_out_of_play(&self) -> bool {
        self.pos.y > WORLD_HEIGHT || self.pos.x < 0.0 || self.pos.x > WORLD_WIDTH
    }

    /// Whether the ball takes part in integration and contacts
    pub fn is_live(&self) -> bool {
        self.state == BallState::Free
    }
}

/// The paddle. Its y is fixed; it chases the ball on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: WORLD_WIDTH / 2.0,
        }
    }
}

impl Paddle {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, PADDLE_Y)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos(), Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT))
    }

    /// Close `factor` of the gap to `target_x`
    pub fn pursue(&mut self, target_x: f32, factor: f32) {
        self.x -= (self.x - target_x) * factor;
    }
}

/// The player-controlled repair character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Hero {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: HERO_RADIUS,
        }
    }

    /// Keep the hero inside the playfield
    pub fn clamp_to_world(&mut self) {
        let min = Vec2::splat(self.radius);
        let max = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) - self.radius;
        let clamped = self.pos.clamp(min, max);
        if clamped.x != self.pos.x {
            self.vel.x = 0.0;
        }
        if clamped.y != self.pos.y {
            self.vel.y = 0.0;
        }
        self.pos = clamped;
    }
}

/// Non-colliding stand-in that tumbles off screen when the hero dies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
}

impl Decoy {
    pub fn new(pos: Vec2, hop_speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -hop_speed),
            rotation: 0.0,
        }
    }

    pub fn fall(&mut self, gravity: f32, spin: f32, dt: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
        self.rotation += spin * dt;
    }

    /// Fallen far enough for a restart to be accepted
    pub fn has_left_playfield(&self) -> bool {
        self.pos.y > DEATH_RESTART_Y
    }
}

/// Things that happened during a tick, drained by the host for audio/HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickDestroyed { id: u32, cell: GridCell },
    BrickRepaired { id: u32, cell: GridCell },
    RepairProgress { cell: GridCell, progress: f32 },
    PaddleHit,
    WallHit(Wall),
    BallReset,
    BallLaunched,
    /// Ball touched the hero
    HeroStruck,
    GameOver,
    Restarted,
    Paused,
    Resumed,
}

/// Running totals shown on the HUD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub bricks_destroyed: u32,
    pub bricks_repaired: u32,
    pub balls_lost: u32,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG for launch angles and paddle centre bias
    pub rng: Pcg32,
    /// Balance values
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Active bricks (sorted by id). Membership means "still in play".
    pub bricks: Vec<Brick>,
    pub ball: Ball,
    pub paddle: Paddle,
    /// `None` once the hero has died
    pub hero: Option<Hero>,
    /// Falling stand-in after death
    pub decoy: Option<Decoy>,
    pub repair: RepairState,
    pub stats: Stats,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game: lay out the level, spawn the hero, serve the ball
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hero_x = rng.random_range(HERO_SPAWN_MIN_X..=HERO_SPAWN_MAX_X).round();

        let paddle = Paddle::default();
        let mut state = Self {
            seed,
            rng,
            tuning,
            time_ticks: 0,
            phase: GamePhase::Playing,
            bricks: Vec::new(),
            ball: Ball::new(Vec2::new(paddle.x, BALL_SERVE_Y)),
            paddle,
            hero: Some(Hero::new(Vec2::new(hero_x, HERO_SPAWN_Y))),
            decoy: None,
            repair: RepairState::default(),
            stats: Stats::default(),
            events: Vec::new(),
            next_id: 1,
        };

        state.lay_out_level();
        state.reset_ball();
        state.events.clear();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fill the first `initial_brick_count` cells row-major
    fn lay_out_level(&mut self) {
        self.bricks.clear();
        for cell in GridCell::all().take(self.tuning.initial_brick_count) {
            let id = self.next_entity_id();
            self.bricks.push(Brick::new(id, cell, false));
        }
    }

    /// Park the ball above the paddle and start the launch countdown
    pub fn reset_ball(&mut self) {
        self.ball.pos = Vec2::new(self.paddle.x, BALL_SERVE_Y);
        self.ball.vel = Vec2::ZERO;
        self.ball.state = BallState::Held {
            launch_in_ticks: self.tuning.launch_delay_ticks(),
        };
        self.events.push(GameEvent::BallReset);
    }

    /// Give a held ball its launch velocity
    pub fn launch_ball(&mut self) {
        let t = &self.tuning;
        let speed_x = self.rng.random_range(t.launch_speed_x_min..t.launch_speed_x_max);
        let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.vel = Vec2::new(sign * speed_x, -t.launch_speed_y);
        self.ball.state = BallState::Free;
        self.events.push(GameEvent::BallLaunched);
    }

    pub fn brick(&self, id: u32) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    pub fn brick_at(&self, cell: GridCell) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.cell == cell)
    }

    /// Take a brick out of play. Returns false if it was already gone.
    pub fn remove_brick(&mut self, id: u32) -> bool {
        let Some(idx) = self.bricks.iter().position(|b| b.id == id) else {
            return false;
        };
        let brick = self.bricks.remove(idx);
        self.repair.forget_brick(brick.id);
        self.stats.bricks_destroyed += 1;
        self.events.push(GameEvent::BrickDestroyed {
            id: brick.id,
            cell: brick.cell,
        });
        true
    }

    /// Take every brick out of play
    pub fn clear_bricks(&mut self) {
        let ids: Vec<u32> = self.bricks.iter().map(|b| b.id).collect();
        for id in ids {
            self.remove_brick(id);
        }
    }

    /// Build a repaired brick in `cell`. Returns its id, or `None` if occupied.
    pub fn spawn_repaired_brick(&mut self, cell: GridCell) -> Option<u32> {
        if self.brick_at(cell).is_some() {
            return None;
        }
        let id = self.next_entity_id();
        self.bricks.push(Brick::new(id, cell, true));
        self.stats.bricks_repaired += 1;
        self.events.push(GameEvent::BrickRepaired { id, cell });
        Some(id)
    }

    /// Hero destroyed, decoy spawned, ball frozen. Runs at most once per game.
    pub fn trigger_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if let Some(hero) = self.hero.take() {
            self.decoy = Some(Decoy::new(hero.pos, self.tuning.decoy_hop_speed));
        }
        self.ball.vel = Vec2::ZERO;
        self.ball.state = BallState::Stopped;
        self.repair.reset();
        self.repair.just_repaired = None;
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!(
            "Game over after {} ticks ({} destroyed, {} repaired)",
            self.time_ticks,
            self.stats.bricks_destroyed,
            self.stats.bricks_repaired
        );
    }

    /// Whether a restart command would be honoured now
    pub fn can_restart(&self) -> bool {
        self.phase == GamePhase::GameOver
            && self.decoy.as_ref().is_none_or(|d| d.has_left_playfield())
    }

    /// Rebuild everything from scratch, keeping the tuning
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(seed, tuning);
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted with seed: {}", seed);
    }

    /// Hand accumulated events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

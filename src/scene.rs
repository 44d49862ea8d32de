//! Scene lifecycle
//!
//! Two scenes run in sequence: [`Preloader`] registers the atlas and clips,
//! then hands over to [`GameScene`], which owns the simulation. The
//! [`SceneDirector`] makes sure a scene has loaded and entered before it sees
//! its first frame.

use crate::assets::{AssetRegistry, frames};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::{GameError, GameResult};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneId {
    Preloader,
    Game,
}

/// What the director should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition {
    Stay,
    Switch(SceneId),
}

pub trait Scene {
    fn id(&self) -> SceneId;

    fn name(&self) -> &'static str;

    /// Register whatever the scene needs before it enters
    fn on_load(&mut self, _assets: &mut AssetRegistry) {}

    /// Build scene state. Runs once before the first `on_frame`.
    fn on_enter(&mut self, assets: &AssetRegistry) -> GameResult<()>;

    /// Advance by one rendered frame of `dt` seconds
    fn on_frame(&mut self, input: &TickInput, dt: f32) -> GameResult<SceneTransition>;

    /// Simulation state, for scenes that have one
    fn game_state(&self) -> Option<&GameState> {
        None
    }

    /// Events produced since the last call
    fn drain_events(&mut self) -> Vec<GameEvent> {
        Vec::new()
    }
}

/// Loads the atlas, then starts the game
#[derive(Debug, Default)]
pub struct Preloader;

impl Scene for Preloader {
    fn id(&self) -> SceneId {
        SceneId::Preloader
    }

    fn name(&self) -> &'static str {
        "preloader"
    }

    fn on_load(&mut self, assets: &mut AssetRegistry) {
        log::info!("Preloader enter");
        assets.load_all();
    }

    fn on_enter(&mut self, _assets: &AssetRegistry) -> GameResult<()> {
        log::info!("Preloader leave");
        Ok(())
    }

    fn on_frame(&mut self, _input: &TickInput, _dt: f32) -> GameResult<SceneTransition> {
        Ok(SceneTransition::Switch(SceneId::Game))
    }
}

/// The playable scene: fixed-timestep driver around [`GameState`]
#[derive(Debug)]
pub struct GameScene {
    seed: u64,
    tuning: Tuning,
    state: Option<GameState>,
    accumulator: f32,
    /// Edges that arrived on a frame too short to run a tick
    pending: TickInput,
}

impl GameScene {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            state: None,
            accumulator: 0.0,
            pending: TickInput::default(),
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }
}

impl Scene for GameScene {
    fn id(&self) -> SceneId {
        SceneId::Game
    }

    fn name(&self) -> &'static str {
        "game"
    }

    fn on_enter(&mut self, assets: &AssetRegistry) -> GameResult<()> {
        for name in [frames::BALL, frames::HERO, frames::PADDLE, frames::DECOY] {
            assets.frame(name)?;
        }
        self.state = Some(GameState::with_tuning(self.seed, self.tuning.clone()));
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        log::info!("Game enter (seed {})", self.seed);
        Ok(())
    }

    fn on_frame(&mut self, input: &TickInput, dt: f32) -> GameResult<SceneTransition> {
        let Some(state) = self.state.as_mut() else {
            return Err(GameError::SceneNotReady { scene: "game" });
        };

        // Large gaps (tab switch) are clamped rather than replayed
        self.accumulator += dt.min(0.1);

        let mut input = *input;
        input.repair |= self.pending.repair;
        input.restart |= self.pending.restart;
        input.pause |= self.pending.pause;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.repair = false;
            input.restart = false;
            input.pause = false;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        self.pending = if substeps == 0 { input } else { TickInput::default() };

        Ok(SceneTransition::Stay)
    }

    fn game_state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state
            .as_mut()
            .map(GameState::drain_events)
            .unwrap_or_default()
    }
}

/// Owns the scenes and the asset registry, and runs the active scene
pub struct SceneDirector {
    assets: AssetRegistry,
    scenes: Vec<Box<dyn Scene>>,
    active: usize,
    entered: bool,
}

impl SceneDirector {
    /// Scenes start in the order given; the first is active
    pub fn new(scenes: Vec<Box<dyn Scene>>) -> Self {
        Self {
            assets: AssetRegistry::new(),
            scenes,
            active: 0,
            entered: false,
        }
    }

    /// Preloader followed by the game
    pub fn standard(seed: u64, tuning: Tuning) -> Self {
        Self::new(vec![
            Box::new(Preloader),
            Box::new(GameScene::new(seed, tuning)),
        ])
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn active_id(&self) -> Option<SceneId> {
        self.scenes.get(self.active).map(|s| s.id())
    }

    pub fn game_state(&self) -> Option<&GameState> {
        self.scenes.get(self.active).and_then(|s| s.game_state())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.scenes
            .get_mut(self.active)
            .map(|s| s.drain_events())
            .unwrap_or_default()
    }

    /// Run one frame, entering the active scene first if needed
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> GameResult<()> {
        let Some(scene) = self.scenes.get_mut(self.active) else {
            return Ok(());
        };

        if !self.entered {
            scene.on_load(&mut self.assets);
            scene.on_enter(&self.assets)?;
            self.entered = true;
        }

        if let SceneTransition::Switch(id) = scene.on_frame(input, dt)? {
            self.switch_to(id);
        }
        Ok(())
    }

    fn switch_to(&mut self, id: SceneId) {
        match self.scenes.iter().position(|s| s.id() == id) {
            Some(index) => {
                log::debug!(
                    "Scene switch: {} -> {}",
                    self.scenes[self.active].name(),
                    self.scenes[index].name()
                );
                self.active = index;
                self.entered = false;
            }
            None => log::warn!("No scene registered for {:?}", id),
        }
    }
}

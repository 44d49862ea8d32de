//! Fixed timestep simulation tick
//!
//! Advances the game deterministically: same seed plus same input stream gives
//! the same state.

use glam::Vec2;
use rand::Rng;

use super::collision::{CollisionRule, Contact, classify, detect_contacts, reflect_velocity};
use super::grid::GridCell;
use super::repair::RepairStep;
use super::state::{BallState, Collidable, GameEvent, GamePhase, GameState, Wall};

/// Input commands for a single tick (deterministic)
///
/// Directions are held state; `repair`, `restart` and `pause` are one-shot
/// edges and must only be set on the tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Repair key pressed this tick
    pub repair: bool,
    /// Restart requested (only honoured once the decoy is off screen)
    pub restart: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Direction the held keys point in, each axis in {-1, 0, 1}
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            tick_game_over(state, input, dt);
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Ball left the playfield: park it above the paddle again
    if state.ball.is_live() && state.ball.is_out_of_play() {
        state.stats.balls_lost += 1;
        state.reset_ball();
    }

    if let BallState::Held { launch_in_ticks } = state.ball.state {
        if launch_in_ticks <= 1 {
            state.launch_ball();
        } else {
            state.ball.state = BallState::Held {
                launch_in_ticks: launch_in_ticks - 1,
            };
        }
    }

    let pursuit = state.tuning.paddle_pursuit;
    let ball_x = state.ball.pos.x;
    state.paddle.pursue(ball_x, pursuit);

    let hero_speed = state.tuning.hero_speed;
    if let Some(hero) = &mut state.hero {
        hero.vel = input.direction() * hero_speed;
        hero.pos += hero.vel * dt;
        hero.clamp_to_world();
    }

    if state.ball.is_live() {
        state.ball.pos += state.ball.vel * dt;
    }

    let had_bricks = !state.bricks.is_empty();

    for contact in detect_contacts(state) {
        let Some(rule) = classify(&contact, state.repair.just_repaired) else {
            continue;
        };
        resolve(state, &contact, rule);
    }

    if had_bricks && state.bricks.is_empty() {
        state.trigger_game_over();
        return;
    }

    update_repair(state, input);
}

/// Game over: the decoy tumbles, and a restart is accepted once it is gone
fn tick_game_over(state: &mut GameState, input: &TickInput, dt: f32) {
    let (gravity, spin) = (state.tuning.decoy_gravity, state.tuning.decoy_spin);
    if let Some(decoy) = &mut state.decoy {
        decoy.fall(gravity, spin, dt);
    }

    if input.restart && state.can_restart() {
        state.restart();
    }
}

/// Apply one classified contact
fn resolve(state: &mut GameState, contact: &Contact, rule: CollisionRule) {
    if !rule.suppresses_default_response() && !apply_default_response(state, contact) {
        // Body went away earlier this frame
        return;
    }

    match rule {
        CollisionRule::BallBrick(id) => {
            if state.remove_brick(id) {
                log::debug!("Brick {} destroyed, {} left", id, state.bricks.len());
            }
        }
        CollisionRule::BallPaddle => {
            let offset = state.ball.pos.x - state.paddle.x;
            state.ball.vel.x = if offset == 0.0 {
                let (min, max) = (state.tuning.center_bias_min, state.tuning.center_bias_max);
                state.rng.random_range(min..max)
            } else {
                state.tuning.paddle_deflection_scale * offset
            };
            state.events.push(GameEvent::PaddleHit);
        }
        CollisionRule::BallWall(wall) => {
            let ball = &mut state.ball;
            match wall {
                Wall::Left | Wall::Right => {
                    if ball.vel.x * contact.normal.x < 0.0 {
                        ball.vel.x = -ball.vel.x;
                    }
                }
                Wall::Top => {
                    if ball.vel.y * contact.normal.y < 0.0 {
                        ball.vel.y = -ball.vel.y;
                    }
                }
            }
            ball.pos += contact.normal * contact.penetration;
            state.events.push(GameEvent::WallHit(wall));
        }
        CollisionRule::HeroRepairedBrick(_) | CollisionRule::HeroBrick(_) => {}
        CollisionRule::BallHero => {
            state.events.push(GameEvent::HeroStruck);
            if state.tuning.hero_strike_clears_bricks {
                log::info!("Hero struck by the ball, clearing {} bricks", state.bricks.len());
                state.clear_bricks();
            }
        }
    }
}

/// Separate the moving body from what it hit and reflect or stop it.
/// Returns false if either body is no longer in play.
fn apply_default_response(state: &mut GameState, contact: &Contact) -> bool {
    if let Collidable::Brick(id) = contact.b {
        if state.brick(id).is_none() {
            return false;
        }
    }

    let push = contact.normal * contact.penetration;
    match contact.a {
        Collidable::Ball => {
            let ball = &mut state.ball;
            if ball.vel.dot(contact.normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, contact.normal);
            }
            ball.pos += push;
            true
        }
        Collidable::Hero => {
            let Some(hero) = &mut state.hero else {
                return false;
            };
            let into = hero.vel.dot(contact.normal);
            if into < 0.0 {
                hero.vel -= contact.normal * into;
            }
            hero.pos += push;
            true
        }
        _ => true,
    }
}

/// Track the hero's cell, release the just-repaired brick, count repair presses
fn update_repair(state: &mut GameState, input: &TickInput) {
    let Some(hero_pos) = state.hero.as_ref().map(|h| h.pos) else {
        return;
    };

    if let Some(id) = state.repair.just_repaired {
        match state.brick(id).map(|b| b.pos) {
            Some(brick_pos) => {
                let threshold =
                    Vec2::new(state.tuning.repair_release_x, state.tuning.repair_release_y);
                state.repair.release_if_clear(hero_pos, brick_pos, threshold);
            }
            None => state.repair.just_repaired = None,
        }
    }

    state.repair.track(GridCell::at(hero_pos));

    if !input.repair {
        return;
    }
    if let Some(target) = state.repair.target {
        if state.brick_at(target).is_some() {
            return;
        }
    }

    match state.repair.press(state.tuning.repair_increment) {
        RepairStep::Idle => {}
        RepairStep::Progress { cell, progress } => {
            state.events.push(GameEvent::RepairProgress { cell, progress });
        }
        RepairStep::Completed(cell) => {
            state.events.push(GameEvent::RepairProgress {
                cell,
                progress: 1.0,
            });
            if let Some(id) = state.spawn_repaired_brick(cell) {
                state.repair.just_repaired = Some(id);
                log::debug!("Brick {} repaired at ({}, {})", id, cell.col, cell.row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::grid::BrickColor;
    use crate::sim::state::Hero;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn press() -> TickInput {
        TickInput {
            repair: true,
            ..Default::default()
        }
    }

    /// Free ball at `pos` moving at `vel`, paddle under it, no hero
    fn free_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        state.ball.pos = pos;
        state.ball.vel = vel;
        state.ball.state = BallState::Free;
        state.paddle.x = pos.x;
        state.hero = None;
    }

    /// Only the top row left, hero standing in cell (3, 2)
    fn repair_site(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.bricks.retain(|b| b.cell.row == 0);
        state.hero.as_mut().unwrap().pos = Vec2::new(304.0, 164.0);
        state
    }

    #[test]
    fn test_direction_cancels_opposites() {
        let input = TickInput {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_ten_presses_build_green_brick() {
        let mut state = repair_site(12345);
        for _ in 0..9 {
            tick(&mut state, &press(), SIM_DT);
        }
        assert!(state.brick_at(GridCell::new(3, 2)).is_none());

        tick(&mut state, &press(), SIM_DT);
        let brick = state.brick_at(GridCell::new(3, 2)).expect("repaired brick");
        assert_eq!(brick.color, BrickColor::Green);
        assert_eq!(brick.pos, Vec2::new(304.0, 164.0));
        assert!(brick.repaired);
        assert_eq!(state.repair.progress, 0.0);
        assert_eq!(state.repair.just_repaired, Some(brick.id));
    }

    #[test]
    fn test_hero_can_stand_in_fresh_brick() {
        let mut state = repair_site(12345);
        let id = state.spawn_repaired_brick(GridCell::new(3, 2)).unwrap();
        state.repair.just_repaired = Some(id);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.hero.as_ref().unwrap().pos, Vec2::new(304.0, 164.0));
        assert_eq!(state.repair.just_repaired, Some(id));

        // Walk away far enough and the exemption ends
        state.hero.as_mut().unwrap().pos = Vec2::new(304.0, 230.0);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.repair.just_repaired, None);
    }

    #[test]
    fn test_presses_on_occupied_cell_are_ignored() {
        let mut state = repair_site(3);
        for _ in 0..10 {
            tick(&mut state, &press(), SIM_DT);
        }
        let count = state.bricks.len();

        // Still standing in the brick just built
        for _ in 0..20 {
            tick(&mut state, &press(), SIM_DT);
        }
        assert_eq!(state.bricks.len(), count);
        assert_eq!(state.stats.bricks_repaired, 1);
        assert_eq!(state.repair.progress, 0.0);
    }

    #[test]
    fn test_progress_resets_when_cell_changes() {
        let mut state = repair_site(5);
        for _ in 0..3 {
            tick(&mut state, &press(), SIM_DT);
        }
        assert!(state.repair.progress > 0.3);

        state.hero.as_mut().unwrap().pos = Vec2::new(368.0, 164.0);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.repair.target, Some(GridCell::new(4, 2)));
        assert_eq!(state.repair.progress, 0.0);

        state.hero.as_mut().unwrap().pos = Vec2::new(368.0, 400.0);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.repair.target, None);
    }

    #[test]
    fn test_paddle_dead_centre_bias() {
        for seed in 0..20 {
            let mut state = GameState::new(seed);
            free_ball(&mut state, Vec2::new(400.0, 530.0), Vec2::new(0.0, 300.0));
            tick(&mut state, &idle(), SIM_DT);
            assert!(
                (2.0..10.0).contains(&state.ball.vel.x),
                "vx = {}",
                state.ball.vel.x
            );
            assert!(state.ball.vel.y < 0.0);
            assert!(state.events.contains(&GameEvent::PaddleHit));
        }
    }

    #[test]
    fn test_paddle_offset_deflection() {
        let mut state = GameState::new(1);
        free_ball(&mut state, Vec2::new(420.0, 530.0), Vec2::new(0.0, 300.0));
        state.paddle.x = 400.0;
        tick(&mut state, &idle(), SIM_DT);
        // Paddle closed a tenth of the gap before the hit
        let offset = state.ball.pos.x - state.paddle.x;
        assert!((state.ball.vel.x - 10.0 * offset).abs() < 1e-3);
        assert!(state.ball.vel.x > 0.0);
    }

    #[test]
    fn test_side_walls_invert_vx_only() {
        let mut state = GameState::new(1);
        free_ball(&mut state, Vec2::new(12.0, 400.0), Vec2::new(-200.0, 50.0));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.ball.vel, Vec2::new(200.0, 50.0));
        assert!(state.ball.pos.x >= BALL_RADIUS - 1e-3);
        assert!(state.events.contains(&GameEvent::WallHit(Wall::Left)));

        let mut state = GameState::new(1);
        free_ball(&mut state, Vec2::new(788.0, 400.0), Vec2::new(200.0, 50.0));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.ball.vel, Vec2::new(-200.0, 50.0));
    }

    #[test]
    fn test_top_wall_inverts_vy_only() {
        let mut state = GameState::new(1);
        free_ball(&mut state, Vec2::new(400.0, 12.0), Vec2::new(50.0, -200.0));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.ball.vel, Vec2::new(50.0, 200.0));
        assert!(state.events.contains(&GameEvent::WallHit(Wall::Top)));
    }

    #[test]
    fn test_last_brick_triggers_game_over_same_frame() {
        let mut state = GameState::new(9);
        state.bricks.truncate(1);
        let target = state.bricks[0].pos;
        let hero_pos = state.hero.as_ref().unwrap().pos;
        free_ball(&mut state, target + Vec2::new(0.0, 30.0), Vec2::new(0.0, -300.0));
        state.hero = Some(Hero::new(hero_pos));

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.bricks.is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.hero.is_none());
        assert!(state.decoy.is_some());
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.ball.state, BallState::Stopped);

        let events = state.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);

        // Nothing more fires on later frames
        for _ in 0..30 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!(!state.drain_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_hero_strike_clears_bricks() {
        let mut state = GameState::new(4);
        let hero_pos = Vec2::new(400.0, 350.0);
        free_ball(&mut state, hero_pos + Vec2::new(0.0, 35.0), Vec2::new(0.0, -300.0));
        state.hero = Some(Hero::new(hero_pos));

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.events.contains(&GameEvent::HeroStruck));
        assert!(state.bricks.is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_hero_strike_can_be_disabled() {
        let tuning = Tuning {
            hero_strike_clears_bricks: false,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(4, tuning);
        let hero_pos = Vec2::new(400.0, 350.0);
        free_ball(&mut state, hero_pos + Vec2::new(0.0, 35.0), Vec2::new(0.0, -300.0));
        state.hero = Some(Hero::new(hero_pos));

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.events.contains(&GameEvent::HeroStruck));
        assert_eq!(state.bricks.len(), 36);
        assert_eq!(state.phase, GamePhase::Playing);
        // No physical response to the strike
        assert_eq!(state.ball.vel, Vec2::new(0.0, -300.0));
    }

    /// Fresh repaired brick at (3, 2) with the hero overlapping its right edge
    fn marked_brick(seed: u64) -> (GameState, u32) {
        let mut state = repair_site(seed);
        let id = state.spawn_repaired_brick(GridCell::new(3, 2)).unwrap();
        state.repair.just_repaired = Some(id);
        state.hero.as_mut().unwrap().pos = Vec2::new(344.0, 164.0);
        (state, id)
    }

    #[test]
    fn test_ball_destroying_marked_brick_clears_marker() {
        let (mut state, id) = marked_brick(8);
        let hero = state.hero.clone();
        // Under the left half of the brick, away from the hero
        free_ball(&mut state, Vec2::new(274.0, 194.0), Vec2::new(0.0, -300.0));
        state.hero = hero;

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.brick(id).is_none());
        assert_eq!(state.repair.just_repaired, None);
        assert_eq!(state.phase, GamePhase::Playing);
        // Hero still close enough that only the removal can explain it
        let hero = state.hero.as_ref().unwrap();
        assert!((hero.pos.x - 304.0).abs() <= state.tuning.repair_release_x);
    }

    #[test]
    fn test_hero_strike_clears_marker() {
        let (mut state, id) = marked_brick(8);
        let hero = state.hero.clone();
        free_ball(&mut state, Vec2::new(344.0, 199.0), Vec2::new(0.0, -300.0));
        state.hero = hero;

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.events.contains(&GameEvent::HeroStruck));
        assert!(state.brick(id).is_none());
        assert!(state.bricks.is_empty());
        assert_eq!(state.repair.just_repaired, None);
    }

    #[test]
    fn test_hero_stopped_by_brick() {
        let mut state = GameState::new(2);
        // Just below brick (0, 3), walking up into it
        let below = GridCell::new(0, 3).center() + Vec2::new(0.0, 16.0 + 22.0 + 2.0);
        state.hero.as_mut().unwrap().pos = below;
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &up, SIM_DT);
        }
        let hero = state.hero.as_ref().unwrap();
        assert!(hero.pos.y >= below.y - 2.0 - 1e-3);
        assert_eq!(state.bricks.len(), 36);
    }

    #[test]
    fn test_lost_ball_is_reset_and_relaunched() {
        let mut state = GameState::new(8);
        free_ball(&mut state, Vec2::new(300.0, 595.0), Vec2::new(0.0, 600.0));
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.ball.pos.y > WORLD_HEIGHT);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.stats.balls_lost, 1);
        assert!(matches!(state.ball.state, BallState::Held { .. }));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(state.events.contains(&GameEvent::BallReset));

        // Held ball stays put for the whole delay
        let held_at = state.ball.pos;
        for _ in 0..58 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.ball.pos, held_at);
        assert!(matches!(state.ball.state, BallState::Held { .. }));

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.ball.state, BallState::Free);
        assert_eq!(state.ball.vel.y, -300.0);
    }

    #[test]
    fn test_first_launch_after_one_second() {
        let mut state = GameState::new(77);
        for _ in 0..59 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.ball.state, BallState::Held { launch_in_ticks: 1 });
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.ball.is_live());
        assert!(state.events.contains(&GameEvent::BallLaunched));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.time_ticks, frozen);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, frozen + 1);
    }

    #[test]
    fn test_restart_waits_for_decoy() {
        let mut state = GameState::new(21);
        state.clear_bricks();
        state.trigger_game_over();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };

        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let mut ticks = 0;
        while !state.can_restart() {
            tick(&mut state, &idle(), SIM_DT);
            ticks += 1;
            assert!(ticks < 600, "decoy never left the playfield");
        }

        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bricks.len(), 36);
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                down: true,
                repair: true,
                ..Default::default()
            },
            idle(),
        ];

        for i in 0..900 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.paddle, state2.paddle);
        assert_eq!(state1.hero, state2.hero);
        assert_eq!(state1.bricks, state2.bricks);
        assert_eq!(state1.events, state2.events);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<[bool; 4]>(), any::<bool>()).prop_map(|([left, right, up, down], repair)| {
            TickInput {
                left,
                right,
                up,
                down,
                repair,
                ..Default::default()
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_brick_count_grows_only_by_repair(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..400),
        ) {
            let mut state = GameState::new(seed);
            let mut game_overs = 0;
            for input in &inputs {
                let before = state.bricks.len();
                tick(&mut state, input, SIM_DT);
                let after = state.bricks.len();
                let events = state.drain_events();
                let repaired = events
                    .iter()
                    .any(|e| matches!(e, GameEvent::BrickRepaired { .. }));

                prop_assert!(after <= before + 1);
                if after > before {
                    prop_assert!(repaired);
                }
                if before > 0 && after == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                    prop_assert!(state.hero.is_none());
                }
                game_overs += events.iter().filter(|e| **e == GameEvent::GameOver).count();
            }
            prop_assert!(game_overs <= 1);
        }

        #[test]
        fn prop_fewer_than_ten_presses_build_nothing(count in 1usize..10) {
            let mut state = repair_site(0);
            for _ in 0..count {
                tick(&mut state, &press(), SIM_DT);
            }
            prop_assert!(state.brick_at(GridCell::new(3, 2)).is_none());
        }
    }
}

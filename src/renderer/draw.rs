//! Scene assembly: turns a [`GameState`] into one triangle list per frame
//!
//! Draw order is back to front: playfield, ghost grid, bricks, repair target,
//! paddle, ball, hero (or the falling decoy).

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::Aabb;
use crate::assets::{AssetRegistry, frames};
use crate::consts::*;
use crate::error::GameResult;
use crate::settings::Settings;
use crate::sim::{GameState, GridCell, RepairPhase};

const CIRCLE_SEGMENTS: u32 = 24;
const BAR_HEIGHT: f32 = 6.0;
const GHOST_ALPHA: f32 = 0.3;

/// Build the vertex list for the current frame. `time` is in seconds and only
/// drives the repair bar pulse.
pub fn build_scene(
    state: &GameState,
    assets: &AssetRegistry,
    settings: &Settings,
    time: f32,
) -> GameResult<Vec<Vertex>> {
    let hc = settings.high_contrast;
    let mut v = Vec::with_capacity(4096);

    let playfield = Aabb::new(
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) * 0.5,
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
    );
    if hc {
        v.extend(shapes::rect_outline(&playfield, 2.0, colors::HC_OUTLINE));
    } else {
        v.extend(shapes::rect(&playfield, colors::PLAYFIELD));
    }

    // Faded copy of every row's brick so empty cells show what belongs there
    if settings.ghost_grid {
        for cell in GridCell::all() {
            let frame = assets.brick_frame(cell.color())?;
            v.extend(shapes::rect(
                &brick_inset(cell_aabb(cell)),
                colors::with_alpha(frame.color, GHOST_ALPHA),
            ));
        }
    }

    for brick in &state.bricks {
        let frame = assets.brick_frame(brick.color)?;
        let aabb = brick.aabb();
        v.extend(shapes::rect(&brick_inset(aabb), frame.color));
        if hc {
            v.extend(shapes::rect_outline(&aabb, 2.0, colors::HC_OUTLINE));
        }
    }

    if let (Some(_), RepairPhase::Targeting(cell)) = (&state.hero, state.repair.phase()) {
        if state.brick_at(cell).is_none() {
            draw_repair_target(&mut v, state, assets, settings, cell, time)?;
        }
    }

    let paddle = assets.frame(frames::PADDLE)?;
    v.extend(shapes::rect(&state.paddle.aabb(), paddle.color));

    let ball = assets.frame(frames::BALL)?;
    v.extend(shapes::circle(
        state.ball.pos,
        state.ball.radius,
        ball.color,
        CIRCLE_SEGMENTS,
    ));

    if let Some(hero) = &state.hero {
        let color = if hc {
            colors::HC_HERO
        } else {
            assets.frame(frames::HERO)?.color
        };
        v.extend(shapes::circle(hero.pos, hero.radius, color, CIRCLE_SEGMENTS));
        if hc {
            v.extend(shapes::ring(
                hero.pos,
                hero.radius,
                hero.radius + 2.0,
                colors::HC_OUTLINE,
                CIRCLE_SEGMENTS,
            ));
        }
    }

    if let Some(decoy) = &state.decoy {
        let frame = assets.frame(frames::DECOY)?;
        let rotation = if settings.effective_decoy_spin() {
            decoy.rotation
        } else {
            0.0
        };
        // Same 2x scale as the hero
        v.extend(shapes::rotated_rect(
            decoy.pos,
            frame.size * 2.0,
            rotation,
            frame.color,
        ));
    }

    Ok(v)
}

fn cell_aabb(cell: GridCell) -> Aabb {
    Aabb::new(cell.center(), Vec2::new(CELL_WIDTH, CELL_HEIGHT))
}

/// Shrink by a pixel so neighbours read as separate bricks
fn brick_inset(aabb: Aabb) -> Aabb {
    Aabb {
        half: aabb.half - Vec2::ONE,
        ..aabb
    }
}

fn draw_repair_target(
    v: &mut Vec<Vertex>,
    state: &GameState,
    assets: &AssetRegistry,
    settings: &Settings,
    cell: GridCell,
    time: f32,
) -> GameResult<()> {
    let highlight = assets.frame(frames::REPAIR_TARGET)?;
    let aabb = cell_aabb(cell);
    let outline = if settings.high_contrast {
        colors::HC_OUTLINE
    } else {
        highlight.color
    };
    v.extend(shapes::rect_outline(&aabb, 2.0, outline));

    let progress = state.repair.progress;
    if settings.repair_bar && progress > 0.0 {
        let bar = Aabb::new(
            Vec2::new(aabb.center.x, aabb.min().y - BAR_HEIGHT),
            Vec2::new(CELL_WIDTH, BAR_HEIGHT),
        );
        let alpha = if settings.reduced_motion {
            1.0
        } else {
            0.75 + 0.25 * (time * 8.0).sin()
        };
        v.extend(shapes::progress_bar(
            &bar,
            progress,
            colors::BAR_TRACK,
            colors::with_alpha(colors::BAR_FILL, alpha),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::sim::{BrickColor, GamePhase};

    fn loaded() -> AssetRegistry {
        let mut assets = AssetRegistry::new();
        assets.load_all();
        assets
    }

    fn count_color(vertices: &[Vertex], color: [f32; 4]) -> usize {
        vertices.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_ghost_grid_toggle() {
        let state = GameState::new(5);
        let assets = loaded();
        let with_grid = build_scene(&state, &assets, &Settings::default(), 0.0).unwrap();
        let without = build_scene(
            &state,
            &assets,
            &Settings {
                ghost_grid: false,
                ..Default::default()
            },
            0.0,
        )
        .unwrap();

        assert_eq!(with_grid.len() - without.len(), 60 * 6);
        let faded = with_grid.iter().filter(|v| v.color[3] == 0.3).count();
        assert_eq!(faded, 60 * 6);
    }

    #[test]
    fn test_ghost_cells_use_row_colour() {
        let state = GameState::new(5);
        let assets = loaded();
        let vertices = build_scene(&state, &assets, &Settings::default(), 0.0).unwrap();
        for color in BrickColor::ROWS {
            let frame = assets.brick_frame(color).unwrap();
            // Ten cells per row, one quad each
            assert_eq!(
                count_color(&vertices, colors::with_alpha(frame.color, 0.3)),
                10 * 6
            );
        }
    }

    #[test]
    fn test_one_quad_per_brick() {
        let mut state = GameState::new(5);
        let assets = loaded();
        let settings = Settings {
            ghost_grid: false,
            ..Default::default()
        };
        let before = build_scene(&state, &assets, &settings, 0.0).unwrap().len();
        let id = state.bricks[0].id;
        state.remove_brick(id);
        let after = build_scene(&state, &assets, &settings, 0.0).unwrap().len();
        assert_eq!(before - after, 6);
    }

    #[test]
    fn test_repair_bar_only_with_progress() {
        let mut state = GameState::new(5);
        state.bricks.retain(|b| b.cell.row == 0);
        let cell = GridCell::new(3, 2);
        state.repair.track(Some(cell));

        let assets = loaded();
        let settings = Settings {
            ghost_grid: false,
            reduced_motion: true,
            ..Default::default()
        };
        let idle = build_scene(&state, &assets, &settings, 0.0).unwrap();
        let highlight = assets.frame(frames::REPAIR_TARGET).unwrap().color;
        assert_eq!(count_color(&idle, highlight), 24);
        assert_eq!(count_color(&idle, colors::BAR_FILL), 0);

        state.repair.press(0.5);
        let pressed = build_scene(&state, &assets, &settings, 0.0).unwrap();
        assert_eq!(count_color(&pressed, colors::BAR_TRACK), 6);
        assert_eq!(count_color(&pressed, colors::BAR_FILL), 6);
    }

    #[test]
    fn test_game_over_draws_decoy_not_hero() {
        let mut state = GameState::new(5);
        state.trigger_game_over();
        assert_eq!(state.phase, GamePhase::GameOver);

        let assets = loaded();
        let vertices = build_scene(&state, &assets, &Settings::default(), 0.0).unwrap();
        let hero = assets.frame(frames::HERO).unwrap().color;
        let decoy = assets.frame(frames::DECOY).unwrap().color;
        assert_eq!(count_color(&vertices, hero), 0);
        assert_eq!(count_color(&vertices, decoy), 6);
    }

    #[test]
    fn test_high_contrast_hero() {
        let state = GameState::new(5);
        let assets = loaded();
        let settings = Settings {
            high_contrast: true,
            ..Default::default()
        };
        let vertices = build_scene(&state, &assets, &settings, 0.0).unwrap();
        assert_eq!(
            count_color(&vertices, colors::HC_HERO),
            CIRCLE_SEGMENTS as usize * 3
        );
    }

    #[test]
    fn test_missing_atlas_is_error() {
        let state = GameState::new(5);
        let err = build_scene(&state, &AssetRegistry::new(), &Settings::default(), 0.0)
            .unwrap_err();
        assert!(matches!(err, GameError::MissingAsset { .. }));
    }
}

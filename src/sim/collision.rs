//! Contact detection and collision classification
//!
//! Detection finds overlapping body pairs (circle vs box, circle vs circle).
//! Classification turns each pair into exactly one [`CollisionRule`] using the
//! [`Collidable`] tag every body carries, so no membership scans are needed.

use glam::Vec2;

use super::state::{Collidable, GameState, Wall};
use crate::Aabb;

/// Overlap between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: Collidable,
    pub b: Collidable,
    /// Unit vector pushing `a` out of `b`
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionRule {
    /// Ball knocks a brick out of play
    BallBrick(u32),
    /// Ball bounces off the paddle with an offset-dependent angle
    BallPaddle,
    /// Ball bounces off a wall; the classifier owns the bounce
    BallWall(Wall),
    /// Hero overlaps the brick they just built; ignored
    HeroRepairedBrick(u32),
    /// Hero walks into a brick and is stopped
    HeroBrick(u32),
    /// Ball touches the hero
    BallHero,
}

impl CollisionRule {
    /// Rules whose contact must not get the default separate-and-reflect response
    pub fn suppresses_default_response(&self) -> bool {
        matches!(
            self,
            CollisionRule::BallWall(_) | CollisionRule::HeroRepairedBrick(_) | CollisionRule::BallHero
        )
    }
}

/// Classify a contact. Precedence: bricks, paddle, walls, hero.
pub fn classify(contact: &Contact, just_repaired: Option<u32>) -> Option<CollisionRule> {
    use Collidable::*;

    let pair = (contact.a, contact.b);

    // Bricks
    match pair {
        (Ball, Brick(id)) | (Brick(id), Ball) => return Some(CollisionRule::BallBrick(id)),
        (Hero, Brick(id)) | (Brick(id), Hero) => {
            return Some(if just_repaired == Some(id) {
                CollisionRule::HeroRepairedBrick(id)
            } else {
                CollisionRule::HeroBrick(id)
            });
        }
        _ => {}
    }

    // Paddle
    if let (Ball, Paddle) | (Paddle, Ball) = pair {
        return Some(CollisionRule::BallPaddle);
    }

    // Walls
    if let (Ball, Wall(wall)) | (Wall(wall), Ball) = pair {
        return Some(CollisionRule::BallWall(wall));
    }

    // Hero
    if let (Ball, Hero) | (Hero, Ball) = pair {
        return Some(CollisionRule::BallHero);
    }

    None
}

/// Circle vs axis-aligned box. Normal points from the box toward the circle.
pub fn circle_aabb(center: Vec2, radius: f32, aabb: &Aabb) -> Option<(Vec2, f32)> {
    let closest = aabb.clamp_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some((offset / dist, radius - dist));
    }

    // Centre inside the box: push out through the nearest face
    let local = center - aabb.center;
    let depth = aabb.half - local.abs();
    if depth.x < depth.y {
        let normal = Vec2::new(local.x.signum(), 0.0);
        Some((normal, depth.x + radius))
    } else {
        let normal = Vec2::new(0.0, local.y.signum());
        Some((normal, depth.y + radius))
    }
}

/// Circle vs circle. Normal points from `b` toward `a`.
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let offset = a - b;
    let reach = ra + rb;
    let dist_sq = offset.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { offset / dist } else { Vec2::NEG_Y };
    Some((normal, reach - dist))
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// All overlapping pairs this frame, in a stable order:
/// ball-bricks (by id), ball-paddle, ball-walls, ball-hero, hero-bricks.
pub fn detect_contacts(state: &GameState) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let ball = &state.ball;

    if ball.is_live() {
        for brick in &state.bricks {
            if let Some((normal, penetration)) = circle_aabb(ball.pos, ball.radius, &brick.aabb()) {
                contacts.push(Contact {
                    a: Collidable::Ball,
                    b: Collidable::Brick(brick.id),
                    normal,
                    penetration,
                });
            }
        }

        if let Some((normal, penetration)) =
            circle_aabb(ball.pos, ball.radius, &state.paddle.aabb())
        {
            contacts.push(Contact {
                a: Collidable::Ball,
                b: Collidable::Paddle,
                normal,
                penetration,
            });
        }

        for wall in Wall::ALL {
            if let Some((normal, penetration)) = circle_aabb(ball.pos, ball.radius, &wall.aabb()) {
                contacts.push(Contact {
                    a: Collidable::Ball,
                    b: Collidable::Wall(wall),
                    normal,
                    penetration,
                });
            }
        }

        if let Some(hero) = &state.hero {
            if let Some((normal, penetration)) =
                circle_circle(ball.pos, ball.radius, hero.pos, hero.radius)
            {
                contacts.push(Contact {
                    a: Collidable::Ball,
                    b: Collidable::Hero,
                    normal,
                    penetration,
                });
            }
        }
    }

    if let Some(hero) = &state.hero {
        for brick in &state.bricks {
            if let Some((normal, penetration)) = circle_aabb(hero.pos, hero.radius, &brick.aabb()) {
                contacts.push(Contact {
                    a: Collidable::Hero,
                    b: Collidable::Brick(brick.id),
                    normal,
                    penetration,
                });
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::BallState;

    fn contact(a: Collidable, b: Collidable) -> Contact {
        Contact {
            a,
            b,
            normal: Vec2::Y,
            penetration: 1.0,
        }
    }

    #[test]
    fn test_classify_is_order_independent() {
        let pairs = [
            (Collidable::Ball, Collidable::Brick(3), CollisionRule::BallBrick(3)),
            (Collidable::Ball, Collidable::Paddle, CollisionRule::BallPaddle),
            (
                Collidable::Ball,
                Collidable::Wall(Wall::Top),
                CollisionRule::BallWall(Wall::Top),
            ),
            (Collidable::Ball, Collidable::Hero, CollisionRule::BallHero),
            (Collidable::Hero, Collidable::Brick(8), CollisionRule::HeroBrick(8)),
        ];
        for (a, b, rule) in pairs {
            assert_eq!(classify(&contact(a, b), None), Some(rule));
            assert_eq!(classify(&contact(b, a), None), Some(rule));
        }
    }

    #[test]
    fn test_classify_just_repaired_brick() {
        let c = contact(Collidable::Hero, Collidable::Brick(8));
        assert_eq!(classify(&c, Some(8)), Some(CollisionRule::HeroRepairedBrick(8)));
        assert_eq!(classify(&c, Some(9)), Some(CollisionRule::HeroBrick(8)));
    }

    #[test]
    fn test_classify_unknown_pairs() {
        let c = contact(Collidable::Paddle, Collidable::Wall(Wall::Left));
        assert_eq!(classify(&c, None), None);
        let c = contact(Collidable::Hero, Collidable::Paddle);
        assert_eq!(classify(&c, None), None);
    }

    #[test]
    fn test_suppressed_rules() {
        assert!(CollisionRule::BallWall(Wall::Left).suppresses_default_response());
        assert!(CollisionRule::BallHero.suppresses_default_response());
        assert!(CollisionRule::HeroRepairedBrick(1).suppresses_default_response());
        assert!(!CollisionRule::BallBrick(1).suppresses_default_response());
        assert!(!CollisionRule::BallPaddle.suppresses_default_response());
        assert!(!CollisionRule::HeroBrick(1).suppresses_default_response());
    }

    #[test]
    fn test_circle_aabb_from_above() {
        let aabb = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0));
        // Box top edge at y = 84
        let (normal, pen) = circle_aabb(Vec2::new(100.0, 78.0), 11.0, &aabb).unwrap();
        assert_eq!(normal, Vec2::NEG_Y);
        assert!((pen - 5.0).abs() < 1e-4);
        assert!(circle_aabb(Vec2::new(100.0, 72.0), 11.0, &aabb).is_none());
    }

    #[test]
    fn test_circle_aabb_centre_inside() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::new(64.0, 32.0));
        let (normal, pen) = circle_aabb(Vec2::new(30.0, 0.0), 5.0, &aabb).unwrap();
        assert_eq!(normal, Vec2::X);
        assert!((pen - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_circle() {
        let (normal, pen) = circle_circle(Vec2::new(30.0, 0.0), 11.0, Vec2::ZERO, 22.0).unwrap();
        assert_eq!(normal, Vec2::X);
        assert!((pen - 3.0).abs() < 1e-4);
        assert!(circle_circle(Vec2::new(40.0, 0.0), 11.0, Vec2::ZERO, 22.0).is_none());
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(100.0, 50.0), Vec2::NEG_X);
        assert!((reflected.x + 100.0).abs() < 1e-3);
        assert!((reflected.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_detect_skips_held_ball() {
        let mut state = GameState::new(1);
        state.hero = None;
        state.ball.pos = state.paddle.pos();
        assert!(matches!(state.ball.state, BallState::Held { .. }));
        assert!(detect_contacts(&state).is_empty());

        state.ball.state = BallState::Free;
        let contacts = detect_contacts(&state);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].b, Collidable::Paddle);
    }

    #[test]
    fn test_detect_walls_and_open_floor() {
        let mut state = GameState::new(1);
        state.hero = None;
        state.ball.state = BallState::Free;

        state.ball.pos = Vec2::new(5.0, 400.0);
        let walls: Vec<_> = detect_contacts(&state).iter().map(|c| c.b).collect();
        assert_eq!(walls, vec![Collidable::Wall(Wall::Left)]);

        state.ball.pos = Vec2::new(400.0, WORLD_HEIGHT - 2.0);
        assert!(detect_contacts(&state).is_empty());
    }

    #[test]
    fn test_detect_order_bricks_first() {
        let mut state = GameState::new(1);
        state.ball.state = BallState::Free;
        // Between brick (0,0) and the left/top walls' corner region
        state.ball.pos = Vec2::new(112.0, 75.0);
        let hero = state.hero.as_mut().unwrap();
        hero.pos = Vec2::new(112.0, 50.0);

        let contacts = detect_contacts(&state);
        assert!(matches!(contacts[0].b, Collidable::Brick(_)));
        assert_eq!(contacts.last().map(|c| c.a), Some(Collidable::Ball));
        assert!(contacts.iter().any(|c| c.b == Collidable::Hero));
    }
}

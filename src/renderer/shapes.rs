//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a triangle list in world coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::Aabb;

/// Filled axis-aligned rectangle
pub fn rect(aabb: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let min = aabb.min();
    let max = aabb.max();
    quad(
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ],
        color,
    )
}

/// Rectangle outline drawn inside `aabb`, `thickness` pixels wide
pub fn rect_outline(aabb: &Aabb, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = aabb.min();
    let max = aabb.max();
    let t = thickness.min(aabb.half.x).min(aabb.half.y);

    let edges = [
        // top, bottom
        Aabb::new(
            Vec2::new(aabb.center.x, min.y + t / 2.0),
            Vec2::new(aabb.half.x * 2.0, t),
        ),
        Aabb::new(
            Vec2::new(aabb.center.x, max.y - t / 2.0),
            Vec2::new(aabb.half.x * 2.0, t),
        ),
        // left, right (between top and bottom)
        Aabb::new(
            Vec2::new(min.x + t / 2.0, aabb.center.y),
            Vec2::new(t, aabb.half.y * 2.0 - 2.0 * t),
        ),
        Aabb::new(
            Vec2::new(max.x - t / 2.0, aabb.center.y),
            Vec2::new(t, aabb.half.y * 2.0 - 2.0 * t),
        ),
    ];

    edges.iter().flat_map(|edge| rect(edge, color)).collect()
}

/// Rectangle of `size` rotated by `rotation` radians around `center`
pub fn rotated_rect(center: Vec2, size: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size * 0.5;
    let rot = Vec2::from_angle(rotation);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));
    quad(corners, color)
}

/// Horizontal bar filled left to right by `fraction` (0.0 - 1.0)
pub fn progress_bar(
    aabb: &Aabb,
    fraction: f32,
    track: [f32; 4],
    fill: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = rect(aabb, track);
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction > 0.0 {
        let width = aabb.half.x * 2.0 * fraction;
        let filled = Aabb::new(
            Vec2::new(aabb.min().x + width / 2.0, aabb.center.y),
            Vec2::new(width, aabb.half.y * 2.0),
        );
        vertices.extend(rect(&filled, fill));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let p1 = center + radius * unit(i, segments);
        let p2 = center + radius * unit(i + 1, segments);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let d1 = unit(i, segments);
        let d2 = unit(i + 1, segments);
        let inner1 = center + inner_radius * d1;
        let outer1 = center + outer_radius * d1;
        let inner2 = center + inner_radius * d2;
        let outer2 = center + outer_radius * d2;

        vertices.extend(quad([inner1, outer1, outer2, inner2], color));
    }

    vertices
}

#[inline]
fn unit(i: u32, segments: u32) -> Vec2 {
    Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI)
}

/// Two triangles covering a convex quad given in winding order
fn quad(c: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    [c[0], c[1], c[2], c[2], c[3], c[0]]
        .iter()
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

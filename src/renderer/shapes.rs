//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Axis-aligned rectangle from its top-left corner (two triangles)
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let min = origin;
    let max = origin + size;
    quad([
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ], color)
}

/// Rectangle rotated about its center by `angle` radians
pub fn rotated_rect(center: Vec2, half_extents: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rotation = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, half_extents.y),
        Vec2::new(-half_extents.x, half_extents.y),
    ]
    .map(|corner| center + rotation.rotate(corner));
    quad(corners, color)
}

/// Two triangles over four corners in winding order
fn quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    [a, b, c, a, c, d]
        .iter()
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

//! Scene assembly in playfield coordinates (y down, origin top-left)

use glam::Vec2;

use super::shapes::{rect, rotated_rect};
use super::theme::{Theme, theme};
use super::vertex::Vertex;
use crate::sim::{Bird, GamePhase, GameState, Obstacle};
use crate::tuning::Tuning;

pub const PIPE_CAP_HEIGHT: f32 = 16.0;
pub const PIPE_CAP_OVERHANG: f32 = 4.0;

const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
const EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Build the frame's triangle list. `skin` is the bird colour for this render.
pub fn build_scene(state: &GameState, tuning: &Tuning, skin: [f32; 4]) -> Vec<Vertex> {
    let palette = theme(state.theme_index);
    let playfield = Vec2::new(tuning.bounds_width, tuning.bounds_height);

    let mut vertices = Vec::with_capacity(6 * (4 + 4 * state.obstacles().len()));
    vertices.extend(rect(Vec2::ZERO, playfield, palette.sky));

    for obstacle in state.obstacles() {
        push_pipe(&mut vertices, obstacle, tuning, palette);
    }

    push_bird(&mut vertices, &state.bird, skin);

    // Dim everything while the run is frozen
    if matches!(state.phase, GamePhase::Paused | GamePhase::GameOver) {
        vertices.extend(rect(Vec2::ZERO, playfield, OVERLAY));
    }

    vertices
}

fn push_pipe(vertices: &mut Vec<Vertex>, obstacle: &Obstacle, tuning: &Tuning, palette: &Theme) {
    let width = tuning.pipe_width;
    let gap_bottom = obstacle.gap_bottom();
    let cap_origin_x = obstacle.x - PIPE_CAP_OVERHANG;
    let cap_size = Vec2::new(width + 2.0 * PIPE_CAP_OVERHANG, PIPE_CAP_HEIGHT);

    // Upper pipe, cap on its lower end
    vertices.extend(rect(
        Vec2::new(obstacle.x, 0.0),
        Vec2::new(width, obstacle.gap_top),
        palette.pipe,
    ));
    vertices.extend(rect(
        Vec2::new(cap_origin_x, (obstacle.gap_top - PIPE_CAP_HEIGHT).max(0.0)),
        cap_size,
        palette.pipe_cap,
    ));

    // Lower pipe, cap on its upper end
    vertices.extend(rect(
        Vec2::new(obstacle.x, gap_bottom),
        Vec2::new(width, tuning.bounds_height - gap_bottom),
        palette.pipe,
    ));
    vertices.extend(rect(
        Vec2::new(cap_origin_x, gap_bottom),
        cap_size,
        palette.pipe_cap,
    ));
}

fn push_bird(vertices: &mut Vec<Vertex>, bird: &Bird, skin: [f32; 4]) {
    let half = Vec2::new(bird.width, bird.height) * 0.5;
    let center = Vec2::new(bird.x, bird.y) + half;
    vertices.extend(rotated_rect(center, half, bird.rotation, skin));

    let eye_offset = Vec2::from_angle(bird.rotation).rotate(Vec2::new(half.x * 0.5, -half.y * 0.4));
    vertices.extend(rotated_rect(
        center + eye_offset,
        Vec2::splat(3.0),
        bird.rotation,
        EYE,
    ));
}

//! Obstacle generation, scrolling and recycling

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A top+bottom barrier pair with one passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Leading (left) edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    /// Set once the bird has cleared this obstacle; never reset
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Right edge of the barrier
    #[inline]
    pub fn trailing_edge(&self, pipe_width: f32) -> f32 {
        self.x + pipe_width
    }
}

/// Ordered (oldest first) set of live obstacles
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    rng: Pcg32,
    next_id: u32,
    /// Obstacles spawned this session, including recycled ones
    spawned: usize,
}

impl ObstacleField {
    /// Build a field pre-seeded with evenly spaced obstacles just off the right edge
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut field = Self {
            obstacles: Vec::with_capacity(tuning.initial_obstacles + 2),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            spawned: 0,
        };

        let first_x = tuning.bounds_width + tuning.pipe_width;
        for i in 0..tuning.initial_obstacles {
            field.spawn_at(first_x + i as f32 * tuning.obstacle_spacing, false, tuning);
        }

        field
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Scroll every obstacle left by `speed`
    pub fn scroll(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Drop obstacles fully off-screen and top the field up on the right.
    /// Run after passes are marked so nothing leaves unscored.
    pub fn recycle(&mut self, tuning: &Tuning) {
        self.obstacles
            .retain(|o| o.trailing_edge(tuning.pipe_width) >= 0.0);

        self.spawn_due(tuning);
    }

    /// Mark every obstacle whose trailing edge is strictly left of `bird_x`.
    /// Returns the ids that flipped this call, oldest first.
    pub fn mark_passed(&mut self, bird_x: f32, pipe_width: f32) -> Vec<u32> {
        let mut flipped = Vec::new();
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.trailing_edge(pipe_width) < bird_x {
                obstacle.passed = true;
                flipped.push(obstacle.id);
            }
        }
        flipped
    }

    fn spawn_due(&mut self, tuning: &Tuning) {
        let trigger_x = tuning.bounds_width - tuning.spawn_threshold;
        loop {
            let next_x = match self.obstacles.last() {
                Some(last) if last.x < trigger_x => last.x + tuning.obstacle_spacing,
                Some(_) => break,
                None => tuning.bounds_width + tuning.pipe_width,
            };
            // The first obstacles spawned after the pre-seeded ones are the warm-up
            let warmup = self.spawned < tuning.initial_obstacles + tuning.warmup_obstacles;
            self.spawn_at(next_x, warmup, tuning);
        }
    }

    fn spawn_at(&mut self, x: f32, warmup: bool, tuning: &Tuning) {
        let (gap_top, gap_height) = if warmup {
            let gap = tuning.warmup_gap;
            let centered = (tuning.bounds_height - gap) / 2.0;
            (centered.clamp(tuning.top_margin, tuning.max_gap_top(gap)), gap)
        } else {
            self.roll_gap(tuning)
        };

        let id = self.next_id;
        self.next_id += 1;
        self.spawned += 1;
        self.obstacles.push(Obstacle {
            id,
            x,
            gap_top,
            gap_height,
            passed: false,
        });
    }

    /// Uniform gap height, then a uniform offset that keeps the gap inside the margins
    fn roll_gap(&mut self, tuning: &Tuning) -> (f32, f32) {
        let gap_height = self
            .rng
            .random_range(tuning.min_gap..=tuning.max_gap)
            .clamp(tuning.min_gap, tuning.max_gap);

        let max_top = tuning.max_gap_top(gap_height);
        let gap_top = self
            .rng
            .random_range(tuning.top_margin..=max_top)
            .clamp(tuning.top_margin, max_top);

        (gap_top, gap_height)
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }
}

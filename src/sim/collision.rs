//! Collision predicates
//!
//! Pure functions over the bird and the obstacle list. Every live obstacle
//! is tested, not just the nearest one.

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::obstacles::Obstacle;
use crate::tuning::Tuning;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crash {
    /// Flew above the top edge
    Ceiling,
    /// Fell below the bottom edge
    Floor,
    /// Hit the barrier of the obstacle with this id
    Obstacle(u32),
}

/// Bird has left the playfield vertically
pub fn out_of_bounds(bird: &Bird, tuning: &Tuning) -> Option<Crash> {
    if bird.y < 0.0 {
        Some(Crash::Ceiling)
    } else if bird.bottom() > tuning.bounds_height {
        Some(Crash::Floor)
    } else {
        None
    }
}

/// Bird and obstacle share some horizontal span
#[inline]
pub fn overlaps_horizontally(bird: &Bird, obstacle: &Obstacle, pipe_width: f32) -> bool {
    bird.right() > obstacle.x && bird.x < obstacle.trailing_edge(pipe_width)
}

/// Bird fits entirely inside the obstacle's gap
#[inline]
pub fn inside_gap(bird: &Bird, obstacle: &Obstacle) -> bool {
    bird.y >= obstacle.gap_top && bird.bottom() <= obstacle.gap_bottom()
}

/// First crash found this tick, bounds before obstacles
pub fn check(bird: &Bird, obstacles: &[Obstacle], tuning: &Tuning) -> Option<Crash> {
    if let Some(crash) = out_of_bounds(bird, tuning) {
        return Some(crash);
    }

    obstacles
        .iter()
        .find(|o| overlaps_horizontally(bird, o, tuning.pipe_width) && !inside_gap(bird, o))
        .map(|o| Crash::Obstacle(o.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird_at(y: f32) -> Bird {
        let mut bird = Bird::new(&Tuning::default(), "classic");
        bird.y = y;
        bird
    }

    fn obstacle(id: u32, x: f32, gap_top: f32, gap_height: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            gap_top,
            gap_height,
            passed: false,
        }
    }

    #[test]
    fn test_horizontal_overlap_scenario() {
        // bird x=100 w=35, pipe x=100 w=60: 135 > 100 and 100 < 160
        let bird = bird_at(300.0);
        let pipe = obstacle(1, 100.0, 200.0, 200.0);
        assert!(overlaps_horizontally(&bird, &pipe, 60.0));
    }

    #[test]
    fn test_horizontal_overlap_edges_are_exclusive() {
        let bird = bird_at(300.0);
        // Pipe starts exactly at the bird's right edge
        assert!(!overlaps_horizontally(&bird, &obstacle(1, 135.0, 0.0, 100.0), 60.0));
        // Pipe ends exactly at the bird's left edge
        assert!(!overlaps_horizontally(&bird, &obstacle(1, 40.0, 0.0, 100.0), 60.0));
        assert!(overlaps_horizontally(&bird, &obstacle(1, 40.5, 0.0, 100.0), 60.0));
    }

    #[test]
    fn test_inside_gap_inclusive_edges() {
        let pipe = obstacle(1, 100.0, 200.0, 200.0);
        assert!(inside_gap(&bird_at(200.0), &pipe));
        assert!(inside_gap(&bird_at(375.0), &pipe)); // bottom exactly 400
        assert!(!inside_gap(&bird_at(199.9), &pipe));
        assert!(!inside_gap(&bird_at(375.1), &pipe));
    }

    #[test]
    fn test_bounds() {
        let tuning = Tuning::default();
        assert_eq!(out_of_bounds(&bird_at(-0.1), &tuning), Some(Crash::Ceiling));
        assert_eq!(out_of_bounds(&bird_at(0.0), &tuning), None);
        assert_eq!(out_of_bounds(&bird_at(575.0), &tuning), None);
        assert_eq!(out_of_bounds(&bird_at(575.5), &tuning), Some(Crash::Floor));
    }

    #[test]
    fn test_check_scans_every_obstacle() {
        let tuning = Tuning::default();
        let bird = bird_at(300.0);
        // First overlapping obstacle is safe, second one is not
        let obstacles = vec![
            obstacle(1, 50.0, 250.0, 200.0),
            obstacle(2, 120.0, 400.0, 180.0),
            obstacle(3, 400.0, 0.0, 180.0),
        ];
        assert_eq!(check(&bird, &obstacles, &tuning), Some(Crash::Obstacle(2)));
    }

    #[test]
    fn test_check_clear_when_inside_all_gaps() {
        let tuning = Tuning::default();
        let bird = bird_at(300.0);
        let obstacles = vec![
            obstacle(1, 50.0, 250.0, 200.0),
            obstacle(2, 120.0, 280.0, 180.0),
            obstacle(3, 400.0, 0.0, 180.0), // far away, gap irrelevant
        ];
        assert_eq!(check(&bird, &obstacles, &tuning), None);
    }
}

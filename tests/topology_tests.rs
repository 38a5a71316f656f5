//! Cube-surface topology tests
//!
//! Exhaustive checks over all 600 (face, row, col, heading) states: the surface
//! is closed, stepping never leaves the board, and seam crossings are reversible.

use cube_paint::types::Position;
use std::collections::HashSet;

fn all_positions() -> Vec<Position> {
    let mut positions = Vec::new();
    for face in 0..6 {
        for row in 0..5 {
            for col in 0..5 {
                for heading in 0..4 {
                    positions.push(Position::new(face, row, col, heading));
                }
            }
        }
    }
    positions
}

#[test]
fn test_straight_walk_returns_within_twenty_steps() {
    for start in all_positions() {
        let mut visited = vec![start];
        let mut current = start;
        let mut returned = false;
        for _ in 0..20 {
            current = current.step();
            assert!(current.is_valid(), "{:?} stepped to invalid {:?}", start, current);
            if visited.contains(&current) {
                returned = true;
                break;
            }
            visited.push(current);
        }
        assert!(returned, "walk from {:?} did not close within 20 steps", start);
    }
}

#[test]
fn test_straight_walk_cycle_is_exactly_twenty() {
    // Five cells on each of four faces around the cube
    for start in all_positions() {
        let mut current = start;
        for n in 1..=20 {
            current = current.step();
            if n < 20 {
                assert_ne!(current, start, "{:?} cycled after {} steps", start, n);
            }
        }
        assert_eq!(current, start);
    }
}

#[test]
fn test_step_is_a_bijection() {
    let images: HashSet<Position> = all_positions().into_iter().map(|p| p.step()).collect();
    assert_eq!(images.len(), 600);
}

#[test]
fn test_turning_around_retraces_the_step() {
    for start in all_positions() {
        let back = start.step().rotate(2).step().rotate(2);
        assert_eq!(back, start, "reversal failed from {:?}", start);
    }
}

#[test]
fn test_every_cell_has_four_distinct_neighbors() {
    for start in all_positions() {
        let cells: HashSet<usize> = start.neighbors().iter().map(|p| p.index()).collect();
        assert_eq!(cells.len(), 4, "{:?} has duplicate neighbors", start);
        assert!(!cells.contains(&start.index()));
    }
}

#[test]
fn test_rotation_does_not_move() {
    let p = Position::new(4, 1, 3, 2);
    for v in 0..4 {
        let rotated = p.rotate(v);
        assert!(rotated.same_cell(&p));
        assert_eq!(rotated.heading, (2 + v) % 4);
    }
}

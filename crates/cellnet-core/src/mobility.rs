use crate::topology::Position;
use rand::Rng;

/// Uniform initial placement in `[0, bound)` on both axes.
pub fn initial_positions<R: Rng + ?Sized>(
    rng: &mut R,
    num_users: usize,
    bound: f64,
) -> Vec<Position> {
    (0..num_users)
        .map(|_| [rng.random::<f64>() * bound, rng.random::<f64>() * bound])
        .collect()
}

/// Random-walk every user by up to `speed / 2` per axis, then clamp into `[0, bound]`.
///
/// Users that drift past an edge stay pinned to it; there is no wrapping or reflection.
pub fn step_positions<R: Rng + ?Sized>(
    rng: &mut R,
    positions: &mut [Position],
    speed: f64,
    bound: f64,
) {
    for pos in positions.iter_mut() {
        for coord in pos.iter_mut() {
            let delta = (rng.random::<f64>() - 0.5) * speed;
            *coord = (*coord + delta).clamp(0.0, bound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn initial_positions_lie_inside_area() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let positions = initial_positions(&mut rng, 200, 40.0);
        assert_eq!(positions.len(), 200);
        assert!(positions
            .iter()
            .flatten()
            .all(|&c| (0.0..40.0).contains(&c)));
    }

    #[test]
    fn displacement_is_bounded_by_half_speed() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let start = vec![[20.0, 20.0]; 100];
        let mut moved = start.clone();
        step_positions(&mut rng, &mut moved, 2.0, 40.0);
        for (a, b) in start.iter().zip(&moved) {
            assert!((a[0] - b[0]).abs() <= 1.0);
            assert!((a[1] - b[1]).abs() <= 1.0);
        }
        assert_ne!(start, moved);
    }

    #[test]
    fn users_are_clamped_at_walls() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut positions = vec![[0.0, 30.0], [30.0, 0.0], [30.0, 30.0]];
        let mut pinned = 0;
        for _ in 0..500 {
            step_positions(&mut rng, &mut positions, 50.0, 30.0);
            assert!(positions
                .iter()
                .flatten()
                .all(|&c| (0.0..=30.0).contains(&c)));
            pinned += positions
                .iter()
                .flatten()
                .filter(|&&c| c == 0.0 || c == 30.0)
                .count();
        }
        // Span wider than the area: users spend time pinned at the walls.
        assert!(pinned > 0);
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = vec![[5.0, 5.0]; 10];
        let mut b = a.clone();
        step_positions(&mut ChaCha12Rng::seed_from_u64(99), &mut a, 1.0, 10.0);
        step_positions(&mut ChaCha12Rng::seed_from_u64(99), &mut b, 1.0, 10.0);
        assert_eq!(a, b);
    }
}

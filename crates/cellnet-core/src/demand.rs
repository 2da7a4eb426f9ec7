use rand::Rng;

/// One integer demand (Mbps) per user, uniform over `min..=max`.
///
/// Draws are independent per user and per call; nothing is remembered between steps.
pub fn generate_demand<R: Rng + ?Sized>(
    rng: &mut R,
    num_users: usize,
    min: u32,
    max: u32,
) -> Vec<u32> {
    debug_assert!(min <= max, "demand range must be non-empty");
    (0..num_users).map(|_| rng.random_range(min..=max)).collect()
}

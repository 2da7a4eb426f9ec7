use cellnet_core::{AssociationStrategy, Network, SimConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::{Duration, Instant};

fn time_run(config: &SimConfig) -> Duration {
    let net = Network::new(config.clone());
    let start = Instant::now();
    let history = net.run();
    let elapsed = start.elapsed();
    assert_eq!(history.len(), config.sim_steps);
    elapsed
}

fn main() {
    let num_cells = 64;
    let num_users = 50_000;
    let sim_steps = 10;
    println!(
        "Benchmarking with {} stations, {} users, {} steps",
        num_cells * num_cells,
        num_users,
        sim_steps
    );

    let mut seeds = ChaCha12Rng::seed_from_u64(42);
    let trials = 3;

    for association in [AssociationStrategy::Linear, AssociationStrategy::Indexed] {
        for parallel in [false, true] {
            let mut total = Duration::ZERO;
            for _ in 0..trials {
                let config = SimConfig {
                    num_cells,
                    num_users,
                    sim_steps,
                    user_speed: 2.0,
                    bs_capacity: 50.0,
                    seed: seeds.random::<u64>(),
                    association,
                    parallel,
                    ..SimConfig::default()
                };
                total += time_run(&config);
            }
            let per_step = total / (trials * sim_steps) as u32;
            println!(
                "{:?} association, parallel={}: {:?} per step",
                association, parallel, per_step
            );
        }
    }
}

use crate::config::AssociationStrategy;
use crate::spatial::{self, StationPoint};
use crate::topology::{BaseStation, Position};
use rayon::prelude::*;
use rstar::RTree;

fn distance_2(a: Position, b: Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Linear scan for the nearest station; the first minimum wins on ties.
pub fn nearest_station_linear(stations: &[BaseStation], point: Position) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for bs in stations {
        let d2 = distance_2(point, bs.position);
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((bs.index, d2)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Maps users to their nearest base station.
///
/// The R*-tree is only built for [`AssociationStrategy::Indexed`]. Both strategies produce
/// identical assignments, including the lowest-index tie-break.
pub struct AssociationResolver {
    stations: Vec<BaseStation>,
    index: Option<RTree<StationPoint>>,
    parallel: bool,
}

impl AssociationResolver {
    /// Panics if `stations` is empty; a network always has at least one cell.
    pub fn new(stations: Vec<BaseStation>, strategy: AssociationStrategy, parallel: bool) -> Self {
        assert!(!stations.is_empty(), "association needs at least one station");
        let index = match strategy {
            AssociationStrategy::Linear => None,
            AssociationStrategy::Indexed => Some(spatial::build_index(&stations)),
        };
        Self {
            stations,
            index,
            parallel,
        }
    }

    pub fn strategy(&self) -> AssociationStrategy {
        if self.index.is_some() {
            AssociationStrategy::Indexed
        } else {
            AssociationStrategy::Linear
        }
    }

    pub fn stations(&self) -> &[BaseStation] {
        &self.stations
    }

    fn resolve_one(&self, point: Position) -> usize {
        let nearest = match &self.index {
            Some(tree) => spatial::nearest_station(tree, point),
            None => nearest_station_linear(&self.stations, point),
        };
        // Non-empty station set is checked in `new`.
        nearest.unwrap_or(0)
    }

    /// One station index per user, aligned with `positions`.
    pub fn resolve(&self, positions: &[Position]) -> Vec<usize> {
        if self.parallel {
            positions.par_iter().map(|&p| self.resolve_one(p)).collect()
        } else {
            positions.iter().map(|&p| self.resolve_one(p)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mobility::initial_positions;
    use crate::topology::generate_stations;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn line_stations() -> Vec<BaseStation> {
        vec![
            BaseStation {
                index: 0,
                position: [0.0, 0.0],
                capacity: 10.0,
            },
            BaseStation {
                index: 1,
                position: [10.0, 0.0],
                capacity: 10.0,
            },
        ]
    }

    fn all_resolvers(stations: Vec<BaseStation>) -> Vec<AssociationResolver> {
        let mut out = Vec::new();
        for strategy in [AssociationStrategy::Linear, AssociationStrategy::Indexed] {
            for parallel in [false, true] {
                out.push(AssociationResolver::new(stations.clone(), strategy, parallel));
            }
        }
        out
    }

    #[test]
    fn nearest_station_examples() {
        for resolver in all_resolvers(line_stations()) {
            assert_eq!(
                resolver.resolve(&[[3.0, 0.0], [7.0, 0.0], [5.0, 0.0]]),
                vec![0, 1, 0],
                "strategy {:?}",
                resolver.strategy()
            );
        }
    }

    #[test]
    fn every_user_gets_a_valid_station() {
        let stations = generate_stations(6, 10.0, 50.0);
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let positions = initial_positions(&mut rng, 300, 60.0);
        for resolver in all_resolvers(stations.clone()) {
            let assignments = resolver.resolve(&positions);
            assert_eq!(assignments.len(), positions.len());
            assert!(assignments.iter().all(|&s| s < stations.len()));
        }
    }

    #[test]
    fn assignment_is_truly_nearest() {
        let stations = generate_stations(5, 10.0, 50.0);
        let mut rng = ChaCha12Rng::seed_from_u64(17);
        let positions = initial_positions(&mut rng, 200, 50.0);
        let resolver =
            AssociationResolver::new(stations.clone(), AssociationStrategy::Linear, false);
        for (pos, station) in positions.iter().zip(resolver.resolve(&positions)) {
            let chosen = distance_2(*pos, stations[station].position);
            assert!(stations
                .iter()
                .all(|bs| chosen <= distance_2(*pos, bs.position)));
        }
    }

    #[test]
    fn strategies_agree_on_random_and_lattice_points() {
        let stations = generate_stations(7, 10.0, 50.0);
        let mut rng = ChaCha12Rng::seed_from_u64(2024);
        let mut positions = initial_positions(&mut rng, 1000, 70.0);
        // Midpoints between lattice neighbours exercise exact ties.
        positions.extend([[5.0, 0.0], [15.0, 0.0], [0.0, 0.0], [70.0, 70.0]]);
        let reference =
            AssociationResolver::new(stations.clone(), AssociationStrategy::Linear, false)
                .resolve(&positions);
        for resolver in all_resolvers(stations) {
            assert_eq!(resolver.resolve(&positions), reference);
        }
    }

    #[test]
    fn single_station_takes_everyone() {
        let stations = generate_stations(1, 10.0, 50.0);
        let resolver = AssociationResolver::new(stations, AssociationStrategy::Indexed, false);
        assert_eq!(resolver.resolve(&[[9.0, 9.0], [0.0, 0.0]]), vec![0, 0]);
    }
}

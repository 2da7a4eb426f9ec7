
use crate::allocation;
use crate::association::AssociationResolver;
use crate::config::{SimConfig, SimConfigError};
use crate::demand;
use crate::mobility;
use crate::record::{SimulationHistory, StepRecord};
use crate::topology::{self, BaseStation, Position};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};
use tracing::{debug, info, Level};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkInitError {
    Config(SimConfigError),
    UserCountMismatch { expected: usize, actual: usize },
    PositionOutOfBounds { user: usize, bound: f64 },
}

impl fmt::Display for NetworkInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkInitError::Config(e) => write!(f, "{}", e),
            NetworkInitError::UserCountMismatch { expected, actual } => write!(
                f,
                "positions.len() ({actual}) must match num_users ({expected})"
            ),
            NetworkInitError::PositionOutOfBounds { user, bound } => {
                write!(f, "user {user} starts outside [0, {bound}]")
            }
        }
    }
}

impl From<SimConfigError> for NetworkInitError {
    fn from(err: SimConfigError) -> Self {
        NetworkInitError::Config(err)
    }
}

impl Error for NetworkInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetworkInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Driver lifecycle: `Init -> Running -> Done`, strictly forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Running,
    Done,
}

/// Simulation driver owning the topology, the user positions and the random source.
///
/// User positions are the only state that survives between steps; assignments, demands and
/// allocations are recomputed from scratch every step.
pub struct Network {
    config: SimConfig,
    resolver: AssociationResolver,
    positions: Vec<Position>,
    rng: ChaCha12Rng,
    step_index: usize,
    history: Vec<StepRecord>,
}

impl Network {
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build the station grid and scatter users uniformly, both seeded from `config.seed`.
    pub fn try_new(config: SimConfig) -> Result<Self, NetworkInitError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let positions =
            mobility::initial_positions(&mut rng, config.num_users, config.area_bound());
        Self::build(config, positions, rng)
    }

    /// Start from caller-supplied user positions instead of random placement.
    pub fn try_with_positions(
        config: SimConfig,
        positions: Vec<Position>,
    ) -> Result<Self, NetworkInitError> {
        config.validate()?;
        if positions.len() != config.num_users {
            return Err(NetworkInitError::UserCountMismatch {
                expected: config.num_users,
                actual: positions.len(),
            });
        }
        let bound = config.area_bound();
        if let Some(user) = positions
            .iter()
            .position(|p| p.iter().any(|c| !(0.0..=bound).contains(c)))
        {
            return Err(NetworkInitError::PositionOutOfBounds { user, bound });
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Self::build(config, positions, rng)
    }

    fn build(
        config: SimConfig,
        positions: Vec<Position>,
        rng: ChaCha12Rng,
    ) -> Result<Self, NetworkInitError> {
        let stations =
            topology::generate_stations(config.num_cells, config.cell_spacing, config.bs_capacity);
        info!(
            stations = stations.len(),
            users = config.num_users,
            steps = config.sim_steps,
            capacity = config.bs_capacity,
            association = ?config.association,
            parallel = config.parallel,
            "network initialised"
        );
        let resolver = AssociationResolver::new(stations, config.association, config.parallel);
        Ok(Self {
            history: Vec::with_capacity(config.sim_steps),
            config,
            resolver,
            positions,
            rng,
            step_index: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stations(&self) -> &[BaseStation] {
        self.resolver.stations()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Steps completed so far.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn phase(&self) -> RunPhase {
        if self.step_index == 0 {
            RunPhase::Init
        } else if self.step_index < self.config.sim_steps {
            RunPhase::Running
        } else {
            RunPhase::Done
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == RunPhase::Done
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Advance one step: move, associate, draw demand, allocate.
    ///
    /// Returns `None` once the configured number of steps has run.
    pub fn step(&mut self) -> Option<StepRecord> {
        if self.is_done() {
            return None;
        }
        let cfg = &self.config;

        mobility::step_positions(
            &mut self.rng,
            &mut self.positions,
            cfg.user_speed,
            cfg.area_bound(),
        );
        let assignments = self.resolver.resolve(&self.positions);
        let demands =
            demand::generate_demand(&mut self.rng, cfg.num_users, cfg.demand_min, cfg.demand_max);
        let allocated = allocation::allocate(
            &assignments,
            &demands,
            cfg.num_stations(),
            cfg.bs_capacity,
            cfg.parallel,
        );

        self.step_index += 1;
        let record = StepRecord {
            step: self.step_index,
            positions: self.positions.clone(),
            assignments,
            demands,
            allocated,
        };
        if tracing::enabled!(Level::DEBUG) {
            let summary = record.summary(cfg.num_stations(), cfg.bs_capacity);
            debug!(
                step = summary.step,
                qos_met = summary.qos_met,
                qos_violated = summary.qos_violated,
                oversubscribed = summary.oversubscribed_stations,
                "step complete"
            );
        }
        self.history.push(record.clone());
        Some(record)
    }

    /// Run the remaining steps and hand back the full history.
    pub fn run(mut self) -> SimulationHistory {
        while self.step().is_some() {}
        info!(steps = self.history.len(), "simulation finished");
        SimulationHistory {
            schema_version: 1,
            stations: self.resolver.stations().to_vec(),
            config: self.config,
            steps: self.history,
        }
    }
}

/// Validate `config`, run it to completion and return the history.
pub fn simulate(config: SimConfig) -> Result<SimulationHistory, NetworkInitError> {
    Ok(Network::try_new(config)?.run())
}

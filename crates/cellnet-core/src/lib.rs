pub mod allocation;
pub mod association;
pub mod config;
pub mod demand;
pub mod mobility;
pub mod network;
pub mod record;
pub mod spatial;
pub mod topology;

pub use allocation::{QosStatus, StationLoad};
pub use config::{AssociationStrategy, SimConfig, SimConfigError};
pub use network::{simulate, Network, NetworkInitError, RunPhase};
pub use record::{SimulationHistory, StepRecord, StepSummary};
pub use topology::{BaseStation, Position};

use crate::allocation::{self, QosStatus, StationLoad};
use crate::config::SimConfig;
use crate::topology::{BaseStation, Position};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one simulated step. All arrays are indexed by user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: usize,
    pub positions: Vec<Position>,
    pub assignments: Vec<usize>,
    pub demands: Vec<u32>,
    pub allocated: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct StepSummary {
    pub step: usize,
    pub users: usize,
    pub qos_met: usize,
    pub qos_violated: usize,
    pub total_demand: u64,
    pub total_allocated: f64,
    pub oversubscribed_stations: usize,
    /// Mean of `allocated / demand` over users.
    pub mean_satisfaction: f64,
}

impl StepRecord {
    pub fn num_users(&self) -> usize {
        self.positions.len()
    }

    pub fn qos(&self) -> Vec<QosStatus> {
        self.allocated
            .iter()
            .zip(&self.demands)
            .map(|(&a, &d)| QosStatus::classify(a, d))
            .collect()
    }

    pub fn qos_met_count(&self) -> usize {
        self.qos().into_iter().filter(|q| q.is_met()).count()
    }

    pub fn station_loads(&self, num_stations: usize, capacity: f64) -> Vec<StationLoad> {
        allocation::station_loads(
            &self.assignments,
            &self.demands,
            &self.allocated,
            num_stations,
            capacity,
        )
    }

    pub fn summary(&self, num_stations: usize, capacity: f64) -> StepSummary {
        let users = self.num_users();
        let qos_met = self.qos_met_count();
        let satisfaction_sum: f64 = self
            .allocated
            .iter()
            .zip(&self.demands)
            .map(|(&a, &d)| if d == 0 { 1.0 } else { a / d as f64 })
            .sum();
        StepSummary {
            step: self.step,
            users,
            qos_met,
            qos_violated: users - qos_met,
            total_demand: self.demands.iter().map(|&d| d as u64).sum(),
            total_allocated: self.allocated.iter().sum(),
            oversubscribed_stations: self
                .station_loads(num_stations, capacity)
                .iter()
                .filter(|l| l.oversubscribed)
                .count(),
            mean_satisfaction: satisfaction_sum / users.max(1) as f64,
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

/// Every step of a completed run, in order, plus the fixed context needed to render it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: SimConfig,
    pub stations: Vec<BaseStation>,
    pub steps: Vec<StepRecord>,
}

impl SimulationHistory {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.steps.iter()
    }

    pub fn summaries(&self) -> Vec<StepSummary> {
        self.steps
            .iter()
            .map(|r| r.summary(self.stations.len(), self.config.bs_capacity))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a SimulationHistory {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

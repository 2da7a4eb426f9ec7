//! Capacity-constrained bandwidth allocation.
//!
//! Every station splits its capacity among the users associated with it. A station whose
//! aggregate demand fits within capacity grants every request in full; an oversubscribed
//! station scales each request by `capacity / total_demand`, so the group exhausts capacity
//! exactly and every user keeps its relative share. Allocation is a pure function of the
//! current step's assignments and demands.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Slack allowed when comparing allocations against demands or capacity.
pub const QOS_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosStatus {
    Met,
    Violated,
}

impl QosStatus {
    pub fn classify(allocated: f64, demand: u32) -> Self {
        if allocated + QOS_TOLERANCE >= demand as f64 {
            QosStatus::Met
        } else {
            QosStatus::Violated
        }
    }

    pub fn is_met(self) -> bool {
        self == QosStatus::Met
    }
}

/// Per-station view of one step's allocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationLoad {
    pub station: usize,
    pub users: usize,
    pub total_demand: u64,
    pub total_allocated: f64,
    pub oversubscribed: bool,
    /// `total_allocated / capacity`, in `[0, 1]`.
    pub utilization: f64,
}

/// User indices grouped by assigned station. Panics if an assignment is out of range.
pub fn group_by_station(assignments: &[usize], num_stations: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); num_stations];
    for (user, &station) in assignments.iter().enumerate() {
        groups[station].push(user);
    }
    groups
}

fn group_demand(members: &[usize], demands: &[u32]) -> u64 {
    members.iter().map(|&u| demands[u] as u64).sum()
}

/// Allocation for each member of one station group, in member order.
fn allocate_group(station: usize, members: &[usize], demands: &[u32], capacity: f64) -> Vec<f64> {
    let total_demand = group_demand(members, demands) as f64;
    // Checked before any division: an oversubscribed group always has positive demand.
    if total_demand <= capacity {
        members.iter().map(|&u| demands[u] as f64).collect()
    } else {
        trace!(
            station,
            users = members.len(),
            total_demand,
            capacity,
            "station oversubscribed, scaling allocations"
        );
        members
            .iter()
            .map(|&u| demands[u] as f64 / total_demand * capacity)
            .collect()
    }
}

/// Allocated bandwidth per user, aligned with `assignments` and `demands`.
///
/// Stations without users contribute nothing. With `parallel`, station groups are processed
/// concurrently; the result is identical either way.
pub fn allocate(
    assignments: &[usize],
    demands: &[u32],
    num_stations: usize,
    capacity: f64,
    parallel: bool,
) -> Vec<f64> {
    debug_assert_eq!(
        assignments.len(),
        demands.len(),
        "assignments and demands must be aligned by user"
    );
    let groups = group_by_station(assignments, num_stations);
    let per_group = |(station, members): (usize, &Vec<usize>)| {
        if members.is_empty() {
            Vec::new()
        } else {
            allocate_group(station, members, demands, capacity)
        }
    };
    let shares: Vec<Vec<f64>> = if parallel {
        groups.par_iter().enumerate().map(per_group).collect()
    } else {
        groups.iter().enumerate().map(per_group).collect()
    };

    let mut allocated = vec![0.0; assignments.len()];
    for (members, share) in groups.iter().zip(shares) {
        for (&user, value) in members.iter().zip(share) {
            allocated[user] = value;
        }
    }
    allocated
}

/// Per-station totals for one step, one entry per station including idle ones.
pub fn station_loads(
    assignments: &[usize],
    demands: &[u32],
    allocated: &[f64],
    num_stations: usize,
    capacity: f64,
) -> Vec<StationLoad> {
    group_by_station(assignments, num_stations)
        .into_iter()
        .enumerate()
        .map(|(station, members)| {
            let total_demand = group_demand(&members, demands);
            let total_allocated: f64 = members.iter().map(|&u| allocated[u]).sum();
            StationLoad {
                station,
                users: members.len(),
                total_demand,
                total_allocated,
                oversubscribed: total_demand as f64 > capacity,
                utilization: if capacity > 0.0 {
                    total_allocated / capacity
                } else {
                    0.0
                },
            }
        })
        .collect()
}

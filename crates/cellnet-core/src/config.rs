use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// How users are matched to their nearest base station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssociationStrategy {
    /// Scan every station for every user.
    #[default]
    Linear,
    /// Query an R*-tree built over station positions.
    Indexed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Cells per side of the hexagonal grid.
    pub num_cells: usize,
    pub num_users: usize,
    /// Maximum per-axis displacement span per step (units/step).
    pub user_speed: f64,
    pub sim_steps: usize,
    /// Capacity of every base station in Mbps.
    pub bs_capacity: f64,
    pub cell_spacing: f64,
    pub demand_min: u32,
    pub demand_max: u32,
    pub seed: u64,
    pub association: AssociationStrategy,
    /// Resolve associations and station allocations with rayon.
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_cells: 4,
            num_users: 15,
            user_speed: 0.5,
            sim_steps: 10,
            bs_capacity: 50.0,
            cell_spacing: 10.0,
            demand_min: 1,
            demand_max: 10,
            seed: 42,
            association: AssociationStrategy::Linear,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidNumCells,
    InvalidNumUsers,
    InvalidSimSteps,
    TooManyCells { max: usize, actual: usize },
    TooManyUsers { max: usize, actual: usize },
    TooManySteps { max: usize, actual: usize },
    TooManyUserSteps { max: usize, actual: usize },
    InvalidUserSpeed(f64),
    InvalidCapacity(f64),
    InvalidCellSpacing(f64),
    InvalidDemandRange { min: u32, max: u32 },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidNumCells => write!(f, "num_cells must be positive"),
            SimConfigError::InvalidNumUsers => write!(f, "num_users must be positive"),
            SimConfigError::InvalidSimSteps => write!(f, "sim_steps must be positive"),
            SimConfigError::TooManyCells { max, actual } => {
                write!(f, "num_cells ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::TooManyUsers { max, actual } => {
                write!(f, "num_users ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::TooManySteps { max, actual } => {
                write!(f, "sim_steps ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::TooManyUserSteps { max, actual } => write!(
                f,
                "num_users * sim_steps ({actual}) exceeds supported maximum ({max})"
            ),
            SimConfigError::InvalidUserSpeed(v) => {
                write!(f, "user_speed must be finite and positive, got {v}")
            }
            SimConfigError::InvalidCapacity(v) => {
                write!(f, "bs_capacity must be finite and positive, got {v}")
            }
            SimConfigError::InvalidCellSpacing(v) => {
                write!(f, "cell_spacing must be finite and positive, got {v}")
            }
            SimConfigError::InvalidDemandRange { min, max } => write!(
                f,
                "demand range [{min}, {max}] must satisfy 1 <= demand_min <= demand_max"
            ),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_CELLS_PER_SIDE: usize = 256;
    pub const MAX_USERS: usize = 1_000_000;
    pub const MAX_STEPS: usize = 1_000_000;
    /// Upper bound on user-steps kept in a run's history.
    pub const MAX_USER_STEPS: usize = 50_000_000;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.num_cells == 0 {
            return Err(SimConfigError::InvalidNumCells);
        }
        if self.num_cells > Self::MAX_CELLS_PER_SIDE {
            return Err(SimConfigError::TooManyCells {
                max: Self::MAX_CELLS_PER_SIDE,
                actual: self.num_cells,
            });
        }
        if self.num_users == 0 {
            return Err(SimConfigError::InvalidNumUsers);
        }
        if self.num_users > Self::MAX_USERS {
            return Err(SimConfigError::TooManyUsers {
                max: Self::MAX_USERS,
                actual: self.num_users,
            });
        }
        if self.sim_steps == 0 {
            return Err(SimConfigError::InvalidSimSteps);
        }
        if self.sim_steps > Self::MAX_STEPS {
            return Err(SimConfigError::TooManySteps {
                max: Self::MAX_STEPS,
                actual: self.sim_steps,
            });
        }
        // Both factors are bounded above, so the product cannot overflow.
        let user_steps = self.num_users * self.sim_steps;
        if user_steps > Self::MAX_USER_STEPS {
            return Err(SimConfigError::TooManyUserSteps {
                max: Self::MAX_USER_STEPS,
                actual: user_steps,
            });
        }
        if !(self.user_speed.is_finite() && self.user_speed > 0.0) {
            return Err(SimConfigError::InvalidUserSpeed(self.user_speed));
        }
        if !(self.bs_capacity.is_finite() && self.bs_capacity > 0.0) {
            return Err(SimConfigError::InvalidCapacity(self.bs_capacity));
        }
        if !(self.cell_spacing.is_finite() && self.cell_spacing > 0.0) {
            return Err(SimConfigError::InvalidCellSpacing(self.cell_spacing));
        }
        if self.demand_min == 0 || self.demand_min > self.demand_max {
            return Err(SimConfigError::InvalidDemandRange {
                min: self.demand_min,
                max: self.demand_max,
            });
        }
        Ok(())
    }

    pub fn num_stations(&self) -> usize {
        self.num_cells * self.num_cells
    }

    /// Side length of the square users move in.
    pub fn area_bound(&self) -> f64 {
        self.num_cells as f64 * self.cell_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_counts() {
        let cfg = SimConfig {
            num_cells: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidNumCells));
        let cfg = SimConfig {
            num_users: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidNumUsers));
        let cfg = SimConfig {
            sim_steps: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidSimSteps));
    }

    #[test]
    fn rejects_non_positive_or_non_finite_reals() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = SimConfig {
                user_speed: bad,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(SimConfigError::InvalidUserSpeed(_))
            ));
            let cfg = SimConfig {
                bs_capacity: bad,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(SimConfigError::InvalidCapacity(_))
            ));
            let cfg = SimConfig {
                cell_spacing: bad,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(SimConfigError::InvalidCellSpacing(_))
            ));
        }
    }

    #[test]
    fn rejects_bad_demand_range() {
        let cfg = SimConfig {
            demand_min: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::InvalidDemandRange { .. })
        ));
        let cfg = SimConfig {
            demand_min: 11,
            demand_max: 10,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::InvalidDemandRange { min: 11, max: 10 })
        ));
    }

    #[test]
    fn rejects_oversized_grid() {
        let cfg = SimConfig {
            num_cells: SimConfig::MAX_CELLS_PER_SIDE + 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::TooManyCells { .. })
        ));
    }

    #[test]
    fn rejects_history_too_large_to_retain() {
        let cfg = SimConfig {
            num_users: SimConfig::MAX_USERS,
            sim_steps: SimConfig::MAX_STEPS,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SimConfigError::TooManyUserSteps {
                max: SimConfig::MAX_USER_STEPS,
                actual: SimConfig::MAX_USERS * SimConfig::MAX_STEPS,
            })
        );
        let at_limit = SimConfig {
            num_users: 50_000,
            sim_steps: 1_000,
            ..SimConfig::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{"num_users": 30, "association": "indexed"}"#).unwrap();
        assert_eq!(cfg.num_users, 30);
        assert_eq!(cfg.association, AssociationStrategy::Indexed);
        assert_eq!(cfg.num_cells, SimConfig::default().num_cells);
        assert_eq!(cfg.area_bound(), 40.0);
    }
}

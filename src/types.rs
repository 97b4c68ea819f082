use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gridded fields the tracker queries from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldId {
    /// Sea-ice concentration, percent (0-100)
    Concentration,
    /// Ice drift x displacement, km per 2-day interval
    DriftX,
    /// Ice drift y displacement, km per 2-day interval
    DriftY,
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldId::Concentration => write!(f, "ice_conc"),
            FieldId::DriftX => write!(f, "dX"),
            FieldId::DriftY => write!(f, "dY"),
        }
    }
}

/// One sample of the reconstructed trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub date: NaiveDate,
    pub longitude: f64,
    pub latitude: f64,
}

/// Why a backtracking run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Ice concentration at the tracked point fell below the threshold
    LowConcentration,
    /// Averaged drift was missing or zero in at least one component
    NoDriftData,
    /// Configured day limit reached with ice still present
    IterationLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::LowConcentration => write!(f, "ice concentration below threshold"),
            StopReason::NoDriftData => write!(f, "no usable drift data"),
            StopReason::IterationLimit => write!(f, "iteration limit reached"),
        }
    }
}

/// Result of one backtracking run.
///
/// Points are ordered newest first: the seed position, then one point per
/// accepted backward step, dates strictly decreasing by one day. The stop
/// reason distinguishes "ice persisted past the search window" from "ice
/// was lost" - data exhaustion is a normal outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub stop_reason: StopReason,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest reconstructed position (the end of the backward track)
    pub fn endpoint(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }
}

/// Backtracking parameters
#[derive(Debug, Clone)]
pub struct BacktrackParams {
    /// Minimum ice concentration in percent; tracking stops below this
    pub min_ice_conc: f64,
    /// Half-width of the drift averaging box, km in projected space
    pub search_radius_km: f64,
    /// Maximum number of backward daily steps
    pub limit_days: u32,
}

impl Default for BacktrackParams {
    fn default() -> Self {
        Self {
            min_ice_conc: 70.0,     // percent
            search_radius_km: 100.0,
            limit_days: 100,
        }
    }
}

/// Error types for trajectory reconstruction
#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("field provider error: {0}")]
    Provider(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tracking operations
pub type DriftResult<T> = Result<T, DriftError>;

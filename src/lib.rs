//! floetrack: backward trajectory reconstruction for drifting sea ice
//!
//! Given time-indexed gridded fields of ice concentration and ice drift,
//! this library traces where an ice parcel was on each prior day: starting
//! from a known position and date it steps one day backward at a time,
//! displacing the point against the locally-averaged drift vector, until
//! the ice concentration falls below a threshold, the drift data runs out,
//! or a day limit is reached.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use floetrack::{backtrack, BacktrackParams, InMemoryProvider};
//!
//! # fn provider() -> InMemoryProvider { unimplemented!() }
//! let provider = provider();
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let trajectory = backtrack(&provider, start, -10.0, 85.0,
//!                            &BacktrackParams::default(), None)?;
//! println!("stopped: {}", trajectory.stop_reason);
//! # Ok::<(), floetrack::DriftError>(())
//! ```

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    BacktrackParams, DriftError, DriftResult, FieldId, StopReason, Trajectory, TrajectoryPoint,
};

pub use crate::core::{backtrack, Backtracker, FieldSampler, PolarStereographic};
pub use io::{FieldProvider, GridSeries, InMemoryProvider};

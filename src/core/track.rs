use crate::core::proj::PolarStereographic;
use crate::core::sampler::FieldSampler;
use crate::io::grid::FieldProvider;
use crate::io::writer;
use crate::types::{BacktrackParams, DriftResult, FieldId, StopReason, Trajectory, TrajectoryPoint};
use chrono::{Datelike, Duration, NaiveDate};
use std::path::Path;

/// The archive's drift product encodes a 2-day cumulative displacement;
/// halving yields the 1-day estimate used for a single backward step.
const DRIFT_INTERVAL_DAYS: f64 = 2.0;

/// The archive's y-axis sign convention changed during 2015 and the early
/// files were never reprocessed; dy from years before this must be negated.
const DY_SIGN_FLIP_BEFORE_YEAR: i32 = 2016;

/// Mutable state of one run: the tracked point in projected coordinates,
/// the date being examined, and the step counter.
struct TrackingState {
    x: f64,
    y: f64,
    date: NaiveDate,
    steps: u32,
}

/// Backward-in-time trajectory reconstruction for a point on drifting ice.
///
/// Each iteration checks ice concentration at the tracked point, averages
/// the drift field over a box around it, and displaces the point against
/// the recorded drift by one day's worth of motion. Tracking ends when the
/// ice melts out, the drift data runs out, or the day limit is hit - all
/// normal outcomes reported in the result, never errors.
pub struct Backtracker {
    params: BacktrackParams,
    proj: PolarStereographic,
}

impl Backtracker {
    /// Create a backtracker with default parameters
    pub fn new() -> Self {
        Self::with_params(BacktrackParams::default())
    }

    /// Create a backtracker with custom parameters
    pub fn with_params(params: BacktrackParams) -> Self {
        Self {
            params,
            proj: PolarStereographic::osi_saf_north(),
        }
    }

    /// Reconstruct the trajectory ending at (`start_longitude`,
    /// `start_latitude`) on `start_date`.
    ///
    /// The returned trajectory always contains the seed point, followed by
    /// one point per accepted backward step with dates decreasing by
    /// exactly one day.
    pub fn run<P: FieldProvider>(
        &self,
        provider: &P,
        start_date: NaiveDate,
        start_longitude: f64,
        start_latitude: f64,
    ) -> DriftResult<Trajectory> {
        let (x0, y0) = self.proj.to_projected(start_longitude, start_latitude)?;
        log::info!(
            "backtracking from ({:.4}, {:.4}) = ({:.1}, {:.1}) km starting {}",
            start_longitude,
            start_latitude,
            x0,
            y0,
            start_date
        );

        let sampler = FieldSampler::new(provider);
        let mut state = TrackingState {
            x: x0,
            y: y0,
            date: start_date,
            steps: 0,
        };
        let mut points = vec![TrajectoryPoint {
            date: start_date,
            longitude: start_longitude,
            latitude: start_latitude,
        }];

        let stop_reason = loop {
            if state.steps >= self.params.limit_days {
                break StopReason::IterationLimit;
            }

            // A missing concentration sample gives no basis to stop; only a
            // resolved value below the threshold ends the run.
            let conc =
                sampler.point_sample(FieldId::Concentration, state.date, state.x, state.y)?;
            log::debug!("{}: ice concentration {:?}", state.date, conc);
            if let Some(conc) = conc {
                if conc < self.params.min_ice_conc {
                    log::info!(
                        "{}: ice concentration {:.1} below threshold {:.1}",
                        state.date,
                        conc,
                        self.params.min_ice_conc
                    );
                    break StopReason::LowConcentration;
                }
            }

            match self.mean_drift(&sampler, &state)? {
                Some((dx, dy)) => {
                    state.x -= dx;
                    state.y -= dy;
                    let (lon, lat) = self.proj.to_geographic(state.x, state.y)?;

                    // The new point carries the previous calendar day: the
                    // day the parcel occupied the reconstructed position.
                    state.date -= Duration::days(1);
                    points.push(TrajectoryPoint {
                        date: state.date,
                        longitude: lon,
                        latitude: lat,
                    });
                    log::debug!(
                        "step {}: {} at ({:.4}, {:.4})",
                        state.steps + 1,
                        state.date,
                        lon,
                        lat
                    );
                }
                None => {
                    log::info!("{}: no more usable drift data", state.date);
                    break StopReason::NoDriftData;
                }
            }

            state.steps += 1;
        };

        log::info!(
            "trajectory of {} days, stopped: {}, final location ({:.4}, {:.4})",
            points.len(),
            stop_reason,
            points[points.len() - 1].longitude,
            points[points.len() - 1].latitude
        );
        Ok(Trajectory {
            points,
            stop_reason,
        })
    }

    /// One-day displacement estimate at the tracked point, or `None` when
    /// the drift data is unusable.
    fn mean_drift<P: FieldProvider>(
        &self,
        sampler: &FieldSampler<'_, P>,
        state: &TrackingState,
    ) -> DriftResult<Option<(f64, f64)>> {
        let radius = self.params.search_radius_km;
        let dx = sampler.neighborhood_average(FieldId::DriftX, state.date, state.x, state.y, radius)?;
        let dy = sampler.neighborhood_average(FieldId::DriftY, state.date, state.x, state.y, radius)?;

        let (dx, dy) = match (dx, dy) {
            (Some(dx), Some(dy)) => (dx, dy),
            _ => return Ok(None),
        };

        let dx = dx / DRIFT_INTERVAL_DAYS;
        let mut dy = dy / DRIFT_INTERVAL_DAYS;
        if state.date.year() < DY_SIGN_FLIP_BEFORE_YEAR {
            dy = -dy;
        }

        // A zero component counts as unusable data. This also stops
        // legitimately single-axis drift; the behavior is kept for
        // compatibility with historical reprocessing runs.
        if dx.abs() * dy.abs() > 0.0 {
            Ok(Some((dx, dy)))
        } else {
            Ok(None)
        }
    }
}

impl Default for Backtracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstruct a backtrajectory and optionally write it as CSV.
///
/// Public entry point: seeds a [`Backtracker`] with `params`, runs it
/// against `provider`, and writes the result to `output` when a path is
/// given. The trajectory is returned either way.
pub fn backtrack<P: FieldProvider>(
    provider: &P,
    start_date: NaiveDate,
    start_longitude: f64,
    start_latitude: f64,
    params: &BacktrackParams,
    output: Option<&Path>,
) -> DriftResult<Trajectory> {
    let trajectory = Backtracker::with_params(params.clone()).run(
        provider,
        start_date,
        start_longitude,
        start_latitude,
    )?;
    if let Some(path) = output {
        writer::write_csv(&trajectory, path)?;
    }
    Ok(trajectory)
}

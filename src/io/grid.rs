use crate::types::{DriftError, DriftResult, FieldId};
use chrono::NaiveDate;
use ndarray::Array3;

/// Source of time-indexed gridded fields in projected coordinates.
///
/// This is the seam to the archive: implementations answer point and
/// region queries with nearest-available-date matching and mark missing
/// cells as NaN. The tracker treats the provider as read-only for the
/// duration of a run; a remote implementation would own its own client
/// and retry policy.
pub trait FieldProvider {
    /// Value of the cell nearest to (x, y) on the date slice nearest to
    /// `date`. NaN marks a missing observation.
    fn sample_point(&self, field: FieldId, date: NaiveDate, x: f64, y: f64) -> DriftResult<f64>;

    /// Values of every cell whose center falls inside the closed box
    /// `[x_min, x_max] x [y_min, y_max]`, on the nearest date slice.
    /// Missing cells are returned as NaN, not dropped.
    fn sample_region(
        &self,
        field: FieldId,
        date: NaiveDate,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> DriftResult<Vec<f64>>;
}

/// One time-indexed scalar grid: a stack of (y, x) slices with cell-center
/// coordinate axes in projected kilometers.
///
/// Either coordinate axis may be stored ascending or descending; the
/// OSI-SAF files keep y descending. Lookups go by coordinate value, so the
/// orientation never matters to callers.
#[derive(Debug, Clone)]
pub struct GridSeries {
    times: Vec<NaiveDate>,
    xc: Vec<f64>,
    yc: Vec<f64>,
    /// (time, y, x); NaN marks missing cells
    values: Array3<f64>,
}

impl GridSeries {
    pub fn new(
        times: Vec<NaiveDate>,
        xc: Vec<f64>,
        yc: Vec<f64>,
        values: Array3<f64>,
    ) -> DriftResult<Self> {
        let expected = (times.len(), yc.len(), xc.len());
        if values.dim() != expected {
            return Err(DriftError::Provider(format!(
                "grid shape {:?} does not match axes (time, y, x) = {:?}",
                values.dim(),
                expected
            )));
        }
        if times.is_empty() || xc.is_empty() || yc.is_empty() {
            return Err(DriftError::Provider("grid has an empty axis".to_string()));
        }
        Ok(Self {
            times,
            xc,
            yc,
            values,
        })
    }

    /// Index of the time slice closest to `date` by absolute day distance
    fn nearest_time_index(&self, date: NaiveDate) -> usize {
        let mut best = 0;
        let mut best_dist = i64::MAX;
        for (i, t) in self.times.iter().enumerate() {
            let dist = (*t - date).num_days().abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    fn nearest_axis_index(axis: &[f64], v: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, c) in axis.iter().enumerate() {
            let dist = (c - v).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Nearest-cell value on the nearest date slice; NaN if missing
    pub fn sample_point(&self, date: NaiveDate, x: f64, y: f64) -> f64 {
        let ti = self.nearest_time_index(date);
        let xi = Self::nearest_axis_index(&self.xc, x);
        let yi = Self::nearest_axis_index(&self.yc, y);
        self.values[[ti, yi, xi]]
    }

    /// Every cell value inside the coordinate box on the nearest date slice
    pub fn sample_region(
        &self,
        date: NaiveDate,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Vec<f64> {
        let ti = self.nearest_time_index(date);
        let mut out = Vec::new();
        for (yi, &yv) in self.yc.iter().enumerate() {
            if yv < y_min || yv > y_max {
                continue;
            }
            for (xi, &xv) in self.xc.iter().enumerate() {
                if xv < x_min || xv > x_max {
                    continue;
                }
                out.push(self.values[[ti, yi, xi]]);
            }
        }
        out
    }
}

/// Provider serving the three tracking fields from in-memory grids.
///
/// Reference implementation of [`FieldProvider`], also the test double for
/// synthetic scenarios.
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    concentration: GridSeries,
    drift_x: GridSeries,
    drift_y: GridSeries,
}

impl InMemoryProvider {
    pub fn new(concentration: GridSeries, drift_x: GridSeries, drift_y: GridSeries) -> Self {
        Self {
            concentration,
            drift_x,
            drift_y,
        }
    }

    fn series(&self, field: FieldId) -> &GridSeries {
        match field {
            FieldId::Concentration => &self.concentration,
            FieldId::DriftX => &self.drift_x,
            FieldId::DriftY => &self.drift_y,
        }
    }
}

impl FieldProvider for InMemoryProvider {
    fn sample_point(&self, field: FieldId, date: NaiveDate, x: f64, y: f64) -> DriftResult<f64> {
        Ok(self.series(field).sample_point(date, x, y))
    }

    fn sample_region(
        &self,
        field: FieldId,
        date: NaiveDate,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> DriftResult<Vec<f64>> {
        Ok(self
            .series(field)
            .sample_region(date, x_min, x_max, y_min, y_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn small_series() -> GridSeries {
        // Two slices, y stored descending as in the archive files.
        let times = vec![date(2020, 1, 1), date(2020, 1, 3)];
        let xc = vec![0.0, 10.0, 20.0];
        let yc = vec![20.0, 10.0, 0.0];
        let mut values = Array3::zeros((2, 3, 3));
        for ti in 0..2 {
            for yi in 0..3 {
                for xi in 0..3 {
                    values[[ti, yi, xi]] = (ti * 100 + yi * 10 + xi) as f64;
                }
            }
        }
        GridSeries::new(times, xc, yc, values).unwrap()
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let result = GridSeries::new(
            vec![date(2020, 1, 1)],
            vec![0.0, 10.0],
            vec![0.0],
            Array3::zeros((1, 2, 2)),
        );
        assert!(matches!(result, Err(DriftError::Provider(_))));
    }

    #[test]
    fn nearest_time_picks_closest_slice() {
        let s = small_series();
        // Jan 2 ties at one day each way; the first slice wins.
        assert_eq!(s.sample_point(date(2020, 1, 2), 0.0, 20.0), 0.0);
        // Jan 5 is closest to the second slice.
        assert_eq!(s.sample_point(date(2020, 1, 5), 0.0, 20.0), 100.0);
    }

    #[test]
    fn point_lookup_snaps_to_nearest_cell() {
        let s = small_series();
        // (12, 8) snaps to xc=10, yc=10 -> value 11.
        assert_eq!(s.sample_point(date(2020, 1, 1), 12.0, 8.0), 11.0);
    }

    #[test]
    fn region_is_orientation_independent() {
        let s = small_series();
        // Box covering xc in {0,10}, yc in {10,20} on the first slice.
        let mut vals = s.sample_region(date(2020, 1, 1), -1.0, 11.0, 9.0, 21.0);
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(vals, vec![0.0, 1.0, 10.0, 11.0]);
    }

    #[test]
    fn region_outside_grid_is_empty() {
        let s = small_series();
        assert!(s
            .sample_region(date(2020, 1, 1), 100.0, 110.0, 100.0, 110.0)
            .is_empty());
    }
}

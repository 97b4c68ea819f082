use crate::io::grid::FieldProvider;
use crate::types::{DriftResult, FieldId};
use chrono::NaiveDate;

/// Masked lookup layer between the tracker and a field provider.
///
/// Concentration checks use the single nearest cell; drift components are
/// smoothed by averaging every cell inside a caller-supplied box, because
/// the drift product is too noisy at sub-grid scale for a stable daily
/// displacement estimate. Missing cells (NaN) are excluded from the mean,
/// never treated as zero.
pub struct FieldSampler<'a, P: FieldProvider> {
    provider: &'a P,
}

impl<'a, P: FieldProvider> FieldSampler<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Nearest-cell sample; `None` when the cell holds no observation.
    pub fn point_sample(
        &self,
        field: FieldId,
        date: NaiveDate,
        x: f64,
        y: f64,
    ) -> DriftResult<Option<f64>> {
        let value = self.provider.sample_point(field, date, x, y)?;
        Ok(if value.is_nan() { None } else { Some(value) })
    }

    /// Mean over the box `[x-radius, x+radius] x [y-radius, y+radius]`,
    /// missing cells excluded. An empty or all-missing neighborhood is a
    /// `None` outcome, not an error: it tells the tracker the data ran out.
    pub fn neighborhood_average(
        &self,
        field: FieldId,
        date: NaiveDate,
        x: f64,
        y: f64,
        radius: f64,
    ) -> DriftResult<Option<f64>> {
        let cells = self.provider.sample_region(
            field,
            date,
            x - radius,
            x + radius,
            y - radius,
            y + radius,
        )?;

        let mut sum = 0.0;
        let mut count = 0usize;
        for v in &cells {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }

        if count == 0 {
            log::debug!(
                "{} neighborhood at ({:.1}, {:.1}) km on {} is all missing ({} cells)",
                field,
                x,
                y,
                date,
                cells.len()
            );
            return Ok(None);
        }
        Ok(Some(sum / count as f64))
    }
}

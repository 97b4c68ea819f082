use crate::types::{DriftResult, Trajectory};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Remove a stale output file. A missing file is the expected case and is
/// suppressed; every other failure propagates.
fn remove_existing(path: &Path) -> DriftResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write the trajectory as plain comma-separated text, one
/// `YYYY-MM-DD,longitude,latitude` row per point, no header. Any existing
/// file at `path` is replaced, never appended to.
pub fn write_csv(trajectory: &Trajectory, path: &Path) -> DriftResult<()> {
    remove_existing(path)?;
    log::info!(
        "writing {} trajectory points to {}",
        trajectory.len(),
        path.display()
    );

    let mut out = BufWriter::new(File::create(path)?);
    for p in &trajectory.points {
        writeln!(
            out,
            "{},{},{}",
            p.date.format("%Y-%m-%d"),
            p.longitude,
            p.latitude
        )?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Geometry,
    properties: Properties,
}

#[derive(Serialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: [f64; 2],
}

#[derive(Serialize)]
struct Properties {
    lon: f64,
    lat: f64,
    date: String,
}

#[derive(Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

/// Write the trajectory as a GeoJSON FeatureCollection of points, the
/// format the downstream plotting pipeline consumes. Same overwrite
/// discipline as [`write_csv`].
pub fn write_geojson(trajectory: &Trajectory, path: &Path) -> DriftResult<()> {
    remove_existing(path)?;

    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: trajectory
            .points
            .iter()
            .map(|p| Feature {
                kind: "Feature",
                geometry: Geometry {
                    kind: "Point",
                    coordinates: [p.longitude, p.latitude],
                },
                properties: Properties {
                    lon: p.longitude,
                    lat: p.latitude,
                    date: p.date.format("%Y-%m-%d").to_string(),
                },
            })
            .collect(),
    };

    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, &collection)?;
    Ok(())
}

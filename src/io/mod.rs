//! Field providers and trajectory output

pub mod grid;
pub mod writer;

// Re-export main types
pub use grid::{FieldProvider, GridSeries, InMemoryProvider};
pub use writer::{write_csv, write_geojson};

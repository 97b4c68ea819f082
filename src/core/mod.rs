//! Core trajectory reconstruction modules

pub mod proj;
pub mod sampler;
pub mod track;

// Re-export main types
pub use proj::PolarStereographic;
pub use sampler::FieldSampler;
pub use track::{backtrack, Backtracker};

//! Domain models for pulse-wave patient records.

mod compat;
mod field;
mod patient;
mod stored;
mod waveform;

pub use field::*;
pub use patient::*;
pub use stored::*;
pub use waveform::*;

//! Sample storage and the collaborators that produce samples.
//!
//! This module provides:
//! - [`MeasuresPool`]: the arrival-ordered sample pool owned by the controller
//! - [`MeasuresPoolSet`]: per-input training/test split of a pool
//! - [`InputSource`] and its stock implementations
//! - Plain-text trace ingestion and seeded synthetic traces

mod pool;
mod source;
mod synthetic;
mod trace;

pub use pool::{MeasuresPool, MeasuresPoolSet};
pub use source::{InputSequence, InputSource, SingleInput};
pub use synthetic::SyntheticTrace;
pub use trace::{parse_trace, read_trace};

//! Type aliases and common types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one program input whose samples are tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct InputId(pub u32);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for InputId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// An execution-time measurement tagged with the input it was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Input the measurement belongs to.
    pub input: InputId,
    /// Measured execution time (any consistent unit).
    pub time: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(input: InputId, time: f64) -> Self {
        Self { input, time }
    }
}

/// Policy used to combine per-input estimates into one pWCET bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergePolicy {
    /// One distribution per input; queries take the worst input.
    Envelope,
    /// Samples of all inputs are pooled and a single distribution is fitted.
    TraceMerge,
}

/// Answer of the configure and monitor hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// Keep sampling.
    Continue,
    /// Stop sampling at this level.
    Stop,
    /// Let the controller decide from its tests and minimum sizes.
    LetControllerDecide,
}

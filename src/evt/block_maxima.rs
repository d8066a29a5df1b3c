//! Block Maxima extraction.

use crate::error::InsufficientData;
use crate::measurement::{MeasuresPool, MeasuresPoolSet};
use crate::types::Sample;

use super::{ApproachKind, EvtApproach, ExtractedPools};

/// Keeps the maximum of each full block of consecutive samples, per input.
///
/// Trailing samples that do not fill a block are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMaxima {
    block_size: usize,
}

impl BlockMaxima {
    /// Create with the given block size (at least 1).
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    /// Samples per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn reduce(&self, pool: &MeasuresPool) -> MeasuresPool {
        let mut maxima = MeasuresPool::new();
        for input in pool.inputs() {
            let values = pool.values_for(input);
            for block in values.chunks_exact(self.block_size) {
                let max = block.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                maxima.push(Sample::new(input, max));
            }
        }
        maxima
    }
}

impl EvtApproach for BlockMaxima {
    fn kind(&self) -> ApproachKind {
        ApproachKind::BlockMaxima
    }

    fn name(&self) -> &'static str {
        "Block Maxima"
    }

    /// Two full blocks.
    fn minimal_sample_size(&self) -> usize {
        2 * self.block_size
    }

    fn perform(&self, set: &MeasuresPoolSet) -> Result<ExtractedPools, InsufficientData> {
        let training = self.reduce(set.training());
        let test = self.reduce(set.test());
        let blocks = training.len();

        Ok(ExtractedPools {
            blocks: Some(blocks),
            ..ExtractedPools::new(training, test)
        })
    }
}

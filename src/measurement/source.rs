//! Input sources: the collaborators that pick which program input is
//! measured next.

use crate::types::InputId;

/// Supplies the next input to measure.
///
/// Returning `None` means no more inputs are available and ends sampling.
pub trait InputSource {
    /// Next input identifier.
    fn next_input(&mut self) -> Option<InputId>;
}

/// Always yields the same input. Sampling stops through the configure hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleInput(pub InputId);

impl InputSource for SingleInput {
    fn next_input(&mut self) -> Option<InputId> {
        Some(self.0)
    }
}

/// Yields a finite list of inputs in order.
#[derive(Debug, Clone)]
pub struct InputSequence {
    inputs: std::vec::IntoIter<InputId>,
}

impl InputSequence {
    /// Create a sequence.
    pub fn new(inputs: impl IntoIterator<Item = InputId>) -> Self {
        Self {
            inputs: inputs.into_iter().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl InputSource for InputSequence {
    fn next_input(&mut self) -> Option<InputId> {
        self.inputs.next()
    }
}

impl<F> InputSource for F
where
    F: FnMut() -> Option<InputId>,
{
    fn next_input(&mut self) -> Option<InputId> {
        self()
    }
}

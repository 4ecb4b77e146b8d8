
use crate::Outcome;
use crate::predictor::BranchPredictor;

/// A simple predictor with no state: always predict the same direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticPredictor {
    direction: Outcome,
}
impl Default for StaticPredictor {
    /// Always predict 'taken'.
    fn default() -> Self { Self::new(Outcome::T) }
}
impl StaticPredictor {
    pub fn new(direction: Outcome) -> Self {
        Self { direction }
    }
    pub fn predict(&self, _pc: u32) -> Outcome { self.direction }
}

impl BranchPredictor for StaticPredictor {
    fn name(&self) -> &'static str { "Static" }
    fn predict(&mut self, _pc: u32) -> Outcome { self.direction }
    fn train(&mut self, _pc: u32, _outcome: Outcome) {}
    fn reset(&mut self) {}
}

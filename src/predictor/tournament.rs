//! Tournament predictor arbitrating between global and local history.

use crate::Outcome;
use crate::predictor::*;

/// Which component a tournament chooser entry currently favors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice { Global, Local }

/// A [GsharePredictor] and a [LocalPredictor] competing for each branch.
///
/// A table of [SaturatingCounter] indexed by the program counter learns
/// which component is more reliable for each address. The upper half of
/// the counter range favors the global component.
///
/// See "The Alpha 21264 Microprocessor" (Kessler, 1999).
#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    global: GsharePredictor,
    local: LocalPredictor,

    /// Chooser table, indexed by the program counter
    chooser: Vec<SaturatingCounter>,

    /// Mask for 'pc_index_bits'
    pc_mask: u32,
}
impl TournamentPredictor {
    pub fn new(ghistory_bits: usize, lhistory_bits: usize, pc_index_bits: usize)
        -> Self
    {
        assert!(pc_index_bits > 0 && pc_index_bits < u32::BITS as usize);
        Self {
            global: GsharePredictor::new(ghistory_bits),
            local: LocalPredictor::new(lhistory_bits, pc_index_bits),
            chooser: vec![SaturatingCounter::default(); 1 << pc_index_bits],
            pc_mask: mask(pc_index_bits),
        }
    }

    pub fn global(&self) -> &GsharePredictor { &self.global }
    pub fn local(&self) -> &LocalPredictor { &self.local }
    pub fn chooser(&self) -> &[SaturatingCounter] { &self.chooser }

    /// Returns the chooser index for some program counter value.
    pub fn chooser_index(&self, pc: u32) -> usize {
        (pc & self.pc_mask) as usize
    }

    /// Returns the component currently favored for 'pc'.
    pub fn choice(&self, pc: u32) -> Choice {
        match self.chooser[self.chooser_index(pc)].predict() {
            Outcome::T => Choice::Global,
            Outcome::N => Choice::Local,
        }
    }

    pub fn predict(&self, pc: u32) -> Outcome {
        match self.choice(pc) {
            Choice::Global => self.global.predict(pc),
            Choice::Local => self.local.predict(pc),
        }
    }

    pub fn train(&mut self, pc: u32, outcome: Outcome) {
        let global_correct = self.global.predict(pc) == outcome;
        let local_correct = self.local.predict(pc) == outcome;

        // Only move the chooser when exactly one component was right
        if global_correct != local_correct {
            let idx = self.chooser_index(pc);
            if global_correct {
                self.chooser[idx].increment();
            } else {
                self.chooser[idx].decrement();
            }
        }

        // Both components observe every outcome
        self.global.train(pc, outcome);
        self.local.train(pc, outcome);
    }

    pub fn reset(&mut self) {
        self.global.reset();
        self.local.reset();
        self.chooser.iter_mut().for_each(SaturatingCounter::reset);
    }
}

impl BranchPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "Tournament" }
    fn predict(&mut self, pc: u32) -> Outcome { TournamentPredictor::predict(self, pc) }
    fn train(&mut self, pc: u32, outcome: Outcome) {
        TournamentPredictor::train(self, pc, outcome)
    }
    fn reset(&mut self) { TournamentPredictor::reset(self) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_weakly_preferring_local() {
        let p = TournamentPredictor::new(4, 4, 4);
        assert!(p.chooser().iter().all(|c| c.state() == CounterState::WeaklyNotTaken));
        assert_eq!(p.choice(0x0), Choice::Local);
    }

    #[test]
    fn chooser_unchanged_when_components_agree() {
        let mut p = TournamentPredictor::new(4, 4, 4);
        // Both components start out predicting not-taken and see the same
        // constant stream, so they are always both right or both wrong.
        for _ in 0..64 {
            assert_eq!(p.global().predict(0x0), p.local().predict(0x0));
            p.train(0x0, Outcome::N);
        }
        assert!(p.chooser().iter().all(|c| c.state() == CounterState::WeaklyNotTaken));
    }

    #[test]
    fn both_components_train() {
        let mut p = TournamentPredictor::new(4, 4, 4);
        assert_eq!(p.choice(0x2), Choice::Local);
        p.train(0x2, Outcome::T);
        // Global entry (0x2 ^ 0) and local entry (history 0) both moved
        assert_eq!(p.global().pht()[0x2].state(), CounterState::WeaklyTaken);
        assert_eq!(p.local().lpt()[0x0].state(), CounterState::WeaklyTaken);
        assert_eq!(p.global().ghr().value(), 0b1);
        assert_eq!(p.local().lht()[0x2], 0b1);
    }
}

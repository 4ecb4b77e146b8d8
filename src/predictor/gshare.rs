//! Global history predictor (gshare).

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// A pattern history table indexed by the program counter XOR'ed with
/// global history.
///
/// See "Combining Branch Predictors" (McFarling, 1993).
#[derive(Clone, Debug)]
pub struct GsharePredictor {
    /// Table of counters
    pht: Vec<SaturatingCounter>,

    /// Global history register
    ghr: HistoryRegister,

    /// Mask for 'ghistory_bits'
    mask: u32,
}
impl GsharePredictor {
    /// Create a predictor with `2^ghistory_bits` counters and a global
    /// history register of `ghistory_bits` bits.
    pub fn new(ghistory_bits: usize) -> Self {
        assert!(ghistory_bits > 0 && ghistory_bits < u32::BITS as usize);
        Self {
            pht: vec![SaturatingCounter::default(); 1 << ghistory_bits],
            ghr: HistoryRegister::new(ghistory_bits),
            mask: mask(ghistory_bits),
        }
    }

    /// Returns the PHT index for some program counter value.
    pub fn get_index(&self, pc: u32) -> usize {
        let masked_pc = pc & self.mask;
        let masked_ghr = (self.ghr.value() as u32) & self.mask;
        (masked_pc ^ masked_ghr) as usize
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn pht(&self) -> &[SaturatingCounter] { &self.pht }

    /// Return the predicted outcome for 'pc'.
    pub fn predict(&self, pc: u32) -> Outcome {
        self.pht[self.get_index(pc)].predict()
    }

    /// Update the indexed counter, then record 'outcome' in global history.
    pub fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.get_index(pc);
        self.pht[idx].update(outcome);
        self.ghr.shift_in(outcome);
    }

    pub fn reset(&mut self) {
        self.pht.iter_mut().for_each(SaturatingCounter::reset);
        self.ghr.reset();
    }
}

impl BranchPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "Gshare" }
    fn predict(&mut self, pc: u32) -> Outcome { GsharePredictor::predict(self, pc) }
    fn train(&mut self, pc: u32, outcome: Outcome) {
        GsharePredictor::train(self, pc, outcome)
    }
    fn reset(&mut self) { GsharePredictor::reset(self) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_folds_history() {
        let mut p = GsharePredictor::new(4);
        assert_eq!(p.get_index(0x4), 0b0100);
        // Upper bits of the pc are masked off
        assert_eq!(p.get_index(0xffff_fff4), 0b0100);
        p.train(0x4, Outcome::T);
        assert_eq!(p.ghr().value(), 0b0001);
        assert_eq!(p.get_index(0x4), 0b0101);
    }

    #[test]
    fn predict_is_pure() {
        let mut p = GsharePredictor::new(6);
        p.train(0x40, Outcome::T);
        p.train(0x44, Outcome::N);
        let first = p.predict(0x48);
        for _ in 0..8 {
            assert_eq!(p.predict(0x48), first);
        }
        assert_eq!(p.ghr().value(), 0b10);
    }

    #[test]
    fn history_updates_once_per_branch() {
        let mut p = GsharePredictor::new(8);
        for _ in 0..3 {
            p.train(0x10, Outcome::T);
        }
        assert_eq!(p.ghr().value(), 0b111);
    }

    #[test]
    fn train_uses_pre_update_history() {
        let mut p = GsharePredictor::new(4);
        p.train(0x4, Outcome::T);
        // Trained entry is (0x4 ^ 0b0000), not (0x4 ^ 0b0001)
        assert_eq!(p.pht()[0b0100].state(), CounterState::WeaklyTaken);
        assert_eq!(p.pht()[0b0101].state(), CounterState::WeaklyNotTaken);
    }

    #[test]
    fn reset_restores_neutral_state() {
        let mut p = GsharePredictor::new(3);
        for pc in 0..16 {
            p.train(pc, Outcome::T);
        }
        p.reset();
        assert_eq!(p.ghr().value(), 0);
        assert!(p.pht().iter().all(|c| *c == SaturatingCounter::default()));
    }
}

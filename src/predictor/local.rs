//! Two-level local history predictor.

use crate::Outcome;
use crate::predictor::*;

/// A table of per-branch history registers (LHT) which indexes into a
/// table of counters (LPT).
#[derive(Clone, Debug)]
pub struct LocalPredictor {
    /// Local history table, indexed by the program counter
    lht: Vec<u32>,

    /// Local pattern table, indexed by local history
    lpt: Vec<SaturatingCounter>,

    /// Mask for 'pc_index_bits'
    pc_mask: u32,

    /// Mask for 'lhistory_bits'
    hist_mask: u32,
}
impl LocalPredictor {
    /// Create a predictor with `2^pc_index_bits` history registers and
    /// `2^lhistory_bits` counters.
    pub fn new(lhistory_bits: usize, pc_index_bits: usize) -> Self {
        assert!(lhistory_bits > 0 && lhistory_bits < u32::BITS as usize);
        assert!(pc_index_bits > 0 && pc_index_bits < u32::BITS as usize);
        Self {
            lht: vec![0; 1 << pc_index_bits],
            lpt: vec![SaturatingCounter::default(); 1 << lhistory_bits],
            pc_mask: mask(pc_index_bits),
            hist_mask: mask(lhistory_bits),
        }
    }

    /// Returns the LHT index for some program counter value.
    pub fn lht_index(&self, pc: u32) -> usize {
        (pc & self.pc_mask) as usize
    }

    /// Returns the LPT index (the masked local history) for some program
    /// counter value.
    pub fn lpt_index(&self, pc: u32) -> usize {
        (self.lht[self.lht_index(pc)] & self.hist_mask) as usize
    }

    pub fn lht(&self) -> &[u32] { &self.lht }
    pub fn lpt(&self) -> &[SaturatingCounter] { &self.lpt }

    pub fn predict(&self, pc: u32) -> Outcome {
        self.lpt[self.lpt_index(pc)].predict()
    }

    pub fn train(&mut self, pc: u32, outcome: Outcome) {
        let lht_idx = self.lht_index(pc);
        let lpt_idx = self.lpt_index(pc);

        // The counter must be selected with the history *before* this
        // outcome is recorded.
        self.lpt[lpt_idx].update(outcome);
        let hist = self.lht[lht_idx];
        self.lht[lht_idx] = (hist << 1) | outcome as u32;
    }

    pub fn reset(&mut self) {
        self.lht.fill(0);
        self.lpt.iter_mut().for_each(SaturatingCounter::reset);
    }
}

impl BranchPredictor for LocalPredictor {
    fn name(&self) -> &'static str { "Local" }
    fn predict(&mut self, pc: u32) -> Outcome { LocalPredictor::predict(self, pc) }
    fn train(&mut self, pc: u32, outcome: Outcome) {
        LocalPredictor::train(self, pc, outcome)
    }
    fn reset(&mut self) { LocalPredictor::reset(self) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trains_pre_update_history_entry() {
        let mut p = LocalPredictor::new(4, 4);
        p.train(0x3, Outcome::T);
        assert_eq!(p.lht()[0x3], 0b1);

        // Pre-update history is 0b0001, post-update would be 0b0011
        p.train(0x3, Outcome::T);
        assert_eq!(p.lpt()[0b0001].state(), CounterState::WeaklyTaken);
        assert_eq!(p.lpt()[0b0011].state(), CounterState::WeaklyNotTaken);
        assert_eq!(p.lht()[0x3], 0b11);
    }

    #[test]
    fn addresses_keep_separate_history() {
        let mut p = LocalPredictor::new(3, 2);
        p.train(0x1, Outcome::T);
        p.train(0x2, Outcome::N);
        p.train(0x1, Outcome::T);
        assert_eq!(p.lht()[1], 0b11);
        assert_eq!(p.lht()[2], 0b0);
        // 0x5 aliases with 0x1 under a 2-bit index
        assert_eq!(p.lht_index(0x5), 1);
    }

    #[test]
    fn learns_alternating_pattern() {
        let mut p = LocalPredictor::new(4, 4);
        let mut outcome = Outcome::T;
        for _ in 0..32 {
            p.train(0x8, outcome);
            outcome = !outcome;
        }
        for _ in 0..8 {
            assert_eq!(p.predict(0x8), outcome);
            p.train(0x8, outcome);
            outcome = !outcome;
        }
    }
}

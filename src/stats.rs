//! Helpers for collecting statistics.

use std::collections::*;
use crate::branch::*;
use bitvec::prelude::*;
use itertools::*;

/// Container for recording simple statistics while evaluating a predictor.
#[derive(Debug, Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by program counter value).
    pub data: BTreeMap<u32, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of times any branch instruction was executed
    pub global_brns: usize,
}
impl BranchStats {
    pub fn new() -> Self { Self::default() }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global misprediction rate, as a percentage.
    pub fn miss_rate(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        100.0 * self.global_miss() as f64 / self.global_brns as f64
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Record a prediction for some branch.
    pub fn update(&mut self, record: &BranchRecord, prediction: Outcome) {
        let hit = prediction == record.outcome;
        self.global_brns += 1;
        if hit { self.global_hits += 1; }

        let data = self.get_mut(record.pc);
        data.occ += 1;
        data.pat.push(record.outcome.into());
        if hit { data.hits += 1; }
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, pc: u32) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular branch.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: u32) -> &mut BranchData {
        self.data.entry(pc).or_default()
    }

    /// Returns the number of unique observed branch instructions.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of branches that are always taken
    pub fn num_always_taken(&self) -> usize {
        self.data.values().filter(|d| d.is_always_taken()).count()
    }

    /// Returns the number of branches that are never taken
    pub fn num_never_taken(&self) -> usize {
        self.data.values().filter(|d| d.is_never_taken()).count()
    }

    /// Returns up to 'n' branches with at least 'min_occ' occurrences,
    /// ordered from the most to the fewest mispredictions.
    pub fn get_worst_branches(&self, n: usize, min_occ: usize)
        -> Vec<(u32, &BranchData)>
    {
        self.data.iter()
            .filter(|(_, s)| s.occ >= min_occ)
            .sorted_by_key(|(pc, s)| (std::cmp::Reverse(s.misses()), **pc))
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

/// Container for per-branch statistics.
#[derive(Debug, Default)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Record of all observed outcomes for this branch.
    pub pat: BitVec,
}
impl BranchData {
    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / self.occ as f64
    }

    pub fn misses(&self) -> usize { self.occ - self.hits }

    pub fn is_always_taken(&self) -> bool {
        self.pat.count_ones() == self.pat.len()
    }

    pub fn is_never_taken(&self) -> bool {
        self.pat.count_zeros() == self.pat.len()
    }

    pub fn times_taken(&self) -> usize {
        self.pat.count_ones()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rec(pc: u32, taken: bool) -> BranchRecord {
        BranchRecord::new(pc, Outcome::from(taken))
    }

    #[test]
    fn counts_hits_and_misses() {
        let mut stat = BranchStats::new();
        stat.update(&rec(0x10, true), Outcome::T);
        stat.update(&rec(0x10, false), Outcome::T);
        stat.update(&rec(0x20, false), Outcome::N);
        stat.update(&rec(0x20, false), Outcome::T);
        assert_eq!(stat.global_brns(), 4);
        assert_eq!(stat.global_hits(), 2);
        assert_eq!(stat.global_miss(), 2);
        assert_eq!(stat.miss_rate(), 50.0);
        assert_eq!(stat.num_unique_branches(), 2);
        assert_eq!(stat.num_never_taken(), 1);
        assert_eq!(stat.get(0x10).unwrap().times_taken(), 1);
    }

    #[test]
    fn worst_branches_sorted_by_misses() {
        let mut stat = BranchStats::new();
        for _ in 0..3 { stat.update(&rec(0x8, true), Outcome::N); }
        for _ in 0..5 { stat.update(&rec(0x4, true), Outcome::N); }
        stat.update(&rec(0xc, true), Outcome::N);
        let worst = stat.get_worst_branches(2, 2);
        let pcs: Vec<u32> = worst.iter().map(|(pc, _)| *pc).collect();
        assert_eq!(pcs, vec![0x4, 0x8]);
    }

    #[test]
    fn empty_rates() {
        let stat = BranchStats::new();
        assert_eq!(stat.hit_rate(), 0.0);
        assert_eq!(stat.miss_rate(), 0.0);
    }
}

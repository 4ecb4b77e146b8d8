use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Perceptron [with integer weights].
///
/// Each input is a bit of global history, presented to the perceptron as
/// +1 when the bit is set and -1 when it is clear.
///
/// See the following papers:
///
/// - "Dynamic Branch Prediction with Perceptrons" (Jiménez and Lin, 2001)
/// - "Neural Methods for Dynamic Branch Prediction" (Jiménez and Lin, 2002)
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Perceptron {
    weights: Vec<i8>,
    bias: i8,
}
impl Perceptron {
    pub fn new(len: usize) -> Self {
        Self { weights: vec![0; len], bias: 0 }
    }

    /// Reset the state.
    pub fn reset(&mut self) {
        self.bias = 0;
        self.weights.fill(0);
    }

    /// Return a reference to the list of weights.
    pub fn weights(&self) -> &[i8] {
        &self.weights
    }

    pub fn bias(&self) -> i8 { self.bias }

    /// Convert some bit of history into an input value.
    fn input(ghr: &HistoryRegister, idx: usize) -> i8 {
        if ghr.bit(idx) { 1 } else { -1 }
    }

    /// Compute the output value for the given history.
    /// The predicted outcome is determined by the sign of the output.
    pub fn output(&self, ghr: &HistoryRegister) -> i32 {
        self.weights.iter().enumerate()
            .map(|(idx, w)| Self::input(ghr, idx) as i32 * *w as i32)
            .fold(self.bias as i32, |sum, val| sum + val)
    }

    /// Adjust the weights toward 'outcome'.
    ///
    /// When a bit in the history agrees with the outcome, the corresponding
    /// weight is incremented. Otherwise, the weight is decremented.
    /// Weights and bias saturate at the bounds of an [i8].
    pub fn train(&mut self, ghr: &HistoryRegister, outcome: Outcome) {
        let t = outcome.sign();
        self.bias = self.bias.saturating_add(t);
        for (idx, w) in self.weights.iter_mut().enumerate() {
            *w = w.saturating_add(Self::input(ghr, idx) * t);
        }
    }
}

/// The result of looking up a perceptron for some branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerceptronOutput {
    /// The program counter value used to make this prediction
    pub pc: u32,

    /// The index of the perceptron used to make this prediction
    pub index: usize,

    /// The raw output of the perceptron
    pub y: i32,

    /// The predicted direction
    pub outcome: Outcome,
}

/// A table of [Perceptron] indexed by the program counter, sharing a
/// single global history register.
#[derive(Clone, Debug)]
pub struct PerceptronPredictor {
    table: Vec<Perceptron>,
    ghr: HistoryRegister,

    /// Training threshold
    threshold: i32,

    /// The most recent prediction, consumed by the next call to `train`
    pending: Option<PerceptronOutput>,
}
impl PerceptronPredictor {
    /// Create a predictor with 'num_perceptrons' entries, each with
    /// 'num_weights' weights.
    pub fn new(num_perceptrons: usize, num_weights: usize, threshold: i32)
        -> Self
    {
        assert!(num_perceptrons.is_power_of_two());
        assert!(num_weights > 0);
        Self {
            table: vec![Perceptron::new(num_weights); num_perceptrons],
            ghr: HistoryRegister::new(num_weights),
            threshold,
            pending: None,
        }
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn table(&self) -> &[Perceptron] { &self.table }
    pub fn threshold(&self) -> i32 { self.threshold }
    pub fn pending(&self) -> Option<&PerceptronOutput> { self.pending.as_ref() }

    /// Returns the index of the perceptron used for some program counter value.
    pub fn get_index(&self, pc: u32) -> usize {
        pc as usize & (self.table.len() - 1)
    }

    /// Compute the output for 'pc' without retaining it.
    pub fn output(&self, pc: u32) -> PerceptronOutput {
        let index = self.get_index(pc);
        let y = self.table[index].output(&self.ghr);
        let outcome = if y >= 0 { Outcome::T } else { Outcome::N };
        PerceptronOutput { pc, index, y, outcome }
    }

    /// Make a prediction for 'pc'. The output is retained until the
    /// following call to [PerceptronPredictor::train].
    pub fn predict(&mut self, pc: u32) -> Outcome {
        let output = self.output(pc);
        self.pending = Some(output);
        output.outcome
    }

    /// Train the perceptron selected by the preceding prediction.
    ///
    /// # Panics
    ///
    /// Panics if there is no outstanding prediction for 'pc'.
    pub fn train(&mut self, pc: u32, outcome: Outcome) {
        let Some(last) = self.pending.take() else {
            panic!("perceptron trained for {:#010x} without a prediction", pc);
        };
        assert_eq!(last.pc, pc,
            "perceptron trained for {:#010x} after predicting {:#010x}",
            pc, last.pc
        );

        // Training occurs after a misprediction, or when the output value is
        // below the threshold.
        let miss = last.outcome != outcome;
        let below_threshold = last.y.abs() < self.threshold;
        if miss || below_threshold {
            self.table[last.index].train(&self.ghr, outcome);
        }
        self.ghr.shift_in(outcome);
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(Perceptron::reset);
        self.ghr.reset();
        self.pending = None;
    }
}

impl BranchPredictor for PerceptronPredictor {
    fn name(&self) -> &'static str { "Perceptron" }
    fn predict(&mut self, pc: u32) -> Outcome { PerceptronPredictor::predict(self, pc) }
    fn train(&mut self, pc: u32, outcome: Outcome) {
        PerceptronPredictor::train(self, pc, outcome)
    }
    fn reset(&mut self) { PerceptronPredictor::reset(self) }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn zero_output_predicts_taken() {
        let mut p = PerceptronPredictor::new(16, 8, 32);
        assert_eq!(p.predict(0x4), Outcome::T);
        let last = p.pending().unwrap();
        assert_eq!(last.y, 0);
        assert_eq!(last.index, 4);
    }

    #[test]
    fn first_update_follows_history_signs() {
        let mut p = PerceptronPredictor::new(4, 3, 32);
        p.predict(0x1);
        p.train(0x1, Outcome::T);
        // All history bits were clear (inputs of -1)
        assert_eq!(p.table()[1].weights(), &[-1, -1, -1]);
        assert_eq!(p.table()[1].bias(), 1);
        assert_eq!(p.ghr().value(), 0b001);
        assert!(p.pending().is_none());
    }

    #[test]
    fn confident_correct_prediction_skips_training() {
        let mut p = PerceptronPredictor::new(1, 2, 2);
        for _ in 0..4 {
            p.predict(0x0);
            p.train(0x0, Outcome::T);
        }
        let before = p.table()[0].clone();
        let out = p.output(0x0);
        assert!(out.y >= 2 && out.outcome == Outcome::T);
        p.predict(0x0);
        p.train(0x0, Outcome::T);
        assert_eq!(p.table()[0], before);
    }

    #[test]
    fn weights_saturate() {
        let mut rng = StdRng::seed_from_u64(0xdead_beef);
        let mut p = PerceptronPredictor::new(8, 12, i32::MAX);
        for _ in 0..20_000 {
            let pc: u32 = rng.gen_range(0..4);
            let outcome = Outcome::from(rng.gen_bool(0.9));
            p.predict(pc);
            p.train(pc, outcome);
        }
        for perceptron in p.table() {
            assert!(perceptron.weights().iter().all(|w| (-128..=127).contains(w)));
        }
    }

    #[test]
    #[should_panic(expected = "without a prediction")]
    fn train_without_predict_panics() {
        let mut p = PerceptronPredictor::new(4, 4, 8);
        p.train(0x0, Outcome::T);
    }

    #[test]
    #[should_panic(expected = "after predicting")]
    fn train_with_other_pc_panics() {
        let mut p = PerceptronPredictor::new(4, 4, 8);
        p.predict(0x0);
        p.train(0x4, Outcome::T);
    }

    #[test]
    fn reset_clears_pending() {
        let mut p = PerceptronPredictor::new(4, 4, 8);
        p.predict(0x0);
        p.train(0x0, Outcome::N);
        p.predict(0x0);
        p.reset();
        assert!(p.pending().is_none());
        assert_eq!(p.table()[0], Perceptron::new(4));
        assert_eq!(p.ghr().value(), 0);
    }
}

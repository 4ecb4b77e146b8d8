//! Implementation of a 2-bit saturating counter.

use crate::Outcome;

/// The four states of a 2-bit saturating counter.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CounterState {
    StronglyNotTaken = 0,
    WeaklyNotTaken   = 1,
    WeaklyTaken      = 2,
    StronglyTaken    = 3,
}
impl CounterState {
    pub const MIN: Self = Self::StronglyNotTaken;
    pub const MAX: Self = Self::StronglyTaken;

    fn from_value(val: u8) -> Self {
        match val {
            0 => Self::StronglyNotTaken,
            1 => Self::WeaklyNotTaken,
            2 => Self::WeaklyTaken,
            _ => Self::StronglyTaken,
        }
    }
}

/// A 2-bit saturating counter used to follow the behavior of a branch.
///
/// Every table in this crate is built from these. A fresh counter starts
/// in [CounterState::WeaklyNotTaken].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    state: CounterState,
}
impl Default for SaturatingCounter {
    fn default() -> Self { Self::new(CounterState::WeaklyNotTaken) }
}
impl SaturatingCounter {
    /// Number of storage bits per counter.
    pub const STORAGE_BITS: usize = 2;

    pub fn new(state: CounterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> CounterState { self.state }
    pub fn value(&self) -> u8 { self.state as u8 }

    /// Move one step toward [CounterState::StronglyTaken].
    pub fn increment(&mut self) {
        if self.state < CounterState::MAX {
            self.state = CounterState::from_value(self.value() + 1);
        }
    }

    /// Move one step toward [CounterState::StronglyNotTaken].
    pub fn decrement(&mut self) {
        if self.state > CounterState::MIN {
            self.state = CounterState::from_value(self.value() - 1);
        }
    }

    /// Return the current predicted direction.
    pub fn predict(&self) -> Outcome {
        Outcome::from(self.state > CounterState::WeaklyNotTaken)
    }

    /// Update the state of the counter with the correct outcome.
    pub fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.increment(),
            Outcome::N => self.decrement(),
        }
    }

    /// Reset the counter to its default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

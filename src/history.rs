//! Global history registers.

use bitvec::prelude::*;

/// A fixed-width shift register of branch outcomes.
///
/// Bit 0 is always the most recent outcome. Shifting in a new outcome moves
/// every bit up by one position and discards the oldest bit, so the register
/// behaves like `(hist << 1 | outcome) & mask(len)`.
#[derive(Clone, Debug)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn data(&self) -> &BitSlice { self.data.as_bitslice() }

    /// Clear all bits.
    pub fn reset(&mut self) {
        self.data.fill(false);
    }

    /// Return the value of bit 'idx' (0 is the newest outcome).
    pub fn bit(&self, idx: usize) -> bool {
        self.data[idx]
    }

    /// Shift the register by one bit and record 'outcome' in bit 0.
    /// The oldest bit is discarded.
    pub fn shift_in(&mut self, outcome: impl Into<bool>) {
        if self.len == 0 {
            return;
        }
        self.data.shift_end(1);
        self.data.set(0, outcome.into());
    }

    /// Return the low bits of the register as an integer.
    ///
    /// Registers wider than a [usize] only expose their newest
    /// `usize::BITS` bits here.
    pub fn value(&self) -> usize {
        let n = self.len.min(usize::BITS as usize);
        if n == 0 {
            return 0;
        }
        self.data[..n].load_le::<usize>()
    }
}

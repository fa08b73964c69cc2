use crate::float::Float;
use crate::utils::bitstream::{Bitstream, Word};

/// Zero-crossing detector with hysteresis. The output goes low when a sample
/// falls below `low` and high when a sample rises above `high`; anything in
/// between keeps the previous state. The band does not have to be centered
/// on zero: the default `-0.1..0.0` suppresses bit flicker for signals
/// dithering around silence.
#[derive(Debug, Clone, Copy)]
pub struct ZeroCross<T>
where
    T: Float,
{
    low: T,
    high: T,
    state: bool,
}

impl<T> ZeroCross<T>
where
    T: Float,
{
    pub fn new(low: T, high: T) -> Self {
        ZeroCross {
            low,
            high,
            state: false,
        }
    }

    /// Feed one sample and return the binarized state.
    pub fn process(&mut self, sample: T) -> bool {
        if sample < self.low {
            self.state = false;
        } else if sample > self.high {
            self.state = true;
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = false;
    }
}

impl<T> Default for ZeroCross<T>
where
    T: Float,
{
    fn default() -> Self {
        ZeroCross::new(T::from_f64(-0.1).unwrap(), T::zero())
    }
}

/// Binarize `signal` into `bits`, one bit per sample. `bits` is cleared first,
/// so positions past the end of `signal` read as zero. Samples past the
/// capacity of `bits` are ignored.
pub fn encode<T, W>(signal: &[T], zero_cross: &mut ZeroCross<T>, bits: &mut Bitstream<W>)
where
    T: Float,
    W: Word,
{
    bits.clear();
    let size = bits.len();
    for (i, &s) in signal.iter().take(size).enumerate() {
        bits.set(i, zero_cross.process(s));
    }
}

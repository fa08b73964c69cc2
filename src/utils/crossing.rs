use crate::error::{Error, Result};
use crate::float::Float;

/// A rising zero crossing located between samples `index - 1` and `index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing<T>
where
    T: Float,
{
    /// Index of the first positive sample.
    pub index: usize,
    /// Fractional offset of the crossing past `index - 1`, in `[0, 1)`.
    pub offset: T,
}

impl<T> Crossing<T>
where
    T: Float,
{
    /// Position of the crossing in (fractional) samples.
    pub fn position(&self) -> T {
        T::from_usize(self.index - 1).unwrap() + self.offset
    }
}

/// Find the first rising zero crossing at or after `start`: the smallest
/// `i >= max(start, 1)` with `signal[i - 1] <= 0 < signal[i]`. The crossing
/// is located by linear interpolation between the two samples.
///
/// The scan never reads past the end of `signal`; running out of samples
/// (silence, DC, or a window too short) is reported as
/// [Error::NoCrossingFound].
pub fn rising_crossing<T: Float>(signal: &[T], start: usize) -> Result<Crossing<T>> {
    let first = start.max(1);
    if first >= signal.len() {
        return Err(Error::NoCrossingFound { start });
    }

    let index = signal[first - 1..]
        .windows(2)
        .position(|pair| pair[0] <= T::zero() && pair[1] > T::zero())
        .map(|i| first + i)
        .ok_or(Error::NoCrossingFound { start })?;

    let prev = signal[index - 1];
    let dy = signal[index] - prev;
    if !(dy > T::zero()) {
        return Err(Error::DegenerateInterpolation { index });
    }
    let offset = -prev / dy;
    if !offset.is_finite() {
        return Err(Error::DegenerateInterpolation { index });
    }

    Ok(Crossing { index, offset })
}

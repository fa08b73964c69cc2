use log::{debug, trace};

use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::bitstream::{Bitstream, Word};
use crate::utils::crossing::rising_crossing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    /// Period in (fractional) samples.
    pub period: T,
    /// `1 - distance / compared_bits` at the selected lag, in `[0, 1]`.
    pub clarity: T,
}

impl<T> Pitch<T>
where
    T: Float,
{
    /// Deviation from `reference` in cents.
    pub fn cents_from(&self, reference: T) -> T {
        cents(self.frequency, reference)
    }
}

/// Pitch difference between `frequency` and `reference` in cents,
/// `1200 * log2(frequency / reference)`.
pub fn cents<T: Float>(frequency: T, reference: T) -> T {
    T::from_f64(1200.0).unwrap() * (frequency / reference).log2()
}

/// Working buffers for a detector. They are allocated once, up front, so
/// that processing a window does not allocate.
#[derive(Debug, Clone)]
pub struct DetectorInternals<W>
where
    W: Word,
{
    pub size: usize,
    pub bits: Bitstream<W>,
    pub distances: Vec<u32>,
}

impl<W> DetectorInternals<W>
where
    W: Word,
{
    pub fn new(size: usize) -> Self {
        let bits = Bitstream::new(size);
        let distances = vec![0; bits.len() / 2];

        DetectorInternals {
            size,
            bits,
            distances,
        }
    }

    /// Fill the distance table for lags `min_lag..=max_lag` and return the
    /// largest distance seen. Entries outside that window are zeroed.
    pub fn correlate(&mut self, min_lag: usize, max_lag: usize) -> u32 {
        let distances = &mut self.distances;
        distances.iter_mut().for_each(|d| *d = 0);

        let window = max_lag + 1 - min_lag;
        let mut max_distance = 0;
        self.bits
            .correlations(min_lag)
            .take(window)
            .for_each(|(lag, distance)| {
                distances[lag] = distance;
                max_distance = max_distance.max(distance);
            });
        max_distance
    }
}

/// Lag with the lowest distance in `min_lag..=max_lag`. Lag 0 only takes
/// part when `min_lag` is 0. Ties go to the lowest lag.
pub fn select_period(distances: &[u32], min_lag: usize, max_lag: usize) -> Option<(usize, u32)> {
    let end = (max_lag + 1).min(distances.len());
    if min_lag >= end {
        return None;
    }
    distances[min_lag..end]
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (i, &d)| match best {
            Some((_, best_d)) if d >= best_d => best,
            _ => Some((min_lag + i, d)),
        })
}

/// Round half up to an index.
pub fn round_index<T: Float>(x: T) -> usize {
    (x + T::from_f64(0.5).unwrap()).floor().to_usize().unwrap_or(0)
}

/// A periodic bitstream also matches itself at every multiple of its period,
/// so the lowest distance may sit at `k * period`. Try dividing `candidate`
/// by the largest divisor first: a divisor is accepted when every
/// intermediate multiple `x = k * candidate / divisor` (`0 < k < divisor`) is
/// a strong match.
///
/// A fractional `x` falls between two lags, and each of them is off the true
/// repeat by a fraction of a sample. Every bit change costs one differing bit
/// at exactly one of the two, so for a true repeat their distances add up to
/// about `transitions`. `x` is strong when that sum stays within
/// `transitions + threshold`, plus the share of the candidate's own distance
/// carried over to `x`.
///
/// Returns the accepted divisor and the corrected (fractional) lag.
pub fn resolve_subharmonic<T: Float>(
    distances: &[u32],
    candidate: usize,
    min_lag: usize,
    threshold: T,
    transitions: u32,
) -> (usize, T) {
    let min_lag = min_lag.max(1);
    let max_divisor = (candidate / min_lag).max(1);
    let candidate_t = T::from_usize(candidate).unwrap();
    let residual = T::from_u32(distances.get(candidate).copied().unwrap_or(0)).unwrap();
    let base = T::from_u32(transitions).unwrap() + threshold;

    let distance = |lag: usize| distances.get(lag).map(|&d| T::from_u32(d).unwrap());
    let is_strong = |x: T, share: T| {
        let below = x.floor().to_usize().unwrap_or(0);
        match (distance(below), distance(below + 1)) {
            (Some(a), Some(b)) => {
                let two = T::one() + T::one();
                a + b <= base + two * share * residual
            }
            _ => false,
        }
    };

    for divisor in (2..=max_divisor).rev() {
        let divisor_t = T::from_usize(divisor).unwrap();
        let true_lag = candidate_t / divisor_t;
        let rejected = (1..divisor)
            .map(|k| T::from_usize(k).unwrap())
            .find(|&k| !is_strong(k * true_lag, k / divisor_t));
        match rejected {
            Some(k) => trace!(
                "Rejected divisor {} (lag {}): weak match at lag {}",
                divisor,
                true_lag,
                k * true_lag
            ),
            None => {
                debug!(
                    "Lag {} is a multiple of lag {} (divisor {})",
                    candidate, true_lag, divisor
                );
                return (divisor, true_lag);
            }
        }
    }

    (1, candidate_t)
}

/// Measure the period of `signal` as the distance between the first rising
/// zero crossing and the one roughly `lag` samples later.
pub fn zero_crossing_period<T: Float>(signal: &[T], lag: usize) -> Result<T> {
    let first = rising_crossing(signal, 0)?;
    // Start one sample early so that a lag overestimated by one still
    // finds the crossing closing this period.
    let start = (first.index + lag).saturating_sub(2);
    let second = rising_crossing(signal, start)?;

    let period = second.position() - first.position();
    if !(period > T::zero()) {
        return Err(Error::DegenerateInterpolation {
            index: second.index,
        });
    }
    trace!(
        "Crossings at {} and {}, period {}",
        first.position(),
        second.position(),
        period
    );
    Ok(period)
}

//! Pitch detection by binary autocorrelation (BCF, bitstream autocorrelation
//! function).
//!
//! The signal is reduced to one bit per sample with a hysteresis zero-crossing
//! detector. The bitstream is then compared with shifted copies of itself: the
//! Hamming distance between the two, counted a machine word at a time with
//! XOR and popcount, is small when the shift matches the period of the signal.
//!
//! The steps are
//!   1. Binarize the window with [ZeroCross].
//!   2. Compute the distance for every lag between the periods of the highest
//!      and lowest expected frequencies.
//!   3. Pick the lag with the lowest distance.
//!   4. A periodic stream matches just as well at multiples of its period. If
//!      every fraction `k / n` of the chosen lag is also a strong match, the
//!      lag is divided by `n`.
//!   5. Refine the period, by default by measuring the distance between two
//!      rising zero crossings of the original signal one period apart.
//!
//! Only integer operations run in the inner loop, so the method is cheap
//! enough for embedded targets.
use log::debug;

use crate::detector::internals::{
    resolve_subharmonic, round_index, select_period, zero_crossing_period, DetectorInternals,
    Pitch,
};
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::bitstream::{Bitstream, Word};
use crate::utils::buffer::smallest_pow2;
use crate::utils::hysteresis::{encode, ZeroCross};
use crate::utils::peak::{correct_extremum, PeakCorrection};

/// Settings of a [BcfDetector].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BcfConfig<T>
where
    T: Float,
{
    pub sample_rate: usize,
    /// Lowest expected pitch in Hz. Sets the longest lag searched.
    pub min_frequency: T,
    /// Highest expected pitch in Hz. Sets the shortest lag searched.
    pub max_frequency: T,
    /// The binarized signal goes low below this level.
    pub hysteresis_low: T,
    /// The binarized signal goes high above this level.
    pub hysteresis_high: T,
    /// Allowed excess distance, as a fraction of the largest distance
    /// observed, before a multiple of the period counts as a weak match when
    /// checking for subharmonics.
    pub subharmonic_threshold: T,
    pub correction: PeakCorrection,
}

impl<T> Default for BcfConfig<T>
where
    T: Float,
{
    fn default() -> Self {
        BcfConfig {
            sample_rate: 44100,
            min_frequency: T::from_f64(50.0).unwrap(),
            max_frequency: T::from_f64(2000.0).unwrap(),
            hysteresis_low: T::from_f64(-0.1).unwrap(),
            hysteresis_high: T::zero(),
            subharmonic_threshold: T::from_f64(0.1).unwrap(),
            correction: PeakCorrection::default(),
        }
    }
}

impl<T> BcfConfig<T>
where
    T: Float,
{
    /// Shortest lag searched, the period of `max_frequency` rounded down.
    pub fn min_lag(&self) -> usize {
        (self.sample_rate_t() / self.max_frequency)
            .floor()
            .to_usize()
            .unwrap_or(0)
            .max(1)
    }

    /// Longest lag searched, the period of `min_frequency` rounded up.
    pub fn max_lag(&self) -> usize {
        (self.sample_rate_t() / self.min_frequency)
            .ceil()
            .to_usize()
            .unwrap_or(usize::MAX)
    }

    /// Smallest power of two window that holds the whole search range.
    pub fn window_size(&self) -> usize {
        smallest_pow2(2 * (self.max_lag() + 1))
    }

    fn sample_rate_t(&self) -> T {
        T::from_usize(self.sample_rate).unwrap()
    }

    /// Check that a detector for windows of `size` samples, stored in words
    /// of type `W`, can run with these settings.
    pub fn validate<W: Word>(&self, size: usize) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidConfiguration(msg)) };

        if size == 0 {
            return invalid("window size must be greater than 0".into());
        }
        if self.sample_rate == 0 {
            return invalid("sample rate must be greater than 0".into());
        }
        if !self.min_frequency.is_finite() || !self.max_frequency.is_finite() {
            return invalid("frequency bounds must be finite".into());
        }
        if !(self.min_frequency > T::zero()) {
            return invalid(format!(
                "minimum frequency must be positive, got {}",
                self.min_frequency
            ));
        }
        if !(self.min_frequency < self.max_frequency) {
            return invalid(format!(
                "minimum frequency {} must be below maximum frequency {}",
                self.min_frequency, self.max_frequency
            ));
        }
        if !(self.hysteresis_low <= self.hysteresis_high) {
            return invalid(format!(
                "hysteresis low {} must not exceed hysteresis high {}",
                self.hysteresis_low, self.hysteresis_high
            ));
        }
        if !(self.subharmonic_threshold >= T::zero() && self.subharmonic_threshold <= T::one()) {
            return invalid(format!(
                "subharmonic threshold must be within [0, 1], got {}",
                self.subharmonic_threshold
            ));
        }

        let bits = smallest_pow2(size.max(W::BITS as usize));
        if bits / (W::BITS as usize) < 4 {
            return invalid(format!(
                "window of {} bits is too short for {}-bit words",
                bits,
                W::BITS
            ));
        }
        let max_lag = self.max_lag();
        if max_lag >= bits / 2 {
            return invalid(format!(
                "longest lag {} does not fit in a window of {} samples",
                max_lag, bits
            ));
        }
        Ok(())
    }
}

/// Binary autocorrelation pitch detector for windows of a fixed size.
///
/// All buffers are allocated in [BcfDetector::new]; [PitchDetector::get_pitch]
/// does not allocate.
#[derive(Debug, Clone)]
pub struct BcfDetector<T, W = u64>
where
    T: Float,
    W: Word,
{
    config: BcfConfig<T>,
    zero_cross: ZeroCross<T>,
    internals: DetectorInternals<W>,
    min_lag: usize,
    max_lag: usize,
}

impl<T, W> BcfDetector<T, W>
where
    T: Float,
    W: Word,
{
    pub fn new(size: usize, config: BcfConfig<T>) -> Result<Self> {
        config.validate::<W>(size)?;

        let zero_cross = ZeroCross::new(config.hysteresis_low, config.hysteresis_high);
        let internals = DetectorInternals::new(size);
        let min_lag = config.min_lag();
        let max_lag = config.max_lag();
        debug!(
            "BCF detector: {} samples in {} bits, lags {}..={}",
            size,
            internals.bits.len(),
            min_lag,
            max_lag
        );

        Ok(BcfDetector {
            config,
            zero_cross,
            internals,
            min_lag,
            max_lag,
        })
    }

    pub fn config(&self) -> &BcfConfig<T> {
        &self.config
    }

    /// Distance table of the last processed window, indexed by lag. Lags
    /// outside the search range are zero.
    pub fn distances(&self) -> &[u32] {
        &self.internals.distances
    }

    /// Binarized last processed window.
    pub fn bitstream(&self) -> &Bitstream<W> {
        &self.internals.bits
    }

    fn quadratic_period(&self, lag: usize, divisor: usize) -> Result<T> {
        if lag <= self.min_lag || lag >= self.max_lag {
            return Err(Error::DegenerateInterpolation { index: lag });
        }
        let distances = &self.internals.distances;
        let neighbourhood = [
            T::from_u32(distances[lag - 1]).unwrap(),
            T::from_u32(distances[lag]).unwrap(),
            T::from_u32(distances[lag + 1]).unwrap(),
        ];
        let (x, _) =
            correct_extremum(1, &neighbourhood).map_err(|_| Error::DegenerateInterpolation {
                index: lag,
            })?;
        let lag = x + T::from_usize(lag - 1).unwrap();
        Ok(lag / T::from_usize(divisor).unwrap())
    }
}

impl<T, W> PitchDetector<T> for BcfDetector<T, W>
where
    T: Float,
    W: Word,
{
    fn get_pitch(&mut self, signal: &[T]) -> Result<Pitch<T>> {
        if signal.len() != self.internals.size {
            return Err(Error::SignalLength {
                expected: self.internals.size,
                got: signal.len(),
            });
        }

        self.zero_cross.reset();
        encode(signal, &mut self.zero_cross, &mut self.internals.bits);
        let max_distance = self.internals.correlate(self.min_lag, self.max_lag);

        let distances = &self.internals.distances;
        let (lag, distance) = select_period(distances, self.min_lag, self.max_lag).ok_or_else(
            || Error::InvalidConfiguration("empty lag search range".into()),
        )?;
        debug!(
            "Lowest distance {} at lag {} (largest distance {})",
            distance, lag, max_distance
        );

        let threshold = self.config.subharmonic_threshold * T::from_u32(max_distance).unwrap();
        let transitions = self.internals.bits.transitions();
        let (divisor, corrected) =
            resolve_subharmonic(distances, lag, self.min_lag, threshold, transitions);
        let corrected_lag = round_index(corrected);

        let period = match self.config.correction {
            PeakCorrection::ZeroCrossing => zero_crossing_period(signal, corrected_lag)?,
            PeakCorrection::Quadratic => self.quadratic_period(lag, divisor)?,
            PeakCorrection::None => corrected,
        };

        let compared = T::from_usize(self.internals.bits.compared_bits()).unwrap();
        let matched = distances.get(corrected_lag).copied().unwrap_or(distance);
        let clarity = (T::one() - T::from_u32(matched).unwrap() / compared)
            .max(T::zero())
            .min(T::one());

        let frequency = self.config.sample_rate_t() / period;
        debug!(
            "Period {} samples, frequency {} Hz, clarity {}",
            period, frequency, clarity
        );

        Ok(Pitch {
            frequency,
            period,
            clarity,
        })
    }
}

/// Estimate the frequency of `signal` in a single call. Allocates a detector
/// sized for `signal`; use [BcfDetector] directly to process many windows.
pub fn estimate_frequency<T: Float>(signal: &[T], config: &BcfConfig<T>) -> Result<T> {
    let mut detector = BcfDetector::<T, u64>::new(signal.len(), config.clone())?;
    detector.get_pitch(signal).map(|pitch| pitch.frequency)
}

//! Bit-packed storage for a binarized signal and the binary autocorrelation
//! computed on top of it.
//!
//! For a bitstream of `size` bits, the distance at lag `L` is the Hamming
//! distance between the first half of the stream and the stream shifted
//! right by `L` bits. Only the first half is ever compared; the second half
//! only feeds the shifted copy. Shifted words are synthesized from two
//! neighbouring source words, so every lag costs `array_size / 2 - 1`
//! XOR + popcount operations.
use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitXor, BitXorAssign, Shl, Shr};

use crate::utils::buffer::smallest_pow2;

/// An unsigned machine word used as the storage unit of a [Bitstream].
pub trait Word:
    Copy
    + Debug
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + BitXorAssign
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    /// All ones when `bit` is set, all zeros otherwise.
    fn splat(bit: bool) -> Self;

    fn popcount(self) -> u32;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(
            impl Word for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn splat(bit: bool) -> Self {
                    (bit as $t).wrapping_neg()
                }

                #[inline]
                fn popcount(self) -> u32 {
                    self.count_ones()
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64, u128, usize);

/// Fixed capacity bit buffer. The capacity is always a power of two and at
/// least one word.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitstream<W: Word = u64> {
    bits: Vec<W>,
    size: usize,
}

impl<W: Word> Bitstream<W> {
    pub fn new(size: usize) -> Self {
        let size = smallest_pow2(size.max(W::BITS as usize));
        let array_size = size / W::BITS as usize;
        Bitstream {
            bits: vec![W::ZERO; array_size],
            size,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Number of words.
    pub fn array_size(&self) -> usize {
        self.bits.len()
    }

    pub fn words(&self) -> &[W] {
        &self.bits
    }

    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = W::ZERO);
    }

    /// Write bit `i` without branching.
    ///
    /// # Panics
    /// If `i >= self.len()`.
    #[inline]
    pub fn set(&mut self, i: usize, val: bool) {
        let mask = W::ONE << (i % W::BITS as usize) as u32;
        let word = &mut self.bits[i / W::BITS as usize];
        *word ^= (W::splat(val) ^ *word) & mask;
    }

    /// # Panics
    /// If `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        let mask = W::ONE << (i % W::BITS as usize) as u32;
        (self.bits[i / W::BITS as usize] & mask) != W::ZERO
    }

    /// Number of bit pairs compared for each lag. Every distance is at most
    /// this value, which is strictly less than `len() / 2`.
    pub fn compared_bits(&self) -> usize {
        half_words(self.bits.len()) * W::BITS as usize
    }

    /// Number of bit changes within the compared bits, i.e. the distance at
    /// lag 1. Shifting a bitstream by a fraction of a sample costs about
    /// this many differing bits per sample of misalignment.
    pub fn transitions(&self) -> u32 {
        self.correlations(1).next().map_or(0, |(_, distance)| distance)
    }

    /// Lazily compute the distance for every lag in `start..len() / 2`.
    /// Lag 0 is reported as 0 without any work.
    pub fn correlations(&self, start: usize) -> Correlations<'_, W> {
        let bits_per_word = W::BITS as usize;
        Correlations {
            bits: &self.bits,
            half: half_words(self.bits.len()),
            pos: start,
            end: self.size / 2,
            index: start / bits_per_word,
            shift: (start % bits_per_word) as u32,
        }
    }

    /// Feed `(lag, distance)` for every lag in `start..len() / 2` to `sink`.
    pub fn autocorrelate<F>(&self, start: usize, mut sink: F)
    where
        F: FnMut(usize, u32),
    {
        self.correlations(start)
            .for_each(|(lag, distance)| sink(lag, distance));
    }
}

fn half_words(array_size: usize) -> usize {
    (array_size / 2).saturating_sub(1)
}

/// Iterator over `(lag, distance)` pairs of a [Bitstream].
///
/// The word offset and sub-word shift of the shifted copy are carried from
/// one lag to the next instead of being recomputed.
#[derive(Debug, Clone)]
pub struct Correlations<'a, W: Word> {
    bits: &'a [W],
    half: usize,
    pos: usize,
    end: usize,
    index: usize,
    shift: u32,
}

impl<'a, W: Word> Correlations<'a, W> {
    fn distance(&self) -> u32 {
        let reference = &self.bits[..self.half];
        let shifted = &self.bits[self.index..];

        if self.shift == 0 {
            reference
                .iter()
                .zip(shifted)
                .map(|(&a, &b)| (a ^ b).popcount())
                .sum()
        } else {
            let shift = self.shift;
            let shift2 = W::BITS - shift;
            reference
                .iter()
                .zip(shifted.windows(2))
                .map(|(&a, pair)| {
                    let v = (pair[0] >> shift) | (pair[1] << shift2);
                    (a ^ v).popcount()
                })
                .sum()
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.shift += 1;
        if self.shift == W::BITS {
            self.shift = 0;
            self.index += 1;
        }
    }
}

impl<'a, W: Word> Iterator for Correlations<'a, W> {
    type Item = (usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let lag = self.pos;
        // Comparing the stream with itself.
        let distance = if lag == 0 { 0 } else { self.distance() };
        self.advance();
        Some((lag, distance))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<'a, W: Word> ExactSizeIterator for Correlations<'a, W> {}

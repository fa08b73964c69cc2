use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

/// Smallest power of two that is greater than or equal to `n`.
/// `smallest_pow2(0)` is 1.
pub fn smallest_pow2(n: usize) -> usize {
    n.next_power_of_two()
}

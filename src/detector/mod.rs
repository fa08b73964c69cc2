use crate::detector::internals::Pitch;
use crate::error::Result;
use crate::float::Float;

pub mod bcf;
pub mod internals;

pub trait PitchDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T]) -> Result<Pitch<T>>;
}

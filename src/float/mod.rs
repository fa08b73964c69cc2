//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use num_traits::float::Float as NumFloat;
use num_traits::FromPrimitive;
use std::fmt::{Debug, Display};

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FromPrimitive {}

impl Float for f64 {}
impl Float for f32 {}

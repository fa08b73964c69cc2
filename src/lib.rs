//! # Bitstream Pitch
//! *bitstream_pitch* estimates the fundamental frequency of a monophonic sound
//! stored in a buffer using binary autocorrelation. The signal is reduced to a
//! single bit per sample and its periodicity is found by counting differing
//! bits between the bitstream and shifted copies of itself, a machine word at
//! a time.
//!
//! # Detectors
//!   * [BcfDetector][detector::bcf::BcfDetector]
//!
//! # Building blocks
//!   * [ZeroCross][utils::hysteresis::ZeroCross], the hysteresis encoder
//!   * [Bitstream][utils::bitstream::Bitstream], bit-packed storage and the
//!     word-level autocorrelation
//!
//! # Examples
//! ```
//! use bitstream_pitch::detector::bcf::{BcfConfig, BcfDetector};
//! use bitstream_pitch::detector::PitchDetector;
//!
//! fn main() {
//!     const SAMPLE_RATE: usize = 44100;
//!     const SIZE: usize = 2048;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 300.0;
//!     let signal: Vec<f64> = (0..SIZE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let config = BcfConfig {
//!         sample_rate: SAMPLE_RATE,
//!         ..BcfConfig::default()
//!     };
//!     let mut detector: BcfDetector<f64> = BcfDetector::new(SIZE, config).unwrap();
//!
//!     let pitch = detector.get_pitch(&signal).unwrap();
//!
//!     println!("Frequency: {}, Clarity: {}", pitch.frequency, pitch.clarity);
//! }
//! ```

pub use detector::internals::Pitch;
pub use error::{Error, Result};

pub mod detector;
pub mod error;
pub mod float;
pub mod utils;

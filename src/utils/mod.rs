pub mod bitstream;
pub mod buffer;
pub mod crossing;
pub mod hysteresis;
pub mod peak;

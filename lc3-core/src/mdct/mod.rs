//! Mixed-radix complex FFT and the IMDCT built on top of it.

pub mod complex;
pub mod fft;
pub mod imdct;

//! Signal acquisition and pitch detection for the tuner's control loop.

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod buffer;
pub mod detector;
pub mod sampler;
pub mod smoothing;
pub mod spectrum;
pub mod window;

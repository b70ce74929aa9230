//! Spectral transform and per-channel frequency representations
//!
//! Provides the 3D discrete Fourier transform used to move cube texture
//! fields into frequency space, Parseval energy helpers, and the
//! coefficient/channel value types the energy physics operates on.
//!
//! Convention: the forward transform is the unnormalized sum; the inverse
//! applies the `1/N³` factor. All energy formulas downstream are stated
//! against this convention.

mod channel;
mod fft;

pub use channel::{Channel, ChannelSet, SpectralCoefficient};
pub use fft::{spectrum_energy, Fft3d, SpectralError, Spectrum3d};

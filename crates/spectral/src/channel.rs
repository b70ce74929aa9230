//! Per-channel spectral representations
//!
//! A cube texture channel is summarized by its DC term plus a small set of
//! dominant non-DC frequency components. Downstream shaders conventionally
//! consume at most 8 coefficients per channel; the engine imposes no cap, the
//! caller bounds the count when extracting.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::fft::{SpectralError, Spectrum3d};

/// One non-DC frequency component of a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralCoefficient {
    /// Magnitude of the component (≥ 0)
    pub amplitude: f64,
    /// Phase in [0, 2π)
    pub phase: f64,
    pub freq_x: i32,
    pub freq_y: i32,
    pub freq_z: i32,
}

/// Spectral summary of one texture channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub dc_amplitude: f64,
    pub dc_phase: f64,
    pub coefficients: Vec<SpectralCoefficient>,
}

impl Channel {
    /// Extract a channel summary from a transformed spectrum
    ///
    /// Keeps the DC term plus the `max_coefficients` strongest non-DC
    /// components, with frequency indices mapped into the signed range
    /// `(-N/2, N/2]`.
    pub fn from_spectrum(
        spectrum: &Spectrum3d,
        size: usize,
        max_coefficients: usize,
    ) -> Result<Self, SpectralError> {
        let total = size * size * size;
        if spectrum.real.len() != total {
            return Err(SpectralError::LengthMismatch {
                part: "real",
                expected: total,
                got: spectrum.real.len(),
            });
        }
        if spectrum.imag.len() != total {
            return Err(SpectralError::LengthMismatch {
                part: "imaginary",
                expected: total,
                got: spectrum.imag.len(),
            });
        }

        let (dc_amplitude, dc_phase) = amplitude_phase(spectrum.real[0], spectrum.imag[0]);

        let mut candidates: Vec<SpectralCoefficient> = Vec::with_capacity(total - 1);
        for idx in 1..total {
            let (amplitude, phase) = amplitude_phase(spectrum.real[idx], spectrum.imag[idx]);
            let x = idx % size;
            let y = (idx / size) % size;
            let z = idx / (size * size);
            candidates.push(SpectralCoefficient {
                amplitude,
                phase,
                freq_x: signed_frequency(x, size),
                freq_y: signed_frequency(y, size),
                freq_z: signed_frequency(z, size),
            });
        }

        candidates.sort_by(|a, b| {
            b.amplitude
                .partial_cmp(&a.amplitude)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(max_coefficients);

        Ok(Channel {
            dc_amplitude,
            dc_phase,
            coefficients: candidates,
        })
    }
}

/// Named channel slots of a cube texture
///
/// A missing channel contributes zero energy downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSet {
    pub r: Option<Channel>,
    pub g: Option<Channel>,
    pub b: Option<Channel>,
    pub a: Option<Channel>,
}

impl ChannelSet {
    /// Iterate over the channels that are present
    pub fn present(&self) -> impl Iterator<Item = &Channel> {
        [&self.r, &self.g, &self.b, &self.a]
            .into_iter()
            .filter_map(|c| c.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Magnitude and [0, 2π) phase of one complex coefficient
fn amplitude_phase(re: f32, im: f32) -> (f64, f64) {
    let re = re as f64;
    let im = im as f64;
    let amplitude = (re * re + im * im).sqrt();
    let mut phase = im.atan2(re);
    if phase < 0.0 {
        phase += TAU;
    }
    (amplitude, phase)
}

/// Map an unsigned FFT bin index into the signed range `(-N/2, N/2]`
fn signed_frequency(index: usize, size: usize) -> i32 {
    if index > size / 2 {
        index as i32 - size as i32
    } else {
        index as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::Fft3d;

    #[test]
    fn test_signed_frequency_mapping() {
        assert_eq!(signed_frequency(0, 8), 0);
        assert_eq!(signed_frequency(3, 8), 3);
        assert_eq!(signed_frequency(4, 8), 4);
        assert_eq!(signed_frequency(5, 8), -3);
        assert_eq!(signed_frequency(7, 8), -1);
    }

    #[test]
    fn test_amplitude_phase_wraps_into_tau() {
        let (amp, phase) = amplitude_phase(0.0, -1.0);
        assert!((amp - 1.0).abs() < 1e-9);
        assert!(phase >= 0.0 && phase < TAU);
        assert!((phase - 3.0 * TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_spectrum_constant_field_is_dc_only() {
        let mut fft = Fft3d::new(8).unwrap();
        let real = vec![1.5f32; 512];
        let imag = vec![0.0f32; 512];
        let spectrum = fft.forward(&real, &imag).unwrap();

        let channel = Channel::from_spectrum(&spectrum, 8, 4).unwrap();
        assert!((channel.dc_amplitude - 768.0).abs() < 1e-2);
        for c in &channel.coefficients {
            assert!(c.amplitude < 1e-3);
        }
    }

    #[test]
    fn test_from_spectrum_finds_dominant_frequency() {
        // A pure cosine along X concentrates amplitude at freq_x = ±1.
        let n = 8usize;
        let mut real = vec![0.0f32; n * n * n];
        let imag = vec![0.0f32; n * n * n];
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let phase = TAU * (x as f64) / n as f64;
                    real[z * n * n + y * n + x] = phase.cos() as f32;
                }
            }
        }

        let mut fft = Fft3d::new(8).unwrap();
        let spectrum = fft.forward(&real, &imag).unwrap();
        let channel = Channel::from_spectrum(&spectrum, 8, 2).unwrap();

        assert!(channel.dc_amplitude < 1e-3);
        assert_eq!(channel.coefficients.len(), 2);
        for c in &channel.coefficients {
            assert_eq!(c.freq_x.abs(), 1);
            assert_eq!(c.freq_y, 0);
            assert_eq!(c.freq_z, 0);
            assert!(c.amplitude > 100.0);
        }
    }

    #[test]
    fn test_from_spectrum_respects_cap() {
        let mut fft = Fft3d::new(8).unwrap();
        let real: Vec<f32> = (0..512).map(|i| ((i * 31 % 17) as f32) * 0.1).collect();
        let imag = vec![0.0f32; 512];
        let spectrum = fft.forward(&real, &imag).unwrap();

        let channel = Channel::from_spectrum(&spectrum, 8, 8).unwrap();
        assert!(channel.coefficients.len() <= 8);

        // Ordered strongest-first
        for pair in channel.coefficients.windows(2) {
            assert!(pair[0].amplitude >= pair[1].amplitude);
        }
    }

    #[test]
    fn test_from_spectrum_length_mismatch() {
        let spectrum = Spectrum3d {
            real: vec![0.0; 10],
            imag: vec![0.0; 10],
            energy: 0.0,
        };
        assert!(Channel::from_spectrum(&spectrum, 8, 4).is_err());
    }

    #[test]
    fn test_channel_set_present() {
        let channel = Channel {
            dc_amplitude: 1.0,
            dc_phase: 0.0,
            coefficients: vec![],
        };
        let set = ChannelSet {
            r: Some(channel.clone()),
            g: None,
            b: Some(channel),
            a: None,
        };
        assert_eq!(set.present().count(), 2);
        assert!(!set.is_empty());
        assert!(ChannelSet::default().is_empty());
    }

    #[test]
    fn test_channel_serde_roundtrip() {
        let channel = Channel {
            dc_amplitude: 2.0,
            dc_phase: 1.0,
            coefficients: vec![SpectralCoefficient {
                amplitude: 4.0,
                phase: 0.5,
                freq_x: 1,
                freq_y: -2,
                freq_z: 3,
            }],
        };
        let json = serde_json::to_string(&channel).unwrap();
        let back: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(channel, back);
    }
}

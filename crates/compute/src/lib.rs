//! Compute backend dispatcher for noise and spectral workloads
//!
//! Three interchangeable tiers sit behind one call contract:
//!
//! ```text
//!                      ComputeEngine
//!                 compute_noise / compute_fft
//!                            │
//!            ┌───────────────┼───────────────┐
//!            ▼               ▼               ▼
//!   ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//!   │  GPU tier   │  │ Parallel    │  │  Scalar     │
//!   │  (wgpu)     │  │ tier (rayon)│  │  reference  │
//!   └─────────────┘  └─────────────┘  └─────────────┘
//! ```
//!
//! The highest available tier runs each call; a failed accelerated dispatch
//! silently descends to the next tier for that call. Every tier satisfies the
//! same output contract, so the `method` tag on results is diagnostic only
//! and callers must never branch on it for correctness. Hardware availability
//! is probed once per process and cached; `destroy` resets the cache.

pub mod backend;
mod bench;
mod clock;
mod engine;

#[cfg(feature = "wasm")]
mod wasm;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bench::{run_benchmarks, BenchmarkResult};
pub use engine::{CapabilityReport, ComputeEngine};
pub use fluxcube_noise::{LatticeSize, NoiseKind, NoiseParams, ParamsError};
pub use fluxcube_spectral::SpectralError;

/// Backend tier that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputeMethod {
    /// Accelerated parallel backend (wgpu compute shaders)
    Gpu,
    /// Portable data-parallel backend (rayon)
    Parallel,
    /// Sequential reference backend, always available
    Scalar,
}

impl ComputeMethod {
    /// All tiers, ranked best-first
    pub const ALL: [ComputeMethod; 3] =
        [ComputeMethod::Gpu, ComputeMethod::Parallel, ComputeMethod::Scalar];

    pub fn label(self) -> &'static str {
        match self {
            ComputeMethod::Gpu => "gpu",
            ComputeMethod::Parallel => "parallel",
            ComputeMethod::Scalar => "scalar",
        }
    }
}

/// Output of one dispatched noise computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseResult {
    /// Flat `N³` lattice, indexed `z*N² + y*N + x`
    pub data: Vec<f32>,
    pub size: LatticeSize,
    /// Tier that ran; diagnostic only
    pub method: ComputeMethod,
    pub compute_time_ms: f64,
}

/// Output of one dispatched forward transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FftResult {
    pub real: Vec<f32>,
    pub imag: Vec<f32>,
    /// Parseval total of the output coefficients
    pub energy: f64,
    /// Tier that ran; diagnostic only
    pub method: ComputeMethod,
}

/// Dispatcher failures
///
/// Capability problems never appear here; tier descent absorbs them. The
/// only error path is a caller contract violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    #[error(transparent)]
    Spectral(#[from] SpectralError),
}

//! Backend dispatch and capability lifecycle
//!
//! The capability probe runs once per process and is memoized in a single
//! guarded slot; `destroy` clears it, releasing any accelerated resources and
//! forcing a fresh probe on the next `initialize`. Dispatch never surfaces a
//! capability problem: a failed accelerated call descends to the next tier
//! for that call only, without retrying the failed tier.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fluxcube_noise::NoiseParams;
use fluxcube_spectral::SpectralError;

use crate::clock::Timer;
use crate::{ComputeError, ComputeMethod, FftResult, NoiseResult};

#[cfg(not(target_arch = "wasm32"))]
use crate::backend::{gpu, parallel};
#[cfg(target_arch = "wasm32")]
use crate::backend::scalar;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use tracing::warn;

/// Result of the accelerated-tier capability probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub supported: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct BackendRegistry {
    #[cfg(not(target_arch = "wasm32"))]
    gpu: Option<Arc<gpu::GpuExecutor>>,
    gpu_error: Option<String>,
}

impl BackendRegistry {
    fn gpu_supported(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.gpu.is_some()
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }
}

/// `None` = not probed yet; `Some` = memoized probe outcome
static REGISTRY: Mutex<Option<BackendRegistry>> = Mutex::new(None);

fn registry() -> std::sync::MutexGuard<'static, Option<BackendRegistry>> {
    REGISTRY.lock().unwrap_or_else(|e| e.into_inner())
}

const fn parallel_available() -> bool {
    cfg!(not(target_arch = "wasm32"))
}

/// Uniform entry point for noise and spectral workloads
///
/// Stateless handle over the process-wide backend registry; cheap to create
/// anywhere. All instances share the same memoized capability cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeEngine;

impl ComputeEngine {
    pub fn new() -> Self {
        ComputeEngine
    }

    /// Probe the accelerated tier and cache the outcome
    ///
    /// Idempotent: repeated calls after the first are no-ops until `destroy`
    /// resets the cache.
    pub fn initialize(&self) {
        let mut guard = registry();
        if guard.is_some() {
            return;
        }

        let mut reg = BackendRegistry::default();

        #[cfg(not(target_arch = "wasm32"))]
        match gpu::GpuExecutor::new() {
            Ok(exec) => {
                debug!("accelerated compute backend initialized");
                reg.gpu = Some(Arc::new(exec));
            }
            Err(err) => {
                debug!(error = %err, "accelerated backend unavailable, CPU tiers remain");
                reg.gpu_error = Some(err.to_string());
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            reg.gpu_error = Some("accelerated backend requires a native host".to_string());
        }

        *guard = Some(reg);
    }

    /// Release accelerated resources and force a fresh probe on next use
    ///
    /// Safe to call repeatedly, and safe when nothing was ever acquired.
    pub fn destroy(&self) {
        let mut guard = registry();
        if guard.take().is_some() {
            debug!("compute backend registry torn down");
        }
    }

    /// Non-blocking capability check, callable before `initialize`
    pub fn check_capability_support(&self) -> CapabilityReport {
        {
            let guard = registry();
            if let Some(reg) = guard.as_ref() {
                return CapabilityReport {
                    supported: reg.gpu_supported(),
                    error: reg.gpu_error.clone(),
                };
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            match gpu::probe_support() {
                Ok(()) => CapabilityReport {
                    supported: true,
                    error: None,
                },
                Err(err) => CapabilityReport {
                    supported: false,
                    error: Some(err.to_string()),
                },
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            CapabilityReport {
                supported: false,
                error: Some("accelerated backend requires a native host".to_string()),
            }
        }
    }

    /// Highest available tier, without executing any work
    pub fn preferred_method(&self) -> ComputeMethod {
        self.initialize();
        let guard = registry();
        let gpu_ok = guard.as_ref().map(|r| r.gpu_supported()).unwrap_or(false);
        if gpu_ok {
            ComputeMethod::Gpu
        } else if parallel_available() {
            ComputeMethod::Parallel
        } else {
            ComputeMethod::Scalar
        }
    }

    /// Whether a specific tier could run right now
    pub fn method_available(&self, method: ComputeMethod) -> bool {
        match method {
            ComputeMethod::Gpu => {
                self.initialize();
                registry().as_ref().map(|r| r.gpu_supported()).unwrap_or(false)
            }
            ComputeMethod::Parallel => parallel_available(),
            ComputeMethod::Scalar => true,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn gpu_executor(&self) -> Option<Arc<gpu::GpuExecutor>> {
        registry().as_ref().and_then(|r| r.gpu.clone())
    }

    /// Compute a noise lattice on the best available tier
    ///
    /// Never fails for capability reasons; the only error path is invalid
    /// parameters.
    pub fn compute_noise(&self, params: &NoiseParams) -> Result<NoiseResult, ComputeError> {
        params.validate()?;
        self.initialize();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(exec) = self.gpu_executor() {
            let timer = Timer::start();
            match exec.compute_noise(params) {
                Ok(data) => {
                    return Ok(NoiseResult {
                        data,
                        size: params.size,
                        method: ComputeMethod::Gpu,
                        compute_time_ms: timer.elapsed_ms(),
                    })
                }
                Err(err) => {
                    warn!(error = %err, "accelerated noise dispatch failed, descending to parallel tier");
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let timer = Timer::start();
            let data = parallel::fill_noise(params);
            Ok(NoiseResult {
                data,
                size: params.size,
                method: ComputeMethod::Parallel,
                compute_time_ms: timer.elapsed_ms(),
            })
        }

        #[cfg(target_arch = "wasm32")]
        {
            let timer = Timer::start();
            let data = scalar::fill_noise(params);
            Ok(NoiseResult {
                data,
                size: params.size,
                method: ComputeMethod::Scalar,
                compute_time_ms: timer.elapsed_ms(),
            })
        }
    }

    /// Forward 3D transform on the best available tier
    pub fn compute_fft(
        &self,
        real: &[f32],
        imag: &[f32],
        size: usize,
    ) -> Result<FftResult, ComputeError> {
        if size != 8 && size != 16 && size != 32 {
            return Err(SpectralError::UnsupportedSize(size).into());
        }
        let total = size * size * size;
        if real.len() != total {
            return Err(SpectralError::LengthMismatch {
                part: "real",
                expected: total,
                got: real.len(),
            }
            .into());
        }
        if imag.len() != total {
            return Err(SpectralError::LengthMismatch {
                part: "imaginary",
                expected: total,
                got: imag.len(),
            }
            .into());
        }
        self.initialize();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(exec) = self.gpu_executor() {
            match exec.compute_fft(real, imag, size) {
                Ok((out_real, out_imag)) => {
                    let energy = fluxcube_spectral::spectrum_energy(&out_real, &out_imag)?;
                    return Ok(FftResult {
                        real: out_real,
                        imag: out_imag,
                        energy,
                        method: ComputeMethod::Gpu,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "accelerated transform dispatch failed, descending to parallel tier");
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let spectrum = parallel::fft_forward(real, imag, size)?;
            Ok(FftResult {
                real: spectrum.real,
                imag: spectrum.imag,
                energy: spectrum.energy,
                method: ComputeMethod::Parallel,
            })
        }

        #[cfg(target_arch = "wasm32")]
        {
            let spectrum = scalar::fft_forward(real, imag, size)?;
            Ok(FftResult {
                real: spectrum.real,
                imag: spectrum.imag,
                energy: spectrum.energy,
                method: ComputeMethod::Scalar,
            })
        }
    }
}

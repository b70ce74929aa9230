//! Diagnostic benchmark harness
//!
//! Runs each tier against identical parameters and reports timing statistics.
//! Unavailable tiers still appear in the output with zeroed timings so callers
//! always get a stable shape. Purely diagnostic: nothing here may feed back
//! into dispatch decisions.

use std::hint::black_box;

use serde::{Deserialize, Serialize};

use fluxcube_noise::NoiseParams;

use crate::backend::scalar;
use crate::clock::Timer;
use crate::{ComputeEngine, ComputeError, ComputeMethod};

#[cfg(not(target_arch = "wasm32"))]
use crate::backend::parallel;

/// Timing summary for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub method: ComputeMethod,
    pub available: bool,
    pub avg_time_ms: f64,
    pub std_dev_ms: f64,
    pub iterations: u32,
    pub ops_per_second: f64,
}

impl BenchmarkResult {
    fn unavailable(method: ComputeMethod) -> Self {
        Self {
            method,
            available: false,
            avg_time_ms: 0.0,
            std_dev_ms: 0.0,
            iterations: 0,
            ops_per_second: 0.0,
        }
    }
}

/// Benchmark the noise fill on every tier
///
/// One entry per tier, ranked best-first, never omitted.
pub fn run_benchmarks(
    engine: &ComputeEngine,
    params: &NoiseParams,
    iterations: u32,
) -> Result<Vec<BenchmarkResult>, ComputeError> {
    params.validate()?;
    engine.initialize();

    Ok(ComputeMethod::ALL
        .into_iter()
        .map(|method| bench_method(engine, params, iterations, method))
        .collect())
}

fn bench_method(
    engine: &ComputeEngine,
    params: &NoiseParams,
    iterations: u32,
    method: ComputeMethod,
) -> BenchmarkResult {
    if !engine.method_available(method) {
        return BenchmarkResult::unavailable(method);
    }
    if iterations == 0 {
        return BenchmarkResult {
            available: true,
            ..BenchmarkResult::unavailable(method)
        };
    }

    let mut times = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let timer = Timer::start();
        if !run_once(engine, params, method) {
            // A tier that fails mid-run is reported as unavailable, not an error
            return BenchmarkResult::unavailable(method);
        }
        times.push(timer.elapsed_ms());
    }

    let avg = times.iter().sum::<f64>() / times.len() as f64;
    let variance = times.iter().map(|t| (t - avg) * (t - avg)).sum::<f64>() / times.len() as f64;
    let ops_per_second = if avg > 0.0 { 1000.0 / avg } else { 0.0 };

    BenchmarkResult {
        method,
        available: true,
        avg_time_ms: avg,
        std_dev_ms: variance.sqrt(),
        iterations,
        ops_per_second,
    }
}

fn run_once(engine: &ComputeEngine, params: &NoiseParams, method: ComputeMethod) -> bool {
    match method {
        ComputeMethod::Gpu => {
            #[cfg(not(target_arch = "wasm32"))]
            {
                match engine.gpu_executor() {
                    Some(exec) => exec.compute_noise(params).is_ok(),
                    None => false,
                }
            }
            #[cfg(target_arch = "wasm32")]
            {
                let _ = engine;
                false
            }
        }
        ComputeMethod::Parallel => {
            #[cfg(not(target_arch = "wasm32"))]
            {
                black_box(parallel::fill_noise(params));
                true
            }
            #[cfg(target_arch = "wasm32")]
            {
                false
            }
        }
        ComputeMethod::Scalar => {
            black_box(scalar::fill_noise(params));
            true
        }
    }
}

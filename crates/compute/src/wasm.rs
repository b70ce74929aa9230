//! WASM bindings for the compute engine
//!
//! Thin wrappers over the native API; parameter and result types cross the
//! boundary through serde. On wasm32 the dispatcher resolves to the scalar
//! tier, so this surface stays correct without the accelerated backends.

use wasm_bindgen::prelude::*;

use fluxcube_noise::NoiseParams;

use crate::{run_benchmarks, ComputeEngine};

fn to_js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Engine handle exposed to the host application
#[wasm_bindgen]
pub struct WasmComputeEngine {
    engine: ComputeEngine,
}

#[wasm_bindgen]
impl WasmComputeEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: ComputeEngine::new(),
        }
    }

    pub fn initialize(&self) {
        self.engine.initialize();
    }

    pub fn destroy(&self) {
        self.engine.destroy();
    }

    #[wasm_bindgen(js_name = checkCapabilitySupport)]
    pub fn check_capability_support(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.engine.check_capability_support()).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = preferredMethod)]
    pub fn preferred_method(&self) -> String {
        self.engine.preferred_method().label().to_string()
    }

    #[wasm_bindgen(js_name = computeNoise)]
    pub fn compute_noise(&self, params: JsValue) -> Result<JsValue, JsValue> {
        let params: NoiseParams = serde_wasm_bindgen::from_value(params).map_err(to_js_err)?;
        let result = self.engine.compute_noise(&params).map_err(to_js_err)?;
        serde_wasm_bindgen::to_value(&result).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = computeFft)]
    pub fn compute_fft(&self, real: &[f32], imag: &[f32], size: usize) -> Result<JsValue, JsValue> {
        let result = self.engine.compute_fft(real, imag, size).map_err(to_js_err)?;
        serde_wasm_bindgen::to_value(&result).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = runBenchmarks)]
    pub fn run_benchmarks(&self, params: JsValue, iterations: u32) -> Result<JsValue, JsValue> {
        let params: NoiseParams = serde_wasm_bindgen::from_value(params).map_err(to_js_err)?;
        let results = run_benchmarks(&self.engine, &params, iterations).map_err(to_js_err)?;
        serde_wasm_bindgen::to_value(&results).map_err(to_js_err)
    }
}

impl Default for WasmComputeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parseval energy of raw coefficient arrays
#[wasm_bindgen(js_name = spectrumEnergy)]
pub fn spectrum_energy(real: &[f32], imag: &[f32]) -> Result<f64, JsValue> {
    fluxcube_spectral::spectrum_energy(real, imag).map_err(to_js_err)
}

//! Wall-clock timing for diagnostic fields
//!
//! `std::time::Instant` is unavailable on bare wasm32 targets, where the
//! diagnostic timings report zero instead.

#[cfg(not(target_arch = "wasm32"))]
pub(crate) struct Timer(std::time::Instant);

#[cfg(not(target_arch = "wasm32"))]
impl Timer {
    pub fn start() -> Self {
        Timer(std::time::Instant::now())
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) struct Timer;

#[cfg(target_arch = "wasm32")]
impl Timer {
    pub fn start() -> Self {
        Timer
    }

    pub fn elapsed_ms(&self) -> f64 {
        0.0
    }
}

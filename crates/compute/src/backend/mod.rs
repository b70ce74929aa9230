//! Backend tiers
//!
//! Each tier fills the same flat lattice contract. The scalar tier is the
//! correctness baseline; the parallel and GPU tiers must agree with it
//! statistically (the GPU tier computes in f32 and is not bit-identical).

pub mod scalar;

#[cfg(not(target_arch = "wasm32"))]
pub mod parallel;

#[cfg(not(target_arch = "wasm32"))]
pub mod gpu;

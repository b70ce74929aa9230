//! Spectral energy physics for cubes
//!
//! Derives a cube's physical energy budget from its spectral channel data via
//! Parseval's theorem and simulates it over application-driven time: coherence
//! decay, fracture detection, and energy transfer between cubes.
//!
//! All operations are pure functions over value types: nothing here mutates
//! caller state in place, performs I/O, or keeps globals. The calling
//! application owns persistence, drives the simulated clock, and is expected
//! to call [`recompute_energy`] after any channel edit.

mod decay;
mod fracture;
mod state;
mod transfer;

pub use decay::{apply_coherence_decay, decay_channel, decay_state};
pub use fracture::{check_fracture, is_near_fracture, FractureReport, DEFAULT_WARNING_RATIO};
pub use state::{
    channel_energy, channel_set_energy, coefficient_energy, normalized_energy,
    recompute_energy, remaining_capacity, CubeEnergyState,
};
pub use transfer::{apply_transfer, transfer_energy, TransferOptions, TransferResult};

// Re-export the spectral value types the physics operates on
pub use fluxcube_spectral::{Channel, ChannelSet, SpectralCoefficient};

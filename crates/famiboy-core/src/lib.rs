//! Game Boy APU to Famicom APU channel virtualization.
//!
//! This crate contains the platform-agnostic mapping engine: it accepts writes
//! to the handheld's sound registers and produces, once per frame, an
//! equivalent stream of host sound-register writes. Frontends (trace replay,
//! the cartridge firmware bridge) drive it through the [`apu::ApuMapper`]
//! facade.

/// Register-file facade and per-frame update pipeline.
pub mod apu;

/// Host channel ownership and wave routing.
pub mod arbiter;

/// Per-voice state: envelope, sweep and one-shot edges.
pub mod channel;

/// Source frequency to host period conversion.
pub mod convert;

/// Log sink seam for frontends.
pub mod diagnostics;

/// Host register emission per voice.
pub mod emit;

/// Host console regions and fixed reference clocks.
pub mod hardware;

/// Host register ids and the outbound bus queue.
pub mod host;

/// Source register image and power-on state.
pub mod register_bank;

/// Update cadence policies.
pub mod scheduler;

/// 8.8 fixed-point clock dividers.
pub mod timer;

/// Wave memory shape classification.
pub mod waveform;

pub use apu::{ApuConfig, ApuMapper};
pub use hardware::HostRegion;
pub use host::{BusQueue, HostSink, HostWrite};
pub use scheduler::UpdateCadence;

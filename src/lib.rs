//! Frontend for the `famiboy-core` APU mapper: configuration, register trace
//! parsing and frame-by-frame replay.

pub mod config;
pub mod logging;
pub mod replay;
pub mod trace;

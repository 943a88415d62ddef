//! Runtime layer for brainfunk.
//!
//! - **Config**: [`MachineConfig`], layered from defaults, JSON and flags
//! - **Engine**: binds a configuration to its dialect and runs or compiles

pub mod config;
pub mod engine;

pub use config::MachineConfig;
pub use engine::Engine;

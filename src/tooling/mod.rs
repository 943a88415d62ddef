//! Tooling layer for brainfunk.
//!
//! - **Debugger**: console commands, an [`Inspector`] over a paused interpreter,
//!   and [`debug_run`] to drive a run through the console

pub mod debugger;

pub use debugger::{debug_run, DebugCommand, Inspector, Reply, HELP};

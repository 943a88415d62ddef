//! Ahead-of-time output: C source text.
//!
//! Turning the text into a binary is left to the caller's C toolchain.

pub mod c_emitter;

pub use c_emitter::{core_emit, CEmitter, EmitHook, EmitOptions};

//! Virtual machine for brainfunk programs.
//!
//! - **Machine**: tape, cursor, program counter and dialect registers
//! - **Interpreter**: the fetch/step loop with pause token and step budget
//! - **Ports**: byte input and output, and the EOF policy
//!
//! # Architecture
//!
//! Single-threaded and synchronous. A machine runs one program to
//! completion; the only interruption is the pause token, which is polled
//! between steps and never mid-operation.

pub mod interpreter;
pub mod machine;
pub mod ports;

pub use interpreter::{Interpreter, PauseToken, RunStatus, StepOutcome};
pub use machine::{core_step, FinishHook, Flow, Machine, StepHook};
pub use ports::{EofPolicy, OutputCapture, Ports};

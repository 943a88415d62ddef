//! Integration tests for brainfunk.
//!
//! This module organises integration tests by component.

pub mod compiled;
pub mod debugger;
pub mod dialects;
pub mod emitter;
pub mod layout;
pub mod scenarios;
pub mod tape;

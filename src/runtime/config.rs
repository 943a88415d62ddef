//! Machine configuration.
//!
//! Layering, lowest priority first: built-in defaults, a JSON file, command
//! line flags. A dialect may still override tape settings afterwards (see
//! [`Dialect::configure_tape`](crate::dialect::Dialect::configure_tape)).
//!
//! ```json
//! { "dialect": "extended", "cell_width": 2, "eof": "zero", "max_steps": 1000000 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{BfError, BfResult, TapeConfig};
use crate::dialect::DialectKind;
use crate::vm::EofPolicy;

/// Everything needed to set up one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    pub dialect: DialectKind,
    /// Cell width in bytes: 1, 2, 4 or 8.
    pub cell_width: usize,
    /// Initial number of cells.
    pub cell_count: i64,
    /// Wrap the pointer around the tape ends.
    pub wrap: bool,
    /// Grow the tape on demand.
    pub dynamic: bool,
    pub eof: EofPolicy,
    /// Abort after this many operations.
    pub max_steps: Option<u64>,
    /// Initial memory, in the escape grammar.
    pub data: Option<String>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Vanilla,
            cell_width: 1,
            cell_count: 32768,
            wrap: false,
            dynamic: false,
            eof: EofPolicy::MinusOne,
            max_steps: None,
            data: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json(text: &str) -> BfResult<Self> {
        serde_json::from_str(text).map_err(|e| BfError::Config {
            message: format!("invalid configuration: {}", e),
        })
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: &Path) -> BfResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The tape as requested, before any dialect override.
    pub fn tape(&self) -> TapeConfig {
        TapeConfig {
            width: self.cell_width,
            length: self.cell_count,
            wrap: self.wrap,
            dynamic: self.dynamic,
        }
    }
}

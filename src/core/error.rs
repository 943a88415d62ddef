//! Error types for the brainfunk tape machine.
//!
//! Every failure in the core is raised at its detection point and handed
//! straight to the caller. Nothing below retries or recovers silently.
//!
//! # Error Categories
//!
//! - **Config**: Bad construction parameters (cell width, cell count, policy mix)
//! - **Addressing**: Bounds violations under a non-wrapping, non-growing tape,
//!   or any negative index that is not wrapped
//! - **Structural**: Unbalanced delimiters at translate time, or an
//!   unresolvable bracket scan while running live (self-modified) code
//! - **DataFormat**: Malformed escape sequences in a data literal
//! - **Unsupported**: A backend the dialect declares unavailable
//! - **Io**: Stream failures and end-of-input under the `Abort` EOF policy
//! - **Runtime**: Arithmetic faults and the optional step budget

use std::fmt;
use thiserror::Error;

/// Which tape access triggered an addressing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOperation {
    Read,
    Write,
    /// Decoding an operation out of live code.
    Fetch,
}

impl fmt::Display for MemoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOperation::Read => write!(f, "read"),
            MemoryOperation::Write => write!(f, "write"),
            MemoryOperation::Fetch => write!(f, "fetch"),
        }
    }
}

/// Direction of a bracket scan, for runtime structural errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Backward,
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDirection::Forward => write!(f, "forward"),
            ScanDirection::Backward => write!(f, "backward"),
        }
    }
}

/// Error type for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum BfError {
    // ═══════════════════════════════════════════════════════════════════
    // Config Errors
    // ═══════════════════════════════════════════════════════════════════

    #[error("invalid cell size {width}: only 1, 2, 4 and 8 are supported")]
    InvalidCellWidth { width: usize },

    #[error("invalid cell count {count}: must be greater than zero")]
    InvalidCellCount { count: i64 },

    #[error("cannot have both a dynamic tape and a wrap-around pointer")]
    ConflictingPolicy,

    #[error("invalid configuration: {message}")]
    Config { message: String },

    // ═══════════════════════════════════════════════════════════════════
    // Addressing Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Pointer decremented below cell zero on a tape that does not wrap.
    #[error("pointer was decremented too much: {operation} at index {index}")]
    NegativeAddress { index: i64, operation: MemoryOperation },

    /// Pointer incremented past the end of a fixed tape.
    #[error("pointer was incremented too much: {operation} at index {index} (length {length})")]
    AddressOutOfBounds {
        index: i64,
        length: usize,
        operation: MemoryOperation,
    },

    /// Dynamic tape asked to grow beyond the hard cap.
    #[error("tape cannot grow to cover index {index} (limit {limit} cells)")]
    TapeExhausted { index: i64, limit: usize },

    // ═══════════════════════════════════════════════════════════════════
    // Structural Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Opening and closing delimiters do not pair up.
    #[error("opening and closing {open}{close} don't match (near source offset {offset})")]
    Unbalanced { open: char, close: char, offset: usize },

    /// A loop-break opcode appears outside of any loop.
    #[error("cannot break out of non-existent loop (source offset {offset})")]
    BreakOutsideLoop { offset: usize },

    /// A bracket scan over live code ran off the program.
    #[error("no matching delimiter for {token:?} at pc {pc} (scanning {direction})")]
    UnmatchedAtRuntime {
        pc: usize,
        token: char,
        direction: ScanDirection,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Data Format Errors
    // ═══════════════════════════════════════════════════════════════════

    #[error("data: {message} (offset {offset})")]
    DataFormat { offset: usize, message: String },

    // ═══════════════════════════════════════════════════════════════════
    // Unsupported
    // ═══════════════════════════════════════════════════════════════════

    #[error("{dialect} can't be {backend}")]
    Unsupported {
        dialect: &'static str,
        backend: &'static str,
    },

    // ═══════════════════════════════════════════════════════════════════
    // I/O Errors
    // ═══════════════════════════════════════════════════════════════════

    #[error("unexpected end of input at pc {pc}")]
    Eof { pc: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════
    // Runtime Errors
    // ═══════════════════════════════════════════════════════════════════

    #[error("division by zero at pc {pc}")]
    DivisionByZero { pc: usize },

    #[error("step limit exceeded: {limit} steps")]
    StepLimitExceeded { limit: u64 },
}

/// Error category for filtering and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Addressing,
    Structural,
    DataFormat,
    Unsupported,
    Io,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Addressing => write!(f, "addressing"),
            ErrorCategory::Structural => write!(f, "structural"),
            ErrorCategory::DataFormat => write!(f, "data format"),
            ErrorCategory::Unsupported => write!(f, "unsupported"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Runtime => write!(f, "runtime"),
        }
    }
}

impl BfError {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BfError::InvalidCellWidth { .. }
            | BfError::InvalidCellCount { .. }
            | BfError::ConflictingPolicy
            | BfError::Config { .. } => ErrorCategory::Config,

            BfError::NegativeAddress { .. }
            | BfError::AddressOutOfBounds { .. }
            | BfError::TapeExhausted { .. } => ErrorCategory::Addressing,

            BfError::Unbalanced { .. }
            | BfError::BreakOutsideLoop { .. }
            | BfError::UnmatchedAtRuntime { .. } => ErrorCategory::Structural,

            BfError::DataFormat { .. } => ErrorCategory::DataFormat,

            BfError::Unsupported { .. } => ErrorCategory::Unsupported,

            BfError::Eof { .. } | BfError::Io(_) => ErrorCategory::Io,

            BfError::DivisionByZero { .. } | BfError::StepLimitExceeded { .. } => {
                ErrorCategory::Runtime
            }
        }
    }

    /// Get the error code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Config: 1000-1999
            BfError::InvalidCellWidth { .. } => 1001,
            BfError::InvalidCellCount { .. } => 1002,
            BfError::ConflictingPolicy => 1003,
            BfError::Config { .. } => 1099,

            // Addressing: 2000-2999
            BfError::NegativeAddress { .. } => 2001,
            BfError::AddressOutOfBounds { .. } => 2002,
            BfError::TapeExhausted { .. } => 2003,

            // Structural: 3000-3999
            BfError::Unbalanced { .. } => 3001,
            BfError::BreakOutsideLoop { .. } => 3002,
            BfError::UnmatchedAtRuntime { .. } => 3003,

            // Data format: 4000-4999
            BfError::DataFormat { .. } => 4001,

            // Unsupported: 5000-5999
            BfError::Unsupported { .. } => 5001,

            // I/O: 6000-6999
            BfError::Eof { .. } => 6001,
            BfError::Io(_) => 6002,

            // Runtime: 7000-7999
            BfError::DivisionByZero { .. } => 7001,
            BfError::StepLimitExceeded { .. } => 7002,
        }
    }

    pub(crate) fn data(offset: usize, message: impl Into<String>) -> Self {
        BfError::DataFormat {
            offset,
            message: message.into(),
        }
    }
}

/// Result type alias for brainfunk operations.
pub type BfResult<T> = Result<T, BfError>;

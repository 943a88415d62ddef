//! Byte I/O for the machine.
//!
//! The core treats input and output as abstract byte streams supplied by
//! the caller. All I/O is blocking.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::BfResult;

/// What an input operation stores when the input stream is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EofPolicy {
    /// Store -1, i.e. all ones at the cell's width.
    #[default]
    MinusOne,
    /// Store zero.
    Zero,
    /// Leave the cell as it was.
    Unchanged,
    /// Stop with an error.
    Abort,
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::MinusOne => write!(f, "minus-one"),
            EofPolicy::Zero => write!(f, "zero"),
            EofPolicy::Unchanged => write!(f, "unchanged"),
            EofPolicy::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minus-one" | "-1" => Ok(EofPolicy::MinusOne),
            "zero" | "0" => Ok(EofPolicy::Zero),
            "unchanged" => Ok(EofPolicy::Unchanged),
            "abort" => Ok(EofPolicy::Abort),
            other => Err(format!(
                "unknown EOF policy '{}' (expected minus-one, zero, unchanged or abort)",
                other
            )),
        }
    }
}

/// The input source and output sink of one machine.
pub struct Ports {
    input: Box<dyn Read>,
    output: Box<dyn Write>,
    pushed_back: Option<u8>,
}

impl fmt::Debug for Ports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ports").finish_non_exhaustive()
    }
}

impl Ports {
    pub fn new(input: impl Read + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            pushed_back: None,
        }
    }

    /// Process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }

    /// Read one byte. `None` at end of input.
    pub fn read_byte(&mut self) -> BfResult<Option<u8>> {
        if let Some(byte) = self.pushed_back.take() {
            return Ok(Some(byte));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Hand `byte` back to the next [`read_byte`](Self::read_byte).
    pub fn unread_byte(&mut self, byte: u8) {
        self.pushed_back = Some(byte);
    }

    pub fn write_byte(&mut self, byte: u8) -> BfResult<()> {
        self.write_bytes(&[byte])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> BfResult<()> {
        self.output.write_all(bytes)?;
        Ok(())
    }

    pub fn flush(&mut self) -> BfResult<()> {
        self.output.flush()?;
        Ok(())
    }
}

/// Cloneable in-memory output sink.
///
/// Hand one clone to [`Ports`] and keep another to read what was written.
#[derive(Debug, Clone, Default)]
pub struct OutputCapture {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl OutputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for OutputCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

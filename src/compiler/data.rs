//! Initial-memory data literals.
//!
//! A data literal is text with C-like escapes that becomes a list of cell
//! values written into the tape before the program starts:
//!
//! ```text
//! \a \b \f \n \r \t \v \\ \' \" \?   single characters
//! \xH...                             up to 2·W hex digits (W = cell width)
//! \N..                               up to 3 octal digits
//! anything else                      the byte itself
//! ```

use crate::core::{BfError, BfResult, CellWidth};

/// Parse a data literal into cell values.
pub fn parse_data(text: &[u8], width: CellWidth) -> BfResult<Vec<u64>> {
    let mut values = Vec::new();
    let mut i = 0;

    while i < text.len() {
        let c = text[i];
        i += 1;
        if c != b'\\' {
            values.push(c as u64);
            continue;
        }

        let escape_at = i - 1;
        let Some(&e) = text.get(i) else {
            return Err(BfError::data(escape_at, "expected symbol after '\\'"));
        };
        i += 1;

        let value = match e {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n' as u64,
            b'r' => b'\r' as u64,
            b't' => b'\t' as u64,
            b'v' => 0x0B,
            b'\\' | b'\'' | b'"' | b'?' => e as u64,
            b'x' => {
                let mut v: u64 = 0;
                let mut digits = 0;
                while digits < width.bytes() * 2 {
                    let Some(d) = text.get(i).and_then(|b| (*b as char).to_digit(16)) else {
                        break;
                    };
                    v = (v << 4) | d as u64;
                    i += 1;
                    digits += 1;
                }
                v
            }
            b'0'..=b'7' => {
                let mut v = (e - b'0') as u64;
                let mut digits = 1;
                while digits < 3 {
                    match text.get(i) {
                        Some(d @ b'0'..=b'7') => {
                            v = (v << 3) | (d - b'0') as u64;
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                v
            }
            other => {
                return Err(BfError::data(
                    escape_at,
                    format!("unexpected symbol {:?} after '\\'", other as char),
                ));
            }
        };
        values.push(value & width.mask());
    }

    Ok(values)
}

/// Escape cell values back into literal text that [`parse_data`] reads
/// back unchanged at the same width.
pub fn escape_data(values: &[u64], width: CellWidth) -> String {
    let mut out = String::new();
    for &v in values {
        let v = v & width.mask();
        match v {
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            0x0C => out.push_str("\\f"),
            0x0A => out.push_str("\\n"),
            0x0D => out.push_str("\\r"),
            0x09 => out.push_str("\\t"),
            0x0B => out.push_str("\\v"),
            0x5C => out.push_str("\\\\"),
            0x27 => out.push_str("\\'"),
            0x22 => out.push_str("\\\""),
            0x20..=0x7E => out.push(v as u8 as char),
            // Full-width hex so a following hex digit is not absorbed
            _ => out.push_str(&format!("\\x{:0w$x}", v, w = width.bytes() * 2)),
        }
    }
    out
}

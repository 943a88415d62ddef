//! Source front-ends.
//!
//! Every front-end reduces its input to a stream of [`Token`]s (a byte in
//! the dialect alphabet plus where it came from). Translation is the same
//! afterwards regardless of how the tokens were produced:
//!
//! - **Text**: one token per byte
//! - **Packed**: 3-bit codes, most significant bit first, indexing `+-<>.,[]`
//! - **Raster**: a walk over an RGB image where pixel colours map to tokens
//!   and the steering tokens `r`/`R` turn the walk

use crate::core::{BfError, BfResult};

/// A source token and its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub byte: u8,
    /// Byte offset for text, code index for packed input, pixel index for rasters.
    pub offset: usize,
}

/// Decoded RGB image for the raster front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    /// Row-major pixels, `width * height` entries.
    pub pixels: Vec<[u8; 3]>,
}

impl Raster {
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> BfResult<Self> {
        if pixels.len() != width * height {
            return Err(BfError::Config {
                message: format!(
                    "raster has {} pixels, expected {}x{}",
                    pixels.len(),
                    width,
                    height
                ),
            });
        }
        Ok(Self { width, height, pixels })
    }

    fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }
}

/// Colour-to-token mapping for a raster dialect.
pub type ColorMap = &'static [([u8; 3], u8)];

/// Program input in one of the supported source formats.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Text(&'a [u8]),
    Packed(&'a [u8]),
    Raster { image: &'a Raster, colors: ColorMap },
}

impl Source<'_> {
    /// Produce the token stream.
    pub fn tokens(&self) -> BfResult<Vec<Token>> {
        match self {
            Source::Text(text) => Ok(text_tokens(text)),
            Source::Packed(bytes) => Ok(unpack_bits(bytes)),
            Source::Raster { image, colors } => scan_raster(image, colors),
        }
    }
}

pub fn text_tokens(text: &[u8]) -> Vec<Token> {
    text.iter()
        .enumerate()
        .map(|(offset, &byte)| Token { byte, offset })
        .collect()
}

/// Table indexed by a 3-bit packed code.
pub const PACKED_ALPHABET: &[u8; 8] = b"+-<>.,[]";

/// Split a byte stream into 3-bit codes.
///
/// A trailing group of one or two bits is padded with zero bits on the right.
/// Every bit is decoded, so the zero padding [`pack_bits`] leaves in its last
/// byte comes back as trailing `+` tokens (code `000`).
pub fn unpack_bits(bytes: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(bytes.len() * 8 / 3 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    let mut input = bytes.iter();

    loop {
        if bits < 3 {
            if let Some(&b) = input.next() {
                buffer = (buffer << 8) | b as u32;
                bits += 8;
                continue;
            }
        }
        let code = match bits {
            0 => break,
            1 | 2 => {
                let c = (buffer << (3 - bits)) & 0x7;
                bits = 0;
                c
            }
            _ => {
                bits -= 3;
                (buffer >> bits) & 0x7
            }
        };
        buffer &= (1 << bits) - 1;
        tokens.push(Token {
            byte: PACKED_ALPHABET[code as usize],
            offset: tokens.len(),
        });
    }
    tokens
}

/// Pack tokens from `+-<>.,[]` into the 3-bit format. Other bytes are dropped.
///
/// The last byte is filled with zero bits, which [`unpack_bits`] reads as `+`.
pub fn pack_bits(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &b in text {
        let Some(code) = PACKED_ALPHABET.iter().position(|&t| t == b) else {
            continue;
        };
        buffer = (buffer << 3) | code as u32;
        bits += 3;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    if bits > 0 {
        out.push((buffer << (8 - bits)) as u8);
    }
    out
}

/// Walk a raster from the top-left corner heading east.
///
/// Headings: 0 east, 1 north, 2 west, 3 south. `R` turns one step
/// anticlockwise, `r` one step clockwise. The walk ends when it leaves the
/// image. It always does: a step is injective on (pixel, heading) and the
/// starting state has no predecessor, so at most `4 * width * height`
/// pixels are visited.
pub fn scan_raster(image: &Raster, colors: ColorMap) -> BfResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let (mut x, mut y, mut dir) = (0usize, 0usize, 0u8);

    while x < image.width && y < image.height {
        let rgb = image.pixel(x, y);
        if let Some(&(_, token)) = colors.iter().find(|(c, _)| *c == rgb) {
            match token {
                b'R' => dir = (dir + 1) % 4,
                b'r' => dir = (dir + 3) % 4,
                byte => tokens.push(Token { byte, offset: y * image.width + x }),
            }
        }

        let next = match dir {
            0 => Some((x + 1, y)),
            1 => y.checked_sub(1).map(|ny| (x, ny)),
            2 => x.checked_sub(1).map(|nx| (nx, y)),
            _ => Some((x, y + 1)),
        };
        match next {
            Some((nx, ny)) => {
                x = nx;
                y = ny;
            }
            None => break,
        }
    }
    Ok(tokens)
}

//! Loller and ExtLoller: Brainfuck and Extended Type I drawn as images.
//!
//! Each pixel colour is one token; `r` and `R` pixels steer the scan
//! clockwise and anticlockwise. Decoding the image file itself is up to
//! the caller, which hands over a [`Raster`](crate::compiler::Raster).

use super::extended::EXTENDED;
use super::vanilla::VANILLA;
use super::{Dialect, DialectKind, FrontEnd};
use crate::compiler::ColorMap;

pub const LOLLER_COLORS: ColorMap = &[
    ([255, 0, 0], b'>'),
    ([128, 0, 0], b'<'),
    ([0, 255, 0], b'+'),
    ([0, 128, 0], b'-'),
    ([0, 0, 255], b'.'),
    ([0, 0, 128], b','),
    ([255, 255, 0], b'['),
    ([128, 128, 0], b']'),
    ([0, 255, 255], b'r'),
    ([0, 128, 128], b'R'),
];

pub const EXTLOLLER_COLORS: ColorMap = &[
    ([255, 0, 0], b'>'),
    ([128, 0, 0], b'<'),
    ([0, 255, 0], b'+'),
    ([0, 128, 0], b'-'),
    ([0, 0, 255], b'.'),
    ([0, 0, 128], b','),
    ([255, 255, 0], b'['),
    ([128, 128, 0], b']'),
    ([0, 255, 255], b'r'),
    ([0, 128, 128], b'R'),
    ([0, 192, 64], b'@'),
    ([192, 64, 0], b'$'),
    ([64, 0, 192], b'!'),
    ([64, 192, 0], b'}'),
    ([192, 0, 64], b'{'),
    ([0, 64, 192], b'~'),
    ([0, 192, 0], b'^'),
    ([192, 0, 0], b'&'),
    ([0, 0, 192], b'|'),
];

pub const LOLLER: Dialect = Dialect {
    kind: DialectKind::Loller,
    name: "Loller",
    front_end: FrontEnd::Raster(LOLLER_COLORS),
    emit: None,
    ..VANILLA
};

pub const EXTLOLLER: Dialect = Dialect {
    kind: DialectKind::Extloller,
    name: "ExtLoller",
    front_end: FrontEnd::Raster(EXTLOLLER_COLORS),
    emit: None,
    emit_prelude: "",
    ..EXTENDED
};

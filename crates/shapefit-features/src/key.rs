//! Canonical feature keys.
//!
//! A key is the ASCII string
//!
//! ```text
//! [kind][width][height][offset_x][offset_y][pattern ...]
//! ```
//!
//! where the five header characters are decimal digits and the pattern is
//! one cell symbol per covered cell, row-major. The header is always part of
//! the key: two regions with the same cells but a different size or position
//! must never share an index slot.
//!
//! Every byte of a valid key belongs to a 23-symbol alphabet (ten digits, the
//! blank, and twelve piece letters), which is what lets
//! [`KeyTrie`](crate::KeyTrie) use fixed-size child tables.

use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shapefit_board::{Cell, MAX_CELLS, MAX_DIMENSION};

use crate::{ShapeDescriptor, ShapeFeature, ShapeKind};

/// Length of the geometry header.
pub const HEADER_LEN: usize = 5;
/// Length of the longest possible key (header plus a full 9×9 pattern).
pub const MAX_KEY_LEN: usize = HEADER_LEN + MAX_CELLS;

const KIND_POS: usize = 0;
const WIDTH_POS: usize = 1;
const HEIGHT_POS: usize = 2;
const OFFSET_X_POS: usize = 3;
const OFFSET_Y_POS: usize = 4;

/// Number of distinct symbols a key may contain.
pub const ALPHABET_LEN: usize = 23;
/// Every symbol a key may contain, in symbol-index order.
pub const ALPHABET: [u8; ALPHABET_LEN] = *b"0123456789 PNBRQKpnbrqk";

const NOT_IN_ALPHABET: u8 = u8::MAX;

const SYMBOL_INDEX: [u8; 256] = {
    let mut table = [NOT_IN_ALPHABET; 256];
    let mut i: u8 = 0;
    while (i as usize) < ALPHABET_LEN {
        table[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    table
};

/// Returns the alphabet position of a key byte, if it belongs to the alphabet.
#[must_use]
pub const fn symbol_index(byte: u8) -> Option<usize> {
    match SYMBOL_INDEX[byte as usize] {
        NOT_IN_ALPHABET => None,
        index => Some(index as usize),
    }
}

/// Reasons a string is not a valid feature key.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidFeatureEncoding {
    #[display("key of length {len} is shorter than the {HEADER_LEN}-character header")]
    MissingHeader { len: usize },
    #[display("key of length {len} exceeds the maximum of {MAX_KEY_LEN}")]
    TooLong { len: usize },
    #[display("header position {position} holds {symbol:?}, expected a digit")]
    NonDigitHeader { position: usize, symbol: char },
    #[display("unknown shape kind {digit}")]
    UnknownShapeKind { digit: u8 },
    #[display("region {width}x{height} at ({offset_x}, {offset_y}) is outside a 9x9 board")]
    GeometryOutOfRange {
        width: u8,
        height: u8,
        offset_x: u8,
        offset_y: u8,
    },
    #[display("pattern has {found} cells, header declares {expected}")]
    PatternLengthMismatch { expected: usize, found: usize },
    #[display("pattern position {position} holds unknown symbol {symbol:?}")]
    UnknownSymbol { position: usize, symbol: char },
}

/// Canonical serialized form of a [`ShapeFeature`].
///
/// Keys are only built from features or through validating parsers, so every
/// key holds a well-formed header and a pattern of the declared length.
///
/// # Example
///
/// ```
/// use shapefit_board::Board;
/// use shapefit_features::{FeatureKey, ShapeDescriptor, ShapeFeature};
///
/// let board: Board = "PN/.k".parse().unwrap();
/// let feature = ShapeFeature::extract(&board, ShapeDescriptor::rectangle(1, 2, 1, 0));
/// let key = FeatureKey::from_feature(&feature);
/// assert_eq!(key.to_string(), "01210Nk");
///
/// let parsed: FeatureKey = "01210Nk".parse().unwrap();
/// assert_eq!(parsed, key);
/// assert_eq!(parsed.to_feature(), feature);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(ArrayVec<u8, MAX_KEY_LEN>);

impl FeatureKey {
    /// Serializes a feature into its key.
    #[must_use]
    pub fn from_feature(feature: &ShapeFeature) -> Self {
        let d = feature.descriptor();
        let mut bytes = ArrayVec::new();
        bytes.push(b'0' + d.kind.as_digit());
        bytes.push(b'0' + d.width);
        bytes.push(b'0' + d.height);
        bytes.push(b'0' + d.offset_x);
        bytes.push(b'0' + d.offset_y);
        bytes.extend(feature.pattern().iter().map(|cell| cell.as_byte()));
        Self(bytes)
    }

    /// Key bytes, header first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alphabet positions of the key bytes, in order.
    pub fn symbols(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .map(|&b| usize::from(SYMBOL_INDEX[usize::from(b)]))
    }

    /// Decodes the geometry header.
    #[must_use]
    pub fn descriptor(&self) -> ShapeDescriptor {
        let digit = |pos: usize| self.0[pos] - b'0';
        ShapeDescriptor {
            kind: ShapeKind::from_digit(digit(KIND_POS)).unwrap_or_default(),
            width: digit(WIDTH_POS),
            height: digit(HEIGHT_POS),
            offset_x: digit(OFFSET_X_POS),
            offset_y: digit(OFFSET_Y_POS),
        }
    }

    /// Decodes the key back into the feature it was built from.
    #[must_use]
    pub fn to_feature(&self) -> ShapeFeature {
        let pattern = self.0[HEADER_LEN..]
            .iter()
            .map(|&b| Cell::from_char(char::from(b)).unwrap_or_default())
            .collect();
        ShapeFeature::from_parts(self.descriptor(), pattern)
    }
}

impl From<&ShapeFeature> for FeatureKey {
    fn from(feature: &ShapeFeature) -> Self {
        Self::from_feature(feature)
    }
}

impl FromStr for FeatureKey {
    type Err = InvalidFeatureEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len < HEADER_LEN {
            return Err(InvalidFeatureEncoding::MissingHeader { len });
        }
        if len > MAX_KEY_LEN {
            return Err(InvalidFeatureEncoding::TooLong { len });
        }

        let mut header = [0; HEADER_LEN];
        for (position, symbol) in s.chars().take(HEADER_LEN).enumerate() {
            let digit = symbol
                .to_digit(10)
                .ok_or(InvalidFeatureEncoding::NonDigitHeader { position, symbol })?;
            #[expect(clippy::cast_possible_truncation)]
            let digit = digit as u8;
            header[position] = digit;
        }

        let kind = ShapeKind::from_digit(header[KIND_POS]).ok_or(
            InvalidFeatureEncoding::UnknownShapeKind {
                digit: header[KIND_POS],
            },
        )?;
        let descriptor = ShapeDescriptor {
            kind,
            width: header[WIDTH_POS],
            height: header[HEIGHT_POS],
            offset_x: header[OFFSET_X_POS],
            offset_y: header[OFFSET_Y_POS],
        };
        let in_range = |offset: u8, extent: u8| extent >= 1 && offset + extent <= MAX_DIMENSION;
        if !in_range(descriptor.offset_x, descriptor.width)
            || !in_range(descriptor.offset_y, descriptor.height)
        {
            return Err(InvalidFeatureEncoding::GeometryOutOfRange {
                width: descriptor.width,
                height: descriptor.height,
                offset_x: descriptor.offset_x,
                offset_y: descriptor.offset_y,
            });
        }

        let found = len - HEADER_LEN;
        if found != descriptor.area() {
            return Err(InvalidFeatureEncoding::PatternLengthMismatch {
                expected: descriptor.area(),
                found,
            });
        }

        let mut bytes = header.iter().map(|d| b'0' + d).collect::<ArrayVec<u8, MAX_KEY_LEN>>();
        for (position, symbol) in s.chars().skip(HEADER_LEN).enumerate() {
            // '.' is a display alias only; keys spell blanks as ' '
            let cell = Cell::from_char(symbol)
                .filter(|_| symbol != '.')
                .ok_or(InvalidFeatureEncoding::UnknownSymbol { position, symbol })?;
            bytes.push(cell.as_byte());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            fmt::Write::write_char(f, char::from(b))?;
        }
        Ok(())
    }
}

impl Serialize for FeatureKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeatureKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid feature key {s:?}: {e}")))
    }
}

//! Shape descriptors and shape features.

use std::fmt;

use arrayvec::ArrayVec;
use shapefit_board::{Board, Cell, MAX_CELLS};

/// Kind of sub-region.
///
/// Only axis-aligned rectangles are produced today. The kind is still part of
/// every canonical key so other region shapes can be added without colliding
/// with existing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum ShapeKind {
    #[default]
    Rectangle = 0,
}

impl ShapeKind {
    /// Returns the header digit of this kind.
    #[must_use]
    pub const fn as_digit(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(ShapeKind::Rectangle),
            _ => None,
        }
    }
}

/// Geometry of a sub-region within its parent board.
///
/// Every value is a single decimal digit, matching the key header layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    pub width: u8,
    pub height: u8,
    pub offset_x: u8,
    pub offset_y: u8,
}

impl ShapeDescriptor {
    #[must_use]
    pub const fn rectangle(width: u8, height: u8, offset_x: u8, offset_y: u8) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            width,
            height,
            offset_x,
            offset_y,
        }
    }

    /// Number of cells covered by the region.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns `true` if the region lies entirely inside `board`.
    #[must_use]
    pub fn fits_in(&self, board: &Board) -> bool {
        self.width >= 1
            && self.height >= 1
            && u16::from(self.offset_x) + u16::from(self.width) <= u16::from(board.width())
            && u16::from(self.offset_y) + u16::from(self.height) <= u16::from(board.height())
    }
}

/// A sub-region of a board: its geometry plus the cells it covers.
///
/// Equality and hashing cover the full descriptor, so the same pattern at a
/// different size or position is a different feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeFeature {
    descriptor: ShapeDescriptor,
    pattern: ArrayVec<Cell, MAX_CELLS>,
}

impl ShapeFeature {
    /// Copies the cells covered by `descriptor` out of `board`.
    ///
    /// Cells are taken row-major relative to the region's top-left corner.
    ///
    /// # Panics
    ///
    /// Panics if the region does not fit inside the board.
    #[must_use]
    pub fn extract(board: &Board, descriptor: ShapeDescriptor) -> Self {
        assert!(
            descriptor.fits_in(board),
            "region {descriptor:?} does not fit in a {}x{} board",
            board.width(),
            board.height()
        );
        let x0 = usize::from(descriptor.offset_x);
        let width = usize::from(descriptor.width);
        let pattern = (descriptor.offset_y..descriptor.offset_y + descriptor.height)
            .flat_map(|y| board.row(y)[x0..][..width].iter().copied())
            .collect();
        Self {
            descriptor,
            pattern,
        }
    }

    /// Builds a feature from parts already known to be consistent.
    pub(crate) fn from_parts(
        descriptor: ShapeDescriptor,
        pattern: ArrayVec<Cell, MAX_CELLS>,
    ) -> Self {
        debug_assert_eq!(descriptor.area(), pattern.len());
        Self {
            descriptor,
            pattern,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    /// Covered cells in row-major order.
    #[must_use]
    pub fn pattern(&self) -> &[Cell] {
        &self.pattern
    }

    /// Returns `true` if every covered cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pattern.iter().all(|c| c.is_blank())
    }
}

/// Draws the pattern as a grid, one line per row.
impl fmt::Display for ShapeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::from(self.descriptor.width);
        for (y, row) in self.pattern.chunks(width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.display_char())?;
            }
        }
        Ok(())
    }
}

//! Exhaustive rectangular decomposition of boards.
//!
//! A `W×H` board has `(W(W+1)/2)·(H(H+1)/2)` axis-aligned rectangles. The
//! decomposer yields all of them except the full board itself and except
//! regions whose cells are all blank.
//!
//! # Order
//!
//! Regions come out in a fixed order so that feature IDs assigned by
//! [`FeatureIndex`](crate::FeatureIndex) are reproducible:
//!
//! 1. width, descending
//! 2. height, descending
//! 3. `offset_y`, ascending
//! 4. `offset_x`, ascending

use shapefit_board::Board;

use crate::{ShapeDescriptor, ShapeFeature};

/// Total number of rectangles in a `width×height` board, full board included.
///
/// # Examples
///
/// ```
/// use shapefit_features::decompose;
///
/// assert_eq!(decompose::region_count(2, 2), 9);
/// assert_eq!(decompose::region_count(8, 8), 1296);
/// ```
#[must_use]
pub fn region_count(width: u8, height: u8) -> usize {
    let w = usize::from(width);
    let h = usize::from(height);
    (w * (w + 1) / 2) * (h * (h + 1) / 2)
}

/// Returns every region geometry of `board` in decomposition order.
///
/// The full board and blank regions are still included here; see [`regions`].
pub fn descriptors(board: &Board) -> impl Iterator<Item = ShapeDescriptor> + use<> {
    let board_width = board.width();
    let board_height = board.height();
    (1..=board_width).rev().flat_map(move |width| {
        (1..=board_height).rev().flat_map(move |height| {
            (0..=board_height - height).flat_map(move |offset_y| {
                (0..=board_width - width)
                    .map(move |offset_x| ShapeDescriptor::rectangle(width, height, offset_x, offset_y))
            })
        })
    })
}

/// Lazily yields the shape features of `board`.
///
/// # Example
///
/// ```
/// use shapefit_board::Board;
/// use shapefit_features::decompose;
///
/// let board: Board = "PN/BR".parse().unwrap();
/// let features = decompose::regions(&board).collect::<Vec<_>>();
/// assert_eq!(features.len(), 8);
/// // the widest, tallest proper sub-regions come first
/// assert_eq!(features[0].to_string(), "PN");
/// ```
pub fn regions(board: &Board) -> impl Iterator<Item = ShapeFeature> + '_ {
    let board_width = board.width();
    let board_height = board.height();
    descriptors(board)
        .filter(move |d| !(d.width == board_width && d.height == board_height))
        .map(move |d| ShapeFeature::extract(board, d))
        .filter(|feature| !feature.is_blank())
}

/// Collects [`regions`] into a vector.
#[must_use]
pub fn decompose(board: &Board) -> Vec<ShapeFeature> {
    regions(board).collect()
}

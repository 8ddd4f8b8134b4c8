//! Boards and labeled samples.
//!
//! This crate owns the input side of the training pipeline:
//!
//! - [`Cell`] - categorical cell values (blank plus the twelve chess pieces)
//! - [`Board`] - a fixed-size grid of cells, at most 9×9
//! - [`BoardSample`] - a board paired with its known score
//! - [`fen`] - FEN placement and evaluation label parsing
//! - [`ingest`] - reading `FEN,Evaluation` records from CSV
//!
//! Malformed input is rejected here, so the feature and training crates only
//! ever see well-formed boards.

use std::path::PathBuf;

pub use self::{board::*, cell::*};

mod board;
mod cell;
pub mod fen;
pub mod ingest;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("board dimensions {width}x{height} out of range (1..={MAX_DIMENSION})")]
    DimensionOutOfRange { width: u8, height: u8 },
    #[display("expected {expected} cells, found {found}")]
    CellCountMismatch { expected: usize, found: usize },
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("unknown cell symbol {symbol:?}")]
    UnknownCell { symbol: char },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FenError {
    #[display("empty piece placement")]
    Empty,
    #[display("expected 8 ranks, found {found}")]
    RankCount { found: usize },
    #[display("rank {rank} covers {found} files, expected 8")]
    FileCount { rank: usize, found: usize },
    #[display("unknown symbol {symbol:?} in rank {rank}")]
    UnknownSymbol { rank: usize, symbol: char },
    #[display("invalid board: {_0}")]
    Board(BoardError),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LabelError {
    #[display("invalid evaluation {text:?}")]
    InvalidNumber { text: String },
    #[display("invalid mate evaluation {text:?}")]
    InvalidMate { text: String },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum IngestError {
    #[display("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("record {record}: {source}")]
    Csv { record: usize, source: csv::Error },
    #[display("record {record}: expected position and evaluation fields")]
    MissingField { record: usize },
    #[display("record {record}: {source}")]
    Fen { record: usize, source: FenError },
    #[display("record {record}: {source}")]
    Label { record: usize, source: LabelError },
}

//! Parsing of FEN piece placements and engine evaluation labels.

use crate::{Board, Cell, FenError, LabelError};

/// Number of ranks and files on a chess board.
pub const CHESS_BOARD_SIZE: u8 = 8;

/// Label assigned to positions with a forced mate.
///
/// Mate evaluations (`#+3`, `#-1`) have no centipawn value, so they map to
/// this sentinel (negated for the side being mated) before clamping.
pub const MATE_SCORE: f32 = 9999.0;

/// Parses the piece placement field of a FEN string into an 8×8 board.
///
/// Only the first whitespace-separated field is read, so full FEN strings
/// (with side to move, castling rights, ...) are accepted too. Rank 8 becomes
/// the top row.
///
/// # Examples
///
/// ```
/// use shapefit_board::{Cell, fen};
///
/// let board = fen::parse_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
/// assert_eq!(board.cell(4, 0), Cell::BlackKing);
/// assert_eq!(board.cell(0, 7), Cell::WhiteRook);
/// assert_eq!(board.cell(3, 3), Cell::Blank);
/// ```
pub fn parse_placement(fen: &str) -> Result<Board, FenError> {
    let placement = fen.split_whitespace().next().ok_or(FenError::Empty)?;
    let ranks = placement.split('/').collect::<Vec<_>>();
    if ranks.len() != usize::from(CHESS_BOARD_SIZE) {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    let mut cells = Vec::with_capacity(usize::from(CHESS_BOARD_SIZE * CHESS_BOARD_SIZE));
    for (rank, text) in ranks.iter().enumerate() {
        let mut files = 0;
        for symbol in text.chars() {
            if let Some(run) = symbol.to_digit(10) {
                if run == 0 {
                    return Err(FenError::UnknownSymbol { rank, symbol });
                }
                let run = run as usize;
                files += run;
                cells.extend(std::iter::repeat_n(Cell::Blank, run));
            } else {
                let cell =
                    Cell::from_piece_char(symbol).ok_or(FenError::UnknownSymbol { rank, symbol })?;
                files += 1;
                cells.push(cell);
            }
        }
        if files != usize::from(CHESS_BOARD_SIZE) {
            return Err(FenError::FileCount { rank, found: files });
        }
    }

    Board::new(CHESS_BOARD_SIZE, CHESS_BOARD_SIZE, cells).map_err(FenError::Board)
}

/// Parses an engine evaluation into a numeric label.
///
/// Accepts signed or unsigned numbers (`+56`, `-120`, `0`, `13.5`) and mate
/// notation (`#+3`, `#-2`, `#4`), which maps to `±MATE_SCORE`.
///
/// # Examples
///
/// ```
/// use shapefit_board::fen::{self, MATE_SCORE};
///
/// assert_eq!(fen::parse_label("+56").unwrap(), 56.0);
/// assert_eq!(fen::parse_label("-120").unwrap(), -120.0);
/// assert_eq!(fen::parse_label("#+3").unwrap(), MATE_SCORE);
/// assert_eq!(fen::parse_label("#-1").unwrap(), -MATE_SCORE);
/// ```
pub fn parse_label(text: &str) -> Result<f32, LabelError> {
    let text = text.trim();
    if let Some(mate) = text.strip_prefix('#') {
        let (sign, distance) = match mate.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, mate.strip_prefix('+').unwrap_or(mate)),
        };
        distance
            .parse::<u32>()
            .map_err(|_| LabelError::InvalidMate {
                text: text.to_owned(),
            })?;
        return Ok(sign * MATE_SCORE);
    }

    let value = text.parse::<f32>().map_err(|_| LabelError::InvalidNumber {
        text: text.to_owned(),
    })?;
    if !value.is_finite() {
        return Err(LabelError::InvalidNumber {
            text: text.to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = parse_placement("8/8/8/8/8/8/8/8").unwrap();
        assert!(board.cells().iter().all(|c| c.is_blank()));
    }

    #[test]
    fn test_mixed_runs() {
        let board = parse_placement("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 1 1").unwrap();
        assert_eq!(
            board.row(0),
            &[
                Cell::BlackRook,
                Cell::Blank,
                Cell::Blank,
                Cell::Blank,
                Cell::BlackKing,
                Cell::Blank,
                Cell::Blank,
                Cell::BlackRook,
            ]
        );
        assert_eq!(board.cell(4, 7), Cell::WhiteKing);
    }

    #[test]
    fn test_rank_count_error() {
        let err = parse_placement("8/8/8").unwrap_err();
        assert!(matches!(err, FenError::RankCount { found: 3 }));
    }

    #[test]
    fn test_file_count_error() {
        let err = parse_placement("9/8/8/8/8/8/8/8").unwrap_err();
        assert!(matches!(err, FenError::FileCount { rank: 0, found: 9 }));

        let err = parse_placement("8/8/8/8/8/8/8/7").unwrap_err();
        assert!(matches!(err, FenError::FileCount { rank: 7, found: 7 }));
    }

    #[test]
    fn test_unknown_symbol_error() {
        let err = parse_placement("8/8/8/3x4/8/8/8/8").unwrap_err();
        assert!(matches!(
            err,
            FenError::UnknownSymbol {
                rank: 3,
                symbol: 'x'
            }
        ));
        let err = parse_placement("8/8/8/08/8/8/8/8").unwrap_err();
        assert!(matches!(err, FenError::UnknownSymbol { symbol: '0', .. }));
    }

    #[test]
    fn test_empty_field() {
        assert!(matches!(parse_placement("   "), Err(FenError::Empty)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(parse_label("0").unwrap(), 0.0);
        assert_eq!(parse_label(" 12 ").unwrap(), 12.0);
        assert_eq!(parse_label("-0").unwrap(), 0.0);
        assert_eq!(parse_label("#4").unwrap(), MATE_SCORE);
        assert_eq!(parse_label("#+0").unwrap(), MATE_SCORE);
    }

    #[test]
    fn test_label_errors() {
        assert!(matches!(
            parse_label("abc"),
            Err(LabelError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_label("inf"),
            Err(LabelError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_label("#+"),
            Err(LabelError::InvalidMate { .. })
        ));
        assert!(matches!(
            parse_label("#x"),
            Err(LabelError::InvalidMate { .. })
        ));
    }
}

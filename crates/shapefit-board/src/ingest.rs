//! Loading labeled positions from delimited text.
//!
//! Each record holds a FEN placement in its first field and an evaluation in
//! its last field (`FEN,Evaluation`, as in the common `chessData.csv` dumps).
//! An optional header row whose first field is `FEN` is skipped.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, Trim};
use log::{debug, info};

use crate::{BoardSample, IngestError, fen};

/// Reads samples from CSV text.
///
/// Stops after `limit` samples when given. Errors carry the 1-based record
/// number so a bad line in a large dump can be found.
///
/// # Example
///
/// ```
/// use shapefit_board::ingest;
///
/// let data = "FEN,Evaluation\n8/8/8/8/8/8/8/K6k w - - 0 1,+12\n";
/// let samples = ingest::read_samples(data.as_bytes(), None).unwrap();
/// assert_eq!(samples.len(), 1);
/// assert_eq!(samples[0].label(), 12.0);
/// ```
pub fn read_samples<R>(reader: R, limit: Option<usize>) -> Result<Vec<BoardSample>, IngestError>
where
    R: io::Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let limit = limit.unwrap_or(usize::MAX);
    let mut samples = vec![];
    for (i, record) in reader.records().enumerate() {
        if samples.len() >= limit {
            break;
        }
        let record_number = i + 1;
        let record = record.map_err(|source| IngestError::Csv {
            record: record_number,
            source,
        })?;

        let placement = record.get(0).unwrap_or_default();
        if i == 0 && placement.eq_ignore_ascii_case("fen") {
            debug!("skipping header row");
            continue;
        }
        if record.len() < 2 {
            return Err(IngestError::MissingField {
                record: record_number,
            });
        }
        let evaluation = record.get(record.len() - 1).unwrap_or_default();

        let board = fen::parse_placement(placement).map_err(|source| IngestError::Fen {
            record: record_number,
            source,
        })?;
        let label = fen::parse_label(evaluation).map_err(|source| IngestError::Label {
            record: record_number,
            source,
        })?;
        samples.push(BoardSample::new(board, label));
    }

    Ok(samples)
}

/// Reads samples from a CSV file. See [`read_samples`].
pub fn load_samples<P>(path: P, limit: Option<usize>) -> Result<Vec<BoardSample>, IngestError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_owned(),
        source,
    })?;
    let samples = read_samples(io::BufReader::new(file), limit)?;
    info!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::MATE_SCORE;

    const DATA: &str = "\
FEN,Evaluation
rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1,-10
rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2,+56
6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1,#+1
";

    #[test]
    fn test_reads_all_records_and_skips_header() {
        let samples = read_samples(DATA.as_bytes(), None).unwrap();
        let labels = samples.iter().map(BoardSample::label).collect::<Vec<_>>();
        assert_eq!(labels, vec![-10.0, 56.0, MATE_SCORE]);
    }

    #[test]
    fn test_limit() {
        let samples = read_samples(DATA.as_bytes(), Some(2)).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_no_header() {
        let data = "8/8/8/8/8/8/8/K6k w - - 0 1,0\n";
        let samples = read_samples(data.as_bytes(), None).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label(), 0.0);
    }

    #[test]
    fn test_bad_fen_reports_record_number() {
        let data = "FEN,Evaluation\n8/8/8/8/8/8/8/K6k w - - 0 1,0\n8/8/8,5\n";
        let err = read_samples(data.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::Fen { record: 3, .. }));
    }

    #[test]
    fn test_bad_label_reports_record_number() {
        let data = "8/8/8/8/8/8/8/K6k w - - 0 1,abc\n";
        let err = read_samples(data.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::Label { record: 1, .. }));
    }

    #[test]
    fn test_missing_field() {
        let data = "8/8/8/8/8/8/8/K6k w - - 0 1\n";
        let err = read_samples(data.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::MissingField { record: 1 }));
    }
}

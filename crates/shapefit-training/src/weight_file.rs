//! Flat weight files.
//!
//! A weight file is the raw sequence of IEEE-754 `f32` values in
//! little-endian byte order, one per feature ID, with no header. The file
//! carries no feature keys, so it is only meaningful next to the index that
//! produced it.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::warn;

use crate::weights::WeightVector;

const WEIGHT_SIZE: usize = size_of::<f32>();

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WeightFileError {
    #[display("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("weight data of {len} bytes is not a whole number of f32 values")]
    Misaligned { len: usize },
    #[display("weight file holds {found} weights, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Writes `weights` as little-endian `f32` values.
pub fn write_weights<W>(mut writer: W, weights: &[f32]) -> io::Result<()>
where
    W: Write,
{
    for w in weights {
        writer.write_all(&w.to_le_bytes())?;
    }
    writer.flush()
}

/// Decodes little-endian `f32` values.
pub fn decode_weights(bytes: &[u8]) -> Result<Vec<f32>, WeightFileError> {
    if bytes.len() % WEIGHT_SIZE != 0 {
        return Err(WeightFileError::Misaligned { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(WEIGHT_SIZE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

pub fn save_weights<P>(path: P, weights: &[f32]) -> Result<(), WeightFileError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let io_error = |source| WeightFileError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_weights(BufWriter::new(file), weights).map_err(io_error)
}

/// Loads a weight file that must hold exactly `expected_len` weights.
///
/// Nothing is returned unless the whole file is valid.
pub fn load_weights<P>(path: P, expected_len: usize) -> Result<WeightVector, WeightFileError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| WeightFileError::Io {
        path: path.to_owned(),
        source,
    })?;
    let weights = decode_weights(&bytes)?;
    if weights.len() != expected_len {
        return Err(WeightFileError::LengthMismatch {
            expected: expected_len,
            found: weights.len(),
        });
    }
    Ok(WeightVector::from(weights))
}

/// Like [`load_weights`], but falls back to zeros (with a warning) on any error.
pub fn load_weights_or_zeroed<P>(path: P, expected_len: usize) -> WeightVector
where
    P: AsRef<Path>,
{
    load_weights(path, expected_len).unwrap_or_else(|e| {
        warn!("ignoring weight file: {e}; starting from zero weights");
        WeightVector::zeroed(expected_len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shapefit-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_save_then_load_is_bit_identical() {
        let path = temp_path("roundtrip.bin");
        let weights = [0.0, -0.0, 1.5, -3.25e-7, f32::MAX, f32::MIN_POSITIVE, 12345.5];
        save_weights(&path, &weights).unwrap();

        let loaded = load_weights(&path, weights.len()).unwrap();
        let bits = |w: &[f32]| w.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(loaded.as_slice()), bits(&weights));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 28);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_little_endian_layout() {
        let mut bytes = vec![];
        write_weights(&mut bytes, &[1.0]).unwrap();
        assert_eq!(bytes, [0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let path = temp_path("mismatch.bin");
        save_weights(&path, &[1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            load_weights(&path, 4),
            Err(WeightFileError::LengthMismatch {
                expected: 4,
                found: 3
            })
        ));
        let fallback = load_weights_or_zeroed(&path, 4);
        assert_eq!(fallback.as_slice(), &[0.0; 4]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_misaligned_is_rejected() {
        assert!(matches!(
            decode_weights(&[0, 0, 0, 0, 1]),
            Err(WeightFileError::Misaligned { len: 5 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = temp_path("does-not-exist.bin");
        assert!(matches!(
            load_weights(&path, 1),
            Err(WeightFileError::Io { .. })
        ));
        assert_eq!(load_weights_or_zeroed(&path, 2).as_slice(), &[0.0, 0.0]);
    }
}

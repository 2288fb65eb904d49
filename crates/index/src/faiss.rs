//! Codec for the faiss `IndexFlat` on-disk layout.
//!
//! Layout (little-endian):
//!
//! ```text
//! fourcc   [u8; 4]  "IxF2" (L2), "IxFI" (inner product) or "IxFl" (legacy)
//! d        i32      dimension
//! ntotal   i64      number of rows
//! dummy    i64      1 << 20
//! dummy    i64      1 << 20
//! trained  u8       is_trained
//! metric   i32      0 = inner product, 1 = L2
//! count    u64      number of floats that follow (d * ntotal)
//! codes    f32 * count
//! ```
//!
//! Only the flat family is understood; any other index type is rejected.

use crate::flat::FlatIndex;
use crate::types::Metric;
use crate::vector_index::VectorIndex;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use neighbors_core::{AppError, AppResult};
use std::io::{Cursor, Read, Write};
use std::path::Path;

const FOURCC_FLAT_L2: &[u8; 4] = b"IxF2";
const FOURCC_FLAT_IP: &[u8; 4] = b"IxFI";
const FOURCC_FLAT_LEGACY: &[u8; 4] = b"IxFl";

/// Value faiss writes into the two unused header slots.
const HEADER_DUMMY: i64 = 1 << 20;

/// Read a serialized index from disk.
pub fn read_index(path: &Path) -> AppResult<Box<dyn VectorIndex>> {
    let bytes = std::fs::read(path).map_err(|e| AppError::file(path, e))?;
    let index = decode(&bytes).map_err(|e| match e {
        AppError::Format(msg) => AppError::Format(format!("{:?}: {}", path, msg)),
        other => other,
    })?;

    tracing::debug!(
        "Decoded {:?}: {} rows, dimension {}, {:?}",
        path,
        index.len(),
        index.dim(),
        index.metric()
    );
    Ok(Box::new(index))
}

/// Write a flat index to disk in the faiss layout.
pub fn write_index(path: &Path, index: &FlatIndex) -> AppResult<()> {
    let bytes = encode(index)?;
    std::fs::write(path, bytes).map_err(|e| AppError::file(path, e))
}

/// Decode a flat index from its serialized bytes.
pub fn decode(bytes: &[u8]) -> AppResult<FlatIndex> {
    let mut cursor = Cursor::new(bytes);

    let mut fourcc = [0u8; 4];
    cursor
        .read_exact(&mut fourcc)
        .map_err(|_| truncated("index type"))?;

    let expected_metric = match &fourcc {
        FOURCC_FLAT_L2 => Some(Metric::L2),
        FOURCC_FLAT_IP => Some(Metric::InnerProduct),
        FOURCC_FLAT_LEGACY => None,
        other => {
            return Err(AppError::Format(format!(
                "unsupported index type '{}'",
                String::from_utf8_lossy(other)
            )))
        }
    };

    let dim = cursor
        .read_i32::<LittleEndian>()
        .map_err(|_| truncated("dimension"))?;
    let ntotal = cursor
        .read_i64::<LittleEndian>()
        .map_err(|_| truncated("row count"))?;
    for _ in 0..2 {
        cursor
            .read_i64::<LittleEndian>()
            .map_err(|_| truncated("header"))?;
    }
    let _is_trained = cursor.read_u8().map_err(|_| truncated("header"))?;
    let metric_code = cursor
        .read_i32::<LittleEndian>()
        .map_err(|_| truncated("metric"))?;

    if dim <= 0 {
        return Err(AppError::Format(format!("invalid dimension {}", dim)));
    }
    if ntotal < 0 {
        return Err(AppError::Format(format!("invalid row count {}", ntotal)));
    }

    let metric = Metric::from_code(metric_code).ok_or_else(|| {
        AppError::Format(format!("unsupported metric type {}", metric_code))
    })?;
    if let Some(expected) = expected_metric {
        if expected != metric {
            return Err(AppError::Format(format!(
                "index type '{}' declares metric {:?}",
                String::from_utf8_lossy(&fourcc),
                metric
            )));
        }
    }

    let dim = dim as usize;
    let expected_count = (ntotal as u64)
        .checked_mul(dim as u64)
        .ok_or_else(|| AppError::Format("row count overflows".to_string()))?;

    let count = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| truncated("vector count"))?;
    if count != expected_count {
        return Err(AppError::Format(format!(
            "expected {} floats for {} rows of dimension {}, found {}",
            expected_count, ntotal, dim, count
        )));
    }

    let remaining = (bytes.len() as u64).saturating_sub(cursor.position());
    if count.saturating_mul(4) > remaining {
        return Err(truncated("vector data"));
    }

    let mut codes = vec![0f32; count as usize];
    cursor
        .read_f32_into::<LittleEndian>(&mut codes)
        .map_err(|_| truncated("vector data"))?;

    FlatIndex::from_codes(dim, metric, codes)
}

/// Encode a flat index into the faiss layout.
pub fn encode(index: &FlatIndex) -> AppResult<Vec<u8>> {
    let codes = index.codes();
    let mut out = Vec::with_capacity(45 + codes.len() * 4);

    let fourcc = match index.metric() {
        Metric::L2 => FOURCC_FLAT_L2,
        Metric::InnerProduct => FOURCC_FLAT_IP,
    };
    let dim = i32::try_from(index.dim())
        .map_err(|_| AppError::Format(format!("dimension {} too large", index.dim())))?;

    out.write_all(fourcc)?;
    out.write_i32::<LittleEndian>(dim)?;
    out.write_i64::<LittleEndian>(index.len() as i64)?;
    out.write_i64::<LittleEndian>(HEADER_DUMMY)?;
    out.write_i64::<LittleEndian>(HEADER_DUMMY)?;
    out.write_u8(1)?;
    out.write_i32::<LittleEndian>(index.metric().code())?;
    out.write_u64::<LittleEndian>(codes.len() as u64)?;
    for &value in codes {
        out.write_f32::<LittleEndian>(value)?;
    }

    Ok(out)
}

fn truncated(what: &str) -> AppError {
    AppError::Format(format!("truncated index file while reading {}", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> FlatIndex {
        FlatIndex::from_codes(3, Metric::L2, vec![0.5, 1.0, -2.0, 3.0, 0.0, 0.25]).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&sample()).unwrap();

        assert_eq!(&bytes[0..4], b"IxF2");
        assert_eq!(i32::from_le_bytes(bytes[4..8].try_into().unwrap()), 3);
        assert_eq!(i64::from_le_bytes(bytes[8..16].try_into().unwrap()), 2);
        assert_eq!(i64::from_le_bytes(bytes[16..24].try_into().unwrap()), 1 << 20);
        assert_eq!(bytes[32], 1);
        assert_eq!(i32::from_le_bytes(bytes[33..37].try_into().unwrap()), 1);
        assert_eq!(u64::from_le_bytes(bytes[37..45].try_into().unwrap()), 6);
        assert_eq!(bytes.len(), 45 + 6 * 4);
    }

    #[test]
    fn test_write_then_read_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vectors.faiss");
        let original = sample();

        write_index(&path, &original).unwrap();
        let loaded = read_index(&path).unwrap();

        assert_eq!(loaded.dim(), 3);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.metric(), Metric::L2);
        assert_eq!(loaded.reconstruct(1).unwrap(), vec![3.0, 0.0, 0.25]);
    }

    #[test]
    fn test_inner_product_fourcc() {
        let index = FlatIndex::from_codes(1, Metric::InnerProduct, vec![1.0]).unwrap();
        let bytes = encode(&index).unwrap();
        assert_eq!(&bytes[0..4], b"IxFI");
        assert_eq!(decode(&bytes).unwrap().metric(), Metric::InnerProduct);
    }

    #[test]
    fn test_legacy_fourcc_takes_metric_from_header() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0..4].copy_from_slice(b"IxFl");
        let index = decode(&bytes).unwrap();
        assert_eq!(index.metric(), Metric::L2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_rejects_unknown_index_type() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0..4].copy_from_slice(b"IHNf");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("IHNf")));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let bytes = encode(&sample()).unwrap();
        let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("truncated")));

        assert!(matches!(decode(&bytes[..10]), Err(AppError::Format(_))));
        assert!(matches!(decode(&[]), Err(AppError::Format(_))));
    }

    #[test]
    fn test_rejects_count_mismatch() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[37..45].copy_from_slice(&5u64.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(AppError::Format(_))));
    }

    #[test]
    fn test_rejects_metric_disagreeing_with_fourcc() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[33..37].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(AppError::Format(_))));
    }

    #[test]
    fn test_rejects_non_positive_dimension() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[4..8].copy_from_slice(&0i32.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("dimension")));

        bytes[4..8].copy_from_slice(&(-3i32).to_le_bytes());
        assert!(matches!(decode(&bytes), Err(AppError::Format(_))));
    }

    #[test]
    fn test_rejects_negative_row_count() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[8..16].copy_from_slice(&(-1i64).to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("row count")));
    }

    #[test]
    fn test_rejects_unsupported_metric() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0..4].copy_from_slice(b"IxFl");
        bytes[33..37].copy_from_slice(&2i32.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("metric")));
    }

    #[test]
    fn test_rejects_huge_count_without_allocating() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[8..16].copy_from_slice(&(1i64 << 40).to_le_bytes());
        bytes[37..45].copy_from_slice(&(3u64 << 40).to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(&err, AppError::Format(msg) if msg.contains("truncated")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = read_index(&temp.path().join("absent.faiss")).err().unwrap();
        assert!(matches!(err, AppError::File { .. }));
    }
}

use crate::error::SplitError;
use crate::page_range::PageRange;
use serde::Serialize;

/// Number of chunks needed to cover `total_pages` with `pages_per_chunk` pages each.
pub fn chunk_count(total_pages: u32, pages_per_chunk: u32) -> Result<usize, SplitError> {
    if pages_per_chunk == 0 {
        return Err(SplitError::Config("pages per chunk must be at least 1".into()));
    }
    Ok(total_pages.div_ceil(pages_per_chunk) as usize)
}

/// Contiguous ranges of `pages_per_chunk` pages covering `1..=total_pages`.
/// Only the last range may be shorter.
pub fn chunk_ranges(total_pages: u32, pages_per_chunk: u32) -> Result<Vec<PageRange>, SplitError> {
    let count = chunk_count(total_pages, pages_per_chunk)?;
    let mut chunks = Vec::with_capacity(count);
    let mut start = 1u32;

    while start <= total_pages {
        let end = start
            .saturating_add(pages_per_chunk - 1)
            .min(total_pages);
        chunks.push(PageRange::new(start, end));
        if end == total_pages {
            break;
        }
        start = end + 1;
    }

    Ok(chunks)
}

/// Fail before any extraction when the filename list does not line up with the chunks.
pub fn validate_filenames(
    total_pages: u32,
    pages_per_chunk: u32,
    filenames: &[String],
) -> Result<(), SplitError> {
    let expected = chunk_count(total_pages, pages_per_chunk)?;
    if filenames.len() != expected {
        return Err(SplitError::ConfigMismatch {
            expected,
            supplied: filenames.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkPlan {
    pub page_count: u32,
    pub pages_per_chunk: u32,
    pub chunks: Vec<PageRange>,
}

impl ChunkPlan {
    pub fn new(page_count: u32, pages_per_chunk: u32) -> Result<Self, SplitError> {
        Ok(ChunkPlan {
            page_count,
            pages_per_chunk,
            chunks: chunk_ranges(page_count, pages_per_chunk)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(chunks: &[PageRange]) -> Vec<(u32, u32)> {
        chunks.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn test_exact_multiple() {
        let chunks = chunk_ranges(6, 3).unwrap();
        assert_eq!(pairs(&chunks), vec![(1, 3), (4, 6)]);
    }

    #[test]
    fn test_short_last_chunk() {
        let chunks = chunk_ranges(7, 3).unwrap();
        assert_eq!(pairs(&chunks), vec![(1, 3), (4, 6), (7, 7)]);
    }

    #[test]
    fn test_empty_document() {
        assert!(chunk_ranges(0, 3).unwrap().is_empty());
        assert_eq!(chunk_count(0, 3).unwrap(), 0);
    }

    #[test]
    fn test_chunk_larger_than_document() {
        let chunks = chunk_ranges(2, 10).unwrap();
        assert_eq!(pairs(&chunks), vec![(1, 2)]);
    }

    #[test]
    fn test_huge_chunk_size_does_not_overflow() {
        let chunks = chunk_ranges(5, u32::MAX).unwrap();
        assert_eq!(pairs(&chunks), vec![(1, 5)]);
    }

    #[test]
    fn test_zero_pages_per_chunk_rejected() {
        assert!(matches!(chunk_ranges(5, 0), Err(SplitError::Config(_))));
    }

    #[test]
    fn test_chunk_properties_hold() {
        for total in 0..60u32 {
            for per in 1..12u32 {
                let chunks = chunk_ranges(total, per).unwrap();
                let sum: u32 = chunks.iter().map(PageRange::page_count).sum();
                assert_eq!(sum, total);
                assert_eq!(chunks.len(), total.div_ceil(per) as usize);
                assert_eq!(chunks.len(), chunk_count(total, per).unwrap());

                let mut next = 1;
                for (i, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.start, next, "gap or overlap at {total}/{per}");
                    assert!(chunk.page_count() <= per);
                    if i + 1 < chunks.len() {
                        assert_eq!(chunk.page_count(), per);
                    }
                    next = chunk.end + 1;
                }
            }
        }
    }

    #[test]
    fn test_filename_count_mismatch() {
        let names = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        let err = validate_filenames(7, 3, &names).unwrap_err();
        assert!(matches!(
            err,
            SplitError::ConfigMismatch {
                expected: 3,
                supplied: 2
            }
        ));
    }

    #[test]
    fn test_filename_count_matches() {
        let names = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        assert!(validate_filenames(6, 3, &names).is_ok());
    }

    #[test]
    fn test_plan_serializes() {
        let plan = ChunkPlan::new(7, 3).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["chunks"][2], serde_json::json!({"start": 7, "end": 7}));
    }
}

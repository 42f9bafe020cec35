pub mod chunks;
pub mod plan;
pub mod ranges;

use crate::error::SplitError;
use crate::extract::PageExtractor;
use crate::page_range::PageRange;
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// One planned extraction: chunk `index` (1-based) covering `range`, written to `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkJob {
    pub index: usize,
    pub range: PageRange,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOutcome {
    pub index: usize,
    pub range: PageRange,
    pub output: PathBuf,
    pub page_count: u32,
}

/// Two chunks writing the same file would silently lose one of them.
pub fn check_distinct_outputs(jobs: &[ChunkJob]) -> Result<(), SplitError> {
    let mut seen = HashSet::new();
    for job in jobs {
        if !seen.insert(&job.output) {
            return Err(SplitError::Config(format!(
                "chunk {} would overwrite {}, already written by an earlier chunk",
                job.index,
                job.output.display()
            )));
        }
    }
    Ok(())
}

/// Extract every job in order, calling `on_done` after each file is written.
///
/// Stops at the first failure; files written before it are left in place.
pub fn run_jobs(
    extractor: &dyn PageExtractor,
    source: &Path,
    jobs: &[ChunkJob],
    mut on_done: impl FnMut(&ChunkOutcome),
) -> Result<Vec<ChunkOutcome>> {
    check_distinct_outputs(jobs)?;

    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        extractor.extract(source, job.range, &job.output)?;

        let outcome = ChunkOutcome {
            index: job.index,
            range: job.range,
            output: job.output.clone(),
            page_count: job.range.page_count(),
        };
        info!(
            tool = extractor.name(),
            chunk = job.index,
            pages = %job.range,
            output = %job.output.display(),
            "chunk written"
        );
        on_done(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Progress line for the command line.
pub fn created_line(outcome: &ChunkOutcome) -> String {
    format!("Created: {}", outcome.output.display())
}

pub fn print_created(outcome: &ChunkOutcome) {
    println!("{}", created_line(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls and fails on the configured chunk.
    struct Recorder {
        calls: RefCell<Vec<PageRange>>,
        fail_on: Option<PageRange>,
    }

    impl PageExtractor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn extract(&self, _source: &Path, range: PageRange, _dest: &Path) -> Result<()> {
            self.calls.borrow_mut().push(range);
            if Some(range) == self.fail_on {
                return Err(SplitError::Extraction {
                    tool: "recorder".into(),
                    range: range.to_string(),
                    message: "boom".into(),
                }
                .into());
            }
            Ok(())
        }
    }

    fn jobs(ranges: &[(u32, u32)]) -> Vec<ChunkJob> {
        ranges
            .iter()
            .enumerate()
            .map(|(i, (s, e))| ChunkJob {
                index: i + 1,
                range: PageRange::new(*s, *e),
                output: PathBuf::from(format!("out_{}.pdf", i + 1)),
            })
            .collect()
    }

    #[test]
    fn test_runs_in_order() {
        let recorder = Recorder {
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let mut seen = Vec::new();
        let outcomes = run_jobs(
            &recorder,
            Path::new("in.pdf"),
            &jobs(&[(1, 3), (4, 6), (7, 7)]),
            |o| seen.push(o.index),
        )
        .unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(outcomes[2].page_count, 1);
        assert_eq!(
            *recorder.calls.borrow(),
            vec![PageRange::new(1, 3), PageRange::new(4, 6), PageRange::new(7, 7)]
        );
    }

    #[test]
    fn test_stops_at_first_failure() {
        let recorder = Recorder {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(PageRange::new(4, 6)),
        };
        let mut seen = Vec::new();
        let err = run_jobs(
            &recorder,
            Path::new("in.pdf"),
            &jobs(&[(1, 3), (4, 6), (7, 7)]),
            |o| seen.push(o.index),
        )
        .unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 5);
        assert_eq!(seen, vec![1]);
        assert_eq!(recorder.calls.borrow().len(), 2);
    }

    #[test]
    fn test_progress_line() {
        let outcome = ChunkOutcome {
            index: 2,
            range: PageRange::new(4, 6),
            output: Path::new("output_pdfs").join("b.pdf"),
            page_count: 3,
        };
        assert_eq!(
            created_line(&outcome),
            format!("Created: {}", Path::new("output_pdfs").join("b.pdf").display())
        );
    }

    #[test]
    fn test_duplicate_outputs_rejected_before_work() {
        let recorder = Recorder {
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let mut dup = jobs(&[(1, 1), (2, 2)]);
        dup[1].output = dup[0].output.clone();

        let err = run_jobs(&recorder, Path::new("in.pdf"), &dup, |_| {}).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 3);
        assert!(recorder.calls.borrow().is_empty());
    }
}

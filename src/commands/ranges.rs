use super::{print_created, run_jobs, ChunkJob, ChunkOutcome};
use crate::config::{RangeSettings, SplitConfig};
use crate::error::SplitError;
use crate::extract::LopdfExtractor;
use crate::page_range::{coverage_issues, resolve_ranges};
use crate::pdf::PdfDocument;
use anyhow::Result;
use tracing::{info, warn};

/// Split the source along explicit ranges with the in-process extractor.
pub fn split_ranges(
    config: &SplitConfig,
    settings: &RangeSettings,
    on_done: impl FnMut(&ChunkOutcome),
) -> Result<Vec<ChunkOutcome>> {
    let source = config.prepare()?;
    let doc = PdfDocument::open(&source)?;
    let total_pages = doc.page_count();

    let ranges = resolve_ranges(&settings.ranges, total_pages)?;
    for issue in coverage_issues(&ranges, total_pages) {
        warn!(source = %source.display(), "{}", issue);
    }

    let jobs = ranges
        .into_iter()
        .enumerate()
        .map(|(i, range)| -> Result<ChunkJob, SplitError> {
            let name = settings.template.render(i + 1, range)?;
            Ok(ChunkJob {
                index: i + 1,
                range,
                output: config.output_path(&name),
            })
        })
        .collect::<Result<Vec<_>, SplitError>>()?;

    let extractor = LopdfExtractor::with_document(doc);
    run_jobs(&extractor, &source, &jobs, on_done)
}

pub fn run(config: &SplitConfig, settings: &RangeSettings) -> Result<()> {
    let outcomes = split_ranges(config, settings, print_created)?;
    info!(
        chunks = outcomes.len(),
        output_dir = %config.output_dir.display(),
        "range split finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobFile;
    use crate::error::exit_code_for;
    use crate::pdf::testing::{page_marker, read_markers, write_numbered_pdf};

    fn setup(pages: u32) -> (tempfile::TempDir, SplitConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig::new(dir.path().join("in"), dir.path().join("out"), "input.pdf");
        std::fs::create_dir_all(&config.input_dir).unwrap();
        write_numbered_pdf(&config.source_path(), pages);
        (dir, config)
    }

    fn settings(ranges: &str) -> RangeSettings {
        JobFile::default().range_settings(Some(ranges), None).unwrap()
    }

    #[test]
    fn test_partition_round_trip() {
        let (_dir, config) = setup(7);
        let outcomes = split_ranges(&config, &settings("1-3,4-6,7"), |_| {}).unwrap();

        let names: Vec<_> = outcomes
            .iter()
            .map(|o| o.output.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "Document_1_pages_1_to_3.pdf",
                "Document_2_pages_4_to_6.pdf",
                "Document_3_pages_7_to_7.pdf"
            ]
        );

        let rejoined: Vec<String> = outcomes
            .iter()
            .flat_map(|o| read_markers(&o.output))
            .collect();
        let expected: Vec<String> = (1..=7).map(page_marker).collect();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn test_out_of_bounds_range_writes_nothing() {
        let (_dir, config) = setup(5);
        let err = split_ranges(&config, &settings("1-3,4-9"), |_| {}).unwrap_err();
        assert_eq!(exit_code_for(&err), 7);
        assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig::new(dir.path().join("in"), dir.path().join("out"), "input.pdf");
        let err = split_ranges(&config, &settings("1-3"), |_| {}).unwrap_err();
        assert_eq!(exit_code_for(&err), 2);
        assert!(config.output_dir.is_dir());
        assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_overlapping_ranges_are_allowed() {
        let (_dir, config) = setup(4);
        let outcomes = split_ranges(&config, &settings("1-3,3-4"), |_| {}).unwrap();
        assert_eq!(read_markers(&outcomes[1].output), vec![page_marker(3), page_marker(4)]);
    }
}

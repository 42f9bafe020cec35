use super::{print_created, run_jobs, ChunkJob, ChunkOutcome};
use crate::chunking::{chunk_ranges, validate_filenames};
use crate::config::{ChunkSettings, SplitConfig};
use crate::error::SplitError;
use crate::extract::{PageExtractor, ToolChoice};
use crate::page_range::PageRange;
use crate::pdf::document::count_pages;
use anyhow::Result;
use tracing::info;

/// Split the source into fixed-size chunks with the configured external tool.
pub fn split_chunks(
    config: &SplitConfig,
    settings: &ChunkSettings,
    on_done: impl FnMut(&ChunkOutcome),
) -> Result<Vec<ChunkOutcome>> {
    let extractor = settings.tool.extractor(settings.tool_path.clone());
    split_chunks_with(config, settings, &extractor, on_done)
}

/// Same as [`split_chunks`], with the extraction strategy supplied by the caller.
pub fn split_chunks_with(
    config: &SplitConfig,
    settings: &ChunkSettings,
    extractor: &dyn PageExtractor,
    on_done: impl FnMut(&ChunkOutcome),
) -> Result<Vec<ChunkOutcome>> {
    let source = config.prepare()?;
    let total_pages = count_pages(&source)?;

    validate_filenames(total_pages, settings.pages_per_chunk, &settings.filenames)?;
    let ranges = chunk_ranges(total_pages, settings.pages_per_chunk)?;
    check_tool_supports(settings.tool, &ranges)?;
    info!(
        total_pages,
        pages_per_chunk = settings.pages_per_chunk,
        chunks = ranges.len(),
        tool = extractor.name(),
        "splitting into fixed-size chunks"
    );

    let jobs: Vec<ChunkJob> = ranges
        .into_iter()
        .zip(&settings.filenames)
        .enumerate()
        .map(|(i, (range, name))| ChunkJob {
            index: i + 1,
            range,
            output: config.output_path(name),
        })
        .collect();

    run_jobs(extractor, &source, &jobs, on_done)
}

/// `pdfseparate` writes a single page per named output; multi-page chunks need qpdf.
fn check_tool_supports(tool: ToolChoice, ranges: &[PageRange]) -> Result<(), SplitError> {
    if tool != ToolChoice::Pdfseparate {
        return Ok(());
    }
    match ranges.iter().find(|r| r.page_count() > 1) {
        Some(range) => Err(SplitError::Config(format!(
            "pdfseparate can only write one page per file but chunk {} spans {} pages; \
             use qpdf or --pages-per-chunk 1",
            range,
            range.page_count()
        ))),
        None => Ok(()),
    }
}

pub fn run(config: &SplitConfig, settings: &ChunkSettings) -> Result<()> {
    let outcomes = split_chunks(config, settings, print_created)?;
    info!(
        chunks = outcomes.len(),
        tool = %settings.tool,
        output_dir = %config.output_dir.display(),
        "chunk split finished"
    );
    Ok(())
}

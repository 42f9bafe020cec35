use crate::chunking::ChunkPlan;
use crate::config::SplitConfig;
use crate::pdf::document::count_pages;
use anyhow::Result;

pub fn plan(config: &SplitConfig, pages_per_chunk: u32) -> Result<ChunkPlan> {
    let source = config.prepare()?;
    let total_pages = count_pages(&source)?;
    Ok(ChunkPlan::new(total_pages, pages_per_chunk)?)
}

pub fn run(config: &SplitConfig, pages_per_chunk: u32) -> Result<()> {
    let plan = plan(config, pages_per_chunk)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

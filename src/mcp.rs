use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chunking::ChunkPlan;
use crate::commands::{chunks::split_chunks, ranges::split_ranges, ChunkOutcome};
use crate::config::{JobFile, SplitConfig};
use crate::pdf::document::count_pages;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Number of pages in each chunk (>= 1)")]
    pub pages_per_chunk: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRangesRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges, one output file each (e.g., '1-3,4-6,7-end')")]
    pub ranges: String,
    #[schemars(description = "Directory for the output files (created if absent)")]
    pub output_dir: String,
    #[schemars(
        description = "Output name pattern with {i}, {start}, {end} placeholders (default: 'Document_{i}_pages_{start}_to_{end}.pdf')"
    )]
    pub name_template: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitChunksRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Number of pages in each chunk (>= 1)")]
    pub pages_per_chunk: u32,
    #[schemars(description = "Output file names, exactly one per chunk, in order")]
    pub filenames: Vec<String>,
    #[schemars(description = "Directory for the output files (created if absent)")]
    pub output_dir: String,
    #[schemars(description = "External tool: 'qpdf' (default) or 'pdfseparate'")]
    pub tool: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SplitServer {
    tool_router: ToolRouter<Self>,
}

impl SplitServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SplitServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Treat `path` as the source inside its own directory.
fn source_config(path: &str, output_dir: &str) -> SplitConfig {
    let path = Path::new(path);
    let input_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let source = path.file_name().map(PathBuf::from).unwrap_or_default();
    SplitConfig::new(input_dir, output_dir, source)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[tool_router]
impl SplitServer {
    #[tool(description = "Get the number of pages in a PDF")]
    fn pdf_page_count(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match count_pages(&path) {
            Ok(page_count) => to_json(&PageCountResult { path, page_count }),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Compute fixed-size chunk boundaries for a PDF without writing anything")]
    fn pdf_plan_chunks(&self, Parameters(req): Parameters<PlanRequest>) -> String {
        let plan = count_pages(&req.path)
            .and_then(|total| Ok(ChunkPlan::new(total, req.pages_per_chunk)?));
        match plan {
            Ok(plan) => to_json(&plan),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split a PDF along explicit page ranges, writing one named file per range")]
    fn pdf_split_ranges(&self, Parameters(req): Parameters<SplitRangesRequest>) -> String {
        let settings = match JobFile::default()
            .range_settings(Some(&req.ranges), req.name_template.as_deref())
        {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };
        let config = source_config(&req.path, &req.output_dir);

        match split_ranges(&config, &settings, |_| {}) {
            Ok(outcomes) => to_json(&SplitResult::from(outcomes)),
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split a PDF into fixed-size chunks with qpdf or pdfseparate; filenames must list one name per chunk")]
    fn pdf_split_chunks(&self, Parameters(req): Parameters<SplitChunksRequest>) -> String {
        let settings = match JobFile::default().chunk_settings(
            Some(req.pages_per_chunk),
            &req.filenames,
            req.tool.as_deref(),
            None,
        ) {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };
        let config = source_config(&req.path, &req.output_dir);

        match split_chunks(&config, &settings, |_| {}) {
            Ok(outcomes) => to_json(&SplitResult::from(outcomes)),
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageCountResult {
    pub path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChunkResult {
    pub index: usize,
    pub start: u32,
    pub end: u32,
    pub output_path: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub chunks: Vec<ChunkResult>,
}

impl From<Vec<ChunkOutcome>> for SplitResult {
    fn from(outcomes: Vec<ChunkOutcome>) -> Self {
        SplitResult {
            chunks: outcomes
                .into_iter()
                .map(|o| ChunkResult {
                    index: o.index,
                    start: o.range.start,
                    end: o.range.end,
                    output_path: o.output.display().to_string(),
                })
                .collect(),
        }
    }
}

#[tool_handler]
impl ServerHandler for SplitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_page_count to size a document, pdf_plan_chunks to \
                 preview fixed-size chunk boundaries, pdf_split_ranges to write one file per \
                 explicit page range, and pdf_split_chunks to write fixed-size chunks with an \
                 external tool."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = SplitServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

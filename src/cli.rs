use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Split a PDF into page-range chunks, one named file per chunk")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    /// TOML job file with [ranges] and/or [chunks] tables
    #[arg(long, global = true, env = "PDF_SPLIT_JOB")]
    pub job: Option<PathBuf>,

    /// Log level (trace/debug/info/warn/error); RUST_LOG is used when omitted
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Directory holding the source PDF (created if absent)
    #[arg(
        long,
        global = true,
        env = "PDF_SPLIT_INPUT_DIR",
        default_value = "input_pdfs"
    )]
    pub input_dir: PathBuf,

    /// Directory the chunks are written to (created if absent)
    #[arg(
        long,
        global = true,
        env = "PDF_SPLIT_OUTPUT_DIR",
        default_value = "output_pdfs"
    )]
    pub output_dir: PathBuf,

    /// Source PDF, relative to the input directory
    #[arg(long, global = true, env = "PDF_SPLIT_SOURCE", default_value = "input.pdf")]
    pub source: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split along explicit page ranges using the built-in PDF library
    Ranges {
        /// Page ranges, one output file each (e.g., "1-3,4-6,7-end")
        #[arg(short, long)]
        ranges: Option<String>,

        /// Output name pattern; placeholders {i}, {start}, {end}, e.g. {i:03}
        #[arg(short, long)]
        name_template: Option<String>,
    },

    /// Split into fixed-size chunks using qpdf or pdfseparate
    Chunks {
        /// Pages per output file
        #[arg(short, long)]
        pages_per_chunk: Option<u32>,

        /// Output file name for the next chunk; give one per chunk, in order
        #[arg(short, long = "filename")]
        filenames: Vec<String>,

        /// External tool: qpdf or pdfseparate
        #[arg(short, long, env = "PDF_SPLIT_TOOL")]
        tool: Option<String>,

        /// Path to the tool's executable, if it is not on PATH
        #[arg(long, env = "PDF_SPLIT_TOOL_PATH")]
        tool_path: Option<PathBuf>,
    },

    /// Print the fixed-size chunk boundaries as JSON without writing any PDF
    Plan {
        /// Pages per output file
        #[arg(short, long)]
        pages_per_chunk: Option<u32>,
    },

    /// Run as MCP server over stdio
    Mcp,
}

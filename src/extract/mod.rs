//! Page extraction strategies.
//!
//! Every strategy writes exactly one output file per call holding the pages
//! of one range, in source order.

pub mod external;
pub mod in_process;

use crate::error::SplitError;
use crate::page_range::PageRange;
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use external::ExternalExtractor;
pub use in_process::LopdfExtractor;

pub trait PageExtractor {
    /// Short name used in progress and error messages.
    fn name(&self) -> &str;

    /// Write the pages of `range` from `source` to `dest`.
    fn extract(&self, source: &Path, range: PageRange, dest: &Path) -> Result<()>;
}

/// External tool used by the fixed-chunk-size splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    Qpdf,
    Pdfseparate,
}

impl ToolChoice {
    pub const DEFAULT: &'static str = "qpdf";

    pub fn program(&self) -> &'static str {
        match self {
            ToolChoice::Qpdf => "qpdf",
            ToolChoice::Pdfseparate => "pdfseparate",
        }
    }

    /// Build the extractor for this tool, optionally overriding the executable path.
    pub fn extractor(&self, program: Option<PathBuf>) -> ExternalExtractor {
        let program = program.unwrap_or_else(|| PathBuf::from(self.program()));
        ExternalExtractor::new(*self, program)
    }
}

impl FromStr for ToolChoice {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qpdf" => Ok(ToolChoice::Qpdf),
            "pdfseparate" => Ok(ToolChoice::Pdfseparate),
            _ => Err(SplitError::InvalidTool(s.to_string())),
        }
    }
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

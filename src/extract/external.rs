use super::{PageExtractor, ToolChoice};
use crate::error::SplitError;
use crate::page_range::PageRange;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Splits by running `qpdf` or `pdfseparate` once per range.
#[derive(Debug, Clone)]
pub struct ExternalExtractor {
    tool: ToolChoice,
    program: PathBuf,
}

impl ExternalExtractor {
    pub fn new(tool: ToolChoice, program: PathBuf) -> Self {
        ExternalExtractor { tool, program }
    }

    /// Command-line arguments for extracting `range` of `source` into `dest`.
    pub fn args(&self, source: &Path, range: PageRange, dest: &Path) -> Vec<OsString> {
        match self.tool {
            // qpdf --empty --pages <src> <start>-<end> -- <dst>
            ToolChoice::Qpdf => vec![
                "--empty".into(),
                "--pages".into(),
                source.into(),
                range.to_string().into(),
                "--".into(),
                dest.into(),
            ],
            // pdfseparate -f <start> -l <end> <src> <dst>
            ToolChoice::Pdfseparate => vec![
                "-f".into(),
                range.start.to_string().into(),
                "-l".into(),
                range.end.to_string().into(),
                source.into(),
                dest.into(),
            ],
        }
    }
}

impl PageExtractor for ExternalExtractor {
    fn name(&self) -> &str {
        self.tool.program()
    }

    fn extract(&self, source: &Path, range: PageRange, dest: &Path) -> Result<()> {
        let args = self.args(source, range, dest);
        debug!(program = %self.program.display(), ?args, "running external tool");

        let output = match Command::new(&self.program).args(&args).output() {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SplitError::ToolNotFound(self.program.display().to_string()).into());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("failed to execute {}", self.program.display()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let message = if stderr.trim().is_empty() {
                format!("exit status {}", code)
            } else {
                format!("exit status {}: {}", code, stderr.trim())
            };
            return Err(SplitError::Extraction {
                tool: self.name().to_string(),
                range: range.to_string(),
                message,
            }
            .into());
        }

        Ok(())
    }
}

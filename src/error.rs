use std::path::PathBuf;

/// Failures a split run can end with. Each kind maps to its own exit code.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("source PDF not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("expected {expected} output filename(s), one per chunk, but {supplied} were supplied")]
    ConfigMismatch { expected: usize, supplied: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported tool '{0}' (expected 'qpdf' or 'pdfseparate')")]
    InvalidTool(String),

    #[error("{tool} failed for pages {range}: {message}")]
    Extraction {
        tool: String,
        range: String,
        message: String,
    },

    #[error("'{0}' was not found; install it or select another tool")]
    ToolNotFound(String),

    #[error("invalid page range: {0}")]
    InvalidRange(String),
}

impl SplitError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SplitError::MissingInput(_) => 2,
            SplitError::ConfigMismatch { .. } | SplitError::Config(_) => 3,
            SplitError::InvalidTool(_) => 4,
            SplitError::Extraction { .. } => 5,
            SplitError::ToolNotFound(_) => 6,
            SplitError::InvalidRange(_) => 7,
        }
    }
}

/// Exit code for an error chain: the first `SplitError` found decides, else 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<SplitError>())
        .map(SplitError::exit_code)
        .unwrap_or(1)
}

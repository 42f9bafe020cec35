//! Run configuration.
//!
//! Command-line flags and environment variables are merged with an optional
//! TOML job file into plain structs that are built once at startup and passed
//! to the commands. Flags win over the job file.

use crate::cli::PathArgs;
use crate::error::SplitError;
use crate::extract::ToolChoice;
use crate::naming::{check_file_name, NameTemplate, DEFAULT_NAME_TEMPLATE};
use crate::page_range::{parse_range_specs, RangeSpec};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the source lives and where chunks go.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source: PathBuf,
}

impl SplitConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
    ) -> Self {
        SplitConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            source: source.into(),
        }
    }

    pub fn source_path(&self) -> PathBuf {
        self.input_dir.join(&self.source)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Create both directories, then make sure the source exists.
    pub fn prepare(&self) -> Result<PathBuf> {
        for dir in [&self.input_dir, &self.output_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let source = self.source_path();
        if !source.is_file() {
            return Err(SplitError::MissingInput(source).into());
        }
        Ok(source)
    }
}

impl From<&PathArgs> for SplitConfig {
    fn from(args: &PathArgs) -> Self {
        SplitConfig::new(&args.input_dir, &args.output_dir, &args.source)
    }
}

/// Settings for the range-driven splitter.
#[derive(Debug, Clone)]
pub struct RangeSettings {
    pub ranges: Vec<RangeSpec>,
    pub template: NameTemplate,
}

/// Settings for the fixed-chunk-size splitter.
#[derive(Debug, Clone)]
pub struct ChunkSettings {
    pub pages_per_chunk: u32,
    pub filenames: Vec<String>,
    pub tool: ToolChoice,
    pub tool_path: Option<PathBuf>,
}

/// On-disk job description.
///
/// ```toml
/// [ranges]
/// ranges = ["1-3", "4-6"]
/// name_template = "Document_{i}_pages_{start}_to_{end}.pdf"
///
/// [chunks]
/// pages_per_chunk = 3
/// filenames = ["intro.pdf", "body.pdf", "appendix.pdf"]
/// tool = "qpdf"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    #[serde(default)]
    pub ranges: RangesSection,
    #[serde(default)]
    pub chunks: ChunksSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangesSection {
    pub ranges: Option<Vec<String>>,
    pub name_template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunksSection {
    pub pages_per_chunk: Option<u32>,
    pub filenames: Option<Vec<String>>,
    pub tool: Option<String>,
    pub tool_path: Option<PathBuf>,
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SplitError::Config(format!("reading job file {}: {}", path.display(), e))
        })?;
        let job = Self::parse(&raw).with_context(|| format!("in job file {}", path.display()))?;
        debug!(path = %path.display(), "loaded job file");
        Ok(job)
    }

    pub fn parse(raw: &str) -> Result<Self, SplitError> {
        toml::from_str(raw).map_err(|e| SplitError::Config(e.to_string()))
    }

    /// Load `path` if given, else an empty job.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn range_settings(
        &self,
        ranges: Option<&str>,
        name_template: Option<&str>,
    ) -> Result<RangeSettings, SplitError> {
        let ranges = match (ranges, &self.ranges.ranges) {
            (Some(cli), _) => parse_range_specs(cli)?,
            (None, Some(listed)) => listed
                .iter()
                .map(|s| RangeSpec::parse(s))
                .collect::<Result<Vec<_>, _>>()?,
            (None, None) => {
                return Err(SplitError::Config(
                    "no page ranges given; pass --ranges or set [ranges].ranges".into(),
                ))
            }
        };
        if ranges.is_empty() {
            return Err(SplitError::Config("page range list is empty".into()));
        }

        let template = name_template
            .or(self.ranges.name_template.as_deref())
            .unwrap_or(DEFAULT_NAME_TEMPLATE);

        Ok(RangeSettings {
            ranges,
            template: NameTemplate::parse(template)?,
        })
    }

    pub fn pages_per_chunk(&self, cli: Option<u32>) -> Result<u32, SplitError> {
        match cli.or(self.chunks.pages_per_chunk) {
            Some(0) => Err(SplitError::Config("pages per chunk must be at least 1".into())),
            Some(n) => Ok(n),
            None => Err(SplitError::Config(
                "no chunk size given; pass --pages-per-chunk or set [chunks].pages_per_chunk"
                    .into(),
            )),
        }
    }

    pub fn chunk_settings(
        &self,
        pages_per_chunk: Option<u32>,
        filenames: &[String],
        tool: Option<&str>,
        tool_path: Option<&Path>,
    ) -> Result<ChunkSettings, SplitError> {
        let pages_per_chunk = self.pages_per_chunk(pages_per_chunk)?;

        let filenames = if filenames.is_empty() {
            self.chunks.filenames.clone().unwrap_or_default()
        } else {
            filenames.to_vec()
        };
        for name in &filenames {
            check_file_name(name)?;
        }

        let tool = tool
            .or(self.chunks.tool.as_deref())
            .unwrap_or(ToolChoice::DEFAULT)
            .parse::<ToolChoice>()?;

        let tool_path = tool_path
            .map(Path::to_path_buf)
            .or_else(|| self.chunks.tool_path.clone());

        Ok(ChunkSettings {
            pages_per_chunk,
            filenames,
            tool,
            tool_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_range::PageRange;

    const JOB: &str = r#"
[ranges]
ranges = ["1-3", "4-end"]
name_template = "part_{i}.pdf"

[chunks]
pages_per_chunk = 3
filenames = ["a.pdf", "b.pdf"]
tool = "pdfseparate"
"#;

    #[test]
    fn test_parse_job_file() {
        let job = JobFile::parse(JOB).unwrap();
        let ranges = job.range_settings(None, None).unwrap();
        assert_eq!(ranges.ranges.len(), 2);
        assert_eq!(ranges.ranges[1].resolve(9).unwrap(), PageRange::new(4, 9));
        assert_eq!(
            ranges.template.render(1, PageRange::new(1, 3)).unwrap(),
            "part_1.pdf"
        );

        let chunks = job.chunk_settings(None, &[], None, None).unwrap();
        assert_eq!(chunks.pages_per_chunk, 3);
        assert_eq!(chunks.filenames, vec!["a.pdf", "b.pdf"]);
        assert_eq!(chunks.tool, ToolChoice::Pdfseparate);
    }

    #[test]
    fn test_flags_override_job_file() {
        let job = JobFile::parse(JOB).unwrap();
        let ranges = job.range_settings(Some("2-2"), Some("x{i}.pdf")).unwrap();
        assert_eq!(ranges.ranges.len(), 1);

        let names = vec!["only.pdf".to_string()];
        let chunks = job
            .chunk_settings(Some(10), &names, Some("qpdf"), None)
            .unwrap();
        assert_eq!(chunks.pages_per_chunk, 10);
        assert_eq!(chunks.filenames, names);
        assert_eq!(chunks.tool, ToolChoice::Qpdf);
    }

    #[test]
    fn test_defaults_without_job_file() {
        let job = JobFile::default();
        let ranges = job.range_settings(Some("1-3,4-6"), None).unwrap();
        assert_eq!(
            ranges.template.render(2, PageRange::new(4, 6)).unwrap(),
            "Document_2_pages_4_to_6.pdf"
        );
        let chunks = job.chunk_settings(Some(3), &[], None, None).unwrap();
        assert_eq!(chunks.tool, ToolChoice::Qpdf);
        assert!(chunks.filenames.is_empty());
    }

    #[test]
    fn test_missing_values_are_config_errors() {
        let job = JobFile::default();
        assert!(matches!(
            job.range_settings(None, None),
            Err(SplitError::Config(_))
        ));
        assert!(matches!(
            job.chunk_settings(None, &[], None, None),
            Err(SplitError::Config(_))
        ));
        assert!(matches!(
            job.chunk_settings(Some(0), &[], None, None),
            Err(SplitError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_tool_selection() {
        let job = JobFile::default();
        let err = job
            .chunk_settings(Some(3), &[], Some("ghostscript"), None)
            .unwrap_err();
        assert!(matches!(err, SplitError::InvalidTool(_)));
    }

    #[test]
    fn test_example_job_file_parses() {
        let job = JobFile::parse(include_str!("../pdfsplit.example.toml")).unwrap();
        assert!(job.range_settings(None, None).is_ok());
        let chunks = job.chunk_settings(None, &[], None, None).unwrap();
        assert_eq!(chunks.filenames.len(), 2);
    }

    #[test]
    fn test_unreadable_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JobFile::load_optional(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 3);
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_unknown_job_key_rejected() {
        let err = JobFile::parse("[chunks]\nsize = 3\n").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_source_still_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig::new(dir.path().join("in"), dir.path().join("out"), "input.pdf");
        let err = config.prepare().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::MissingInput(_))
        ));
        assert!(dir.path().join("in").is_dir());
        assert!(dir.path().join("out").is_dir());
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }
}

use super::PageExtractor;
use crate::error::SplitError;
use crate::page_range::PageRange;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::cell::RefCell;
use std::path::Path;
use tracing::debug;

/// Splits with `lopdf`, loading each source document once and reusing it for every range.
#[derive(Default)]
pub struct LopdfExtractor {
    loaded: RefCell<Option<PdfDocument>>,
}

impl LopdfExtractor {
    /// Start from an already opened document.
    pub fn with_document(doc: PdfDocument) -> Self {
        LopdfExtractor {
            loaded: RefCell::new(Some(doc)),
        }
    }

    fn write_range(&self, source: &Path, range: PageRange, dest: &Path) -> Result<()> {
        let mut loaded = self.loaded.borrow_mut();
        let doc = match loaded.take() {
            Some(doc) if doc.path == source => doc,
            _ => {
                debug!(source = %source.display(), "loading source document");
                PdfDocument::open(source)?
            }
        };
        let doc = loaded.insert(doc);

        let mut part = doc.extract_range(range)?;
        PdfDocument::save(&mut part, dest)
    }
}

impl PageExtractor for LopdfExtractor {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn extract(&self, source: &Path, range: PageRange, dest: &Path) -> Result<()> {
        self.write_range(source, range, dest).map_err(|e| {
            SplitError::Extraction {
                tool: self.name().to_string(),
                range: range.to_string(),
                message: format!("{:#}", e),
            }
            .into()
        })
    }
}

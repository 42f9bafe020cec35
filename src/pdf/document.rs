use crate::page_range::PageRange;
use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Copy the pages of `range` into a new document, dropping everything else.
    pub fn extract_range(&self, range: PageRange) -> Result<Document> {
        let total = self.page_count();
        if range.start == 0 || range.start > range.end || range.end > total {
            anyhow::bail!("Pages {} are out of range (1-{})", range, total);
        }

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| *num < range.start || *num > range.end)
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            // Deleted pages leave their content streams and resources behind.
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Page count of the PDF at `path`.
pub fn count_pages<P: AsRef<Path>>(path: P) -> Result<u32> {
    Ok(PdfDocument::open(path)?.page_count())
}

use crate::error::SplitError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive, 1-based page range.
///
/// Ranges built from user input go through [`RangeSpec::resolve`], which
/// checks them against the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        PageRange { start, end }
    }

    pub fn page_count(&self) -> u32 {
        if self.start > self.end {
            return 0;
        }
        self.end - self.start + 1
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A range as written by the user, before the page count is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: PageRef,
    pub end: Option<PageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Number(u32),
    End,
}

impl RangeSpec {
    /// Parse a page range specification like "1-5", "7" or "4-end"
    pub fn parse(s: &str) -> Result<Self, SplitError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SplitError::InvalidRange("empty page range".into()));
        }

        if let Some(dash_pos) = s.find('-') {
            // "-5" is not a range
            if dash_pos == 0 {
                return Err(SplitError::InvalidRange(format!("'{}'", s)));
            }

            let start = parse_page_ref(&s[..dash_pos])?;
            let end = parse_page_ref(&s[dash_pos + 1..])?;

            Ok(RangeSpec {
                start,
                end: Some(end),
            })
        } else {
            let page = parse_page_ref(s)?;
            Ok(RangeSpec {
                start: page,
                end: None,
            })
        }
    }

    /// Resolve against the document's page count, enforcing 1 <= start <= end <= total.
    pub fn resolve(&self, total_pages: u32) -> Result<PageRange, SplitError> {
        let start = match &self.start {
            PageRef::Number(n) => *n,
            PageRef::End => total_pages,
        };

        let end = match &self.end {
            Some(PageRef::Number(n)) => *n,
            Some(PageRef::End) => total_pages,
            None => start,
        };

        if start == 0 || end == 0 {
            return Err(SplitError::InvalidRange(format!(
                "{}-{}: page numbers must be >= 1",
                start, end
            )));
        }

        if start > end {
            return Err(SplitError::InvalidRange(format!(
                "{}-{}: start page is after end page",
                start, end
            )));
        }

        if end > total_pages {
            return Err(SplitError::InvalidRange(format!(
                "{}-{}: document has only {} page(s)",
                start, end, total_pages
            )));
        }

        Ok(PageRange { start, end })
    }
}

fn parse_page_ref(s: &str) -> Result<PageRef, SplitError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("end") {
        Ok(PageRef::End)
    } else {
        s.parse::<u32>()
            .map(PageRef::Number)
            .map_err(|_| SplitError::InvalidRange(format!("invalid page number '{}'", s)))
    }
}

/// Parse a comma-separated list of page ranges like "1-3,4-6,7-end"
pub fn parse_range_specs(s: &str) -> Result<Vec<RangeSpec>, SplitError> {
    s.split(',').map(RangeSpec::parse).collect()
}

/// Resolve every spec against `total_pages`, keeping the given order.
pub fn resolve_ranges(specs: &[RangeSpec], total_pages: u32) -> Result<Vec<PageRange>, SplitError> {
    specs.iter().map(|spec| spec.resolve(total_pages)).collect()
}

/// Describe where `ranges` fail to partition `1..=total_pages`.
///
/// Ranges are not required to form a partition, so these are reported rather than rejected.
pub fn coverage_issues(ranges: &[PageRange], total_pages: u32) -> Vec<String> {
    let mut hits = vec![0u32; total_pages as usize];
    for range in ranges {
        for page in range.pages() {
            hits[(page - 1) as usize] += 1;
        }
    }

    let mut issues = Vec::new();
    let uncovered: Vec<u32> = (1..=total_pages)
        .filter(|p| hits[(*p - 1) as usize] == 0)
        .collect();
    if !uncovered.is_empty() {
        issues.push(format!("page(s) not in any range: {}", compact(&uncovered)));
    }
    let repeated: Vec<u32> = (1..=total_pages)
        .filter(|p| hits[(*p - 1) as usize] > 1)
        .collect();
    if !repeated.is_empty() {
        issues.push(format!("page(s) in more than one range: {}", compact(&repeated)));
    }
    issues
}

// Sorted page numbers back into "1-3,7" form.
fn compact(pages: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = pages.iter().copied().peekable();
    while let Some(first) = iter.next() {
        let mut last = first;
        while iter.peek() == Some(&(last + 1)) {
            last += 1;
            iter.next();
        }
        parts.push(PageRange::new(first, last));
    }
    parts
        .into_iter()
        .map(|r| {
            if r.start == r.end {
                r.start.to_string()
            } else {
                r.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

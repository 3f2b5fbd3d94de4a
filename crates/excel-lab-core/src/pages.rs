//! The reference document's page collection.
//!
//! A [`PageCollection`] is built once at startup from the extracted PDF
//! text and shared read-only for the rest of the process.

use serde::Serialize;

/// Shown in place of theory excerpts when no reference document was loaded.
pub const MISSING_DOCUMENT_NOTICE: &str =
    "PDF not found. Put the file next to the binary or set MODULE_PDF_PATH.";

/// Inclusive, 1-based page range within the reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn single(page: usize) -> Self {
        Self {
            start: page,
            end: page,
        }
    }
}

/// Ordered, immutable per-page text of the reference document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCollection {
    pages: Vec<String>,
}

impl PageCollection {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in document order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Returns the text of a 1-based page number.
    pub fn page(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(String::as_str)
    }

    /// Total characters across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.chars().count()).sum()
    }

    /// Joins the pages of `range`, clamped to the document, with blank lines.
    ///
    /// Returns [`MISSING_DOCUMENT_NOTICE`] when the collection is empty and
    /// an empty string when the range falls entirely outside the document.
    pub fn excerpt(&self, range: PageRange) -> String {
        if self.pages.is_empty() {
            return MISSING_DOCUMENT_NOTICE.to_string();
        }
        if range.end == 0 {
            return String::new();
        }
        let start = range.start.saturating_sub(1);
        let end = (range.end - 1).min(self.pages.len() - 1);
        if start > end {
            return String::new();
        }
        self.pages[start..=end].join("\n\n").trim().to_string()
    }

    /// Joins several excerpts with blank lines.
    pub fn excerpts(&self, ranges: &[PageRange]) -> String {
        if self.pages.is_empty() {
            return MISSING_DOCUMENT_NOTICE.to_string();
        }
        ranges
            .iter()
            .map(|r| self.excerpt(*r))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(n: usize) -> PageCollection {
        PageCollection::new((1..=n).map(|i| format!("page {}", i)).collect())
    }

    #[test]
    fn test_page_is_one_based() {
        let c = collection(3);
        assert_eq!(c.page(1), Some("page 1"));
        assert_eq!(c.page(3), Some("page 3"));
        assert_eq!(c.page(0), None);
        assert_eq!(c.page(4), None);
    }

    #[test]
    fn test_excerpt_inclusive_range() {
        let c = collection(5);
        assert_eq!(c.excerpt(PageRange::new(2, 4)), "page 2\n\npage 3\n\npage 4");
        assert_eq!(c.excerpt(PageRange::single(5)), "page 5");
    }

    #[test]
    fn test_excerpt_clamps_to_document() {
        let c = collection(3);
        assert_eq!(c.excerpt(PageRange::new(2, 40)), "page 2\n\npage 3");
        assert_eq!(c.excerpt(PageRange::new(0, 1)), "page 1");
        assert_eq!(c.excerpt(PageRange::new(10, 12)), "");
    }

    #[test]
    fn test_excerpt_on_empty_collection() {
        let c = PageCollection::empty();
        assert_eq!(c.excerpt(PageRange::new(1, 2)), MISSING_DOCUMENT_NOTICE);
        assert_eq!(
            c.excerpts(&[PageRange::single(18), PageRange::new(44, 45)]),
            MISSING_DOCUMENT_NOTICE
        );
    }

    #[test]
    fn test_excerpts_join() {
        let c = collection(6);
        assert_eq!(
            c.excerpts(&[PageRange::single(1), PageRange::new(5, 6)]),
            "page 1\n\npage 5\n\npage 6"
        );
    }

    #[test]
    fn test_total_chars() {
        let c = PageCollection::new(vec!["ab".into(), "£1".into()]);
        assert_eq!(c.total_chars(), 4);
        assert_eq!(c.len(), 2);
        assert!(!c.is_empty());
    }
}

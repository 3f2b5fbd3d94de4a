//! Reference PDF loading and page-text cleanup.
//!
//! The course PDF is read once at startup, split into per-page text with
//! `pdf-extract`, and normalized: repeating footers and page markers are
//! stripped, letter-spaced headings are collapsed, and whitespace is
//! squeezed. A missing file is tolerated and yields an empty collection.

use excel_lab_core::pages::PageCollection;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

struct Cleanup {
    footer: Regex,
    page_marker: Regex,
    spaced_part: Regex,
    spaced_module: Regex,
    blanks: Regex,
    newlines: Regex,
}

fn cleanup() -> &'static Cleanup {
    static CLEANUP: OnceLock<Cleanup> = OnceLock::new();
    CLEANUP.get_or_init(|| Cleanup {
        footer: Regex::new(
            r"(?i)MODULE\s+4:\s+EXCEL\s+&\s+DATA\s+ANALYSIS\s+WITH\s+AI\s+\d+\s*/\s*\d+",
        )
        .expect("footer pattern"),
        page_marker: Regex::new(r"\b\d+\s*/\s*\d+\b").expect("page marker pattern"),
        spaced_part: Regex::new(r"\bP\s+A\s+R\s+T\b").expect("PART pattern"),
        spaced_module: Regex::new(r"\bM\s+O\s+D\s+U\s+L\s+E\b").expect("MODULE pattern"),
        blanks: Regex::new(r"[ \t]+").expect("blank pattern"),
        newlines: Regex::new(r"\n{3,}").expect("newline pattern"),
    })
}

/// Normalizes one page of extracted text.
pub fn clean_page_text(text: &str) -> String {
    let c = cleanup();
    let text = text.replace('\u{a0}', " ");
    let text = c.footer.replace_all(&text, "");
    let text = c.page_marker.replace_all(&text, "");
    let text = c.spaced_part.replace_all(&text, "PART");
    let text = c.spaced_module.replace_all(&text, "MODULE");
    let text = c.blanks.replace_all(&text, " ");
    let text = c.newlines.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Extracts raw per-page text from PDF bytes.
pub fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Loads and cleans the reference document.
///
/// Returns an empty collection when `path` does not exist.
pub fn load_pages(path: &Path) -> Result<PageCollection, ExtractError> {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "reference PDF not found; labs will run without reference pages"
        );
        return Ok(PageCollection::empty());
    }

    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let pages: Vec<String> = extract_pdf_pages(&bytes)?
        .iter()
        .map(|p| clean_page_text(p))
        .collect();

    let collection = PageCollection::new(pages);
    tracing::info!(
        path = %path.display(),
        pages = collection.len(),
        chars = collection.total_chars(),
        "loaded reference PDF"
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_footer() {
        let raw = "Formulas in plain English\nMODULE 4: EXCEL & DATA ANALYSIS WITH AI 12 / 50";
        assert_eq!(clean_page_text(raw), "Formulas in plain English");
    }

    #[test]
    fn test_footer_is_case_insensitive() {
        let raw = "Intro module 4:  excel &\ndata analysis with ai 3/50 text";
        assert_eq!(clean_page_text(raw), "Intro text");
    }

    #[test]
    fn test_strips_stray_page_markers() {
        assert_eq!(clean_page_text("Cleaning 7 / 50"), "Cleaning");
    }

    #[test]
    fn test_collapses_letter_spaced_headings() {
        assert_eq!(clean_page_text("P A R T 2"), "PART 2");
        assert_eq!(clean_page_text("M O D U L E 4"), "MODULE 4");
    }

    #[test]
    fn test_whitespace_normalization() {
        let raw = "\u{a0}Line\t\tone  here\n\n\n\nLine two  ";
        assert_eq!(clean_page_text(raw), "Line one here\n\nLine two");
    }

    #[test]
    fn test_missing_file_yields_empty_collection() {
        let tmp = tempfile::TempDir::new().unwrap();
        let pages = load_pages(&tmp.path().join("missing.pdf")).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_invalid_pdf_returns_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        let err = load_pages(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}

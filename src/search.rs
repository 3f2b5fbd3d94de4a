//! Page inspection and retrieval commands (`lab pages`, `lab retrieve`).

use anyhow::{bail, Result};
use excel_lab_core::pages::PageCollection;
use excel_lab_core::retrieve::{rank_pages, retrieve, RetrievalParams};
use std::path::Path;

const PREVIEW_CHARS: usize = 70;

/// Lists the loaded pages, or prints one page in full.
pub fn run_pages(path: &Path, pages: &PageCollection, page: Option<usize>) -> Result<()> {
    if let Some(n) = page {
        match pages.page(n) {
            Some(text) => {
                println!("Page {}:", n);
                println!("{}", text);
                return Ok(());
            }
            None => bail!("page {} out of range (document has {} pages)", n, pages.len()),
        }
    }

    println!("Reference document");
    println!("==================");
    println!();
    println!("  Path:   {}", path.display());
    if pages.is_empty() {
        println!("  Status: not found (set MODULE_PDF_PATH or document.path)");
        return Ok(());
    }
    println!("  Pages:  {}", pages.len());
    println!("  Chars:  {}", pages.total_chars());
    println!();

    for (i, text) in pages.pages().iter().enumerate() {
        println!("  {:>3}. {}", i + 1, preview(text));
    }
    Ok(())
}

/// Runs the retriever and prints the reference text it would supply.
pub fn run_retrieve(
    pages: &PageCollection,
    params: &RetrievalParams,
    query: &str,
    explain: bool,
) -> Result<()> {
    if explain {
        let ranked = rank_pages(query, pages.pages(), params);
        if ranked.is_empty() {
            println!("No scored pages.");
        } else {
            println!("Ranking ({} pages):", ranked.len());
            for s in &ranked {
                println!(
                    "  page {:>3}  score {:>3}  (overlap {}, bonus {})",
                    s.page, s.score, s.overlap, s.bonus
                );
            }
        }
        println!();
    }

    let text = retrieve(query, pages.pages(), params);
    if text.is_empty() {
        println!("No results.");
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else if flat.is_empty() {
        "(blank)".to_string()
    } else {
        flat
    }
}

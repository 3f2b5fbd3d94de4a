use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn lab_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("lab");
    path
}

/// Writes a config whose document lives in the temp dir (and may not exist).
fn setup_test_env(document: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[document]
path = "{}/{}"

[retrieval]
max_pages = 6
max_chars = 7000

[llm]
provider = "gemini"
api_key_env = "EXCEL_LAB_TEST_UNSET_KEY"
base_url = "http://127.0.0.1:1"
timeout_secs = 2
"#,
        root.display(),
        document
    );

    let config_path = config_dir.join("lab.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_lab(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = lab_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("MODULE_PDF_PATH")
        .env_remove("EXCEL_LAB_TEST_UNSET_KEY")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run lab binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Minimal one-page PDF showing `phrase`, with correct stream length and
/// xref offsets so the page tree parses.
fn minimal_pdf(phrase: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", phrase);
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let o4 = out.len();
    out.extend_from_slice(
        format!(
            "4 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
            content.len(),
            content
        )
        .as_bytes(),
    );
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

#[test]
fn test_catalog_lists_all_modules() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) = run_lab(&config_path, &["catalog"]);
    assert!(success, "catalog failed: {}", stderr);
    assert!(stdout.contains("Excel & Data Analysis AI Power Suite"));
    for key in ["[Foundations]", "[Formulas]", "[Cleaning]", "[Advanced]"] {
        assert!(stdout.contains(key), "missing {} in: {}", key, stdout);
    }
    assert!(stdout.contains("2C: Fixing Errors & Advanced Functions"));
    assert!(stdout.contains("Sharing Sensitive Data"));
}

#[test]
fn test_theory_without_document_shows_notice() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) = run_lab(&config_path, &["theory", "formulas", "1"]);
    assert!(success, "theory failed: {}", stderr);
    assert!(stdout.contains("THE FORMULA REQUEST FORMULA"));
    assert!(stdout.contains("PDF not found"));
    assert!(stdout.contains("Common Mistakes:"));
}

#[test]
fn test_theory_unknown_section_fails() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (_, stderr, success) = run_lab(&config_path, &["theory", "formulas", "4"]);
    assert!(!success);
    assert!(stderr.contains("section 4 not found"), "stderr: {}", stderr);
}

#[test]
fn test_retrieve_without_document_is_empty() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) =
        run_lab(&config_path, &["retrieve", "xlookup returns blank", "--explain"]);
    assert!(success, "retrieve failed: {}", stderr);
    assert!(stdout.contains("No scored pages."));
    assert!(stdout.contains("No results."));
    assert!(
        stderr.contains("reference PDF not found"),
        "expected a warning on stderr, got: {}",
        stderr
    );
}

#[test]
fn test_retrieve_blank_query_succeeds() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) = run_lab(&config_path, &["retrieve", "   "]);
    assert!(success, "retrieve failed: {}", stderr);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_lab_dry_run_prints_prompt() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) = run_lab(
        &config_path,
        &[
            "lab",
            "foundations",
            "1",
            "--context",
            "Columns: Date, Client, Amount",
            "--dry-run",
        ],
    );
    assert!(success, "dry run failed: {}", stderr);
    assert!(stdout.contains("Role: Excel & Data Analysis AI Coach"));
    assert!(stdout.contains("Context: Columns: Date, Client, Amount"));
    assert!(stdout.contains("Reference: 0 chars"));
    assert!(stdout.contains("User input:\nColumns: Date, Client, Amount"));
    assert!(stdout.trim_end().ends_with("Return ONLY valid JSON."));
}

#[test]
fn test_lab_empty_context_fails() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (_, stderr, success) = run_lab(
        &config_path,
        &["lab", "cleaning", "2", "--context", "  ", "--dry-run"],
    );
    assert!(!success);
    assert!(stderr.contains("context must not be empty"), "stderr: {}", stderr);
}

#[test]
fn test_lab_without_key_reports_missing_credential() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, stderr, success) = run_lab(
        &config_path,
        &["lab", "advanced", "2", "--context", "Monthly revenue for 12 months"],
    );
    assert!(!success, "lab should fail without a key: {}", stdout);
    assert!(
        stderr.contains(
            "API Key missing. Please set your EXCEL_LAB_TEST_UNSET_KEY in the environment."
        ),
        "stderr: {}",
        stderr
    );
    // The blueprint is still shown.
    assert!(stdout.contains("Role: Data Visualisation Coach"));
}

#[test]
fn test_pages_reads_pdf() {
    let (tmp, config_path) = setup_test_env("course.pdf");
    fs::write(
        tmp.path().join("course.pdf"),
        minimal_pdf("Pivot tables summarise data"),
    )
    .unwrap();

    let (stdout, stderr, success) = run_lab(&config_path, &["pages"]);
    assert!(success, "pages failed: {}", stderr);
    assert!(stdout.contains("Pages:  1"), "stdout: {}", stdout);
}

#[test]
fn test_pages_missing_document() {
    let (_tmp, config_path) = setup_test_env("missing.pdf");
    let (stdout, _, success) = run_lab(&config_path, &["pages"]);
    assert!(success);
    assert!(stdout.contains("Status: not found"));
}

#[test]
fn test_invalid_pdf_fails() {
    let (tmp, config_path) = setup_test_env("broken.pdf");
    fs::write(tmp.path().join("broken.pdf"), b"not a valid pdf").unwrap();

    let (_, stderr, success) = run_lab(&config_path, &["pages"]);
    assert!(!success);
    assert!(stderr.contains("PDF extraction failed"), "stderr: {}", stderr);
}

#[test]
fn test_document_path_env_override() {
    let (tmp, config_path) = setup_test_env("missing.pdf");
    let pdf = tmp.path().join("elsewhere.pdf");

    let output = Command::new(lab_binary())
        .arg("--config")
        .arg(&config_path)
        .arg("pages")
        .env("MODULE_PDF_PATH", &pdf)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("elsewhere.pdf"), "stdout: {}", stdout);
    assert!(!stdout.contains("missing.pdf"));
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("lab.toml");
    fs::write(&config_path, "[retrieval]\nmax_pages = 0\n").unwrap();

    let (_, stderr, success) = run_lab(&config_path, &["pages"]);
    assert!(!success);
    assert!(stderr.contains("max_pages"), "stderr: {}", stderr);
}

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::parser::Document;

pub const DEFAULT_INPUT_DIR: &str = "data";

/// Appended after every page of converted PDF text.
pub const PAGE_BREAK: &str = "\n--- PAGE BREAK ---\n";

pub struct LoadedDocuments {
    pub documents: Vec<Document>,
    /// File names that could not be read or converted.
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Pdf,
    Text,
}

fn input_kind(path: &Path) -> Option<InputKind> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "pdf" => Some(InputKind::Pdf),
        "txt" => Some(InputKind::Text),
        _ => None,
    }
}

/// Read every .pdf/.txt datasheet in `dir`, sorted by file name.
pub fn load_documents(dir: &Path, limit: Option<usize>) -> Result<LoadedDocuments> {
    if !dir.is_dir() {
        bail!("Input directory not found at '{}'", dir.display());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && input_kind(p).is_some())
        .collect();
    paths.sort();
    if let Some(n) = limit {
        paths.truncate(n);
    }

    let mut documents = Vec::with_capacity(paths.len());
    let mut failed = Vec::new();

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match read_document(&path) {
            Ok(text) => {
                debug!("Read {} ({} chars)", name, text.len());
                documents.push(Document::new(name, text));
            }
            Err(e) => {
                warn!("Failed to read {}: {:#}", name, e);
                failed.push(name);
            }
        }
    }

    info!(
        "Loaded {} datasheets from {} ({} unreadable)",
        documents.len(),
        dir.display(),
        failed.len()
    );
    Ok(LoadedDocuments { documents, failed })
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match input_kind(path) {
        Some(InputKind::Pdf) => pdf_to_text(&bytes),
        _ => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed files
    let extracted = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| anyhow!("PDF text extraction panicked"))?
        .map_err(|e| anyhow!("Failed to extract text from PDF: {}", e))?;
    Ok(join_pages(&extracted))
}

/// pdf-extract separates pages with form feeds; mark each page end the way
/// downstream parsing expects.
pub fn join_pages(raw: &str) -> String {
    raw.split('\x0C')
        .filter(|page| !page.trim().is_empty())
        .map(|page| format!("{}{}", page, PAGE_BREAK))
        .collect()
}

// ── Tests ──

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use super::{parse_datasheet, CableRecord, Document};

/// A document whose parse blew up; it contributes no records.
#[derive(Debug, Clone, Error)]
#[error("could not process {document}: {message}")]
pub struct DocumentError {
    pub document: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Numbered from 1 in document order, then fiber-count order.
    pub records: Vec<CableRecord>,
    /// Documents without any fiber count.
    pub skipped: Vec<String>,
    pub failures: Vec<DocumentError>,
}

pub fn parse_all(documents: &[Document]) -> BatchOutput {
    parse_all_with_progress(documents, || {})
}

/// Like [`parse_all`], calling `on_document` once per finished document.
pub fn parse_all_with_progress<F>(documents: &[Document], on_document: F) -> BatchOutput
where
    F: Fn() + Sync,
{
    run_batch(documents, parse_datasheet, on_document)
}

/// Documents are parsed in parallel; ids are handed out afterwards in a single
/// sequential pass so numbering only depends on input order.
fn run_batch<P, F>(documents: &[Document], parse: P, on_document: F) -> BatchOutput
where
    P: Fn(&str, &str) -> Vec<CableRecord> + Sync,
    F: Fn() + Sync,
{
    let outcomes: Vec<_> = documents
        .par_iter()
        .map(|doc| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| parse(&doc.id, &doc.text)));
            on_document();
            outcome
        })
        .collect();

    let mut output = BatchOutput::default();
    let mut next_id: u32 = 1;

    for (doc, outcome) in documents.iter().zip(outcomes) {
        match outcome {
            Ok(records) if records.is_empty() => output.skipped.push(doc.id.clone()),
            Ok(records) => {
                for mut record in records {
                    record.cable_id = next_id;
                    next_id += 1;
                    output.records.push(record);
                }
            }
            Err(payload) => {
                let err = DocumentError {
                    document: doc.id.clone(),
                    message: panic_message(payload.as_ref()),
                };
                warn!("{}", err);
                output.failures.push(err);
            }
        }
    }

    info!(
        "Parsed {} records from {} documents ({} skipped, {} failed)",
        output.records.len(),
        documents.len(),
        output.skipped.len(),
        output.failures.len()
    );
    output
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ── Tests ──

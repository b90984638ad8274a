use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::parser::CableRecord;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub struct WriteStats {
    pub written: usize,
    pub failed: usize,
}

/// `<datasheet stem>_<count>F.json`
pub fn output_file_name(record: &CableRecord) -> String {
    let path = Path::new(&record.datasheet);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.datasheet.clone());
    format!("{}_{}F.json", stem, record.fiber_count)
}

/// `<datasheet stem>_<extension>_<count>F.json`, for datasheets sharing a stem.
fn qualified_file_name(record: &CableRecord) -> String {
    let path = Path::new(&record.datasheet);
    match path.extension() {
        Some(ext) => {
            let stem = path.file_stem().unwrap_or(ext).to_string_lossy();
            format!("{}_{}_{}F.json", stem, ext.to_string_lossy(), record.fiber_count)
        }
        None => output_file_name(record),
    }
}

/// Write each record as pretty JSON. A failed file is logged and counted;
/// only failing to create `dir` aborts. When two datasheets share a stem the
/// later one's files carry the source extension; a name already written in
/// this batch is never overwritten.
pub fn write_records(dir: &Path, records: &[CableRecord]) -> Result<WriteStats> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut stats = WriteStats {
        written: 0,
        failed: 0,
    };
    let mut used: HashSet<String> = HashSet::new();

    for record in records {
        let mut name = output_file_name(record);
        if used.contains(&name) {
            name = qualified_file_name(record);
        }
        if !used.insert(name.clone()) {
            warn!("Skipping {}: {} already written in this run", record.datasheet, name);
            stats.failed += 1;
            continue;
        }

        let path = dir.join(&name);
        let result = serde_json::to_string_pretty(record)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
        match result {
            Ok(()) => {
                debug!("Saved: {}", name);
                stats.written += 1;
            }
            Err(e) => {
                warn!("Failed to write {}: {}", name, e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

// ── Tests ──

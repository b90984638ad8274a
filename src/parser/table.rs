use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Header keywords marking the fiber-count row of a comparison table.
const HEADER_KEYWORDS: &[&str] = &["Fibre Count", "Fiber Count"];

/// Cells are separated by ",,", "," or a run of 2+ whitespace chars, whichever
/// the PDF text extraction happened to produce.
static CELL_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",,|,|\s{2,}").unwrap());

/// Fiber count tokens (`<digits>F`) in a header line or cell.
static COUNT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\D)(\d+)F").unwrap());

pub fn split_cells(line: &str) -> Vec<&str> {
    CELL_SPLIT_RE.split(line.trim()).collect()
}

fn count_tokens(s: &str) -> impl Iterator<Item = u32> + '_ {
    COUNT_TOKEN_RE
        .captures_iter(s)
        .filter_map(|c| c[1].parse().ok())
}

/// Index of the header line and the cell index of every fiber count it names.
/// A count maps to the first cell whose token is that exact number.
fn locate_header(lines: &[&str], counts: &[u32]) -> Option<(usize, HashMap<u32, usize>)> {
    let idx = lines.iter().position(|line| {
        HEADER_KEYWORDS.iter().any(|kw| line.contains(kw))
            && count_tokens(line).any(|n| counts.contains(&n))
    })?;

    let mut columns = HashMap::new();
    for (i, cell) in split_cells(lines[idx]).iter().enumerate() {
        for n in count_tokens(cell).filter(|n| counts.contains(n)) {
            columns.entry(n).or_insert(i);
        }
    }
    Some((idx, columns))
}

fn clean(cell: &str) -> String {
    cell.replace(['$', '"'], "").trim().to_string()
}

/// Pick the cell for a row. The column rule, in order:
/// 1. mapped column `c` if the row label sits in the first cell, else `c - 1`
///    (label spanning one column shifts data left);
/// 2. if that cell is empty, the one further left;
/// 3. unmapped count or out-of-range index: the second cell.
fn resolve_cell(cells: &[&str], column: Option<usize>, needle: &str) -> Option<String> {
    if let Some(col) = column {
        let label_first = cells
            .first()
            .is_some_and(|c| c.to_lowercase().contains(needle));
        let index = if label_first { Some(col) } else { col.checked_sub(1) };
        if let Some(i) = index.filter(|&i| i < cells.len()) {
            let value = clean(cells[i]);
            if value.is_empty() && i > 0 {
                return Some(clean(cells[i - 1]));
            }
            return Some(value);
        }
    }
    cells.get(1).map(|c| clean(c))
}

/// Value of `parameter` in the column of fiber count `target`.
///
/// None when the text has no fiber-count header row, when no later row
/// mentions the parameter, or when the resolved cell is empty; callers then
/// fall back to free-text patterns.
pub fn lookup(text: &str, counts: &[u32], target: u32, parameter: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let (header_idx, columns) = locate_header(&lines, counts)?;
    let needle = parameter.to_lowercase();
    let column = columns.get(&target).copied();

    for line in &lines[header_idx + 1..] {
        if !line.to_lowercase().contains(&needle) {
            continue;
        }
        let cells = split_cells(line);
        if let Some(value) = resolve_cell(&cells, column, &needle) {
            return Some(value).filter(|v| !v.is_empty());
        }
    }
    None
}

// ── Tests ──

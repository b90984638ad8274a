use std::sync::LazyLock;

use regex::Regex;

use super::Field;
use crate::parser::table;

static LOOSE_TUBES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Number of loose tubes\s*.*?(\d+)").unwrap());
static FIBRE_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)Fib(?:re|er) Type\s*:?\s*"?([^\n"]*G\.65\d[^\n"]*|OM\d)"#).unwrap()
});
static MULTIMODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"OM\d").unwrap());

/// Tube construction keywords, checked in order against lowercased text.
const TUBE_VOCABULARY: &[(&str, &str)] = &[
    ("tight buffer", "Tight Buffered"),
    ("ribbon", "Ribbon"),
    ("central tube", "Central Loose Tube"),
    ("loose tube", "Loose Tube"),
];

/// Datasheets that name no construction use standard loose tubes.
const DEFAULT_TUBE: &str = "Standard";

fn tube_code(count: &str) -> &'static str {
    if count.trim_start_matches('0') == "1" {
        "UT"
    } else {
        "MT"
    }
}

/// Unitube ("UT") or multitube ("MT") construction for one fiber count.
pub fn cable_type(text: &str, counts: &[u32], count: u32) -> Field {
    if text.contains("Unitube") {
        return Field::found("UT");
    }
    if text.contains("Multitube") {
        return Field::found("MT");
    }

    if let Some(tubes) = table::lookup(text, counts, count, "Number of loose tubes") {
        if tubes.chars().all(|c| c.is_ascii_digit()) {
            return Field::found(tube_code(&tubes));
        }
    }

    LOOSE_TUBES_RE
        .captures(text)
        .map(|c| tube_code(&c[1]).to_string())
        .into()
}

/// Single-mode ("SM", ITU G.65x) or multi-mode ("MM", OMx) fiber.
///
/// The table is read in the column of the smallest fiber count; the fiber
/// grade does not change between variants.
pub fn fiber_type(text: &str, counts: &[u32]) -> Field {
    let labelled = counts
        .first()
        .and_then(|&count| table::lookup(text, counts, count, "Fibre Type"))
        .or_else(|| FIBRE_TYPE_RE.captures(text).map(|c| c[1].to_string()))
        .unwrap_or_default();

    if labelled.contains("G.65") || text.contains("G.65") {
        Field::found("SM")
    } else if MULTIMODE_RE.is_match(&labelled) || MULTIMODE_RE.is_match(text) {
        Field::found("MM")
    } else {
        Field::Unknown
    }
}

pub fn tube(text: &str) -> Field {
    let lower = text.to_lowercase();
    let kind = TUBE_VOCABULARY
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map_or(DEFAULT_TUBE, |&(_, kind)| kind);
    Field::found(kind)
}

// ── Tests ──

use std::sync::LazyLock;

use regex::Regex;

use super::Field;

static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)environmental\s+(?:performance|characteristics|conditions)").unwrap()
});
static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:mechanical|physical|optical|ordering|standards|notes|--- PAGE BREAK ---)")
        .unwrap()
});
static TEMPERATURE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+−–]?\s?\d+\s*°?\s*C?\s*(?:to|~|-|–|−)\s*[-+−–]?\s?\d+\s*°\s*C").unwrap()
});
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lines of the environmental section, without its heading.
fn environmental_block(text: &str) -> Option<Vec<&str>> {
    let mut lines = text.lines();
    lines.by_ref().find(|l| BLOCK_START_RE.is_match(l))?;
    Some(lines.take_while(|l| !BLOCK_END_RE.is_match(l)).collect())
}

/// Pair every temperature range with the label printed on the line below it.
/// The first range seen for a label is kept.
fn temperature_ranges<'a>(block: &[&'a str]) -> Vec<(&'a str, String)> {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    for (i, line) in block.iter().enumerate() {
        let Some(range) = TEMPERATURE_RANGE_RE.find(line) else {
            continue;
        };
        let label = block[i + 1..]
            .iter()
            .copied()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .filter(|l| !TEMPERATURE_RANGE_RE.is_match(l))
            .map(|l| l.trim_end_matches(':').trim_end());
        let Some(label) = label.filter(|l| !l.is_empty()) else {
            continue;
        };
        if pairs.iter().any(|(existing, _)| *existing == label) {
            continue;
        }
        pairs.push((label, WHITESPACE_RE.replace_all(range.as_str(), " ").into_owned()));
    }

    pairs
}

/// Operating/storage/installation temperature ranges as one string,
/// e.g. "Operation: -40°C to +70°C; Storage: -40°C to +70°C".
pub fn nesc_condition(text: &str) -> Field {
    let Some(block) = environmental_block(text) else {
        return Field::Unknown;
    };
    let pairs = temperature_ranges(&block);
    if pairs.is_empty() {
        return Field::Unknown;
    }
    Field::found(
        pairs
            .iter()
            .map(|(label, range)| format!("{}: {}", label, range))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

// ── Tests ──

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::extract::{self, Field};

static TITLE_COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d/]+").unwrap());
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static FIBER_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)F").unwrap());

/// Fiber counts a datasheet is sold in, unique and ascending.
///
/// Two sources are merged: the leading "24/48/96" run of the title line, and
/// every "<N>F" token anywhere in the text. Stray numbers such as part codes
/// ending in F are accepted; missing a real variant is worse than an extra
/// record.
pub fn discover(text: &str) -> Vec<u32> {
    let mut counts = BTreeSet::new();

    if let Field::Found(title) = extract::description(text) {
        if let Some(lead) = TITLE_COUNTS_RE.find(&title) {
            for m in DIGITS_RE.find_iter(lead.as_str()) {
                insert_count(&mut counts, m.as_str());
            }
        }
    }

    for caps in FIBER_TOKEN_RE.captures_iter(text) {
        insert_count(&mut counts, &caps[1]);
    }

    counts.into_iter().collect()
}

fn insert_count(counts: &mut BTreeSet<u32>, token: &str) {
    match token.parse::<u32>() {
        Ok(n) => {
            counts.insert(n);
        }
        Err(_) => debug!("Dropping fiber count token {}", token),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_body_are_merged() {
        let text = "Technical Specifications\n24/48F Indoor LSZH Cable\nAlso available as 96F.\n";
        assert_eq!(discover(text), vec![24, 48, 96]);
    }

    #[test]
    fn dedupes_by_numeric_value() {
        let text = "Fibre Count 012F 12F 6F\n";
        assert_eq!(discover(text), vec![6, 12]);
    }

    #[test]
    fn title_without_suffix_counts() {
        let text = "Technical Specifications\n144 Loose Tube Cable\nbody\n";
        assert_eq!(discover(text), vec![144]);
    }

    #[test]
    fn sorted_numerically_not_lexically() {
        let text = "options: 144F, 12F, 96F, 2F";
        assert_eq!(discover(text), vec![2, 12, 96, 144]);
    }

    #[test]
    fn nothing_found() {
        assert!(discover("Installation guide, revision 3, 2021").is_empty());
        assert!(discover("").is_empty());
    }

    #[test]
    fn oversized_token_is_dropped() {
        let text = "serial 99999999999999999999F and 24F";
        assert_eq!(discover(text), vec![24]);
    }
}

pub mod classify;
pub mod colors;
pub mod environment;
pub mod mechanical;

use std::sync::LazyLock;

use regex::Regex;

use super::SENTINEL;

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Technical Specifications\s*\n(.*?)\s*\n").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Outcome of a single-field extraction. A miss is an ordinary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Found(String),
    Unknown,
}

impl Field {
    pub fn found(value: impl Into<String>) -> Self {
        Field::Found(value.into())
    }

    /// Run `fallback` only when nothing was found so far.
    pub fn or_else<F>(self, fallback: F) -> Field
    where
        F: FnOnce() -> Field,
    {
        match self {
            Field::Found(_) => self,
            Field::Unknown => fallback(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Field::Found(v) => v,
            Field::Unknown => SENTINEL,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Field::Found(v) => v,
            Field::Unknown => SENTINEL.to_string(),
        }
    }
}

/// Blank values count as misses so the next strategy gets a turn.
impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Field::Found(v),
            _ => Field::Unknown,
        }
    }
}

/// Regexes tried in priority order; the first one whose group 1 matches wins.
pub struct PatternChain {
    patterns: Vec<Regex>,
}

impl PatternChain {
    pub fn new(patterns: &[&str]) -> Self {
        PatternChain {
            patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
        }
    }

    /// Each pattern is `label` followed by a suffix, case-insensitive, with `.`
    /// crossing line breaks.
    pub fn labelled(label: &str, suffixes: &[&str]) -> Self {
        let label = regex::escape(label);
        PatternChain {
            patterns: suffixes
                .iter()
                .map(|s| Regex::new(&format!("(?is){}{}", label, s)).unwrap())
                .collect(),
        }
    }

    pub fn first_match(&self, text: &str) -> Field {
        self.patterns
            .iter()
            .find_map(|re| {
                re.captures(text)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string())
            })
            .into()
    }
}

/// Title line right after the "Technical Specifications" heading.
pub fn description(text: &str) -> Field {
    DESCRIPTION_RE
        .captures(text)
        .map(|c| WHITESPACE_RE.replace_all(&c[1], " ").trim().to_string())
        .into()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_after_heading() {
        let text = "Header\nTechnical Specifications\n24/48F   Indoor  LSZH Cable \nMore";
        assert_eq!(description(text), Field::found("24/48F Indoor LSZH Cable"));
    }

    #[test]
    fn description_skips_blank_lines() {
        let text = "technical specifications\n\n\n12F Drop Cable\nbody";
        assert_eq!(description(text).as_str(), "12F Drop Cable");
    }

    #[test]
    fn description_missing() {
        assert_eq!(description("no heading here\n"), Field::Unknown);
        assert_eq!(description("").as_str(), SENTINEL);
    }

    #[test]
    fn chain_first_match_wins() {
        let chain = PatternChain::new(&[r"alpha (\d+)", r"(\d+)"]);
        assert_eq!(chain.first_match("7 then alpha 9"), Field::found("9"));
        assert_eq!(chain.first_match("only 7"), Field::found("7"));
        assert_eq!(chain.first_match("nothing"), Field::Unknown);
    }

    #[test]
    fn labelled_chain_escapes_label() {
        let chain = PatternChain::labelled("Weight (kg/km)", &[r"\s*:\s*(\d+)"]);
        assert_eq!(chain.first_match("weight (KG/KM): 85"), Field::found("85"));
        assert_eq!(chain.first_match("Weight kg/km: 85"), Field::Unknown);
    }

    #[test]
    fn blank_option_is_unknown() {
        assert_eq!(Field::from(Some("   ".to_string())), Field::Unknown);
        assert_eq!(Field::from(None), Field::Unknown);
        assert!(Field::from(Some("x".to_string())).is_found());
    }

    #[test]
    fn or_else_short_circuits() {
        let found = Field::found("a").or_else(|| panic!("fallback must not run"));
        assert_eq!(found.into_value(), "a");
        assert_eq!(Field::Unknown.or_else(|| Field::found("b")).into_value(), "b");
    }
}

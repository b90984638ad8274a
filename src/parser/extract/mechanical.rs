use std::sync::LazyLock;

use super::{Field, PatternChain};
use crate::parser::table;

static TENSILE: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::labelled(
        "Tensile Strength",
        &[
            r"[\s\S]*?Installation\s*:\s*(\d+\s*N)",
            r"[\s\S]*?Short Term\s*:\s*(\d+\s*N)",
            r"[\s\S]*?(\d+\s*N)",
        ],
    )
});

static CRUSH: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::labelled(
        "Crush Resistance",
        &[
            r"[\s\S]*?(\d+\s*N/\d+\s*x?\s*\d*\s*cm)",
            r"[\s\S]*?(\d+\s*N/\d+\s*x?\s*\d*\s*mm)",
            r"[\s\S]*?(\d+\s*N)",
        ],
    )
});

// Same line as the label only.
static DIAMETER: LazyLock<PatternChain> = LazyLock::new(|| {
    PatternChain::new(&[
        r"(?i)Cable Diameter\s*.*?(\d+\.\d+\s*±\s*\d+\.\d+\s*mm)",
        r"(?i)Cable Diameter\s*.*?(\d+(?:\.\d+)?\s*mm)",
    ])
});

pub fn tensile(text: &str, counts: &[u32], count: u32) -> Field {
    Field::from(table::lookup(text, counts, count, "Tensile Strength"))
        .or_else(|| TENSILE.first_match(text))
}

pub fn crush(text: &str, counts: &[u32], count: u32) -> Field {
    Field::from(table::lookup(text, counts, count, "Crush Resistance"))
        .or_else(|| CRUSH.first_match(text))
}

pub fn diameter(text: &str, counts: &[u32], count: u32) -> Field {
    Field::from(table::lookup(text, counts, count, "Cable Diameter"))
        .or_else(|| DIAMETER.first_match(text))
}

// ── Tests ──

use std::sync::LazyLock;

use regex::Regex;

use super::Field;

// PDF text extraction sometimes emits Greek capitals (Ε Ι Α Τ) that look
// identical to the Latin ones in "EIA/TIA".
static COLOR_STANDARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<eia>[EΕ][IΙ][AΑ]\s*/\s*[TΤ][IΙ][AΑ]\s*-?\s*598)|(?P<din>DIN\s*VDE\s*0888)|(?P<iec>IEC\s*60304)",
    )
    .unwrap()
});

/// Fiber and tube colour-coding standard the datasheet refers to.
pub fn tube_color_coding(text: &str) -> Field {
    let Some(caps) = COLOR_STANDARD_RE.captures(text) else {
        return Field::Unknown;
    };
    let standard = if caps.name("eia").is_some() {
        "EIA/TIA-598"
    } else if caps.name("din").is_some() {
        "DIN VDE 0888"
    } else {
        "IEC 60304"
    };
    Field::found(standard)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_eia() {
        assert_eq!(tube_color_coding("colours per EIA/TIA-598").as_str(), "EIA/TIA-598");
        assert_eq!(tube_color_coding("EIA / TIA 598 C").as_str(), "EIA/TIA-598");
    }

    #[test]
    fn greek_lookalikes() {
        assert_eq!(tube_color_coding("according to ΕΙΑ/ΤΙΑ - 598").as_str(), "EIA/TIA-598");
    }

    #[test]
    fn din_and_iec() {
        assert_eq!(tube_color_coding("DIN  VDE 0888 part 3").as_str(), "DIN VDE 0888");
        assert_eq!(tube_color_coding("IEC 60304 colours").as_str(), "IEC 60304");
    }

    #[test]
    fn first_standard_in_text_wins() {
        let text = "Tubes: DIN VDE 0888\nFibres: EIA/TIA-598";
        assert_eq!(tube_color_coding(text).as_str(), "DIN VDE 0888");
    }

    #[test]
    fn none_mentioned() {
        assert_eq!(tube_color_coding("blue, orange, green"), Field::Unknown);
    }
}

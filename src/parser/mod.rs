pub mod batch;
pub mod extract;
pub mod table;
pub mod variants;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use extract::{classify, colors, environment, mechanical};

pub use batch::{parse_all, parse_all_with_progress, BatchOutput, DocumentError};

/// Placeholder for any field that could not be extracted.
pub const SENTINEL: &str = "N/A";

static COUNT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9/F\s]+").unwrap());

/// Extracted text of one datasheet, keyed by its file name.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// One fiber-count variant of a cable, flattened to the published JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableRecord {
    #[serde(rename = "cableID")]
    pub cable_id: u32,
    #[serde(rename = "cableDescription")]
    pub description: String,
    #[serde(rename = "fiberCount")]
    pub fiber_count: String,
    #[serde(rename = "typeofCable")]
    pub cable_type: String,
    pub span: String,
    pub tube: String,
    #[serde(rename = "tubeColorCoding")]
    pub tube_color_coding: String,
    #[serde(rename = "fiberType")]
    pub fiber_type: String,
    pub diameter: String,
    pub tensile: String,
    #[serde(rename = "nescCondition")]
    pub nesc_condition: String,
    pub crush: String,
    #[serde(rename = "blowingLength")]
    pub blowing_length: String,
    #[serde(rename = "datasheetURL")]
    pub datasheet: String,
    #[serde(rename = "isActive")]
    pub is_active: String,
}

/// Fields shared by every variant of one datasheet.
struct SharedFields {
    title: String,
    fiber_type: String,
    tube: String,
    tube_color_coding: String,
    nesc_condition: String,
}

/// Parse one datasheet into a record per fiber-count variant.
///
/// Returns an empty Vec when no fiber count can be found, which marks the
/// document as something other than a cable datasheet. Field misses degrade
/// to [`SENTINEL`]; the records carry `cable_id = 0` until the batch numbers
/// them.
pub fn parse_datasheet(document_id: &str, text: &str) -> Vec<CableRecord> {
    let counts = variants::discover(text);
    if counts.is_empty() {
        debug!("No fiber counts in {}, skipping", document_id);
        return Vec::new();
    }
    debug!("{}: fiber counts {:?}", document_id, counts);

    let description = extract::description(text).into_value();
    let fiber_type = classify::fiber_type(text, &counts);
    if fiber_type.is_found() {
        debug!("{}: fiber type {}", document_id, fiber_type.as_str());
    } else {
        debug!("{}: fiber type not stated", document_id);
    }
    let shared = SharedFields {
        title: COUNT_PREFIX_RE.replace(&description, "").into_owned(),
        fiber_type: fiber_type.into_value(),
        tube: classify::tube(text).into_value(),
        tube_color_coding: colors::tube_color_coding(text).into_value(),
        nesc_condition: environment::nesc_condition(text).into_value(),
    };

    counts
        .iter()
        .map(|&count| CableRecord {
            cable_id: 0,
            description: format!("{}F {}", count, shared.title),
            fiber_count: count.to_string(),
            cable_type: classify::cable_type(text, &counts, count).into_value(),
            span: SENTINEL.to_string(),
            tube: shared.tube.clone(),
            tube_color_coding: shared.tube_color_coding.clone(),
            fiber_type: shared.fiber_type.clone(),
            diameter: mechanical::diameter(text, &counts, count).into_value(),
            tensile: mechanical::tensile(text, &counts, count).into_value(),
            nesc_condition: shared.nesc_condition.clone(),
            crush: mechanical::crush(text, &counts, count).into_value(),
            blowing_length: SENTINEL.to_string(),
            datasheet: document_id.to_string(),
            is_active: "Y".to_string(),
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn unitube_table_one_record_per_variant() {
        let records = parse_datasheet("unitube.pdf", &fixture("unitube_table"));
        let counts: Vec<&str> = records.iter().map(|r| r.fiber_count.as_str()).collect();
        assert_eq!(counts, vec!["4", "8", "12"]);
        assert!(records.iter().all(|r| r.cable_id == 0));
        assert!(records.iter().all(|r| r.datasheet == "unitube.pdf"));
    }

    #[test]
    fn unitube_table_per_variant_fields() {
        let records = parse_datasheet("unitube.pdf", &fixture("unitube_table"));
        let twelve = records.iter().find(|r| r.fiber_count == "12").unwrap();
        assert_eq!(twelve.description, "12F Unitube Outdoor Duct Cable, Loose Tube");
        assert_eq!(twelve.tensile, "1500 N");
        assert_eq!(twelve.crush, "1000 N/10 cm");
        assert_eq!(twelve.diameter, "6.8 ± 0.2 mm");
        assert_eq!(twelve.cable_type, "UT");

        let four = records.iter().find(|r| r.fiber_count == "4").unwrap();
        assert_eq!(four.tensile, "1000 N");
        assert_eq!(four.diameter, "6.0 ± 0.2 mm");
    }

    #[test]
    fn unitube_table_shared_fields() {
        let records = parse_datasheet("unitube.pdf", &fixture("unitube_table"));
        for r in &records {
            assert_eq!(r.fiber_type, "SM");
            assert_eq!(r.tube, "Loose Tube");
            assert_eq!(r.tube_color_coding, "EIA/TIA-598");
            assert_eq!(
                r.nesc_condition,
                "Operation: -40°C to +70°C; Storage: -40°C to +70°C; Installation: -10°C to +50°C"
            );
            assert_eq!(r.span, SENTINEL);
            assert_eq!(r.blowing_length, SENTINEL);
            assert_eq!(r.is_active, "Y");
        }
    }

    #[test]
    fn multitube_free_text_falls_back_to_patterns() {
        let records = parse_datasheet("multitube.pdf", &fixture("multitube_freetext"));
        let counts: Vec<&str> = records.iter().map(|r| r.fiber_count.as_str()).collect();
        assert_eq!(counts, vec!["48", "96"]);
        for r in &records {
            assert_eq!(r.cable_type, "MT");
            assert_eq!(r.fiber_type, "MM");
            assert_eq!(r.tensile, "2700 N");
            assert_eq!(r.crush, "2200 N/10 cm");
            assert_eq!(r.diameter, "10.5 ± 0.5 mm");
            assert_eq!(r.tube_color_coding, "DIN VDE 0888");
            assert_eq!(r.nesc_condition, SENTINEL);
        }
        assert_eq!(records[0].description, "48F Multitube Armoured Direct Burial Cable");
    }

    #[test]
    fn brochure_without_counts_yields_nothing() {
        assert!(parse_datasheet("brochure.pdf", &fixture("brochure")).is_empty());
    }

    #[test]
    fn missing_fields_degrade_to_sentinel() {
        let records = parse_datasheet("bare.txt", "Patch panel for 24F trays");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.description, "24F N/A");
        assert_eq!(r.cable_type, SENTINEL);
        assert_eq!(r.fiber_type, SENTINEL);
        assert_eq!(r.tensile, SENTINEL);
        assert_eq!(r.crush, SENTINEL);
        assert_eq!(r.diameter, SENTINEL);
        assert_eq!(r.tube_color_coding, SENTINEL);
        assert_eq!(r.tube, "Standard");
    }

    #[test]
    fn serializes_published_keys() {
        let records = parse_datasheet("bare.txt", "Patch panel for 24F trays");
        let json = serde_json::to_value(&records[0]).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "cableID",
            "cableDescription",
            "fiberCount",
            "typeofCable",
            "span",
            "tube",
            "tubeColorCoding",
            "fiberType",
            "diameter",
            "tensile",
            "nescCondition",
            "crush",
            "blowingLength",
            "datasheetURL",
            "isActive",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj.len(), 15);
        assert!(obj["cableID"].is_u64());
        assert_eq!(obj["fiberCount"], "24");
    }
}

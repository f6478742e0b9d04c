//! Vocabulary for telling dimension callouts apart from the other
//! annotations on a drawing: thread designations, surface finish marks,
//! hardness specs, weld notes, chamfers, grid zone labels and title
//! block text.

use crate::model::MetadataField;

/// Annotations that are callouts in their own right but never dimensions.
pub fn is_excluded_text(text: &str) -> bool {
    let t = text.trim();
    is_thread(t)
        || is_surface_finish(t)
        || is_hardness(t)
        || is_welding(t)
        || is_chamfer(t)
        || is_zone_label(t)
}

/// Metric (`M8`, `M8x1.25`) or series (`1/4-20 UNC`, `3/8 NPT`) threads.
pub fn is_thread(text: &str) -> bool {
    if let Some(rest) = text.strip_prefix('M') {
        if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    const SERIES: [&str; 5] = ["UNC", "UNF", "UNEF", "NPT", "BSP"];
    text.split_whitespace().any(|word| {
        SERIES.iter().any(|series| match word.strip_suffix(series) {
            Some("") => true,
            Some(size) => size.chars().next().is_some_and(|c| c.is_ascii_digit()),
            None => false,
        })
    })
}

/// Roughness values (`Ra 3.2`, `Rz6.3`, `RMS 125`) and N grades (`N6`).
pub fn is_surface_finish(text: &str) -> bool {
    for prefix in ["Ra", "RA", "Rz", "RZ", "RMS"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            let rest = rest.trim_start();
            if rest.is_empty() || rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return true;
            }
        }
    }
    if let Some(rest) = text.strip_prefix('N') {
        if let Ok(grade) = rest.parse::<u8>() {
            return (1..=12).contains(&grade);
        }
    }
    false
}

/// Hardness callouts on any of the common scales, e.g. `58-62 HRC`.
pub fn is_hardness(text: &str) -> bool {
    const SCALES: [&str; 6] = ["HRC", "HRB", "HRA", "HB", "HV", "HBW"];
    text.split_whitespace().any(|word| {
        let word = word.trim_matches(|c: char| !c.is_ascii_alphabetic());
        let upper = word.to_ascii_uppercase();
        SCALES.contains(&upper.as_str())
    })
}

pub fn is_welding(text: &str) -> bool {
    const WORDS: [&str; 5] = ["WELD", "WELDS", "WELDED", "WELDING", "FILLET"];
    text.split_whitespace()
        .any(|word| WORDS.contains(&word.to_ascii_uppercase().as_str()))
}

/// Chamfer callouts: `C5`, `C 0.5` or the angle form `2x45°`.
pub fn is_chamfer(text: &str) -> bool {
    let collapsed: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if let Some(rest) = collapsed.strip_prefix('C') {
        if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    if let Some(idx) = collapsed.find('X') {
        let (left, right) = collapsed.split_at(idx);
        let right = &right[1..];
        let left_numeric =
            !left.is_empty() && left.chars().all(|c| c.is_ascii_digit() || c == '.');
        if left_numeric && right.starts_with("45") {
            return true;
        }
    }
    false
}

/// Grid reference labels along the drawing border, `A1` through `H12`.
/// `R` is exempt so radius callouts like `R5` survive.
pub fn is_zone_label(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_uppercase() || first == 'R' {
        return false;
    }
    let rest = chars.as_str();
    (1..=2).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit())
}

/// Column headers of parts lists, revision tables and hole tables.
pub fn is_table_header(text: &str) -> bool {
    const HEADERS: [&str; 17] = [
        "ITEM",
        "POS",
        "QTY",
        "QUANTITY",
        "PART NO",
        "PART NUMBER",
        "DESCRIPTION",
        "MATERIAL",
        "REV",
        "ZONE",
        "REMARKS",
        "STANDARD",
        "HOLE TABLE",
        "TAG",
        "X LOC",
        "Y LOC",
        "SIZE",
    ];
    let normalized = text
        .trim()
        .trim_end_matches([':', '.'])
        .to_ascii_uppercase();
    HEADERS.contains(&normalized.as_str())
}

const METADATA_LABELS: [(&str, MetadataField); 17] = [
    ("PART NUMBER", MetadataField::PartNumber),
    ("PART NO", MetadataField::PartNumber),
    ("P/N", MetadataField::PartNumber),
    ("DRAWING NO", MetadataField::PartNumber),
    ("DWG NO", MetadataField::PartNumber),
    ("TITLE", MetadataField::Title),
    ("NAME", MetadataField::Title),
    ("MATERIAL", MetadataField::Material),
    ("MATL", MetadataField::Material),
    ("REVISION", MetadataField::Revision),
    ("REV", MetadataField::Revision),
    ("SCALE", MetadataField::Scale),
    ("SHEET", MetadataField::Sheet),
    ("DATE", MetadataField::Date),
    ("WEIGHT", MetadataField::Weight),
    ("WT", MetadataField::Weight),
    ("MASS", MetadataField::Weight),
];

/// Match a title block label at the start of `text`. Returns the field and
/// whatever value text follows the label on the same line, which may be
/// empty when the value sits in a neighbouring cell.
pub fn metadata_label(text: &str) -> Option<(MetadataField, &str)> {
    let t = text.trim();
    for (label, field) in METADATA_LABELS {
        let head = match t.get(..label.len()) {
            Some(head) => head,
            None => continue,
        };
        if !head.eq_ignore_ascii_case(label) {
            continue;
        }
        let rest = &t[label.len()..];
        let boundary_ok = rest
            .chars()
            .next()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
        if boundary_ok {
            return Some((field, rest.trim_start_matches([':', '.', ' '])));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads() {
        assert!(is_thread("M8"));
        assert!(is_thread("M8x1.25"));
        assert!(is_thread("1/4-20 UNC"));
        assert!(is_thread("1/4-20UNC"));
        assert!(is_thread("3/8 NPT"));
        assert!(!is_thread("12.5 ± 0.1"));
        assert!(!is_thread("TRUNCATE"));
    }

    #[test]
    fn test_surface_finish() {
        assert!(is_surface_finish("Ra 3.2"));
        assert!(is_surface_finish("Ra3.2"));
        assert!(is_surface_finish("RMS 125"));
        assert!(is_surface_finish("N6"));
        assert!(!is_surface_finish("N13"));
        assert!(!is_surface_finish("R3.5"));
        assert!(!is_surface_finish("Radius"));
    }

    #[test]
    fn test_hardness() {
        assert!(is_hardness("58-62 HRC"));
        assert!(is_hardness("HB 200"));
        assert!(!is_hardness("12.50 ± 0.05"));
    }

    #[test]
    fn test_chamfer() {
        assert!(is_chamfer("C5"));
        assert!(is_chamfer("C 0.5"));
        assert!(is_chamfer("2x45°"));
        assert!(is_chamfer("1.5 X 45"));
        assert!(!is_chamfer("4X ⌀5.00"));
        assert!(!is_chamfer("C"));
    }

    #[test]
    fn test_zone_labels() {
        assert!(is_zone_label("A1"));
        assert!(is_zone_label("B12"));
        assert!(!is_zone_label("R5"));
        assert!(!is_zone_label("A123"));
        assert!(!is_zone_label("12"));
    }

    #[test]
    fn test_table_headers() {
        assert!(is_table_header("ITEM"));
        assert!(is_table_header("Qty"));
        assert!(is_table_header("PART NO."));
        assert!(is_table_header("HOLE TABLE"));
        assert!(is_table_header("X LOC"));
        assert!(!is_table_header("12.50"));
    }

    #[test]
    fn test_metadata_labels() {
        let (field, value) = metadata_label("MATERIAL: 6061-T6").unwrap();
        assert_eq!(field, MetadataField::Material);
        assert_eq!(value, "6061-T6");

        let (field, value) = metadata_label("PART NO 12345").unwrap();
        assert_eq!(field, MetadataField::PartNumber);
        assert_eq!(value, "12345");

        let (field, value) = metadata_label("P/N: A-100-42").unwrap();
        assert_eq!(field, MetadataField::PartNumber);
        assert_eq!(value, "A-100-42");

        let (field, _) = metadata_label("WT 2.4 kg").unwrap();
        assert_eq!(field, MetadataField::Weight);

        let (field, value) = metadata_label("REV").unwrap();
        assert_eq!(field, MetadataField::Revision);
        assert_eq!(value, "");

        assert!(metadata_label("REVOLVED SECTION").is_none());
        assert!(metadata_label("12.50 ± 0.05").is_none());
    }
}

use balloon_core::report::{DimensionScan, InspectionReport, ReportRow};
use std::fmt::Write;

pub fn print(report: &InspectionReport) {
    let meta = &report.metadata;
    match (&meta.part_number, &meta.revision) {
        (Some(part), Some(rev)) => println!("=== {part} rev {rev} ===\n"),
        (Some(part), None) => println!("=== {part} ===\n"),
        _ => println!("=== Inspection report ===\n"),
    }

    let details = [
        ("Title:", &meta.title),
        ("Material:", &meta.material),
        ("Scale:", &meta.scale),
        ("Sheet:", &meta.sheet),
        ("Date:", &meta.date),
        ("Weight:", &meta.weight),
    ];
    let mut any_detail = false;
    for (label, value) in details {
        if let Some(value) = value {
            println!("  {:<9} {}", label, value);
            any_detail = true;
        }
    }
    if any_detail {
        println!();
    }

    if report.rows.is_empty() {
        println!("  No dimensions detected.");
    } else {
        let value_width = report
            .rows
            .iter()
            .map(|r| value_cell(r).chars().count())
            .max()
            .unwrap_or(5)
            .max(5);

        println!(
            "  {:>3}  {:>4}  {:<width$}  {:<4}  Acceptance",
            "#",
            "Page",
            "Value",
            "Unit",
            width = value_width
        );
        for row in &report.rows {
            let critical_marker = if row.critical { "  (critical)" } else { "" };
            let note = match &row.note {
                Some(note) => format!("  [{note}]"),
                None => String::new(),
            };
            println!(
                "  {:>3}  {:>4}  {:<width$}  {:<4}  {}{}{}",
                row.balloon_id,
                row.page_index,
                value_cell(row),
                row.unit.to_string(),
                row.formula,
                critical_marker,
                note,
                width = value_width
            );
        }
        println!();
        println!(
            "  {} balloon(s) across {} page(s), {} critical",
            report.rows.len(),
            report.pages.len(),
            report.critical_rows().count()
        );
    }

    if !report.review.is_empty() {
        println!("\n  Manual review:");
        for item in &report.review {
            let id = match item.balloon_id {
                Some(id) => format!(" (balloon {id})"),
                None => String::new(),
            };
            println!(
                "    page {}: \"{}\"{} -- {}",
                item.page_index, item.raw_text, id, item.reason
            );
        }
    }

    if !report.page_failures.is_empty() {
        println!("\n  Failed pages:");
        for failure in &report.page_failures {
            println!("    page {}: {}", failure.page_index, failure.reason);
        }
    }
}

fn value_cell(row: &ReportRow) -> String {
    match &row.symbol {
        Some(symbol) => format!("{}{}", symbol, row.nominal),
        None => row.nominal.to_string(),
    }
}

pub fn format_dims(scan: &DimensionScan) -> String {
    let mut out = String::new();

    if scan.pages.is_empty() && scan.page_failures.is_empty() {
        let _ = writeln!(out, "No pages scanned.");
        return out;
    }

    for page in &scan.pages {
        let _ = writeln!(out, "=== Page {} ===\n", page.page_index);
        if page.findings.is_empty() {
            let _ = writeln!(out, "  no dimensions detected\n");
            continue;
        }
        let text_width = page
            .findings
            .iter()
            .map(|f| f.raw_text.chars().count())
            .max()
            .unwrap_or(10);
        for finding in &page.findings {
            if let Some(dim) = &finding.dimension {
                let symbol = dim.symbol.as_deref().unwrap_or("");
                let critical_marker = if dim.critical { "  (critical)" } else { "" };
                let note = match &dim.note {
                    Some(note) => format!("  [{note}]"),
                    None => String::new(),
                };
                let _ = writeln!(
                    out,
                    "  {:<width$}  ->  {}{} {} {}, accept [{}, {}]{}{}",
                    finding.raw_text,
                    symbol,
                    dim.nominal,
                    dim.unit,
                    dim.tolerance,
                    dim.lower_bound(),
                    dim.upper_bound(),
                    critical_marker,
                    note,
                    width = text_width
                );
            } else if let Some(error) = &finding.error {
                let _ = writeln!(
                    out,
                    "  {:<width$}  !!  {}",
                    finding.raw_text,
                    error,
                    width = text_width
                );
            }
        }
        let _ = writeln!(out);
    }

    if !scan.page_failures.is_empty() {
        let _ = writeln!(out, "Failed pages:");
        for failure in &scan.page_failures {
            let _ = writeln!(out, "  page {}: {}", failure.page_index, failure.reason);
        }
    }

    out
}

//! CLI presentation: text and json formatters per command family.

use crate::error::ApiError;
use crate::proof::ConsistencyOutcome;
use crate::registry::{CheckOutcome, Registration};
use crate::store::FingerprintRecord;
use crate::tree::Tree;
use crate::verify::VerifyReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;
use std::path::Path;

/// Pretty JSON for any command result
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidInput(format!("Failed to serialize output: {}", e)))
}

pub fn format_build_text(tree: &Tree, trace: Option<&Path>) -> String {
    let mut out = format!(
        "root: {}\nleaves: {}\nnodes: {}",
        tree.root_digest(),
        tree.leaf_count(),
        tree.node_count()
    );
    if let Some(path) = trace {
        out.push_str(&format!("\ntrace: {}", path.display()));
    }
    out
}

pub fn format_verify_text(report: &VerifyReport) -> String {
    if report.matches {
        format!("verified: {} ({} leaves)", report.actual_root, report.leaf_count)
    } else {
        format!(
            "MISMATCH\nexpected: {}\nactual:   {}",
            report.expected_root, report.actual_root
        )
    }
}

pub fn format_consistency_text(outcome: &ConsistencyOutcome) -> String {
    let label = match outcome {
        ConsistencyOutcome::Identical { .. } => "identical",
        ConsistencyOutcome::Extended { .. } => "extended",
        ConsistencyOutcome::NotComparable => "not comparable",
    };
    let mut lines = vec![format!("consistency: {}", label)];
    lines.extend(outcome.evidence().into_iter().map(|d| format!("  {}", d)));
    lines.join("\n")
}

pub fn format_audit_trail_text(leaf: &str, trail: &[String]) -> String {
    if trail.is_empty() {
        return format!("leaf {:?} not found in trace", leaf);
    }
    trail
        .iter()
        .enumerate()
        .map(|(depth, digest)| format!("{:>3}  {}", depth, digest))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_registration_text(registration: &Registration) -> String {
    let record = &registration.record;
    let mut out = format!(
        "registered {} version {}\nfingerprint: {}\nleaves: {}",
        record.name, record.version, record.fingerprint, record.leaf_count
    );
    if let Some(accuracy) = record.accuracy {
        out.push_str(&format!("\naccuracy: {}", accuracy));
    }
    if let Some(path) = &registration.trace_path {
        out.push_str(&format!("\ntrace: {}", path.display()));
    }
    out
}

pub fn format_check_text(outcome: &CheckOutcome) -> String {
    let mut out = format!(
        "{} version {}: {}",
        outcome.name,
        outcome.version,
        format_verify_text(&outcome.report)
    );
    if outcome.discarded {
        out.push_str("\ncorrupted copy removed");
    }
    out
}

pub fn format_record_list_text(records: &[FingerprintRecord]) -> String {
    if records.is_empty() {
        return "No artifacts registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Name",
        "Version",
        "Fingerprint",
        "Leaves",
        "Accuracy",
        "Recorded",
        "Deprecated",
        "Description",
        "Change log",
    ]);
    for record in records {
        table.add_row(vec![
            record.name.clone(),
            record.version.clone(),
            record.fingerprint.to_string(),
            record.leaf_count.to_string(),
            record
                .accuracy
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            if record.deprecated { "yes" } else { "no" }.to_string(),
            record.description.clone().unwrap_or_else(|| "-".to_string()),
            record.change_log.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

//! Human-readable summary renderer for snapshot diffs.

use crate::diff::model::{DiffClassification, DiffResult};
use crate::model::record::format_coord;
use crate::model::Record;

/// How many keys per bucket are listed before eliding the rest
const MAX_LISTED: usize = 20;

/// Render a human-readable Markdown/text summary of a [`DiffResult`].
///
/// Informational only; the structured diff is the source of truth.
pub fn render_human_summary(diff: &DiffResult) -> String {
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");

    let class_label = match diff.classification() {
        DiffClassification::Initial => "Initial",
        DiffClassification::Identical => "Identical",
        DiffClassification::Changed => "Changed",
    };
    out.push_str(&format!("**Classification**: {class_label}\n\n"));

    out.push_str("### Identity\n\n");
    out.push_str(&format!(
        "| | Snapshot |\n|---|---|\n| previous | `{}` |\n| current | `{}` |\n\n",
        diff.previous_id.as_deref().map(short).unwrap_or("-"),
        short(&diff.current_id),
    ));

    let counts = diff.counts();
    out.push_str(&format!(
        "- added: {}\n- removed: {}\n- modified: {}\n- unchanged: {}\n\n",
        counts.added, counts.removed, counts.modified, counts.unchanged
    ));

    if diff.classification() == DiffClassification::Identical {
        out.push_str("_No tower changes detected._\n");
        return out;
    }

    section(&mut out, "Added", &diff.added);
    section(&mut out, "Removed", &diff.removed);

    if !diff.modified.is_empty() {
        out.push_str("### Modified\n\n");
        for m in diff.modified.iter().take(MAX_LISTED) {
            out.push_str(&format!("- `{}`\n", m.key));
        }
        elided(&mut out, diff.modified.len());
        out.push('\n');
    }

    out
}

fn section(out: &mut String, title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }
    out.push_str(&format!("### {title}\n\n"));
    for r in records.iter().take(MAX_LISTED) {
        out.push_str(&format!(
            "- `{}` at {}, {}\n",
            r.identity_key(),
            format_coord(r.lat_e7),
            format_coord(r.lon_e7)
        ));
    }
    elided(out, records.len());
    out.push('\n');
}

fn elided(out: &mut String, total: usize) {
    if total > MAX_LISTED {
        out.push_str(&format!("- ... and {} more\n", total - MAX_LISTED));
    }
}

/// First 12 hex chars of a digest
fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

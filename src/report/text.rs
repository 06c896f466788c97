use std::collections::BTreeMap;

use crate::diff::classifier::is_relevant_asset_type;
use crate::diff::differ::{ProgramScopes, ScopeChanges};
use crate::directory::schema::{Program, Scope};

/// Instructions this long or longer are omitted from the report entirely,
/// with no truncation marker.
const MAX_INSTRUCTION_LEN: usize = 200;

/// Render a change set as the notification report. Equal inputs produce
/// byte-identical output: programs sort ascending by name, scopes ascending
/// by identifier, aggregate counts ascending by type.
pub fn render_report(changes: &ScopeChanges) -> String {
    let mut out = String::new();

    if !changes.new_programs.is_empty() {
        out.push_str(&format!(
            "New programs found: {}\n\n",
            changes.new_programs.len()
        ));

        let mut programs: Vec<&Program> = changes.new_programs.iter().collect();
        programs.sort_by(|a, b| a.name.cmp(&b.name));

        for program in programs {
            out.push_str(&format!(
                "=== NEW PROGRAM: {} ({}) ===\n",
                program.name, program.handle
            ));
            out.push_str(&format!("Program URL: {}\n", program.url));
            out.push_str(&format!("Program Type: {}\n", program.type_label()));
            out.push_str(&format!("Managed by HackerOne: {}\n", program.is_managed()));
            out.push_str(&format!("Offers Bounties: {}\n\n", program.offers_bounties));

            out.push_str("In-scope targets: ");
            out.push_str(&summarize_target_counts(program));
            out.push_str("\n\n");
        }
    }

    if !changes.new_scopes.is_empty() {
        out.push_str(&format!(
            "New scopes found in existing programs: {}\n\n",
            changes.new_scopes.len()
        ));

        let mut entries: Vec<&ProgramScopes> = changes.new_scopes.values().collect();
        entries.sort_by(|a, b| a.program.name.cmp(&b.program.name));

        for entry in entries {
            let program = &entry.program;
            out.push_str(&format!("=== {} ({}) ===\n", program.name, program.handle));
            out.push_str(&format!("Program URL: {}\n", program.url));
            out.push_str(&format!("Program Type: {}\n", program.type_label()));
            out.push_str(&format!("Offers Bounties: {}\n", program.offers_bounties));

            let mut scopes: Vec<&Scope> = entry.scopes.iter().collect();
            scopes.sort_by(|a, b| a.asset_identifier.cmp(&b.asset_identifier));

            for scope in scopes {
                let eligibility = if scope.bounty_eligible() {
                    " (Eligible for bounty)"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "- [{}] {}{}\n",
                    scope.asset_type, scope.asset_identifier, eligibility
                ));

                if let Some(severity) = scope.max_severity.as_deref() {
                    if !severity.is_empty() {
                        out.push_str(&format!("  Max Severity: {severity}\n"));
                    }
                }

                if let Some(instruction) = scope.instruction.as_deref() {
                    if !instruction.is_empty() && instruction.len() < MAX_INSTRUCTION_LEN {
                        let first_line = instruction.split('\n').next().unwrap_or_default();
                        out.push_str(&format!("  Info: {first_line}\n"));
                    }
                }
            }
            out.push('\n');
        }
    }

    out
}

// Counts every in-scope entry, relevant or not, grouped by upper-cased type.
// BTreeMap iteration yields the alphabetical order the report promises.
fn summarize_target_counts(program: &Program) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for scope in &program.targets.in_scope {
        *counts
            .entry(scope.asset_type.to_ascii_uppercase())
            .or_default() += 1;
    }
    counts
        .iter()
        .map(|(asset_type, count)| format!("{count} {asset_type}s"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-screen overview of a snapshot for the read-only `snapshot` command:
/// totals plus the monitored in-scope target counts per relevant type.
pub fn render_snapshot_summary(programs: &[Program]) -> String {
    let open = programs.iter().filter(|p| p.is_open()).count();
    let offering = programs.iter().filter(|p| p.offers_bounties).count();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut tracked = 0usize;
    for program in programs.iter().filter(|p| p.is_open()) {
        for scope in &program.targets.in_scope {
            if is_relevant_asset_type(&scope.asset_type) {
                *counts
                    .entry(scope.asset_type.to_ascii_uppercase())
                    .or_default() += 1;
                tracked += 1;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Programs: {} total, {} open, {} offering bounties\n",
        programs.len(),
        open,
        offering
    ));
    out.push_str(&format!("Monitored in-scope targets: {tracked}\n"));
    for (asset_type, count) in &counts {
        out.push_str(&format!("  {count} {asset_type}\n"));
    }
    out
}

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::diff::classifier::is_relevant_asset_type;
use crate::directory::schema::{Program, Scope};

/// Everything that changed between two snapshots: programs whose handle was
/// not openly listed before, and per-program in-scope targets that appeared
/// inside programs that were. Derived, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeChanges {
    pub new_programs: Vec<Program>,
    /// Keyed by program handle, the one identity that is stable across
    /// snapshots; the program value rides along for rendering.
    pub new_scopes: BTreeMap<String, ProgramScopes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramScopes {
    pub program: Program,
    pub scopes: Vec<Scope>,
}

impl ScopeChanges {
    pub fn is_empty(&self) -> bool {
        self.new_programs.is_empty() && self.new_scopes.is_empty()
    }
}

// Relevance matching is case-insensitive, but the key keeps the type string
// exactly as published: a re-cased asset type reads as a new scope.
fn scope_key(scope: &Scope) -> String {
    format!("{}:{}", scope.asset_type, scope.asset_identifier)
}

/// Compare two snapshots. Output carries no ordering guarantees beyond map
/// determinism; the report renderer owns presentation order.
pub fn diff_snapshots(previous: &[Program], current: &[Program]) -> ScopeChanges {
    // Relevant-scope keys per open previous program. Map membership doubles
    // as the previous open-handle set: a handle absent here was not openly
    // listed last time, even if the program existed in another state.
    let mut previous_scopes: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for program in previous {
        if !program.is_open() {
            continue;
        }
        let keys = previous_scopes.entry(program.handle.as_str()).or_default();
        for scope in &program.targets.in_scope {
            if is_relevant_asset_type(&scope.asset_type) {
                keys.insert(scope_key(scope));
            }
        }
    }

    let mut changes = ScopeChanges::default();
    for program in current {
        if !program.is_open() {
            continue;
        }

        let Some(known_keys) = previous_scopes.get(program.handle.as_str()) else {
            // A wholly new program; its scopes are summarized by the report,
            // not enumerated one by one.
            changes.new_programs.push(program.clone());
            continue;
        };

        for scope in &program.targets.in_scope {
            if !is_relevant_asset_type(&scope.asset_type) {
                continue;
            }
            if !known_keys.contains(&scope_key(scope)) {
                changes
                    .new_scopes
                    .entry(program.handle.clone())
                    .or_insert_with(|| ProgramScopes {
                        program: program.clone(),
                        scopes: Vec::new(),
                    })
                    .scopes
                    .push(scope.clone());
            }
        }
    }

    changes
}

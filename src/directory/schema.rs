use serde::{Deserialize, Serialize};

/// One full fetch of the directory dataset: the upstream payload and the
/// cached baseline are both a JSON array of programs.
pub type Snapshot = Vec<Program>;

const OPEN_SUBMISSION_STATE: &str = "open";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub offers_bounties: bool,
    #[serde(default)]
    pub submission_state: String,
    #[serde(default)]
    pub managed_program: Option<bool>,
    #[serde(default)]
    pub targets: Targets,
}

impl Program {
    /// Only programs accepting submissions are monitored; anything else is
    /// invisible to the differ on both sides of a comparison.
    pub fn is_open(&self) -> bool {
        self.submission_state == OPEN_SUBMISSION_STATE
    }

    pub fn is_managed(&self) -> bool {
        self.managed_program.unwrap_or(false)
    }

    pub fn type_label(&self) -> &'static str {
        if self.is_managed() {
            "Managed"
        } else {
            "Self-managed"
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Targets {
    #[serde(default)]
    pub in_scope: Vec<Scope>,
    #[serde(default)]
    pub out_of_scope: Vec<Scope>,
}

// The upstream dataset carries JSON null in eligible_for_bounty, instruction
// and max_severity for some records, and omits fields for others; both decode
// to None / the default here instead of failing the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scope {
    #[serde(default)]
    pub asset_identifier: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub eligible_for_bounty: Option<bool>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub max_severity: Option<String>,
}

impl Scope {
    pub fn bounty_eligible(&self) -> bool {
        self.eligible_for_bounty.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::Program;

    #[test]
    fn only_open_state_counts_as_open() {
        let mut program = Program {
            handle: "acme".to_string(),
            name: "Acme".to_string(),
            url: "https://hackerone.com/acme".to_string(),
            offers_bounties: true,
            submission_state: "open".to_string(),
            managed_program: None,
            targets: Default::default(),
        };
        assert!(program.is_open());

        program.submission_state = "paused".to_string();
        assert!(!program.is_open());
        program.submission_state = "Open".to_string();
        assert!(!program.is_open());
    }

    #[test]
    fn type_label_follows_managed_flag() {
        let mut program = Program {
            handle: "acme".to_string(),
            name: "Acme".to_string(),
            url: String::new(),
            offers_bounties: false,
            submission_state: "open".to_string(),
            managed_program: Some(true),
            targets: Default::default(),
        };
        assert_eq!(program.type_label(), "Managed");

        program.managed_program = None;
        assert_eq!(program.type_label(), "Self-managed");
    }

    #[test]
    fn decodes_records_with_nulls_and_unknown_fields() {
        let payload = r#"[
            {
                "handle": "acme",
                "name": "Acme",
                "url": "https://hackerone.com/acme",
                "offers_bounties": true,
                "submission_state": "open",
                "response_efficiency_percentage": 97,
                "targets": {
                    "in_scope": [
                        {
                            "asset_identifier": "acme.com",
                            "asset_type": "URL",
                            "eligible_for_bounty": null,
                            "instruction": null,
                            "max_severity": "critical",
                            "availability_requirement": "high"
                        }
                    ],
                    "out_of_scope": []
                }
            }
        ]"#;

        let programs: Vec<Program> = serde_json::from_str(payload).expect("payload should decode");
        assert_eq!(programs.len(), 1);
        let scope = &programs[0].targets.in_scope[0];
        assert!(!scope.bounty_eligible());
        assert_eq!(scope.instruction, None);
        assert_eq!(scope.max_severity.as_deref(), Some("critical"));
        assert_eq!(programs[0].managed_program, None);
    }
}

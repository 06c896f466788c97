/// Asset types tracked for novelty. A scope whose type is outside this list
/// is invisible to the differ: never counted as new, never retained for the
/// next comparison.
pub const RELEVANT_ASSET_TYPES: [&str; 5] = ["URL", "WILDCARD", "CIDR", "IP_ADDRESS", "API"];

/// Case-insensitive membership test against [`RELEVANT_ASSET_TYPES`].
pub fn is_relevant_asset_type(asset_type: &str) -> bool {
    let normalized = asset_type.to_ascii_uppercase();
    RELEVANT_ASSET_TYPES.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::{is_relevant_asset_type, RELEVANT_ASSET_TYPES};

    #[test]
    fn accepts_every_listed_type_in_any_case() {
        for asset_type in RELEVANT_ASSET_TYPES {
            assert!(is_relevant_asset_type(asset_type));
            assert!(is_relevant_asset_type(&asset_type.to_ascii_lowercase()));
        }
        assert!(is_relevant_asset_type("Url"));
        assert!(is_relevant_asset_type("Ip_Address"));
    }

    #[test]
    fn rejects_unlisted_types() {
        for asset_type in ["OTHER", "SOURCE_CODE", "DOWNLOADABLE_EXECUTABLES", "HARDWARE", ""] {
            assert!(!is_relevant_asset_type(asset_type));
        }
    }
}

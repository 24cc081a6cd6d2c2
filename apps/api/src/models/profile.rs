use serde::{Deserialize, Serialize};

/// A persisted work position as the application sees it.
///
/// `verified` and `reviewed` are tri-state: `None` means "not yet evaluated",
/// `Some(bool)` is a verifier's verdict. The empty-vs-one-element sequence
/// encoding the store uses for these fields never leaves `store::wire`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub company: String,
    pub role: String,
    /// Whole months, always ≥ 1.
    pub duration: u64,
    pub verified: Option<bool>,
    pub reviewed: Option<bool>,
}

/// A user's profile as read back from the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub skill_level: String,
    pub positions: Vec<Position>,
}

/// Which review flag of a position a verifier is setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewField {
    Verified,
    Reviewed,
}

impl ReviewField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewField::Verified => "verified",
            ReviewField::Reviewed => "reviewed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_serializes_tristate_as_null() {
        let position = Position {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            duration: 12,
            verified: None,
            reviewed: Some(true),
        };
        let json = serde_json::to_value(&position).unwrap();
        assert!(json["verified"].is_null());
        assert_eq!(json["reviewed"], serde_json::json!(true));
        assert_eq!(json["duration"], serde_json::json!(12));
    }

    #[test]
    fn test_profile_uses_camel_case_field_names() {
        let profile = UserProfile {
            name: "Test User".to_string(),
            skill_level: "Professional".to_string(),
            positions: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("skillLevel").is_some());
        assert!(json.get("skill_level").is_none());
    }

    #[test]
    fn test_review_field_deserializes_lowercase() {
        let field: ReviewField = serde_json::from_str(r#""verified""#).unwrap();
        assert_eq!(field, ReviewField::Verified);
        let field: ReviewField = serde_json::from_str(r#""reviewed""#).unwrap();
        assert_eq!(field, ReviewField::Reviewed);
    }
}

//! Career profile data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on any single profile field, in characters.
///
/// Enforced by the store on write; the dialogue truncates input to this
/// length before it reaches the draft.
pub const MAX_FIELD_CHARS: usize = 4000;

/// A user's committed career profile.
///
/// Stored in the `users` table, one row per `user_id`. Written only when the
/// three-step dialogue completes, and replaced wholesale on every re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub interests: String,
    pub skills: String,
    pub work_preference: String,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(
        user_id: impl Into<String>,
        interests: impl Into<String>,
        skills: impl Into<String>,
        work_preference: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            interests: interests.into(),
            skills: skills.into(),
            work_preference: work_preference.into(),
            updated_at: Utc::now(),
        }
    }

    /// Field names paired with values, for limit checks and logging.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("interests", self.interests.as_str()),
            ("skills", self.skills.as_str()),
            ("work_preference", self.work_preference.as_str()),
        ]
    }
}

/// Fields collected so far in the current dialogue pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_preference: Option<String>,
}

impl ProfileDraft {
    /// Turn a fully populated draft into a profile. `None` if any field is
    /// still missing.
    pub fn complete(&self, user_id: &str) -> Option<UserProfile> {
        Some(UserProfile::new(
            user_id,
            self.interests.clone()?,
            self.skills.clone()?,
            self.work_preference.clone()?,
        ))
    }
}

/// Clip free text to `max_chars` characters without splitting a code point.
pub fn truncate_field(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => text[..byte_offset].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_complete_requires_all_fields() {
        let mut draft = ProfileDraft {
            interests: Some("painting".into()),
            skills: Some("color theory".into()),
            work_preference: None,
        };
        assert!(draft.complete("42").is_none());

        draft.work_preference = Some("remote".into());
        let profile = draft.complete("42").unwrap();
        assert_eq!(profile.user_id, "42");
        assert_eq!(profile.interests, "painting");
        assert_eq!(profile.skills, "color theory");
        assert_eq!(profile.work_preference, "remote");
    }

    #[test]
    fn draft_accepts_empty_strings() {
        let draft = ProfileDraft {
            interests: Some(String::new()),
            skills: Some(String::new()),
            work_preference: Some(String::new()),
        };
        assert!(draft.complete("1").is_some());
    }

    #[test]
    fn truncate_field_respects_char_boundaries() {
        assert_eq!(truncate_field("живопись", 4), "живо");
        assert_eq!(truncate_field("short", 10), "short");
        assert_eq!(truncate_field("", 3), "");
        assert_eq!(truncate_field("🎨🎨🎨", 2), "🎨🎨");
    }

    #[test]
    fn draft_serde_skips_missing_fields() {
        let draft = ProfileDraft {
            interests: Some("music".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"interests": "music"}));
    }
}

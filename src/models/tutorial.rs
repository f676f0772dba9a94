//! Tutorial document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// A stored tutorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for both create and update.
///
/// Every field is optional so that updates can be partial; creation
/// additionally requires a non-empty `title`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TutorialInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

impl TutorialInput {
    /// True when the body carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.published.is_none()
    }

    /// Build a new document, or `None` if no usable title was given.
    pub fn into_tutorial(self) -> Option<Tutorial> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let now = Utc::now();
        Some(Tutorial {
            id: Uuid::new_v4(),
            title,
            description: self.description,
            published: self.published.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

impl Tutorial {
    /// Apply the fields present in `input`, bumping `updated_at`.
    pub fn apply(&mut self, input: TutorialInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
        if let Some(published) = input.published {
            self.published = published;
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl Document for Tutorial {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title() {
        assert!(TutorialInput::default().into_tutorial().is_none());

        let blank = TutorialInput {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.into_tutorial().is_none());
    }

    #[test]
    fn test_create_defaults_unpublished() {
        let t = TutorialInput {
            title: Some("Rust".into()),
            ..Default::default()
        }
        .into_tutorial()
        .unwrap();
        assert!(!t.published);
        assert_eq!(t.created_at, t.updated_at);
    }

    #[test]
    fn test_apply_is_partial() {
        let mut t = TutorialInput {
            title: Some("Rust".into()),
            description: Some("intro".into()),
            published: None,
        }
        .into_tutorial()
        .unwrap();

        t.apply(TutorialInput {
            published: Some(true),
            ..Default::default()
        });
        assert_eq!(t.title, "Rust");
        assert_eq!(t.description.as_deref(), Some("intro"));
        assert!(t.published);
    }

    #[test]
    fn test_serializes_camel_case() {
        let t = TutorialInput {
            title: Some("Rust".into()),
            ..Default::default()
        }
        .into_tutorial()
        .unwrap();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("description").is_none());
        assert_eq!(json["id"], t.id.to_string());
    }

    #[test]
    fn test_title_match_ignores_case() {
        let t = TutorialInput {
            title: Some("Node Tutorial".into()),
            ..Default::default()
        }
        .into_tutorial()
        .unwrap();
        assert!(t.title_contains("tutorial"));
        assert!(t.title_contains("NODE"));
        assert!(!t.title_contains("rust"));
    }
}

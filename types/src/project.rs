//! Saved code projects. Plain CRUD records, no versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeProject {
    pub id: ProjectId,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CodeProject {
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::fresh(),
            name: name.into(),
            code: code.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_stamps_both_timestamps() {
        let now = Utc::now();
        let project = CodeProject::new("salat-reminder", "fn main() {}", now);
        assert_eq!(project.created_at, now);
        assert_eq!(project.updated_at, now);
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let project = CodeProject::new("demo", "-- none", Utc::now());
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}

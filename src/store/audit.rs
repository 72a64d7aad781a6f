use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Creation and last-modification metadata attached by callers to their
/// domain documents. The store itself is agnostic to its presence; embed it
/// with `#[serde(flatten)]` to share the document's `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEnvelope {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl AuditEnvelope {
    pub fn created_by(creator: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            created_by: Some(creator),
            created_at: DateTime::now(),
            updated_by: None,
            updated_at: None,
        }
    }

    /// Record a modification by `modifier` at the current time.
    pub fn touch(&mut self, modifier: ObjectId) {
        self.updated_by = Some(modifier);
        self.updated_at = Some(DateTime::now());
    }
}

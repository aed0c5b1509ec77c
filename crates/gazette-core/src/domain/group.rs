use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group entity - a named community that posts may belong to.
///
/// The slug is the group's unique URL-safe identifier and addresses the group
/// feed at `/group/{slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Create a new group with a generated ID.
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
        }
    }
}

//! View models - what the handlers hand to the HTML layer.

use serde::{Deserialize, Serialize};

/// A post as shown on feeds and its own page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub author: String,
    pub text: String,
    pub pub_date: String,
    pub group: Option<GroupRef>,
}

/// A short group reference: enough for a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    pub title: String,
    pub slug: String,
}

/// A group as shown on its feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// An author as shown on their profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    pub username: String,
    pub post_count: u64,
}

/// Pagination metadata for a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

/// The post form: submitted values, field errors, and the group selector
/// options. Re-rendering after a validation failure echoes the submitted
/// values back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormView {
    pub text: String,
    pub group: String,
    pub text_error: Option<String>,
    pub group_error: Option<String>,
    pub groups: Vec<GroupRef>,
}

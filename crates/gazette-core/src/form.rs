//! The post form: raw input binding and field validation.
//!
//! The same form backs both the create and edit actions. The `group` field
//! carries a group slug; resolving the slug needs the store, so the handler
//! looks it up and feeds the outcome into [`PostInput::validate`].

use serde::Deserialize;
use uuid::Uuid;

/// Raw field values submitted from the post form. Unknown fields (such as a
/// client-supplied `author`) are dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub text: String,
    /// Group slug; an empty string means "no group".
    #[serde(default)]
    pub group: String,
}

impl PostInput {
    /// The submitted group slug, if any.
    pub fn wants_group(&self) -> Option<&str> {
        let slug = self.group.trim();
        (!slug.is_empty()).then_some(slug)
    }

    /// Apply the field rules, combining the text check with the group
    /// resolution outcome. On success returns a bound-but-unsaved draft;
    /// on failure, field-keyed messages and nothing is persisted.
    pub fn validate(&self, group: GroupChoice) -> Result<PostDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", "Enter the post text.");
        }

        let group_id = match group {
            GroupChoice::None => None,
            GroupChoice::Found(id) => Some(id),
            GroupChoice::Unknown => {
                errors.add("group", "Select one of the available groups.");
                None
            }
        };

        if errors.is_empty() {
            Ok(PostDraft {
                text: text.to_string(),
                group_id,
            })
        } else {
            Err(errors)
        }
    }
}

/// Outcome of resolving the submitted group slug against the store.
#[derive(Debug, Clone, Copy)]
pub enum GroupChoice {
    /// No group submitted.
    None,
    /// Slug resolved to an existing group.
    Found(Uuid),
    /// Slug submitted but no such group exists.
    Unknown,
}

/// A validated, unsaved post body.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
}

/// Validation error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

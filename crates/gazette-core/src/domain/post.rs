use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Group, User};

/// Post entity - the core content unit.
///
/// A post always has exactly one author and zero-or-one group. The author and
/// publication timestamp are fixed at creation; editing may only change the
/// text and the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post. The author comes from the authenticated identity,
    /// never from client input.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            group_id,
            text,
            pub_date: Utc::now(),
        }
    }
}

/// A post joined with its author and optional group, as the feed queries
/// return it.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_sets_author_and_timestamp() {
        let author = Uuid::new_v4();
        let before = Utc::now();
        let post = Post::new(author, "hello".to_string(), None);

        assert_eq!(post.author_id, author);
        assert!(post.group_id.is_none());
        assert!(post.pub_date >= before);
        assert!(post.pub_date <= Utc::now());
    }
}

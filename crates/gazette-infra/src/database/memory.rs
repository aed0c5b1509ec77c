//! In-memory repositories - used as fallback when no database is configured.
//!
//! These hold real data behind async RwLocks so the application (and the
//! handler tests) behave identically with or without PostgreSQL.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use gazette_core::domain::{Group, Post, PostDetail, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{BaseRepository, GroupRepository, PostRepository, UserRepository};

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.store.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }
}

/// In-memory group repository.
pub struct InMemoryGroupRepository {
    store: RwLock<HashMap<Uuid, Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        self.store.write().await.insert(group.id, group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|g| g.slug == slug).cloned())
    }

    async fn all(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.store.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

struct StoredPost {
    post: Post,
    seq: u64,
}

/// In-memory post repository.
///
/// Holds handles to the user and group stores so feed queries can join the
/// author and group rows the way the SQL repositories do.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, StoredPost>>,
    seq: AtomicU64,
    users: Arc<InMemoryUserRepository>,
    groups: Arc<InMemoryGroupRepository>,
}

impl InMemoryPostRepository {
    pub fn new(users: Arc<InMemoryUserRepository>, groups: Arc<InMemoryGroupRepository>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            seq: AtomicU64::new(0),
            users,
            groups,
        }
    }

    async fn detail(&self, post: Post) -> Result<PostDetail, RepoError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| RepoError::Constraint("post without author row".to_string()))?;
        let group = match post.group_id {
            Some(id) => self.groups.find_by_id(id).await?,
            None => None,
        };
        Ok(PostDetail {
            post,
            author,
            group,
        })
    }

    async fn window<F>(&self, filter: F, offset: u64, limit: u64) -> Result<Vec<PostDetail>, RepoError>
    where
        F: Fn(&Post) -> bool,
    {
        let mut selected: Vec<(u64, Post)> = {
            let store = self.store.read().await;
            store
                .values()
                .filter(|stored| filter(&stored.post))
                .map(|stored| (stored.seq, stored.post.clone()))
                .collect()
        };
        // Newest first; the insertion counter breaks identical-timestamp ties.
        selected.sort_by(|a, b| (b.1.pub_date, b.0).cmp(&(a.1.pub_date, a.0)));

        let mut details = Vec::new();
        for (_, post) in selected
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
        {
            details.push(self.detail(post).await?);
        }
        Ok(details)
    }

    async fn count_matching<F>(&self, filter: F) -> u64
    where
        F: Fn(&Post) -> bool,
    {
        let store = self.store.read().await;
        store.values().filter(|stored| filter(&stored.post)).count() as u64
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).map(|s| s.post.clone()))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        // An update keeps the original insertion position.
        let seq = store
            .get(&post.id)
            .map(|existing| existing.seq)
            .unwrap_or_else(|| self.seq.fetch_add(1, Ordering::Relaxed));
        store.insert(
            post.id,
            StoredPost {
                post: post.clone(),
                seq,
            },
        );
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn recent(&self, offset: u64, limit: u64) -> Result<Vec<PostDetail>, RepoError> {
        self.window(|_| true, offset, limit).await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.count_matching(|_| true).await)
    }

    async fn by_group(
        &self,
        group_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError> {
        self.window(|p| p.group_id == Some(group_id), offset, limit)
            .await
    }

    async fn count_by_group(&self, group_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.count_matching(|p| p.group_id == Some(group_id)).await)
    }

    async fn by_author(
        &self,
        author_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError> {
        self.window(|p| p.author_id == author_id, offset, limit)
            .await
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.count_matching(|p| p.author_id == author_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed() -> (
        Arc<InMemoryUserRepository>,
        Arc<InMemoryGroupRepository>,
        InMemoryPostRepository,
        User,
        Group,
    ) {
        let users = Arc::new(InMemoryUserRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let posts = InMemoryPostRepository::new(users.clone(), groups.clone());

        let author = users
            .save(User::new("skywalker".to_string(), "x".to_string()))
            .await
            .unwrap();
        let group = groups
            .save(Group::new(
                "Rustaceans".to_string(),
                "rust".to_string(),
                "All things Rust".to_string(),
            ))
            .await
            .unwrap();

        (users, groups, posts, author, group)
    }

    #[tokio::test]
    async fn feed_is_newest_first() {
        let (_, _, posts, author, _) = seed().await;

        for i in 0..3 {
            posts
                .save(Post::new(author.id, format!("post {i}"), None))
                .await
                .unwrap();
        }

        let feed = posts.recent(0, 10).await.unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].post.text, "post 2");
        assert_eq!(feed[2].post.text, "post 0");
        assert_eq!(feed[0].author.username, "skywalker");
    }

    #[tokio::test]
    async fn window_respects_offset_and_limit() {
        let (_, _, posts, author, _) = seed().await;

        for i in 0..13 {
            posts
                .save(Post::new(author.id, format!("post {i}"), None))
                .await
                .unwrap();
        }

        let first = posts.recent(0, 10).await.unwrap();
        let second = posts.recent(10, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 3);
        assert_eq!(first[0].post.text, "post 12");
        assert_eq!(second[2].post.text, "post 0");
        assert_eq!(posts.count().await.unwrap(), 13);
    }

    #[tokio::test]
    async fn group_filter_only_returns_group_posts() {
        let (_, _, posts, author, group) = seed().await;

        posts
            .save(Post::new(author.id, "grouped".to_string(), Some(group.id)))
            .await
            .unwrap();
        posts
            .save(Post::new(author.id, "loose".to_string(), None))
            .await
            .unwrap();

        let feed = posts.by_group(group.id, 0, 10).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.text, "grouped");
        assert_eq!(feed[0].group.as_ref().unwrap().slug, "rust");
        assert_eq!(posts.count_by_group(group.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn author_filter_excludes_other_authors() {
        let (users, _, posts, author, _) = seed().await;

        let other = users
            .save(User::new("vader".to_string(), "x".to_string()))
            .await
            .unwrap();
        posts
            .save(Post::new(author.id, "mine".to_string(), None))
            .await
            .unwrap();
        posts
            .save(Post::new(other.id, "theirs".to_string(), None))
            .await
            .unwrap();

        let feed = posts.by_author(author.id, 0, 10).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.text, "mine");
        assert_eq!(posts.count_by_author(author.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_updates_in_place() {
        let (_, _, posts, author, _) = seed().await;

        let mut post = posts
            .save(Post::new(author.id, "before".to_string(), None))
            .await
            .unwrap();
        post.text = "after".to_string();
        posts.save(post.clone()).await.unwrap();

        assert_eq!(posts.count().await.unwrap(), 1);
        let found = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.text, "after");
        assert_eq!(found.pub_date, post.pub_date);
    }

    #[tokio::test]
    async fn lookups_by_username_and_slug() {
        let (users, groups, _, _, _) = seed().await;

        assert!(
            users
                .find_by_username("skywalker")
                .await
                .unwrap()
                .is_some()
        );
        assert!(users.find_by_username("nobody").await.unwrap().is_none());
        assert!(groups.find_by_slug("rust").await.unwrap().is_some());
        assert!(groups.find_by_slug("jazz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (users, _, _, _, _) = seed().await;
        let result = users.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}

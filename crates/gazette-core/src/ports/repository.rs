use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, Post, PostDetail, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    /// Find a group by its unique slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title, for the post form's group selector.
    async fn all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository.
///
/// The feed queries return author- and group-joined rows, pre-ordered by
/// publication timestamp descending, windowed with an explicit offset/limit.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// The newest posts across all authors and groups.
    async fn recent(&self, offset: u64, limit: u64) -> Result<Vec<PostDetail>, RepoError>;

    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    /// The newest posts in one group.
    async fn by_group(
        &self,
        group_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError>;

    /// Number of posts in one group.
    async fn count_by_group(&self, group_id: Uuid) -> Result<u64, RepoError>;

    /// The newest posts by one author.
    async fn by_author(
        &self,
        author_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError>;

    /// Number of posts by one author.
    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

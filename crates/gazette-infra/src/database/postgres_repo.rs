//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use gazette_core::domain::{Group, PostDetail, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{GroupRepository, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn all(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

impl PostgresPostRepository {
    /// Run a feed query: newest first, offset/limit window, then load the
    /// author and group rows for each post.
    async fn feed(
        &self,
        select: Select<PostEntity>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError> {
        let posts = select
            .order_by_desc(post::Column::PubDate)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let authors = posts
            .load_one(UserEntity, &self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        let groups = posts
            .load_one(GroupEntity, &self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        posts
            .into_iter()
            .zip(authors)
            .zip(groups)
            .map(|((post, author), group)| {
                // author_id is a non-null foreign key
                let author = author
                    .ok_or_else(|| RepoError::Constraint("post without author row".to_string()))?;
                Ok(PostDetail {
                    post: post.into(),
                    author: author.into(),
                    group: group.map(Into::into),
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn recent(&self, offset: u64, limit: u64) -> Result<Vec<PostDetail>, RepoError> {
        self.feed(PostEntity::find(), offset, limit).await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn by_group(
        &self,
        group_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError> {
        let select = PostEntity::find().filter(post::Column::GroupId.eq(group_id));
        self.feed(select, offset, limit).await
    }

    async fn count_by_group(&self, group_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::GroupId.eq(group_id))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn by_author(
        &self,
        author_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, RepoError> {
        let select = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        self.feed(select, offset, limit).await
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}

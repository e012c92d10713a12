use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, FeedEntry, Location, Post, User};
use crate::error::RepoError;
use crate::feed::FeedQuery;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository. Categories are addressed by slug on the public surface.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, ordered by title.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// All locations, ordered by name.
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of the feed described by `query`, newest `pub_date` first,
    /// each post annotated with its comment count.
    async fn feed(&self, query: FeedQuery, page: PageRequest)
    -> Result<Page<FeedEntry>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// A comment, only if it belongs to `post_id`.
    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;
}

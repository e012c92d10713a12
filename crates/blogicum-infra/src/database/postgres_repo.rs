//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, FeedEntry, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::feed::{FeedQuery, FeedScope, FeedVisibility};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// SQL form of the visibility rule; relies on `categories` being left-joined.
fn visible_to(viewer: Option<Uuid>, now: DateTime<Utc>) -> Condition {
    let public = Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        );

    match viewer {
        Some(viewer) => Condition::any()
            .add(post::Column::AuthorId.eq(viewer))
            .add(public),
        None => public,
    }
}

impl PostgresPostRepository {
    async fn comment_counts(&self, post_ids: Vec<Uuid>) -> Result<HashMap<Uuid, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, count)| (post_id, count.max(0) as u64))
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn feed(
        &self,
        query: FeedQuery,
        page: PageRequest,
    ) -> Result<Page<FeedEntry>, RepoError> {
        let mut select =
            PostEntity::find().join(JoinType::LeftJoin, post::Relation::Category.def());

        select = match query.scope {
            FeedScope::All => select,
            FeedScope::Category(id) => select.filter(post::Column::CategoryId.eq(id)),
            FeedScope::Author(id) => select.filter(post::Column::AuthorId.eq(id)),
        };

        if let FeedVisibility::VisibleTo { viewer, now } = query.visibility {
            select = select.filter(visible_to(viewer, now));
        }

        let paginator = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, page.size);

        let total_items = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(map_db_err)?;

        let counts = self
            .comment_counts(models.iter().map(|m| m.id).collect())
            .await?;

        let items = models
            .into_iter()
            .map(|model| {
                let comment_count = counts.get(&model.id).copied().unwrap_or(0);
                FeedEntry {
                    post: Post::from(model),
                    comment_count,
                }
            })
            .collect();

        tracing::debug!(?query, page = page.number, total_items, "Feed page loaded");

        Ok(Page::new(items, page, total_items))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(comment_id)
            .filter(comment::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

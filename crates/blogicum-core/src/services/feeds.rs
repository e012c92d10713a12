use chrono::Utc;
use uuid::Uuid;

use super::BlogService;
use crate::domain::{Category, FeedEntry, User};
use crate::error::DomainError;
use crate::feed::FeedQuery;
use crate::pagination::{Page, PageRequest};

impl BlogService {
    /// The global feed as seen by `viewer`.
    pub async fn index_feed(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<FeedEntry>, DomainError> {
        self.feed(FeedQuery::index(viewer, Utc::now()), page).await
    }

    /// Posts of one published category as seen by `viewer`.
    pub async fn category_feed(
        &self,
        viewer: Option<Uuid>,
        slug: &str,
        page: PageRequest,
    ) -> Result<(Category, Page<FeedEntry>), DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let page = self
            .feed(FeedQuery::category(category.id, viewer, Utc::now()), page)
            .await?;

        Ok((category, page))
    }

    /// Every post written by `username`, hidden ones included.
    pub async fn profile_feed(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<(User, Page<FeedEntry>), DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let page = self.feed(FeedQuery::profile(user.id), page).await?;

        Ok((user, page))
    }

    async fn feed(
        &self,
        query: FeedQuery,
        request: PageRequest,
    ) -> Result<Page<FeedEntry>, DomainError> {
        if !request.is_addressable() {
            return Err(DomainError::not_found("page", request.number));
        }

        let page = self.repos.posts.feed(query, request).await?;
        if !page.in_range() {
            return Err(DomainError::not_found("page", request.number));
        }

        Ok(page)
    }
}

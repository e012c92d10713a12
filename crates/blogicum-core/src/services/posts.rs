use chrono::Utc;
use uuid::Uuid;

use super::{BlogService, REQUIRED, TITLE_MAX_CHARS};
use crate::domain::{Category, Location, Post, PostDetail, PostInput, PostUpdate};
use crate::error::{DomainError, FieldErrors};
use crate::policy;

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

impl BlogService {
    /// A single post with its comments, if `viewer` may see it.
    pub async fn post_detail(
        &self,
        viewer: Option<Uuid>,
        post_id: Uuid,
    ) -> Result<PostDetail, DomainError> {
        let post = self.load_post(post_id).await?;

        let category = match post.category_id {
            Some(id) => self.repos.categories.find_by_id(id).await?,
            None => None,
        };

        if !policy::is_visible(viewer, &post, category.as_ref(), Utc::now()) {
            return Err(DomainError::not_found("post", post_id));
        }

        let location = match post.location_id {
            Some(id) => self.repos.locations.find_by_id(id).await?,
            None => None,
        };
        let comments = self.repos.comments.list_for_post(post.id).await?;

        Ok(PostDetail {
            post,
            category,
            location,
            comments,
        })
    }

    /// Categories and locations a post form may reference.
    pub async fn post_form_choices(&self) -> Result<(Vec<Category>, Vec<Location>), DomainError> {
        let categories = self.repos.categories.list().await?;
        let locations = self.repos.locations.list().await?;
        Ok((categories, locations))
    }

    /// Create a post authored by `viewer`.
    pub async fn create_post(&self, viewer: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let mut errors = FieldErrors::new();
        check_title_and_text(&input.title, &input.text, &mut errors);
        self.check_references(input.category_id, input.location_id, &mut errors)
            .await?;
        errors.into_result()?;

        let post = Post::new(viewer, input);
        Ok(self.repos.posts.insert(post).await?)
    }

    /// The post `viewer` wants to edit or delete, provided they wrote it.
    pub async fn owned_post(&self, viewer: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.load_post(post_id).await?;
        if !policy::can_modify(viewer, &post) {
            return Err(DomainError::Forbidden("only the author may change this post"));
        }
        Ok(post)
    }

    pub async fn update_post(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        update: PostUpdate,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(viewer, post_id).await?;

        let mut errors = FieldErrors::new();
        check_title_and_text(&update.title, &update.text, &mut errors);
        self.check_references(
            update.category_id.flatten(),
            update.location_id.flatten(),
            &mut errors,
        )
        .await?;
        errors.into_result()?;

        post.apply(update);
        Ok(self.repos.posts.update(post).await?)
    }

    /// Delete a post and, with it, its comments.
    pub async fn delete_post(&self, viewer: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.owned_post(viewer, post_id).await?;
        self.repos.posts.delete(post.id).await?;
        Ok(post)
    }

    pub(super) async fn load_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn check_references(
        &self,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
        errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        if let Some(id) = category_id {
            if self.repos.categories.find_by_id(id).await?.is_none() {
                errors.add("category", INVALID_CHOICE);
            }
        }
        if let Some(id) = location_id {
            if self.repos.locations.find_by_id(id).await?.is_none() {
                errors.add("location", INVALID_CHOICE);
            }
        }
        Ok(())
    }
}

fn check_title_and_text(title: &str, text: &str, errors: &mut FieldErrors) {
    if title.trim().is_empty() {
        errors.add("title", REQUIRED);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("Ensure this value has at most {TITLE_MAX_CHARS} characters."),
        );
    }
    if text.trim().is_empty() {
        errors.add("text", REQUIRED);
    }
}

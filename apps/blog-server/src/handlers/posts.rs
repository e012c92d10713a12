//! Post detail, create, edit and delete.
//!
//! Mutations answer with `303 See Other`. A non-author trying to edit is sent
//! back to the post instead of being refused; deleting refuses with 403.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::FieldErrors;
use blogicum_core::domain::{Post, PostInput, PostUpdate};
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{PostForm, PostFormResponse};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const REQUIRED: &str = "This field is required.";

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(viewer.user_id(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::detail(detail))))
}

/// GET /api/posts/create
pub async fn create_form(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    form_response(&state, None).await
}

/// POST /api/posts/create
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner();

    let Some(pub_date) = form.pub_date else {
        let mut errors = FieldErrors::new();
        errors.add("pub_date", REQUIRED);
        return Err(DomainError::Validation(errors).into());
    };

    let input = PostInput {
        title: form.title,
        text: form.text,
        image: form.image.flatten(),
        pub_date,
        location_id: form.location.flatten(),
        category_id: form.category.flatten(),
        is_published: form.is_published.unwrap_or(true),
    };

    let post = state.blog.create_post(identity.user_id, input).await?;
    tracing::info!(user_id = %identity.user_id, post_id = %post.id, "Post created");

    // The token may predate a username change.
    let author = state.blog.profile(identity.user_id).await?;
    Ok(views::see_other(views::profile_url(&author.username)))
}

/// GET /api/posts/{post_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    match state.blog.owned_post(identity.user_id, post_id).await {
        Ok(post) => form_response(&state, Some(post)).await,
        Err(DomainError::Forbidden(_)) => Ok(views::see_other(views::post_url(post_id))),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/posts/{post_id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = body.into_inner();

    let update = PostUpdate {
        title: form.title,
        text: form.text,
        image: form.image,
        pub_date: form.pub_date,
        location_id: form.location,
        category_id: form.category,
        is_published: form.is_published,
    };

    match state.blog.update_post(identity.user_id, post_id, update).await {
        Ok(_) => {
            tracing::info!(user_id = %identity.user_id, %post_id, "Post updated");
        }
        Err(DomainError::Forbidden(_)) => {
            tracing::debug!(user_id = %identity.user_id, %post_id, "Edit by non-author redirected");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(views::see_other(views::post_url(post_id)))
}

/// GET /api/posts/{post_id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .owned_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(post))))
}

/// POST /api/posts/{post_id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    tracing::info!(user_id = %identity.user_id, post_id = %post.id, "Post deleted");

    Ok(views::see_other(views::INDEX_URL))
}

async fn form_response(state: &AppState, initial: Option<Post>) -> AppResult<HttpResponse> {
    let (categories, locations) = state.blog.post_form_choices().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostFormResponse {
        initial: initial.map(views::post),
        categories: categories.into_iter().map(views::category).collect(),
        locations: locations.into_iter().map(views::location).collect(),
    })))
}

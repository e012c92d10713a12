//! Comment create, edit and delete.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::CommentInput;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::CommentForm;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/add_comment/{post_id}
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let input = CommentInput {
        text: body.into_inner().text,
    };

    let comment = state
        .blog
        .add_comment(identity.user_id, post_id, input)
        .await?;

    tracing::info!(user_id = %identity.user_id, %post_id, comment_id = %comment.id, "Comment added");

    Ok(views::see_other(views::post_url(post_id)))
}

/// Any other method on /api/add_comment/{post_id}.
pub async fn reject_method() -> AppResult<HttpResponse> {
    Err(AppError::Forbidden(
        "Comments can only be added with POST".to_string(),
    ))
}

/// GET /api/posts/{post_id}/edit_comment/{comment_id}
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .blog
        .owned_comment(identity.user_id, post_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::comment(comment))))
}

/// POST /api/posts/{post_id}/edit_comment/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let input = CommentInput {
        text: body.into_inner().text,
    };

    state
        .blog
        .update_comment(identity.user_id, post_id, comment_id, input)
        .await?;

    tracing::info!(user_id = %identity.user_id, %post_id, %comment_id, "Comment updated");

    Ok(views::see_other(views::post_url(post_id)))
}

/// GET /api/posts/{post_id}/delete_comment/{comment_id}
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .blog
        .owned_comment(identity.user_id, post_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::comment(comment))))
}

/// POST /api/posts/{post_id}/delete_comment/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    state
        .blog
        .delete_comment(identity.user_id, post_id, comment_id)
        .await?;

    tracing::info!(user_id = %identity.user_id, %post_id, %comment_id, "Comment deleted");

    Ok(views::see_other(views::post_url(post_id)))
}

//! Editing the viewer's own profile.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blogicum_core::domain::ProfileUpdate;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::ProfileForm;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.blog.profile(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileForm {
        first_name: user.first_name,
        last_name: user.last_name,
        username: user.username,
        email: Some(user.email).filter(|email| !email.is_empty()),
    })))
}

/// POST /api/profile/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileForm>,
) -> AppResult<HttpResponse> {
    let mut form = body.into_inner();
    if form.email.as_deref().is_some_and(str::is_empty) {
        form.email = None;
    }
    form.validate()?;

    let update = ProfileUpdate {
        first_name: form.first_name,
        last_name: form.last_name,
        username: form.username,
        email: form.email.unwrap_or_default(),
    };

    let user = state.blog.update_profile(identity.user_id, update).await?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::user(user),
        "Profile updated",
    )))
}

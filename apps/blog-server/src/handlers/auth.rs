//! Registration and login.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use crate::middleware::error::{AppError, AppResult, field_messages};
use crate::state::AppState;

const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// POST /api/auth/registration
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = match req.validate() {
        Ok(()) => Default::default(),
        Err(e) => field_messages(&e),
    };
    if req.password != req.password_confirmation {
        errors
            .entry("password_confirmation".to_string())
            .or_insert_with(Vec::new)
            .push(PASSWORD_MISMATCH.to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .blog
        .register(req.username, req.email, password_hash)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, user.id, &user.username)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .blog
        .repositories()
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(username = %req.username, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, user.id, &user.username)?))
}

fn issue_token(state: &AppState, user_id: uuid::Uuid, username: &str) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user_id, username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

//! The three post listings: global, per category and per author.

use actix_web::{HttpResponse, web};

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{CategoryFeedResponse, PageQuery, ProfileFeedResponse};

use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/?page=N
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .index_feed(viewer.user_id(), views::page_request(query.page))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::feed(page))))
}

/// GET /api/category/{slug}?page=N
pub async fn category(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (category, page) = state
        .blog
        .category_feed(viewer.user_id(), &path, views::page_request(query.page))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryFeedResponse {
        category: views::category(category),
        page: views::feed(page),
    })))
}

/// GET /api/profile/{username}?page=N
///
/// Lists everything the user wrote, drafts and scheduled posts included.
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (user, page) = state
        .blog
        .profile_feed(&path, views::page_request(query.page))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileFeedResponse {
        profile: views::user(user),
        page: views::feed(page),
    })))
}

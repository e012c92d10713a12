//! Domain to wire conversions and redirect helpers.

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, FeedEntry, Location, Post, PostDetail, User};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_shared::PageResponse;
use blogicum_shared::dto::{
    CategoryResponse, CommentResponse, FeedEntryResponse, LocationResponse, PostDetailResponse,
    PostResponse, UserResponse,
};

pub const INDEX_URL: &str = "/api/";

pub fn post_url(post_id: Uuid) -> String {
    format!("/api/posts/{post_id}")
}

pub fn profile_url(username: &str) -> String {
    format!("/api/profile/{username}")
}

/// `303 See Other` so clients follow up with a GET.
pub fn see_other(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.into()))
        .finish()
}

/// `?page=` defaults to the first page.
pub fn page_request(page: Option<u64>) -> PageRequest {
    page.map(PageRequest::new).unwrap_or_default()
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text: post.text,
        image: post.image,
        pub_date: post.pub_date,
        location_id: post.location_id,
        category_id: post.category_id,
        is_published: post.is_published,
        created_at: post.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
    }
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        category: detail.category.map(category),
        location: detail.location.map(location),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn feed(page: Page<FeedEntry>) -> PageResponse<FeedEntryResponse> {
    let total_pages = page.total_pages();
    let has_next = page.has_next();
    let has_previous = page.has_previous();

    let page = page.map(|entry| FeedEntryResponse {
        post: post(entry.post),
        comment_count: entry.comment_count,
    });

    PageResponse {
        items: page.items,
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages,
        has_next,
        has_previous,
    }
}

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use blogicum_core::domain::{Category, CommentInput, Post, PostInput, PostUpdate, User};
use blogicum_core::ports::BaseRepository;
use blogicum_infra::{Argon2PasswordService, InMemoryBlogStore, JwtConfig, JwtTokenService};

use super::configure_app;
use crate::state::{AppState, in_memory};

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().configure(configure_app($state.clone()))).await
    };
}

fn state() -> (AppState, Arc<InMemoryBlogStore>) {
    let store = Arc::new(InMemoryBlogStore::new());
    let state = AppState::new(
        in_memory(store.clone()),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(JwtTokenService::new(JwtConfig::default())),
    );
    (state, store)
}

/// A stored user and a bearer header value for them.
async fn user(state: &AppState, store: &InMemoryBlogStore, username: &str) -> (User, String) {
    let user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        "unused".to_string(),
    );
    let user = BaseRepository::<User, Uuid>::insert(store, user)
        .await
        .unwrap();
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    (user, format!("Bearer {token}"))
}

async fn post(state: &AppState, author: &User, hours_from_now: i64) -> Post {
    state
        .blog
        .create_post(
            author.id,
            PostInput {
                title: "Hello".to_string(),
                text: "First words".to_string(),
                image: None,
                pub_date: Utc::now() + Duration::hours(hours_from_now),
                location_id: None,
                category_id: None,
                is_published: true,
            },
        )
        .await
        .unwrap()
}

fn location_of<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_rt::test]
async fn test_health_check() {
    let (state, _) = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_registration_and_login() {
    let (state, _) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/registration")
        .set_json(json!({
            "username": "anna",
            "email": "anna@example.com",
            "password": "correct horse",
            "password_confirmation": "correct horse"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");

    let req = test::TestRequest::post()
        .uri("/api/auth/registration")
        .set_json(json!({
            "username": "anna",
            "email": "other@example.com",
            "password": "another secret",
            "password_confirmation": "another secret"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "anna", "password": "wrong password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "anna", "password": "correct horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn test_registration_password_mismatch() {
    let (state, _) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/registration")
        .set_json(json!({
            "username": "boris",
            "email": "boris@example.com",
            "password": "long enough",
            "password_confirmation": "long enougH"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["password_confirmation"].is_array());
}

#[actix_rt::test]
async fn test_empty_index_has_one_page() {
    let (state, _) = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_pages"], 1);
    assert_eq!(body["data"]["items"], json!([]));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/?page=2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_huge_page_number_is_not_found() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    post(&state, &author, -1).await;

    for uri in [
        "/api/?page=18446744073709551615",
        "/api/?page=1844674407370955162",
        "/api/profile/author?page=18446744073709551615",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_future_post_visible_only_to_author() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "author").await;
    let scheduled = post(&state, &author, 2).await;
    let uri = format!("/api/posts/{}", scheduled.id);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["post"]["id"], scheduled.id.to_string());
}

#[actix_rt::test]
async fn test_unpublished_category_is_not_found() {
    let (state, store) = state();
    let app = app!(state);
    BaseRepository::<Category, Uuid>::insert(
        store.as_ref(),
        Category::new("Drafts", "Work in progress", "drafts").unpublished(),
    )
    .await
    .unwrap();

    let req = test::TestRequest::get().uri("/api/category/drafts").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_profile_feed_includes_hidden_posts() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "writer").await;
    post(&state, &author, 48).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/profile/writer").to_request())
            .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["profile"]["username"], "writer");
    assert_eq!(body["data"]["page"]["total_items"], 1);
}

#[actix_rt::test]
async fn test_create_post_requires_login() {
    let (state, _) = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/posts/create").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_create_post_redirects_to_profile() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "anna").await;
    let (someone_else, _) = user(&state, &store, "boris").await;

    let req = test::TestRequest::post()
        .uri("/api/posts/create")
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(json!({
            "title": "Trip",
            "text": "We went north.",
            "pub_date": Utc::now(),
            "author": someone_else.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), "/api/profile/anna");

    let (_, page) = state
        .blog
        .profile_feed("anna", blogicum_core::PageRequest::first())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].post.author_id, author.id);
}

#[actix_rt::test]
async fn test_create_post_reports_field_errors() {
    let (state, store) = state();
    let app = app!(state);
    let (_, bearer) = user(&state, &store, "anna").await;

    let req = test::TestRequest::post()
        .uri("/api/posts/create")
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(json!({ "title": "", "text": "body", "pub_date": Utc::now() }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["title"].is_array());
}

#[actix_rt::test]
async fn test_non_author_edit_redirects_to_detail() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, intruder) = user(&state, &store, "intruder").await;
    let original = post(&state, &author, -1).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", original.id))
        .insert_header((header::AUTHORIZATION, intruder))
        .set_json(json!({ "title": "Defaced", "text": "gotcha" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), format!("/api/posts/{}", original.id));

    let detail = state.blog.post_detail(None, original.id).await.unwrap();
    assert_eq!(detail.post.title, "Hello");
}

#[actix_rt::test]
async fn test_non_author_edit_form_redirects_to_detail() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, intruder) = user(&state, &store, "intruder").await;
    let original = post(&state, &author, -1).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/edit", original.id))
        .insert_header((header::AUTHORIZATION, intruder))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), format!("/api/posts/{}", original.id));
}

#[actix_rt::test]
async fn test_editing_draft_without_publish_flag_keeps_it_hidden() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "author").await;
    let draft = state
        .blog
        .create_post(
            author.id,
            PostInput {
                title: "Draft".to_string(),
                text: "wip".to_string(),
                image: Some("images/sketch.png".to_string()),
                pub_date: Utc::now() - Duration::hours(1),
                location_id: None,
                category_id: None,
                is_published: false,
            },
        )
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", draft.id))
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(json!({ "title": "Draft v2", "text": "still wip" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert!(state.blog.post_detail(None, draft.id).await.is_err());
    let own = state
        .blog
        .post_detail(Some(author.id), draft.id)
        .await
        .unwrap();
    assert_eq!(own.post.title, "Draft v2");
    assert!(!own.post.is_published);
    assert_eq!(own.post.image.as_deref(), Some("images/sketch.png"));
}

#[actix_rt::test]
async fn test_edit_clears_image_on_explicit_null() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "author").await;
    let original = post(&state, &author, -1).await;
    state
        .blog
        .update_post(
            author.id,
            original.id,
            PostUpdate {
                image: Some(Some("images/old.png".to_string())),
                ..PostUpdate::text_only("Hello", "First words")
            },
        )
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", original.id))
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(json!({ "title": "Hello", "text": "First words", "image": null }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);

    let detail = state.blog.post_detail(None, original.id).await.unwrap();
    assert_eq!(detail.post.image, None);
    assert!(detail.post.is_published);
}

#[actix_rt::test]
async fn test_non_author_delete_is_forbidden() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, intruder) = user(&state, &store, "intruder").await;
    let target = post(&state, &author, -1).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/delete", target.id))
        .insert_header((header::AUTHORIZATION, intruder))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    assert!(state.blog.post_detail(None, target.id).await.is_ok());
}

#[actix_rt::test]
async fn test_author_deletes_post() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "author").await;
    let target = post(&state, &author, -1).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/delete", target.id))
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), "/api/");
    assert!(state.blog.post_detail(Some(author.id), target.id).await.is_err());
}

#[actix_rt::test]
async fn test_add_comment_rejects_get() {
    let (state, store) = state();
    let app = app!(state);
    let (author, bearer) = user(&state, &store, "author").await;
    let target = post(&state, &author, -1).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/add_comment/{}", target.id))
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    let detail = state.blog.post_detail(None, target.id).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[actix_rt::test]
async fn test_add_comment_redirects_to_post() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, reader) = user(&state, &store, "reader").await;
    let target = post(&state, &author, -1).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/add_comment/{}", target.id))
        .insert_header((header::AUTHORIZATION, reader))
        .set_json(json!({ "text": "Nice one" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), format!("/api/posts/{}", target.id));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"][0]["comment_count"], 1);
}

#[actix_rt::test]
async fn test_non_author_cannot_delete_comment() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, intruder) = user(&state, &store, "intruder").await;
    let target = post(&state, &author, -1).await;
    let comment = state
        .blog
        .add_comment(
            author.id,
            target.id,
            CommentInput {
                text: "Mine".to_string(),
            },
        )
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/posts/{}/delete_comment/{}",
            target.id, comment.id
        ))
        .insert_header((header::AUTHORIZATION, intruder))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    let detail = state.blog.post_detail(None, target.id).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
}

#[actix_rt::test]
async fn test_non_author_cannot_edit_comment() {
    let (state, store) = state();
    let app = app!(state);
    let (author, _) = user(&state, &store, "author").await;
    let (_, intruder) = user(&state, &store, "intruder").await;
    let target = post(&state, &author, -1).await;
    let comment = state
        .blog
        .add_comment(
            author.id,
            target.id,
            CommentInput {
                text: "Original".to_string(),
            },
        )
        .await
        .unwrap();
    let uri = format!("/api/posts/{}/edit_comment/{}", target.id, comment.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, intruder.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, intruder))
        .set_json(json!({ "text": "Defaced" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let detail = state.blog.post_detail(None, target.id).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].text, "Original");
}

#[actix_rt::test]
async fn test_profile_edit_round_trip() {
    let (state, store) = state();
    let app = app!(state);
    let (_, bearer) = user(&state, &store, "anna").await;

    let req = test::TestRequest::get()
        .uri("/api/profile/edit")
        .insert_header((header::AUTHORIZATION, bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "anna");

    let req = test::TestRequest::post()
        .uri("/api/profile/edit")
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(json!({
            "first_name": "Anna",
            "last_name": "Karenina",
            "username": "anna_k",
            "email": ""
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "anna_k");
    assert_eq!(body["message"], "Profile updated");
}

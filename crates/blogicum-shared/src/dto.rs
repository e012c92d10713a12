//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::response::PageResponse;

// ─── Requests ──────────────────────────────────────────────────

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters long"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password: String,
    pub password_confirmation: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Editable profile fields; also returned pre-filled by `GET /profile/edit`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    pub username: String,
    /// Blank is allowed; anything else must be an address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

/// Post create/edit submission. Any `author` sent by the client is ignored.
///
/// On edit an omitted field keeps its stored value; `image`, `location` and
/// `category` are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    /// Required on create.
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
}

/// Tells an omitted field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

/// `?page=N` query string of feed routes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

// ─── Responses ─────────────────────────────────────────────────

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// A feed item: the post plus its comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntryResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub category: Option<CategoryResponse>,
    pub location: Option<LocationResponse>,
    pub comments: Vec<CommentResponse>,
}

/// `GET /category/{slug}`: the category and one page of its posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFeedResponse {
    pub category: CategoryResponse,
    pub page: PageResponse<FeedEntryResponse>,
}

/// `GET /profile/{username}`: the author and one page of everything they wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFeedResponse {
    pub profile: UserResponse,
    pub page: PageResponse<FeedEntryResponse>,
}

/// What a post form needs: current values (when editing) and the selectable choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub initial: Option<PostResponse>,
    pub categories: Vec<CategoryResponse>,
    pub locations: Vec<LocationResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_rules() {
        let request = RegisterUserRequest {
            username: String::new(),
            email: "not-an-address".to_string(),
            password: "short".to_string(),
            password_confirmation: "short".to_string(),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_profile_email_is_optional() {
        let form: ProfileForm = serde_json::from_str(r#"{"username": "anna"}"#).unwrap();
        assert!(form.validate().is_ok());

        let form: ProfileForm =
            serde_json::from_str(r#"{"username": "anna", "email": "nope"}"#).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_post_form_tells_missing_from_null() {
        let form: PostForm =
            serde_json::from_str(r#"{"title": "t", "text": "x", "image": null}"#).unwrap();

        assert_eq!(form.image, Some(None));
        assert_eq!(form.location, None);
        assert_eq!(form.category, None);
        assert_eq!(form.is_published, None);

        let form: PostForm =
            serde_json::from_str(r#"{"image": "images/a.png", "category": null}"#).unwrap();
        assert_eq!(form.image, Some(Some("images/a.png".to_string())));
        assert_eq!(form.category, Some(None));
    }

    #[test]
    fn test_feed_entry_is_flat() {
        let entry = FeedEntryResponse {
            post: PostResponse {
                id: Uuid::nil(),
                author_id: Uuid::nil(),
                title: "Hello".to_string(),
                text: "World".to_string(),
                image: None,
                pub_date: Utc::now(),
                location_id: None,
                category_id: None,
                is_published: true,
                created_at: Utc::now(),
            },
            comment_count: 2,
        };

        let body = serde_json::to_value(entry).unwrap();

        assert_eq!(body["title"], "Hello");
        assert_eq!(body["comment_count"], 2);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Authored, Category, Comment, Location, Publishable};

/// Post entity - a blog post, possibly scheduled for later publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    /// Publication time. A future value schedules the post.
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Values submitted when creating a post.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
}

/// Values submitted when editing a post.
///
/// `None` keeps the stored value. For the nullable fields `Some(None)` clears it.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub text: String,
    pub image: Option<Option<String>>,
    pub pub_date: Option<DateTime<Utc>>,
    pub location_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
}

impl PostUpdate {
    /// Only title and text; everything else stays as stored.
    pub fn text_only(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            image: None,
            pub_date: None,
            location_id: None,
            category_id: None,
            is_published: None,
        }
    }
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, input: PostInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: input.title,
            text: input.text,
            image: input.image,
            pub_date: input.pub_date,
            location_id: input.location_id,
            category_id: input.category_id,
            is_published: input.is_published,
            created_at: Utc::now(),
        }
    }

    /// Apply an edit. The author is never touched.
    pub fn apply(&mut self, update: PostUpdate) {
        self.title = update.title;
        self.text = update.text;
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(pub_date) = update.pub_date {
            self.pub_date = pub_date;
        }
        if let Some(location_id) = update.location_id {
            self.location_id = location_id;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(is_published) = update.is_published {
            self.is_published = is_published;
        }
    }
}

impl Publishable for Post {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// A post as listed in a feed, annotated with its number of comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub post: Post,
    pub comment_count: u64,
}

/// A single post with its related records and comments (oldest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input() -> PostInput {
        PostInput {
            title: "Morning".to_string(),
            text: "Coffee first".to_string(),
            image: None,
            pub_date: Utc::now(),
            location_id: None,
            category_id: None,
            is_published: true,
        }
    }

    #[test]
    fn test_apply_keeps_author_and_pub_date_when_absent() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, input());
        let original_date = post.pub_date;

        post.apply(PostUpdate {
            image: Some(Some("images/tea.png".to_string())),
            is_published: Some(false),
            ..PostUpdate::text_only("Evening", "Tea now")
        });

        assert_eq!(post.author_id, author);
        assert_eq!(post.pub_date, original_date);
        assert_eq!(post.title, "Evening");
        assert_eq!(post.image.as_deref(), Some("images/tea.png"));
        assert!(!post.is_published);
    }

    #[test]
    fn test_apply_leaves_unsubmitted_fields_alone() {
        let category = Uuid::new_v4();
        let mut post = Post::new(
            Uuid::new_v4(),
            PostInput {
                image: Some("images/draft.png".to_string()),
                category_id: Some(category),
                is_published: false,
                ..input()
            },
        );

        post.apply(PostUpdate::text_only("Draft v2", "still wip"));

        assert_eq!(post.title, "Draft v2");
        assert!(!post.is_published);
        assert_eq!(post.image.as_deref(), Some("images/draft.png"));
        assert_eq!(post.category_id, Some(category));
    }

    #[test]
    fn test_apply_clears_nullable_fields() {
        let mut post = Post::new(
            Uuid::new_v4(),
            PostInput {
                image: Some("images/old.png".to_string()),
                location_id: Some(Uuid::new_v4()),
                ..input()
            },
        );

        post.apply(PostUpdate {
            image: Some(None),
            location_id: Some(None),
            ..PostUpdate::text_only("Morning", "Coffee first")
        });

        assert_eq!(post.image, None);
        assert_eq!(post.location_id, None);
    }

    #[test]
    fn test_apply_reschedules() {
        let mut post = Post::new(Uuid::new_v4(), input());
        let later = Utc::now() + Duration::days(2);

        post.apply(PostUpdate {
            pub_date: Some(later),
            ..PostUpdate::text_only("Morning", "Coffee first")
        });

        assert_eq!(post.pub_date, later);
    }
}

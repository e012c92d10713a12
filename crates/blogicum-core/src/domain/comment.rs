use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Authored;

/// Comment entity - belongs to exactly one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Values submitted when writing or editing a comment.
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub text: String,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, input: CommentInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text: input.text,
            created_at: Utc::now(),
        }
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

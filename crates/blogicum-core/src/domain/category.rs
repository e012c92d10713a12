use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Publishable;

/// Category entity - groups posts under a public slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Unique, URL-safe identifier used in category feed routes.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new published category.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            slug: slug.into(),
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }
}

impl Publishable for Category {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

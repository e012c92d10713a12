//! Visibility and ownership rules.
//!
//! Both rules are pure functions of the viewer and the record; the caller
//! supplies the clock and the post's category so nothing here touches storage.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Authored, Category, Post, Publishable};

/// Whether `viewer` may see `post`.
///
/// Authors always see their own posts. Everyone else needs the post to be
/// published, its publication date to have passed, and its category (if any)
/// to be published.
pub fn is_visible(
    viewer: Option<Uuid>,
    post: &Post,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> bool {
    if viewer == Some(post.author_id) {
        return true;
    }

    post.is_published() && post.pub_date <= now && category.is_none_or(|c| c.is_published())
}

/// Whether `viewer` may edit or delete `resource`.
pub fn can_modify<R: Authored>(viewer: Uuid, resource: &R) -> bool {
    viewer == resource.author_id()
}

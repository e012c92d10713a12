//! Feed query descriptions.
//!
//! A [`FeedQuery`] says which posts a feed lists; repositories turn it into
//! storage queries, sort by `pub_date` descending and attach comment counts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::policy;

/// Which posts a feed draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    All,
    Category(Uuid),
    Author(Uuid),
}

/// Which of those posts survive the visibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedVisibility {
    /// No filtering at all (profile listings).
    Everything,
    /// Only posts [`policy::is_visible`] admits for this viewer at this instant.
    VisibleTo {
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub scope: FeedScope,
    pub visibility: FeedVisibility,
}

impl FeedQuery {
    /// The global feed.
    pub fn index(viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::All,
            visibility: FeedVisibility::VisibleTo { viewer, now },
        }
    }

    pub fn category(category_id: Uuid, viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::Category(category_id),
            visibility: FeedVisibility::VisibleTo { viewer, now },
        }
    }

    /// Every post of one author, whatever its state.
    pub fn profile(author_id: Uuid) -> Self {
        Self {
            scope: FeedScope::Author(author_id),
            visibility: FeedVisibility::Everything,
        }
    }

    /// Whether `post` (with its resolved `category`) belongs in this feed.
    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        let in_scope = match self.scope {
            FeedScope::All => true,
            FeedScope::Category(id) => post.category_id == Some(id),
            FeedScope::Author(id) => post.author_id == id,
        };

        in_scope
            && match self.visibility {
                FeedVisibility::Everything => true,
                FeedVisibility::VisibleTo { viewer, now } => {
                    policy::is_visible(viewer, post, category, now)
                }
            }
    }
}

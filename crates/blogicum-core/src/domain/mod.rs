//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use category::Category;
pub use comment::{Comment, CommentInput};
pub use location::Location;
pub use post::{FeedEntry, Post, PostDetail, PostInput, PostUpdate};
pub use user::{ProfileUpdate, User};

/// Records that can be hidden from the public without being deleted.
pub trait Publishable {
    fn is_published(&self) -> bool;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Records owned by the user who created them.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

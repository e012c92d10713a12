//! Use-cases - the blog's read and write operations over the repository ports.
//!
//! Every operation takes the viewer explicitly. Hidden and missing records both
//! surface as [`DomainError::NotFound`](crate::DomainError::NotFound); ownership
//! failures surface as [`DomainError::Forbidden`](crate::DomainError::Forbidden)
//! and it is up to the caller to decide how to present them.

mod comments;
mod feeds;
mod posts;
mod profiles;

use std::sync::Arc;

use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

/// The set of repositories the blog runs on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// Blog use-cases.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }
}

/// Longest title accepted for posts.
pub const TITLE_MAX_CHARS: usize = 256;

pub(crate) const REQUIRED: &str = "This field is required.";

//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the visibility and ownership rules, pagination and the use-cases
//! that tie them to the repository ports.

pub mod domain;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldErrors, RepoError};
pub use feed::FeedQuery;
pub use pagination::{PAGE_SIZE, Page, PageRequest};
pub use services::BlogService;

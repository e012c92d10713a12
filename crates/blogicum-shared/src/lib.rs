//! # Blogicum Shared
//!
//! Wire types shared between the server and its clients.
//! Nothing here depends on the domain crate, so it also builds for WASM frontends.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PageResponse};

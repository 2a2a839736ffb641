//! Data models
//!
//! Typed entities for the tag cloud widget. `Blog` and `Tag` mirror tables
//! owned by the host CMS; `TagUsage` and `TagCloudEntry` are the ephemeral
//! records this crate produces.

mod blog;
mod tag;

pub use blog::Blog;
pub use tag::{TagCloudEntry, TagUsage};

//! Database repositories
//!
//! Repository pattern implementations for the widget's read path:
//! resolving blogs and aggregating tag usage.

pub mod blog;
pub mod tag_cloud;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use tag_cloud::{SqlxTagCloudRepository, TagCloudRepository};

//! Tag cloud records
//!
//! `TagUsage` is the raw aggregation row (one per distinct tag of a blog)
//! and `TagCloudEntry` is the finished record handed to the rendering layer.

use serde::{Deserialize, Serialize};

/// Aggregated usage of one tag within one blog, as returned by the
/// tag cloud query. Counts are always positive: tags with no posts in the
/// blog never produce a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    /// URL-friendly slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Number of posts in the blog carrying this tag
    pub count: i64,
}

/// One entry of a rendered tag cloud.
///
/// `normalized_tag` is the tag's relative weight in 0..=10, where the
/// most-used tag of the blog always scores exactly 10.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagCloudEntry {
    /// Display title of the tag
    pub tag_name: String,
    /// Link to the blog's listing for this tag
    pub link: String,
    /// Raw number of posts carrying the tag
    pub tag_count: i64,
    /// Weight normalized against the most-used tag, 0..=10
    pub normalized_tag: i64,
}

//! Blog model
//!
//! Owned by the host CMS; this crate only reads it to resolve a widget's
//! blog association and to build tag links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog: the owning content collection whose posts are tagged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Blog {
    /// Unique identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// URL segment the blog is served under
    pub url_segment: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Blog {
    /// Base link (URL prefix) for this blog, with a trailing slash.
    pub fn link(&self) -> String {
        format!("/{}/", self.url_segment)
    }

    /// Link to the listing of posts carrying the given tag.
    pub fn tag_link(&self, slug: &str) -> String {
        format!("{}tag/{}", self.link(), slug)
    }
}

//! Tag cloud computation
//!
//! `TagCloudWidget::get_tags` is the widget's one operation: resolve the
//! blog association, run the aggregate usage query, and normalize counts
//! onto a 0-10 scale against the most-used tag.

use crate::db::repositories::{BlogRepository, TagCloudRepository};
use crate::models::{Blog, TagCloudEntry, TagUsage};
use crate::widget::fields::CmsField;
use std::sync::Arc;

/// Error types for widget operations
///
/// A failed store query is distinct from an empty tag cloud: callers get an
/// error they can react to rather than a silently empty result.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The underlying store was unreachable or rejected the query
    #[error("Query error: {0}")]
    Query(#[from] anyhow::Error),
}

/// Tag cloud widget for a blog.
///
/// Holds the admin-configured state (display title, target blog) together
/// with the repositories it reads from. Purely read-only; concurrent
/// invocations share no mutable state.
pub struct TagCloudWidget {
    title: String,
    blog_id: Option<i64>,
    blogs: Arc<dyn BlogRepository>,
    usage: Arc<dyn TagCloudRepository>,
}

impl TagCloudWidget {
    /// Create a widget with no blog association and the default title.
    pub fn new(blogs: Arc<dyn BlogRepository>, usage: Arc<dyn TagCloudRepository>) -> Self {
        Self {
            title: "Tags Cloud".to_string(),
            blog_id: None,
            blogs,
            usage,
        }
    }

    /// Set the admin-configured widget title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Associate the widget with a blog.
    pub fn with_blog(mut self, blog_id: i64) -> Self {
        self.blog_id = Some(blog_id);
        self
    }

    /// The widget's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The associated blog, if one is configured.
    pub fn blog_id(&self) -> Option<i64> {
        self.blog_id
    }

    /// Compute the tag cloud for the associated blog.
    ///
    /// Returns one entry per distinct tag attached to at least one of the
    /// blog's posts, ordered by tag title ascending. Each entry carries the
    /// raw post count and a weight normalized against the most-used tag:
    /// `round(count * 10 / max_count)`, so the maximum always normalizes to
    /// exactly 10.
    ///
    /// A missing blog association (or a `blog_id` that no longer resolves)
    /// yields an empty result without touching the association store's
    /// aggregate query.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Query`] if the store is unreachable or the
    /// query fails. No internal retry.
    pub async fn get_tags(&self) -> Result<Vec<TagCloudEntry>, WidgetError> {
        let Some(blog_id) = self.blog_id else {
            return Ok(Vec::new());
        };

        let Some(blog) = self.blogs.get_by_id(blog_id).await? else {
            tracing::debug!(blog_id, "Widget blog association no longer resolves");
            return Ok(Vec::new());
        };

        let usage = self.usage.counts_for_blog(blog.id).await?;
        Ok(build_entries(&blog, &usage))
    }

    /// Augment the host's admin field set with this widget's fields.
    ///
    /// Appends a title text field and a blog-selection dropdown whose
    /// options are all known blogs. The host invokes this once at its
    /// form-building extension point.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Query`] if the blog listing for the dropdown
    /// options cannot be read.
    pub async fn cms_fields(&self, mut fields: Vec<CmsField>) -> Result<Vec<CmsField>, WidgetError> {
        fields.push(CmsField::Text {
            name: "title".to_string(),
            label: "Title".to_string(),
            value: self.title.clone(),
        });

        let options = self
            .blogs
            .list()
            .await?
            .into_iter()
            .map(|blog| (blog.id.to_string(), blog.title))
            .collect();

        fields.push(CmsField::Dropdown {
            name: "blog_id".to_string(),
            label: "Blog".to_string(),
            options,
            selected: self.blog_id.map(|id| id.to_string()),
        });

        Ok(fields)
    }
}

/// Build display entries from title-sorted usage rows.
fn build_entries(blog: &Blog, usage: &[TagUsage]) -> Vec<TagCloudEntry> {
    let max_count = usage.iter().map(|u| u.count).max().unwrap_or(0);

    usage
        .iter()
        .map(|u| TagCloudEntry {
            tag_name: u.title.clone(),
            link: blog.tag_link(&u.slug),
            tag_count: u.count,
            normalized_tag: normalize(u.count, max_count),
        })
        .collect()
}

/// Normalize a count onto the 0-10 scale, rounding half away from zero.
/// The most-used tag always scores 10; a rare tag in a large cloud can
/// round down to 0.
///
/// `max_count` is positive whenever any usage row exists, so the zero guard
/// only covers the vacuous no-rows case.
fn normalize(count: i64, max_count: i64) -> i64 {
    if max_count == 0 {
        return 0;
    }
    (count as f64 * 10.0 / max_count as f64).round() as i64
}

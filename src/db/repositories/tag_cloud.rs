//! Tag cloud repository
//!
//! The single aggregate read the widget issues: per-tag post counts for one
//! blog, joined through the post-tag association table. The blog identifier
//! is always bound as a typed parameter, never interpolated into the SQL.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::TagUsage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag cloud repository trait
#[async_trait]
pub trait TagCloudRepository: Send + Sync {
    /// Per-tag usage counts across the given blog's posts.
    ///
    /// Returns one row per distinct tag attached to at least one post of the
    /// blog, grouped by (slug, title) and ordered by title ascending. Tags
    /// unused within the blog produce no row.
    async fn counts_for_blog(&self, blog_id: i64) -> Result<Vec<TagUsage>>;
}

/// SQLx-based tag cloud repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagCloudRepository {
    pool: DynDatabasePool,
}

impl SqlxTagCloudRepository {
    /// Create a new SQLx tag cloud repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagCloudRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagCloudRepository for SqlxTagCloudRepository {
    async fn counts_for_blog(&self, blog_id: i64) -> Result<Vec<TagUsage>> {
        tracing::debug!(blog_id, "Querying tag usage counts");
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                counts_for_blog_sqlite(self.pool.as_sqlite().unwrap(), blog_id).await
            }
            DatabaseDriver::Mysql => {
                counts_for_blog_mysql(self.pool.as_mysql().unwrap(), blog_id).await
            }
        }
    }
}

const COUNTS_SQL: &str = r#"
    SELECT t.slug, t.title, COUNT(pt.tag_id) AS tag_count
    FROM blog_post_tags pt
    INNER JOIN blog_posts p ON p.id = pt.blog_post_id
    INNER JOIN tags t ON t.id = pt.tag_id
    WHERE p.blog_id = ?
    GROUP BY t.slug, t.title
    ORDER BY t.title ASC
"#;

async fn counts_for_blog_sqlite(pool: &SqlitePool, blog_id: i64) -> Result<Vec<TagUsage>> {
    let rows = sqlx::query(COUNTS_SQL)
        .bind(blog_id)
        .fetch_all(pool)
        .await
        .context("Failed to query tag usage counts")?;

    Ok(rows
        .iter()
        .map(|row| TagUsage {
            slug: row.get("slug"),
            title: row.get("title"),
            count: row.get("tag_count"),
        })
        .collect())
}

async fn counts_for_blog_mysql(pool: &MySqlPool, blog_id: i64) -> Result<Vec<TagUsage>> {
    let rows = sqlx::query(COUNTS_SQL)
        .bind(blog_id)
        .fetch_all(pool)
        .await
        .context("Failed to query tag usage counts")?;

    Ok(rows
        .iter()
        .map(|row| TagUsage {
            slug: row.get("slug"),
            title: row.get("title"),
            count: row.get("tag_count"),
        })
        .collect())
}

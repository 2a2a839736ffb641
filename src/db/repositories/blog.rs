//! Blog repository
//!
//! Read-only access to the CMS-owned blogs table. The widget uses it to
//! resolve its blog association and to list blogs for the admin dropdown.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Blog;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Get blog by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;

    /// List all blogs ordered by title
    async fn list(&self) -> Result<Vec<Blog>>;
}

/// SQLx-based blog repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    /// Create a new SQLx blog repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_blog_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_blog_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_blogs_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_blogs_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_blog_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, url_segment, created_at
        FROM blogs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get blog by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_blog_sqlite(&row))),
        None => Ok(None),
    }
}

async fn list_blogs_sqlite(pool: &SqlitePool) -> Result<Vec<Blog>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, url_segment, created_at
        FROM blogs
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list blogs")?;

    Ok(rows.iter().map(row_to_blog_sqlite).collect())
}

fn row_to_blog_sqlite(row: &sqlx::sqlite::SqliteRow) -> Blog {
    Blog {
        id: row.get("id"),
        title: row.get("title"),
        url_segment: row.get("url_segment"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_blog_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, url_segment, created_at
        FROM blogs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get blog by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_blog_mysql(&row))),
        None => Ok(None),
    }
}

async fn list_blogs_mysql(pool: &MySqlPool) -> Result<Vec<Blog>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, url_segment, created_at
        FROM blogs
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list blogs")?;

    Ok(rows.iter().map(row_to_blog_mysql).collect())
}

fn row_to_blog_mysql(row: &sqlx::mysql::MySqlRow) -> Blog {
    Blog {
        id: row.get("id"),
        title: row.get("title"),
        url_segment: row.get("url_segment"),
        created_at: row.get("created_at"),
    }
}

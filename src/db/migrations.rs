//! Database migrations
//!
//! Code-embedded migrations for the blog schema the widget reads. In a full
//! deployment this schema is owned by the host CMS; the embedded copy keeps
//! tests and demo databases self-contained. Each migration carries SQL for
//! both SQLite and MySQL; applied versions are tracked in a `_migrations`
//! table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with statements for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static [&'static str],
    /// SQL statements for MySQL
    pub up_mysql: &'static [&'static str],
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations, embedded in the binary.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_blogs",
        up_sqlite: &[
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                url_segment VARCHAR(255) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_blogs_url_segment ON blogs(url_segment)",
        ],
        up_mysql: &[
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(255) NOT NULL,
                url_segment VARCHAR(255) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            "CREATE INDEX idx_blogs_url_segment ON blogs(url_segment)",
        ],
    },
    Migration {
        version: 2,
        name: "create_blog_posts",
        up_sqlite: &[
            r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog_id INTEGER NOT NULL,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_blog_posts_blog_id ON blog_posts(blog_id)",
        ],
        up_mysql: &[
            r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                blog_id BIGINT NOT NULL,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (blog_id) REFERENCES blogs(id) ON DELETE CASCADE
            )
            "#,
            "CREATE INDEX idx_blog_posts_blog_id ON blog_posts(blog_id)",
        ],
    },
    Migration {
        version: 3,
        name: "create_tags",
        up_sqlite: &[
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_tags_slug ON tags(slug)",
        ],
        up_mysql: &[
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            "CREATE INDEX idx_tags_slug ON tags(slug)",
        ],
    },
    Migration {
        version: 4,
        name: "create_blog_post_tags",
        up_sqlite: &[
            r#"
            CREATE TABLE IF NOT EXISTS blog_post_tags (
                blog_post_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (blog_post_id, tag_id),
                FOREIGN KEY (blog_post_id) REFERENCES blog_posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_blog_post_tags_tag_id ON blog_post_tags(tag_id)",
        ],
        up_mysql: &[
            r#"
            CREATE TABLE IF NOT EXISTS blog_post_tags (
                blog_post_id BIGINT NOT NULL,
                tag_id BIGINT NOT NULL,
                PRIMARY KEY (blog_post_id, tag_id),
                FOREIGN KEY (blog_post_id) REFERENCES blog_posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            )
            "#,
            "CREATE INDEX idx_blog_post_tags_tag_id ON blog_post_tags(tag_id)",
        ],
    },
];

/// Run all pending migrations.
///
/// Creates the tracking table if needed, then applies any migration whose
/// version has not been recorded yet, in order.
///
/// # Returns
///
/// Number of migrations applied
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    let mut records = Vec::new();

    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let rows =
                sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
                    .fetch_all(pool.as_sqlite().expect("sqlite driver has sqlite pool"))
                    .await?;
            for row in rows {
                records.push(MigrationRecord {
                    version: row.get("version"),
                    name: row.get("name"),
                    applied_at: row.get("applied_at"),
                });
            }
        }
        DatabaseDriver::Mysql => {
            let rows =
                sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
                    .fetch_all(pool.as_mysql().expect("mysql driver has mysql pool"))
                    .await?;
            for row in rows {
                records.push(MigrationRecord {
                    version: row.get("version"),
                    name: row.get("name"),
                    applied_at: row.get("applied_at"),
                });
            }
        }
    }

    Ok(records)
}

/// Apply a single migration and record it
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let sqlite = pool.as_sqlite().expect("sqlite driver has sqlite pool");
            for statement in migration.up_sqlite {
                sqlx::query(statement)
                    .execute(sqlite)
                    .await
                    .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
            }
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(sqlite)
                .await?;
        }
        DatabaseDriver::Mysql => {
            let mysql = pool.as_mysql().expect("mysql driver has mysql pool");
            for statement in migration.up_mysql {
                sqlx::query(statement)
                    .execute(mysql)
                    .await
                    .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
            }
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(mysql)
                .await?;
        }
    }

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    let sql = sql.trim();
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(applied.len() == MIGRATIONS.len())
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(MIGRATIONS.len().saturating_sub(applied.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        // Running again should apply 0 migrations
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_is_up_to_date() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(!up_to_date);

        run_migrations(&pool).await.expect("Failed to run migrations");
        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(up_to_date);
    }

    #[tokio::test]
    async fn test_pending_count() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let pending = pending_count(&pool).await.expect("Failed to check");
        assert_eq!(pending, MIGRATIONS.len());

        run_migrations(&pool).await.expect("Failed to run migrations");
        let pending = pending_count(&pool).await.expect("Failed to check");
        assert_eq!(pending, 0);
    }

    #[tokio::test]
    async fn test_blog_schema_created() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        let result = sqlx::query("INSERT INTO blogs (title, url_segment) VALUES (?, ?)")
            .bind("News")
            .bind("news")
            .execute(sqlite_pool)
            .await;
        assert!(result.is_ok());

        let result = sqlx::query("INSERT INTO blog_posts (blog_id, title, slug) VALUES (1, ?, ?)")
            .bind("First Post")
            .bind("first-post")
            .execute(sqlite_pool)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_post_tag_join_cascades_on_post_delete() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        sqlx::query("INSERT INTO blogs (title, url_segment) VALUES ('News', 'news')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_posts (blog_id, title, slug) VALUES (1, 'Post', 'post')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tags (slug, title) VALUES ('rust', 'Rust')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_post_tags (blog_post_id, tag_id) VALUES (1, 1)")
            .execute(sqlite_pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM blog_posts WHERE id = 1")
            .execute(sqlite_pool)
            .await
            .unwrap();

        let row = sqlx::query("SELECT COUNT(*) as count FROM blog_post_tags")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_join_table_rejects_duplicate_pairs() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        sqlx::query("INSERT INTO blogs (title, url_segment) VALUES ('News', 'news')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_posts (blog_id, title, slug) VALUES (1, 'Post', 'post')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tags (slug, title) VALUES ('rust', 'Rust')")
            .execute(sqlite_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO blog_post_tags (blog_post_id, tag_id) VALUES (1, 1)")
            .execute(sqlite_pool)
            .await
            .unwrap();

        let duplicate = sqlx::query("INSERT INTO blog_post_tags (blog_post_id, tag_id) VALUES (1, 1)")
            .execute(sqlite_pool)
            .await;
        assert!(duplicate.is_err());
    }
}

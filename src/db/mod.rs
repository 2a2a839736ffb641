//! Database layer
//!
//! Trait-based pool abstraction over SQLite and MySQL, embedded migrations
//! for the blog schema the widget reads, and the repositories the widget
//! depends on. The driver is selected from configuration.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

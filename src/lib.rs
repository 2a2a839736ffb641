//! blog-tagcloud - tag cloud widget backend for blog modules
//!
//! This library computes normalized tag frequency listings ("tag clouds")
//! for a blog inside a host content-management system. The host owns widget
//! lifecycle, form rendering and templating; this crate owns the aggregation
//! query, the normalization algorithm and the typed entry records.

pub mod config;
pub mod db;
pub mod models;
pub mod widget;

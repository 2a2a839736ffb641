//! Tag cloud widget
//!
//! The widget proper: admin-configured state (title and blog association),
//! the `get_tags` operation producing normalized `TagCloudEntry` records,
//! and the explicit CMS field-augmentation contract.

pub mod fields;
pub mod tag_cloud;

pub use fields::CmsField;
pub use tag_cloud::{TagCloudWidget, WidgetError};

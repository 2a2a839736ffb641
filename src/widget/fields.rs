//! Admin field contract
//!
//! The two admin-editable fields of the widget, expressed as data the host
//! CMS renders however it likes. The host calls
//! [`TagCloudWidget::cms_fields`](crate::widget::TagCloudWidget::cms_fields)
//! once at its form-building extension point, passing the fields it already
//! has and receiving the augmented set back. No global registration hook.

use serde::{Deserialize, Serialize};

/// One admin-editable form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CmsField {
    /// Free text input
    Text {
        /// Field name the host persists the value under
        name: String,
        /// Human-readable label
        label: String,
        /// Current value
        value: String,
    },
    /// Single-select dropdown
    Dropdown {
        /// Field name the host persists the value under
        name: String,
        /// Human-readable label
        label: String,
        /// `(value, label)` pairs in display order
        options: Vec<(String, String)>,
        /// Currently selected value, if any
        selected: Option<String>,
    },
}

impl CmsField {
    /// The field's persistence name.
    pub fn name(&self) -> &str {
        match self {
            CmsField::Text { name, .. } => name,
            CmsField::Dropdown { name, .. } => name,
        }
    }
}

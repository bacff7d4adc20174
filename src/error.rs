//! Error types for design-graph operations, project IO and property editing.

use crate::property::PropertyType;
use crate::widget::WidgetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    /// The widget kind cannot be constructed.
    #[error("unknown widget kind `{0}`")]
    UnknownKind(String),

    #[error("document root must be a container, found `{0}`")]
    RootNotContainer(String),

    #[error("unsupported project version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("malformed project document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no widget with id {0}")]
    NoSuchWidget(WidgetId),

    #[error("widget {0} cannot hold children")]
    NotAContainer(WidgetId),
}

#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("unknown property `{0}`")]
    Unknown(String),

    #[error("property `{0}` is read-only")]
    ReadOnly(String),

    #[error("property `{name}` expects a {expected:?} value")]
    TypeMismatch { name: String, expected: PropertyType },

    #[error("cannot read `{text}` as a {expected:?} value")]
    Unparsable { text: String, expected: PropertyType },

    #[error("property `{0}` needs a finite number")]
    NotFinite(String),
}

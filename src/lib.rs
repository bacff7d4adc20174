//! Design-graph engine for a drag-and-drop form designer.
//!
//! The [`graph::DesignGraph`] holds the live widget tree and every interactive edit;
//! [`sync`] moves it to and from [`project::ProjectDocument`]; [`codegen`] turns it
//! into widget-construction source text. [`session::Session`] ties these together for
//! a host application.

pub mod codegen;
pub mod error;
pub mod graph;
pub mod layout;
pub mod merge;
pub mod model;
pub mod project;
pub mod property;
pub mod resources;
pub mod session;
pub mod settings;
pub mod sync;
pub mod widget;

pub use error::{DesignError, PropertyError};
pub use graph::{DesignEvent, DesignGraph, DropPayload, GraphCommand};
pub use layout::{LayoutStrategy, Region};
pub use model::{NodeAttributes, PositionMode, VisualNode};
pub use project::ProjectDocument;
pub use property::{PropertyBag, PropertyValue};
pub use resources::ResourceTable;
pub use session::Session;
pub use settings::DesignerSettings;
pub use widget::{Bounds, Point, Size, WidgetId, WidgetKind};

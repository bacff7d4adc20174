//! Persisted, toolkit-neutral description of one widget occurrence.

use crate::layout::{GridCell, LayoutStrategy, Region};
use crate::widget::style::{BorderSpec, FontSpec, Rgba};
use crate::widget::{Bounds, ContentKind, Size};
use serde::{Deserialize, Serialize};

/// Whether a node's bounds are authoritative or computed by the parent's layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionMode {
    #[default]
    Absolute,
    Managed,
}

/// Kind-specific value shown by a widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Content {
    Text(String),
    SelectedItem(String),
    Value(f64),
}

impl Content {
    pub const fn kind(&self) -> ContentKind {
        match self {
            Content::Text(_) => ContentKind::Text,
            Content::SelectedItem(_) => ContentKind::SelectedItem,
            Content::Value(_) => ContentKind::NumericValue,
        }
    }
}

/// Every attribute of a node that survives save/load, apart from its kind, its menu
/// reference and its children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Identity; unique among siblings. `None` for anonymous nodes.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub preferred_size: Option<Size>,
    #[serde(default)]
    pub minimum_size: Option<Size>,
    #[serde(default)]
    pub maximum_size: Option<Size>,
    #[serde(default)]
    pub background: Option<Rgba>,
    #[serde(default)]
    pub foreground: Option<Rgba>,
    #[serde(default)]
    pub font: Option<FontSpec>,
    #[serde(default)]
    pub border: Option<BorderSpec>,
    /// How this node arranges its own children.
    #[serde(default)]
    pub layout: LayoutStrategy,
    /// Region token, meaningful only while the parent uses border regions.
    #[serde(default)]
    pub constraint: Option<Region>,
    /// Cell record, meaningful only while the parent uses the constraint grid.
    #[serde(default)]
    pub grid_cell: Option<GridCell>,
    #[serde(default)]
    pub position_mode: PositionMode,
}

fn default_true() -> bool {
    true
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            name: None,
            content: None,
            visible: true,
            enabled: true,
            bounds: Bounds::default(),
            preferred_size: None,
            minimum_size: None,
            maximum_size: None,
            background: None,
            foreground: None,
            font: None,
            border: None,
            layout: LayoutStrategy::None,
            constraint: None,
            grid_cell: None,
            position_mode: PositionMode::Absolute,
        }
    }
}

impl NodeAttributes {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub kind: String,
    #[serde(flatten)]
    pub attrs: NodeAttributes,
    /// Name of a shared pop-up menu in the project's menu table.
    #[serde(default)]
    pub context_menu: Option<String>,
    #[serde(default)]
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    pub fn new(kind: impl Into<String>, attrs: NodeAttributes) -> Self {
        Self {
            kind: kind.into(),
            attrs,
            context_menu: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<VisualNode>) -> Self {
        self.children = children;
        self
    }

    /// Pre-order walk over this node and all descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a VisualNode)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_| n += 1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::style::{FontStyle, Rgba};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attribute_defaults() {
        let a = NodeAttributes::default();
        assert!(a.visible);
        assert!(a.enabled);
        assert_eq!(a.position_mode, PositionMode::Absolute);
        assert_eq!(a.layout, LayoutStrategy::None);
    }

    #[test]
    fn test_minimal_json_fills_defaults() {
        let node: VisualNode = serde_json::from_str(r#"{"kind":"Label","name":"l"}"#).unwrap();
        assert_eq!(node.kind, "Label");
        assert_eq!(node.attrs, NodeAttributes::named("l"));
        assert!(node.children.is_empty());
        assert_eq!(node.context_menu, None);
    }

    #[test]
    fn test_node_json_round_trip() {
        let mut attrs = NodeAttributes::named("title");
        attrs.content = Some(Content::Text("Hello \"world\"".into()));
        attrs.font = Some(FontSpec::new(
            "Dialog",
            FontStyle {
                bold: true,
                italic: false,
            },
            14,
        ));
        attrs.background = Some(Rgba::rgb(10, 20, 30));
        attrs.constraint = Some(Region::North);
        attrs.bounds = Bounds::new(1, 2, 3, 4);
        let mut node = VisualNode::new("Label", attrs);
        node.context_menu = Some("ctx".into());
        let tree = VisualNode::new("Panel", NodeAttributes::named("panel")).with_children(vec![node]);

        let json = serde_json::to_string(&tree).unwrap();
        let back: VisualNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.count(), 2);
    }
}

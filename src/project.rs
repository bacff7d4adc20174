use crate::error::DesignError;
use crate::model::{NodeAttributes, VisualNode};
use crate::widget::{Bounds, WidgetKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemSpec {
    pub label: String,
    #[serde(default)]
    pub action: String,
}

impl MenuItemSpec {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSpec {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItemSpec>,
}

/// The saved form of a design: the node tree, the shared menus it references and the
/// hand-written code kept alongside the generated code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub root: VisualNode,
    #[serde(default)]
    pub popup_menus: Vec<MenuSpec>,
    #[serde(default)]
    pub user_code: String,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for ProjectDocument {
    fn default() -> Self {
        let mut attrs = NodeAttributes::named("panel");
        attrs.bounds = Bounds::new(0, 0, 800, 600);
        Self {
            version: DOCUMENT_VERSION,
            root: VisualNode::new(WidgetKind::Panel.name(), attrs),
            popup_menus: Vec::new(),
            user_code: String::new(),
        }
    }
}

impl ProjectDocument {
    pub fn to_json(&self) -> Result<String, DesignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and version-checks a document without touching any live state.
    pub fn from_json(json: &str) -> Result<ProjectDocument, DesignError> {
        let doc: ProjectDocument = serde_json::from_str(json)?;
        if doc.version > DOCUMENT_VERSION {
            return Err(DesignError::UnsupportedVersion {
                found: doc.version,
                supported: DOCUMENT_VERSION,
            });
        }
        Ok(doc)
    }

    pub fn read(path: &Path) -> Result<ProjectDocument, DesignError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn write(&self, path: &Path) -> Result<(), DesignError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

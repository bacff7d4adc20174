//! Designer preferences: grid, snapping, locking and canvas size.

use crate::error::DesignError;
use crate::widget::Size;
use crate::widget::style::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIN_GRID_SIZE: i32 = 1;
pub const MAX_GRID_SIZE: i32 = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerSettings {
    pub snap_to_grid: bool,
    pub grid_size: i32,
    pub grid_color: Rgba,
    pub lock_components: bool,
    pub canvas_size: Size,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 10,
            grid_color: Rgba::rgba(200, 200, 200, 64),
            lock_components: false,
            canvas_size: Size::new(800, 600),
        }
    }
}

impl DesignerSettings {
    pub fn set_grid_size(&mut self, px: i32) {
        self.grid_size = px.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    }

    pub fn load(path: &Path) -> Result<DesignerSettings, DesignError> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: DesignerSettings = serde_json::from_str(&json)?;
        settings.set_grid_size(settings.grid_size);
        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> DesignerSettings {
        match Self::load(path) {
            Ok(s) => s,
            Err(DesignError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), DesignError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

//! Layout strategy registry: the closed set of strategies a container can use to
//! arrange its children, plus the per-child placement records they consume.

use crate::widget::style::Insets;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowAlignment {
    Left,
    #[default]
    Center,
    Right,
    Leading,
    Trailing,
}

/// How a container lays out its own children. `None` is free-form placement where
/// every child's bounds are authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayoutStrategy {
    Flow {
        #[serde(default)]
        alignment: FlowAlignment,
        #[serde(default = "default_flow_gap")]
        hgap: i32,
        #[serde(default = "default_flow_gap")]
        vgap: i32,
    },
    BorderRegions {
        #[serde(default)]
        hgap: i32,
        #[serde(default)]
        vgap: i32,
    },
    UniformGrid {
        #[serde(default = "default_one")]
        rows: u32,
        #[serde(default = "default_one")]
        cols: u32,
        #[serde(default)]
        hgap: i32,
        #[serde(default)]
        vgap: i32,
    },
    ConstraintGrid,
    // Unknown type names in older or foreign documents degrade to free-form.
    #[default]
    #[serde(other)]
    None,
}

fn default_flow_gap() -> i32 {
    5
}

fn default_one() -> u32 {
    1
}

impl LayoutStrategy {
    /// Display names, in menu order.
    pub const NAMES: [&'static str; 5] = [
        "Absolute",
        "Flow",
        "BorderRegions",
        "UniformGrid",
        "ConstraintGrid",
    ];

    pub const fn flow() -> Self {
        LayoutStrategy::Flow {
            alignment: FlowAlignment::Center,
            hgap: 5,
            vgap: 5,
        }
    }

    pub const fn border_regions() -> Self {
        LayoutStrategy::BorderRegions { hgap: 0, vgap: 0 }
    }

    pub const fn uniform_grid(rows: u32, cols: u32) -> Self {
        LayoutStrategy::UniformGrid {
            rows,
            cols,
            hgap: 0,
            vgap: 0,
        }
    }

    /// Builds a strategy with default parameters. Unknown names silently map to `None`.
    pub fn from_name(name: &str) -> LayoutStrategy {
        match name.trim().to_ascii_lowercase().as_str() {
            "flow" | "flowlayout" => Self::flow(),
            "border" | "borderlayout" | "borderregions" => Self::border_regions(),
            "grid" | "gridlayout" | "uniformgrid" => Self::uniform_grid(1, 1),
            "gridbag" | "gridbaglayout" | "constraintgrid" => LayoutStrategy::ConstraintGrid,
            _ => LayoutStrategy::None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            LayoutStrategy::None => "Absolute",
            LayoutStrategy::Flow { .. } => "Flow",
            LayoutStrategy::BorderRegions { .. } => "BorderRegions",
            LayoutStrategy::UniformGrid { .. } => "UniformGrid",
            LayoutStrategy::ConstraintGrid => "ConstraintGrid",
        }
    }

    pub const fn is_free_form(&self) -> bool {
        matches!(self, LayoutStrategy::None)
    }

    pub const fn is_border_regions(&self) -> bool {
        matches!(self, LayoutStrategy::BorderRegions { .. })
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slot a child occupies in a border-region parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    #[default]
    Center,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Center,
    ];

    pub const fn token(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Center => "Center",
        }
    }

    pub fn from_token(token: &str) -> Option<Region> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fill {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Fill {
    pub const ALL: [Fill; 4] = [Fill::None, Fill::Horizontal, Fill::Vertical, Fill::Both];

    pub fn from_name(name: &str) -> Option<Fill> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Fill::None => "None",
            Fill::Horizontal => "Horizontal",
            Fill::Vertical => "Vertical",
            Fill::Both => "Both",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::North,
        Anchor::NorthEast,
        Anchor::East,
        Anchor::SouthEast,
        Anchor::South,
        Anchor::SouthWest,
        Anchor::West,
        Anchor::NorthWest,
    ];

    pub fn from_name(name: &str) -> Option<Anchor> {
        let name = name.trim();
        Self::ALL.into_iter().find(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Anchor::Center => "Center",
            Anchor::North => "North",
            Anchor::NorthEast => "NorthEast",
            Anchor::East => "East",
            Anchor::SouthEast => "SouthEast",
            Anchor::South => "South",
            Anchor::SouthWest => "SouthWest",
            Anchor::West => "West",
            Anchor::NorthWest => "NorthWest",
        }
    }
}

/// Per-child record consumed by a `ConstraintGrid` parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight_x: f64,
    pub weight_y: f64,
    pub fill: Fill,
    pub anchor: Anchor,
    pub pad_x: i32,
    pub pad_y: i32,
    pub insets: Insets,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            weight_x: 0.0,
            weight_y: 0.0,
            fill: Fill::None,
            anchor: Anchor::Center,
            pad_x: 0,
            pad_y: 0,
            insets: Insets::default(),
        }
    }
}

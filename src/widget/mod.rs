pub mod style;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetId(u64);

impl WidgetId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Integer pixel point, in whichever coordinate space the caller states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Position and size relative to the parent's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }
}

/// What kind of value a widget displays and persists beyond its geometry and style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    None,
    Text,
    SelectedItem,
    NumericValue,
}

/// The closed catalog of constructible widget kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Panel,
    Button,
    ToggleButton,
    CheckBox,
    RadioButton,
    Label,
    TextField,
    PasswordField,
    TextArea,
    ComboBox,
    Spinner,
    Slider,
    ProgressBar,
    Separator,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 14] = [
        WidgetKind::Panel,
        WidgetKind::Button,
        WidgetKind::ToggleButton,
        WidgetKind::CheckBox,
        WidgetKind::RadioButton,
        WidgetKind::Label,
        WidgetKind::TextField,
        WidgetKind::PasswordField,
        WidgetKind::TextArea,
        WidgetKind::ComboBox,
        WidgetKind::Spinner,
        WidgetKind::Slider,
        WidgetKind::ProgressBar,
        WidgetKind::Separator,
    ];

    /// Type name used in documents and generated code.
    pub const fn name(&self) -> &'static str {
        match self {
            WidgetKind::Panel => "Panel",
            WidgetKind::Button => "Button",
            WidgetKind::ToggleButton => "ToggleButton",
            WidgetKind::CheckBox => "CheckBox",
            WidgetKind::RadioButton => "RadioButton",
            WidgetKind::Label => "Label",
            WidgetKind::TextField => "TextField",
            WidgetKind::PasswordField => "PasswordField",
            WidgetKind::TextArea => "TextArea",
            WidgetKind::ComboBox => "ComboBox",
            WidgetKind::Spinner => "Spinner",
            WidgetKind::Slider => "Slider",
            WidgetKind::ProgressBar => "ProgressBar",
            WidgetKind::Separator => "Separator",
        }
    }

    /// Case-insensitive lookup; `None` means the kind cannot be constructed.
    pub fn from_name(name: &str) -> Option<WidgetKind> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Prefix for generated identities: `button`, `checkbox`, ...
    pub fn name_prefix(&self) -> String {
        self.name().to_lowercase()
    }

    pub const fn is_container(&self) -> bool {
        matches!(self, WidgetKind::Panel)
    }

    pub const fn content_kind(&self) -> ContentKind {
        match self {
            WidgetKind::Button
            | WidgetKind::ToggleButton
            | WidgetKind::CheckBox
            | WidgetKind::RadioButton
            | WidgetKind::Label
            | WidgetKind::TextField
            | WidgetKind::PasswordField
            | WidgetKind::TextArea => ContentKind::Text,
            WidgetKind::ComboBox => ContentKind::SelectedItem,
            WidgetKind::Spinner | WidgetKind::Slider | WidgetKind::ProgressBar => {
                ContentKind::NumericValue
            }
            WidgetKind::Panel | WidgetKind::Separator => ContentKind::None,
        }
    }

    /// Size given to a freshly dropped widget.
    pub const fn default_size(&self) -> Size {
        match self {
            WidgetKind::Panel => Size::new(200, 150),
            WidgetKind::Button | WidgetKind::ToggleButton => Size::new(120, 30),
            WidgetKind::CheckBox | WidgetKind::RadioButton => Size::new(120, 24),
            WidgetKind::Label => Size::new(120, 24),
            WidgetKind::TextField | WidgetKind::PasswordField => Size::new(160, 26),
            WidgetKind::TextArea => Size::new(240, 120),
            WidgetKind::ComboBox => Size::new(160, 26),
            WidgetKind::Spinner => Size::new(80, 26),
            WidgetKind::Slider => Size::new(200, 24),
            WidgetKind::ProgressBar => Size::new(200, 20),
            WidgetKind::Separator => Size::new(200, 8),
        }
    }

    /// Content given to a freshly dropped widget.
    pub fn default_content(&self) -> Option<crate::model::Content> {
        use crate::model::Content;
        match self {
            WidgetKind::Button => Some(Content::Text("Button".into())),
            WidgetKind::ToggleButton => Some(Content::Text("Toggle".into())),
            WidgetKind::CheckBox => Some(Content::Text("CheckBox".into())),
            WidgetKind::RadioButton => Some(Content::Text("Option".into())),
            WidgetKind::Label => Some(Content::Text("Label".into())),
            WidgetKind::TextField | WidgetKind::PasswordField | WidgetKind::TextArea => None,
            WidgetKind::ComboBox => None,
            WidgetKind::Spinner | WidgetKind::Slider | WidgetKind::ProgressBar => {
                Some(Content::Value(0.0))
            }
            WidgetKind::Panel | WidgetKind::Separator => None,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounds a coordinate to the nearest multiple of `grid`. Grids below 2 px are a no-op.
pub fn snap_with_grid(v: i32, grid: i32) -> i32 {
    if grid < 2 {
        return v;
    }
    ((v as f32 / grid as f32).round() as i32) * grid
}

pub fn snap_point_with_grid(p: Point, grid: i32) -> Point {
    Point::new(snap_with_grid(p.x, grid), snap_with_grid(p.y, grid))
}

/// Escapes a string for use inside a generated double-quoted literal.
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_with_grid() {
        assert_eq!(snap_with_grid(5, 10), 10);
        assert_eq!(snap_with_grid(4, 10), 0);
        assert_eq!(snap_with_grid(47, 10), 50);
        assert_eq!(snap_with_grid(22, 10), 20);
        assert_eq!(snap_with_grid(12, 8), 16);

        // Grid of 1 or less leaves values alone
        assert_eq!(snap_with_grid(13, 1), 13);
        assert_eq!(snap_with_grid(13, 0), 13);
    }

    #[test]
    fn test_snap_point() {
        assert_eq!(
            snap_point_with_grid(Point::new(15, 25), 10),
            Point::new(20, 30)
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("path\\to\\file"), "path\\\\to\\\\file");
        assert_eq!(escape("say \"hello\""), "say \\\"hello\\\"");
        assert_eq!(escape("two\nlines"), "two\\nlines");
    }

    #[test]
    fn test_kind_lookup_is_case_insensitive() {
        assert_eq!(WidgetKind::from_name("button"), Some(WidgetKind::Button));
        assert_eq!(WidgetKind::from_name(" ComboBox "), Some(WidgetKind::ComboBox));
        assert_eq!(WidgetKind::from_name("JTree"), None);
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_widget_kind_default_size() {
        for kind in WidgetKind::ALL {
            let size = kind.default_size();
            assert!(size.width > 0, "{kind:?} should have positive width");
            assert!(size.height > 0, "{kind:?} should have positive height");
        }
        assert_eq!(WidgetKind::Button.default_size(), Size::new(120, 30));
    }

    #[test]
    fn test_only_panels_are_containers() {
        let containers: Vec<_> = WidgetKind::ALL
            .into_iter()
            .filter(WidgetKind::is_container)
            .collect();
        assert_eq!(containers, vec![WidgetKind::Panel]);
    }

    #[test]
    fn test_default_content_matches_content_kind() {
        for kind in WidgetKind::ALL {
            if let Some(content) = kind.default_content() {
                assert_eq!(content.kind(), kind.content_kind(), "{kind:?}");
            }
        }
    }

    #[test]
    fn test_bounds_geometry() {
        let b = Bounds::new(10, 20, 100, 40);
        assert_eq!(b.center(), Point::new(60, 40));
        assert!(b.contains(Point::new(10, 20)));
        assert!(!b.contains(Point::new(110, 20)));
    }

    #[test]
    fn test_widget_id_display() {
        let id = WidgetId::new(42);
        assert_eq!(format!("{}", id), "42");
    }
}

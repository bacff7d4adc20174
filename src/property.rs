//! Uniform property access for inspectors.
//!
//! Anything that edits node attributes by name goes through [`PropertyBag`]. Nodes
//! implement it with a fixed descriptor table per widget kind.

use crate::error::PropertyError;
use crate::layout::{Anchor, Fill, GridCell, LayoutStrategy, Region};
use crate::model::{Content, NodeAttributes, PositionMode};
use crate::widget::style::{BorderSpec, FontSpec, FontStyle, Insets, Rgba};
use crate::widget::{Bounds, ContentKind, Size, WidgetKind};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Text,
    Bool,
    Number,
    Color,
    Bounds,
    Size,
    Font,
    Border,
    Layout,
    Region,
    GridCell,
    PositionMode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Bool(bool),
    Number(f64),
    Color(Option<Rgba>),
    Bounds(Bounds),
    Size(Option<Size>),
    Font(Option<FontSpec>),
    Border(Option<BorderSpec>),
    Layout(LayoutStrategy),
    Region(Option<Region>),
    GridCell(Option<GridCell>),
    PositionMode(PositionMode),
}

impl PropertyValue {
    pub const fn ty(&self) -> PropertyType {
        match self {
            PropertyValue::Text(_) => PropertyType::Text,
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Number(_) => PropertyType::Number,
            PropertyValue::Color(_) => PropertyType::Color,
            PropertyValue::Bounds(_) => PropertyType::Bounds,
            PropertyValue::Size(_) => PropertyType::Size,
            PropertyValue::Font(_) => PropertyType::Font,
            PropertyValue::Border(_) => PropertyType::Border,
            PropertyValue::Layout(_) => PropertyType::Layout,
            PropertyValue::Region(_) => PropertyType::Region,
            PropertyValue::GridCell(_) => PropertyType::GridCell,
            PropertyValue::PositionMode(_) => PropertyType::PositionMode,
        }
    }

    /// Reads `text` as a value of type `ty`. Blank text clears optional values.
    pub fn parse(ty: PropertyType, text: &str) -> Result<PropertyValue, PropertyError> {
        let t = text.trim();
        let bad = || PropertyError::Unparsable {
            text: text.to_string(),
            expected: ty,
        };
        let value = match ty {
            PropertyType::Text => PropertyValue::Text(text.to_string()),
            PropertyType::Bool => match t.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => PropertyValue::Bool(true),
                "false" | "no" | "0" => PropertyValue::Bool(false),
                _ => return Err(bad()),
            },
            PropertyType::Number => PropertyValue::Number(parse_finite(t).ok_or_else(bad)?),
            PropertyType::Color if t.is_empty() => PropertyValue::Color(None),
            PropertyType::Color => PropertyValue::Color(Some(Rgba::parse_hex(t).ok_or_else(bad)?)),
            PropertyType::Bounds => match parse_ints(t).as_deref() {
                Some(&[x, y, w, h]) => PropertyValue::Bounds(Bounds::new(x, y, w, h)),
                _ => return Err(bad()),
            },
            PropertyType::Size if t.is_empty() => PropertyValue::Size(None),
            PropertyType::Size => match parse_ints(t).as_deref() {
                Some(&[w, h]) => PropertyValue::Size(Some(Size::new(w, h))),
                _ => return Err(bad()),
            },
            PropertyType::Font if t.is_empty() => PropertyValue::Font(None),
            PropertyType::Font => PropertyValue::Font(Some(parse_font(t).ok_or_else(bad)?)),
            PropertyType::Border => PropertyValue::Border(parse_border(t).ok_or_else(bad)?),
            PropertyType::Layout => PropertyValue::Layout(LayoutStrategy::from_name(t)),
            PropertyType::Region if t.is_empty() => PropertyValue::Region(None),
            PropertyType::Region => PropertyValue::Region(Some(Region::from_token(t).ok_or_else(bad)?)),
            PropertyType::GridCell if t.is_empty() => PropertyValue::GridCell(None),
            PropertyType::GridCell => PropertyValue::GridCell(Some(parse_grid_cell(t).ok_or_else(bad)?)),
            PropertyType::PositionMode => match t.to_ascii_lowercase().as_str() {
                "absolute" => PropertyValue::PositionMode(PositionMode::Absolute),
                "managed" => PropertyValue::PositionMode(PositionMode::Managed),
                _ => return Err(bad()),
            },
        };
        Ok(value)
    }
}

fn parse_ints(t: &str) -> Option<Vec<i32>> {
    t.split(',').map(|p| p.trim().parse().ok()).collect()
}

/// Non-finite numbers cannot be stored in a project document.
fn parse_finite(t: &str) -> Option<f64> {
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `x,y,w,h,wx,wy,fill,anchor,padx,pady,top,left,bottom,right`, e.g.
/// `0,1,2,1,1,0,Horizontal,West,0,0,2,2,2,2`.
fn parse_grid_cell(t: &str) -> Option<GridCell> {
    let f: Vec<&str> = t.split(',').map(str::trim).collect();
    let [x, y, w, h, wx, wy, fill, anchor, px, py, top, left, bottom, right] = f[..] else {
        return None;
    };
    let int = |s: &str| s.parse::<i32>().ok();
    let cell = GridCell {
        x: x.parse::<u32>().ok()?,
        y: y.parse::<u32>().ok()?,
        width: w.parse::<u32>().ok().filter(|v| *v > 0)?,
        height: h.parse::<u32>().ok().filter(|v| *v > 0)?,
        weight_x: parse_finite(wx).filter(|v| *v >= 0.0)?,
        weight_y: parse_finite(wy).filter(|v| *v >= 0.0)?,
        fill: Fill::from_name(fill)?,
        anchor: Anchor::from_name(anchor)?,
        pad_x: int(px)?,
        pad_y: int(py)?,
        insets: Insets::new(int(top)?, int(left)?, int(bottom)?, int(right)?),
    };
    Some(cell)
}

/// `Family-style-size`, e.g. `Dialog-bold-12`. Style is `plain`, `bold`, `italic` or
/// `bolditalic`.
fn parse_font(t: &str) -> Option<FontSpec> {
    let mut parts = t.rsplitn(3, '-');
    let size = parts.next()?.trim().parse().ok()?;
    let style = match parts.next()?.trim().to_ascii_lowercase().as_str() {
        "plain" => FontStyle::PLAIN,
        "bold" => FontStyle { bold: true, italic: false },
        "italic" => FontStyle { bold: false, italic: true },
        "bolditalic" => FontStyle { bold: true, italic: true },
        _ => return None,
    };
    let family = parts.next()?.trim();
    (!family.is_empty()).then(|| FontSpec::new(family, style, size))
}

/// A short text form for the common borders: `none`, `etched`, `empty N`,
/// `line #RRGGBB N`, `titled Some title`.
fn parse_border(t: &str) -> Option<Option<BorderSpec>> {
    let (head, rest) = t.split_once(' ').unwrap_or((t, ""));
    let rest = rest.trim();
    let border = match head.to_ascii_lowercase().as_str() {
        "" | "none" => return Some(None),
        "etched" => BorderSpec::Etched {
            style: Default::default(),
            highlight: None,
            shadow: None,
        },
        "empty" => BorderSpec::Empty {
            insets: Insets::uniform(rest.parse().ok()?),
        },
        "line" => {
            let (color, thickness) = rest.split_once(' ').unwrap_or((rest, "1"));
            BorderSpec::line(Rgba::parse_hex(color)?, thickness.trim().parse().ok()?)
        }
        "titled" => BorderSpec::titled(rest),
        _ => return None,
    };
    Some(Some(border))
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Color(c) => match c {
                Some(c) => write!(f, "{c}"),
                None => Ok(()),
            },
            PropertyValue::Bounds(b) => write!(f, "{},{},{},{}", b.x, b.y, b.width, b.height),
            PropertyValue::Size(s) => match s {
                Some(s) => write!(f, "{},{}", s.width, s.height),
                None => Ok(()),
            },
            PropertyValue::Font(font) => match font {
                Some(font) => {
                    let style = match (font.style.bold, font.style.italic) {
                        (false, false) => "plain",
                        (true, false) => "bold",
                        (false, true) => "italic",
                        (true, true) => "bolditalic",
                    };
                    write!(f, "{}-{}-{}", font.family, style, font.size)
                }
                None => Ok(()),
            },
            PropertyValue::Border(b) => match b {
                Some(b) => f.write_str(b.type_name()),
                None => f.write_str("none"),
            },
            PropertyValue::Layout(l) => write!(f, "{l}"),
            PropertyValue::Region(r) => match r {
                Some(r) => write!(f, "{r}"),
                None => Ok(()),
            },
            PropertyValue::GridCell(c) => match c {
                Some(c) => write!(
                    f,
                    "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                    c.x,
                    c.y,
                    c.width,
                    c.height,
                    c.weight_x,
                    c.weight_y,
                    c.fill.name(),
                    c.anchor.name(),
                    c.pad_x,
                    c.pad_y,
                    c.insets.top,
                    c.insets.left,
                    c.insets.bottom,
                    c.insets.right
                ),
                None => Ok(()),
            },
            PropertyValue::PositionMode(m) => write!(f, "{m:?}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub ty: PropertyType,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    const fn rw(name: &'static str, ty: PropertyType) -> Self {
        Self {
            name,
            ty,
            readable: true,
            writable: true,
        }
    }

    const fn ro(name: &'static str, ty: PropertyType) -> Self {
        Self {
            name,
            ty,
            readable: true,
            writable: false,
        }
    }
}

/// Named, typed attribute access.
pub trait PropertyBag {
    fn list(&self) -> Vec<PropertyDescriptor>;

    fn get(&self, name: &str) -> Result<PropertyValue, PropertyError>;

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;

    fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.list().into_iter().find(|d| d.name == name)
    }

    /// Parses `text` according to the property's declared type, then sets it.
    fn set_text(&mut self, name: &str, text: &str) -> Result<(), PropertyError> {
        let d = self
            .descriptor(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        self.set(name, PropertyValue::parse(d.ty, text)?)
    }
}

/// Property view over one node's attributes.
pub struct NodeProperties<'a> {
    kind: WidgetKind,
    attrs: &'a mut NodeAttributes,
}

impl<'a> NodeProperties<'a> {
    pub fn new(kind: WidgetKind, attrs: &'a mut NodeAttributes) -> Self {
        Self { kind, attrs }
    }

    fn content_descriptor(&self) -> Option<PropertyDescriptor> {
        match self.kind.content_kind() {
            ContentKind::None => None,
            ContentKind::Text => Some(PropertyDescriptor::rw("text", PropertyType::Text)),
            ContentKind::SelectedItem => {
                Some(PropertyDescriptor::rw("selected_item", PropertyType::Text))
            }
            ContentKind::NumericValue => Some(PropertyDescriptor::rw("value", PropertyType::Number)),
        }
    }
}

impl PropertyBag for NodeProperties<'_> {
    fn list(&self) -> Vec<PropertyDescriptor> {
        use PropertyType as T;
        let mut out = vec![
            PropertyDescriptor::ro("kind", T::Text),
            PropertyDescriptor::rw("name", T::Text),
        ];
        out.extend(self.content_descriptor());
        out.extend([
            PropertyDescriptor::rw("visible", T::Bool),
            PropertyDescriptor::rw("enabled", T::Bool),
            PropertyDescriptor::rw("bounds", T::Bounds),
            PropertyDescriptor::rw("preferred_size", T::Size),
            PropertyDescriptor::rw("minimum_size", T::Size),
            PropertyDescriptor::rw("maximum_size", T::Size),
            PropertyDescriptor::rw("background", T::Color),
            PropertyDescriptor::rw("foreground", T::Color),
            PropertyDescriptor::rw("font", T::Font),
            PropertyDescriptor::rw("border", T::Border),
        ]);
        if self.kind.is_container() {
            out.push(PropertyDescriptor::rw("layout", T::Layout));
        }
        out.extend([
            PropertyDescriptor::rw("constraint", T::Region),
            PropertyDescriptor::rw("grid_cell", T::GridCell),
            PropertyDescriptor::rw("position_mode", T::PositionMode),
        ]);
        out
    }

    fn get(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        if self.descriptor(name).is_none() {
            return Err(PropertyError::Unknown(name.to_string()));
        }
        let a = &*self.attrs;
        let value = match name {
            "kind" => PropertyValue::Text(self.kind.name().to_string()),
            "name" => PropertyValue::Text(a.name.clone().unwrap_or_default()),
            "text" | "selected_item" => PropertyValue::Text(match &a.content {
                Some(Content::Text(s) | Content::SelectedItem(s)) => s.clone(),
                _ => String::new(),
            }),
            "value" => PropertyValue::Number(match a.content {
                Some(Content::Value(v)) => v,
                _ => 0.0,
            }),
            "visible" => PropertyValue::Bool(a.visible),
            "enabled" => PropertyValue::Bool(a.enabled),
            "bounds" => PropertyValue::Bounds(a.bounds),
            "preferred_size" => PropertyValue::Size(a.preferred_size),
            "minimum_size" => PropertyValue::Size(a.minimum_size),
            "maximum_size" => PropertyValue::Size(a.maximum_size),
            "background" => PropertyValue::Color(a.background),
            "foreground" => PropertyValue::Color(a.foreground),
            "font" => PropertyValue::Font(a.font.clone()),
            "border" => PropertyValue::Border(a.border.clone()),
            "layout" => PropertyValue::Layout(a.layout),
            "constraint" => PropertyValue::Region(a.constraint),
            "grid_cell" => PropertyValue::GridCell(a.grid_cell),
            "position_mode" => PropertyValue::PositionMode(a.position_mode),
            _ => return Err(PropertyError::Unknown(name.to_string())),
        };
        Ok(value)
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let d = self
            .descriptor(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        if !d.writable {
            return Err(PropertyError::ReadOnly(name.to_string()));
        }
        let mismatch = || PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: d.ty,
        };
        if value.ty() != d.ty {
            return Err(mismatch());
        }
        let a = &mut *self.attrs;
        match (name, value) {
            ("name", PropertyValue::Text(s)) => {
                let s = s.trim();
                a.name = (!s.is_empty()).then(|| s.to_string());
            }
            ("text", PropertyValue::Text(s)) => {
                a.content = (!s.is_empty()).then_some(Content::Text(s));
            }
            ("selected_item", PropertyValue::Text(s)) => {
                a.content = (!s.is_empty()).then_some(Content::SelectedItem(s));
            }
            ("value", PropertyValue::Number(v)) if !v.is_finite() => {
                return Err(PropertyError::NotFinite(name.to_string()));
            }
            ("value", PropertyValue::Number(v)) => a.content = Some(Content::Value(v)),
            ("visible", PropertyValue::Bool(b)) => a.visible = b,
            ("enabled", PropertyValue::Bool(b)) => a.enabled = b,
            ("bounds", PropertyValue::Bounds(b)) => a.bounds = b,
            ("preferred_size", PropertyValue::Size(s)) => a.preferred_size = s,
            ("minimum_size", PropertyValue::Size(s)) => a.minimum_size = s,
            ("maximum_size", PropertyValue::Size(s)) => a.maximum_size = s,
            ("background", PropertyValue::Color(c)) => a.background = c,
            ("foreground", PropertyValue::Color(c)) => a.foreground = c,
            ("font", PropertyValue::Font(f)) => a.font = f,
            ("border", PropertyValue::Border(b)) => a.border = b,
            ("layout", PropertyValue::Layout(l)) => a.layout = l,
            ("constraint", PropertyValue::Region(r)) => a.constraint = r,
            ("grid_cell", PropertyValue::GridCell(c)) => {
                if c.is_some_and(|c| !(c.weight_x.is_finite() && c.weight_y.is_finite())) {
                    return Err(PropertyError::NotFinite(name.to_string()));
                }
                a.grid_cell = c;
            }
            ("position_mode", PropertyValue::PositionMode(m)) => a.position_mode = m,
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn button() -> NodeAttributes {
        let mut a = NodeAttributes::named("button1");
        a.content = Some(Content::Text("OK".into()));
        a
    }

    #[test]
    fn test_list_depends_on_kind() {
        let mut a = NodeAttributes::default();
        let names = |bag: &NodeProperties| bag.list().iter().map(|d| d.name).collect::<Vec<_>>();

        let panel = NodeProperties::new(WidgetKind::Panel, &mut a);
        assert!(names(&panel).contains(&"layout"));
        assert!(!names(&panel).contains(&"text"));

        let slider = NodeProperties::new(WidgetKind::Slider, &mut a);
        assert!(names(&slider).contains(&"value"));
        assert!(!names(&slider).contains(&"layout"));
    }

    #[test]
    fn test_get_and_set() {
        let mut a = button();
        let mut bag = NodeProperties::new(WidgetKind::Button, &mut a);
        assert_eq!(bag.get("text").unwrap(), PropertyValue::Text("OK".into()));
        bag.set("text", PropertyValue::Text("Cancel".into())).unwrap();
        bag.set("enabled", PropertyValue::Bool(false)).unwrap();
        assert_eq!(a.content, Some(Content::Text("Cancel".into())));
        assert!(!a.enabled);
    }

    #[test]
    fn test_set_errors() {
        let mut a = button();
        let mut bag = NodeProperties::new(WidgetKind::Button, &mut a);
        assert_eq!(
            bag.set("kind", PropertyValue::Text("Label".into())),
            Err(PropertyError::ReadOnly("kind".into()))
        );
        assert_eq!(
            bag.set("colour", PropertyValue::Bool(true)),
            Err(PropertyError::Unknown("colour".into()))
        );
        assert_eq!(
            bag.set("visible", PropertyValue::Text("yes".into())),
            Err(PropertyError::TypeMismatch {
                name: "visible".into(),
                expected: PropertyType::Bool
            })
        );
        assert!(matches!(bag.get("layout"), Err(PropertyError::Unknown(_))));
    }

    #[test]
    fn test_set_text_coerces() {
        let mut a = button();
        let mut bag = NodeProperties::new(WidgetKind::Button, &mut a);
        bag.set_text("bounds", "5, 6, 70, 25").unwrap();
        bag.set_text("background", "#102030").unwrap();
        bag.set_text("font", "Dialog-bold-14").unwrap();
        bag.set_text("constraint", "north").unwrap();
        bag.set_text("border", "line #000000 2").unwrap();
        assert!(matches!(
            bag.set_text("preferred_size", "wide"),
            Err(PropertyError::Unparsable { .. })
        ));
        assert_eq!(a.bounds, Bounds::new(5, 6, 70, 25));
        assert_eq!(a.background, Some(Rgba::rgb(0x10, 0x20, 0x30)));
        assert_eq!(
            a.font,
            Some(FontSpec::new("Dialog", FontStyle { bold: true, italic: false }, 14))
        );
        assert_eq!(a.constraint, Some(Region::North));
        assert_eq!(a.border, Some(BorderSpec::line(Rgba::BLACK, 2)));
    }

    #[test]
    fn test_blank_text_clears_optional_values() {
        let mut a = button();
        a.background = Some(Rgba::WHITE);
        let mut bag = NodeProperties::new(WidgetKind::Button, &mut a);
        bag.set_text("background", "  ").unwrap();
        bag.set_text("name", "").unwrap();
        assert_eq!(a.background, None);
        assert_eq!(a.name, None);
    }

    #[test]
    fn test_unknown_layout_name_means_free_form() {
        let mut a = NodeAttributes::default();
        let mut bag = NodeProperties::new(WidgetKind::Panel, &mut a);
        bag.set_text("layout", "BorderLayout").unwrap();
        assert_eq!(bag.get("layout").unwrap(), PropertyValue::Layout(LayoutStrategy::border_regions()));
        bag.set_text("layout", "Spiral").unwrap();
        assert_eq!(a.layout, LayoutStrategy::None);
    }

    #[test]
    fn test_display_matches_parse() {
        let v = PropertyValue::Font(Some(FontSpec::new("Serif", FontStyle::PLAIN, 11)));
        assert_eq!(v.to_string(), "Serif-plain-11");
        assert_eq!(PropertyValue::parse(PropertyType::Font, &v.to_string()).unwrap(), v);
        assert_eq!(PropertyValue::Bounds(Bounds::new(1, 2, 3, 4)).to_string(), "1,2,3,4");
    }

    #[test]
    fn test_non_finite_value_is_refused() {
        let mut a = NodeAttributes::default();
        let mut bag = NodeProperties::new(WidgetKind::Spinner, &mut a);
        for text in ["NaN", "inf", "-infinity"] {
            assert!(matches!(
                bag.set_text("value", text),
                Err(PropertyError::Unparsable { .. })
            ));
        }
        assert_eq!(
            bag.set("value", PropertyValue::Number(f64::NAN)),
            Err(PropertyError::NotFinite("value".into()))
        );
        bag.set_text("value", "-2.5").unwrap();
        assert_eq!(a.content, Some(Content::Value(-2.5)));
    }

    #[test]
    fn test_grid_cell_edit() {
        let mut a = button();
        let mut bag = NodeProperties::new(WidgetKind::Button, &mut a);
        bag.set_text("grid_cell", "1, 2, 2, 1, 0.5, 0, both, northwest, 3, 4, 1, 2, 3, 4")
            .unwrap();
        let cell = GridCell {
            x: 1,
            y: 2,
            width: 2,
            height: 1,
            weight_x: 0.5,
            weight_y: 0.0,
            fill: Fill::Both,
            anchor: Anchor::NorthWest,
            pad_x: 3,
            pad_y: 4,
            insets: Insets::new(1, 2, 3, 4),
        };
        assert_eq!(bag.get("grid_cell").unwrap(), PropertyValue::GridCell(Some(cell)));
        let shown = PropertyValue::GridCell(Some(cell)).to_string();
        assert_eq!(shown, "1,2,2,1,0.5,0,Both,NorthWest,3,4,1,2,3,4");
        assert_eq!(
            PropertyValue::parse(PropertyType::GridCell, &shown).unwrap(),
            PropertyValue::GridCell(Some(cell))
        );

        for bad in ["1,2,3", "0,0,0,1,0,0,None,Center,0,0,0,0,0,0", "0,0,1,1,NaN,0,None,Center,0,0,0,0,0,0"] {
            assert!(bag.set_text("grid_cell", bad).is_err(), "{bad}");
        }
        bag.set_text("grid_cell", "").unwrap();
        assert_eq!(a.grid_cell, None);
    }
}

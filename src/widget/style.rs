//! Colors, fonts and border descriptors attached to visual nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight (non-premultiplied) RGBA, 0-255 per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn r(&self) -> u8 {
        self.0[0]
    }

    pub const fn g(&self) -> u8 {
        self.0[1]
    }

    pub const fn b(&self) -> u8 {
        self.0[2]
    }

    pub const fn a(&self) -> u8 {
        self.0[3]
    }

    /// `RRGGBB`, alpha dropped.
    pub fn hex_rgb(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r(), self.g(), self.b())
    }

    /// Parses `#RRGGBB`, `0xRRGGBB` or `RRGGBB`, with an optional trailing `AA`.
    pub fn parse_hex(s: &str) -> Option<Rgba> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Some(Rgba([byte(0)?, byte(2)?, byte(4)?, a]))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a() == 255 {
            write!(f, "#{}", self.hex_rgb())
        } else {
            write!(f, "#{}{:02X}", self.hex_rgb(), self.a())
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl FontStyle {
    pub const PLAIN: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    #[serde(default)]
    pub style: FontStyle,
    pub size: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, style: FontStyle, size: u32) -> Self {
        Self {
            family: family.into(),
            style,
            size,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitlePosition {
    #[default]
    Default,
    AboveTop,
    Top,
    BelowTop,
    AboveBottom,
    Bottom,
    BelowBottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleJustification {
    #[default]
    Default,
    Left,
    Center,
    Right,
    Leading,
    Trailing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtchStyle {
    #[default]
    Lowered,
    Raised,
}

/// Border descriptor. "No border" is `Option::None` at the attribute level.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BorderSpec {
    Empty {
        insets: Insets,
    },
    Line {
        thickness: i32,
        color: Rgba,
    },
    Matte {
        insets: Insets,
        color: Option<Rgba>,
    },
    Titled {
        title: String,
        #[serde(default)]
        position: TitlePosition,
        #[serde(default)]
        justification: TitleJustification,
        #[serde(default)]
        color: Option<Rgba>,
        #[serde(default)]
        font: Option<FontSpec>,
    },
    Etched {
        #[serde(default)]
        style: EtchStyle,
        #[serde(default)]
        highlight: Option<Rgba>,
        #[serde(default)]
        shadow: Option<Rgba>,
    },
    Compound {
        outer: Option<Box<BorderSpec>>,
        inner: Option<Box<BorderSpec>>,
    },
}

impl BorderSpec {
    pub fn line(color: Rgba, thickness: i32) -> Self {
        BorderSpec::Line { thickness, color }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        BorderSpec::Titled {
            title: title.into(),
            position: TitlePosition::Default,
            justification: TitleJustification::Default,
            color: None,
            font: None,
        }
    }

    pub fn compound(outer: BorderSpec, inner: BorderSpec) -> Self {
        BorderSpec::Compound {
            outer: Some(Box::new(outer)),
            inner: Some(Box::new(inner)),
        }
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            BorderSpec::Empty { .. } => "Empty",
            BorderSpec::Line { .. } => "Line",
            BorderSpec::Matte { .. } => "Matte",
            BorderSpec::Titled { .. } => "Titled",
            BorderSpec::Etched { .. } => "Etched",
            BorderSpec::Compound { .. } => "Compound",
        }
    }
}

//! Layout configuration: the geometry and style of every card in a run.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::CardError;
use crate::{CANONICAL_HEIGHT, CANONICAL_WIDTH};

/// An RGBA color, written as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);

    pub fn rgba(self) -> Rgba<u8> {
        Rgba(self.0)
    }
}

impl FromStr for Color {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CardError::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| CardError::InvalidColor(s.into()))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color([channel(0)?, channel(2)?, channel(4)?, alpha]))
    }
}

impl TryFrom<String> for Color {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// Corner coordinates of the QR code area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl QrBox {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// A box can only hold a QR code when both sides are positive.
    pub fn is_drawable(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// How the QR code area is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QrPlacement {
    /// Explicit corner coordinates.
    Box(QrBox),
    /// A square whose side is a percentage of the canvas width, centered
    /// horizontally with its top edge at `y`.
    AutoScale { percent_of_width: f32, y: i32 },
}

impl QrPlacement {
    /// Resolve the placement against a canvas of the given width.
    pub fn resolve(&self, canvas_width: u32) -> QrBox {
        match *self {
            QrPlacement::Box(b) => b,
            QrPlacement::AutoScale { percent_of_width, y } => {
                let side = (canvas_width as f32 * percent_of_width / 100.0).round() as i32;
                let x1 = (canvas_width as i32 - side) / 2;
                QrBox {
                    x1,
                    y1: y,
                    x2: x1 + side,
                    y2: y + side,
                }
            }
        }
    }
}

/// Vertical band the label is centered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBand {
    pub y_top: i32,
    pub y_bottom: i32,
}

impl TextBand {
    pub fn center(&self) -> i32 {
        (self.y_top + self.y_bottom) / 2
    }
}

/// Label text and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Prepended to the record text, e.g. `"ROOM NO: "`.
    pub prefix: String,
    pub font_size: f32,
    pub color: Color,
    pub background: Color,
    /// When set, no rectangle is drawn behind the label.
    pub transparent_background: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            font_size: 120.0,
            color: Color::WHITE,
            background: Color::BLACK,
            transparent_background: true,
        }
    }
}

impl LabelStyle {
    pub fn label_for(&self, text: &str) -> String {
        format!("{}{}", self.prefix, text)
    }
}

/// Square logo area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoBox {
    pub x: i32,
    pub y: i32,
    pub size: u32,
}

/// Everything that shapes a card, passed explicitly to the composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub qr: QrPlacement,
    pub text_band: TextBand,
    pub label: LabelStyle,
    pub logo: Option<LogoBox>,
    /// Draw guides in the auto-preview.
    pub show_guides: bool,
    /// Resize the template to the canonical resolution before composing.
    pub auto_correct_resolution: bool,
    pub canonical_width: u32,
    pub canonical_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            qr: QrPlacement::Box(QrBox {
                x1: 542,
                y1: 1453,
                x2: 1729,
                y2: 2662,
            }),
            text_band: TextBand {
                y_top: 2762,
                y_bottom: 2906,
            },
            label: LabelStyle::default(),
            logo: None,
            show_guides: false,
            auto_correct_resolution: false,
            canonical_width: CANONICAL_WIDTH,
            canonical_height: CANONICAL_HEIGHT,
        }
    }
}

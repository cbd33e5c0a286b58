use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgba;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color '{0}' must be #rrggbb or #rrggbbaa")]
    Length(String),
    #[error("Color '{0}' contains a non-hex digit")]
    Digit(String),
}

/// An sRGB color with alpha, written as `#rrggbb` or `#rrggbbaa` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr)]
pub struct Color(Srgba<f64>);

impl Color {
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    pub fn components(&self) -> (f64, f64, f64, f64) {
        self.0.into_components()
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn fade(&self, factor: f64) -> Self {
        let (r, g, b, a) = self.components();
        Self::rgba(r, g, b, a * factor)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::Length(s.to_string()));
        }

        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::Digit(s.to_string()))
        };

        let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
        let a = if hex.len() == 8 { channel(6)? } else { u8::MAX };

        Ok(Self(Srgba::new(r, g, b, a).into_format()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Srgba<u8> = self.0.into_format();
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            c.red, c.green, c.blue, c.alpha
        )
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct FontFamily(String);

crate::impl_string_newtype!(FontFamily);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: FontFamily,
    pub size: f64,
    pub weight: FontWeight,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: FontFamily::new("Sans"),
            size: 17.0,
            weight: FontWeight::Normal,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LayoutMode {
    /// Column and titles centered in the bounds; measures every title first.
    #[default]
    Centered,
    /// Column pinned to the leading edge; no title measurement.
    Leading,
}

/// Appearance of a states view.
///
/// | field | default |
/// |---|---|
/// | `circle_active_color` | `#000000` |
/// | `circle_inactive_color` | `#d3d3d3` |
/// | `circle_border_color` | `#808080` |
/// | `circle_border_width` | `1` |
/// | `circle_max_size` | unbounded |
/// | `separator_length` | `10` |
/// | `separator_color` | `#808080` |
/// | `separator_width` | `1` |
/// | `title_font` | `Sans 17` |
/// | `title_active_color` | `#000000` |
/// | `title_inactive_color` | `#d3d3d3` |
/// | `activity_index` | none |
/// | `activity_indicator_color` | `#ffffff` |
/// | `layout` | `centered` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub circle_active_color: Color,
    pub circle_inactive_color: Color,
    pub circle_border_color: Color,
    pub circle_border_width: f64,
    pub circle_max_size: Option<f64>,
    pub separator_length: f64,
    pub separator_color: Color,
    pub separator_width: f64,
    pub title_font: Font,
    pub title_active_color: Color,
    pub title_inactive_color: Color,
    /// State index that shows the spinner instead of the ripple when it is the boundary.
    pub activity_index: Option<usize>,
    pub activity_indicator_color: Color,
    pub layout: LayoutMode,
}

impl Default for Style {
    fn default() -> Self {
        let black = Color::rgb(0.0, 0.0, 0.0);
        let light_gray = Color::rgb(211.0 / 255.0, 211.0 / 255.0, 211.0 / 255.0);
        let gray = Color::rgb(0.5, 0.5, 0.5);

        Self {
            circle_active_color: black,
            circle_inactive_color: light_gray,
            circle_border_color: gray,
            circle_border_width: 1.0,
            circle_max_size: None,
            separator_length: 10.0,
            separator_color: gray,
            separator_width: 1.0,
            title_font: Font::default(),
            title_active_color: black,
            title_inactive_color: light_gray,
            activity_index: None,
            activity_indicator_color: Color::rgb(1.0, 1.0, 1.0),
            layout: LayoutMode::Centered,
        }
    }
}

impl Style {
    /// True when switching from `self` to `other` moves or resizes any circle.
    pub fn affects_layout(&self, other: &Style) -> bool {
        self.separator_length != other.separator_length
            || self.circle_max_size != other.circle_max_size
            || self.layout != other.layout
            || self.title_font != other.title_font
    }

    pub fn circle_color(&self, active: bool) -> Color {
        if active {
            self.circle_active_color
        } else {
            self.circle_inactive_color
        }
    }

    pub fn title_color(&self, active: bool) -> Color {
        if active {
            self.title_active_color
        } else {
            self.title_inactive_color
        }
    }

    /// Separators take the active color when the state below them is active.
    pub fn separator_color_for(&self, next_active: bool) -> Color {
        if next_active {
            self.circle_active_color
        } else {
            self.separator_color
        }
    }
}

//! Terminal colour themes
//!
//! A fixed catalog of named palettes. Applying one recolours the widget,
//! rewrites the scrollbar stylesheet and sets the page background.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::page::Document;
use crate::widget::TerminalWidget;

/// Id of the injected scrollbar style element
pub const SCROLLBAR_STYLE_ID: &str = "terminal-scrollbar-style";

/// Width the scrollbar style gives the viewport scrollbar
pub const SCROLLBAR_WIDTH_PX: u32 = 12;

/// An sRGB colour written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color(0x00, 0x00, 0x00);

    pub const fn hex(rgb: u32) -> Self {
        Color((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid colour {0:?}, expected #rrggbb")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        let rgb = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(s.to_string()))?;
        Ok(Color::hex(rgb))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Foreground, background and cursor colours of one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub foreground: Color,
    pub background: Color,
    pub cursor: Color,
}

impl ThemeDescriptor {
    pub const fn new(foreground: Color, background: Color, cursor: Color) -> Self {
        Self {
            foreground,
            background,
            cursor,
        }
    }
}

/// Immutable name -> theme lookup table
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: BTreeMap<&'static str, ThemeDescriptor>,
}

impl ThemeCatalog {
    /// The six built-in palettes
    pub fn builtin() -> Self {
        let themes = [
            (
                "Cyberpunk",
                ThemeDescriptor::new(
                    Color::hex(0x0affff),
                    Color::hex(0x121212),
                    Color::hex(0x0a8993),
                ),
            ),
            (
                "Dark",
                ThemeDescriptor::new(Color::WHITE, Color::hex(0x1e1e1e), Color::WHITE),
            ),
            (
                "Light",
                ThemeDescriptor::new(Color::BLACK, Color::WHITE, Color::BLACK),
            ),
            (
                "Green",
                ThemeDescriptor::new(Color::hex(0x00ff00), Color::BLACK, Color::hex(0x00ff00)),
            ),
            (
                "Amber",
                ThemeDescriptor::new(Color::hex(0xffb000), Color::BLACK, Color::hex(0xffb000)),
            ),
            (
                "Neon",
                ThemeDescriptor::new(Color::hex(0xff00ff), Color::BLACK, Color::hex(0xff00ff)),
            ),
        ];

        Self {
            themes: themes.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ThemeDescriptor> {
        self.themes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.themes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Scrollbar rule set derived from a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarStyle {
    pub width_px: u32,
    pub track: Color,
    pub thumb: Color,
    pub thumb_hover: Color,
}

impl ScrollbarStyle {
    pub fn for_theme(theme: &ThemeDescriptor) -> Self {
        Self {
            width_px: SCROLLBAR_WIDTH_PX,
            track: theme.background,
            thumb: theme.foreground,
            thumb_hover: theme.cursor,
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            ".xterm-viewport::-webkit-scrollbar {{\n    width: {}px;\n}}\n\
             .xterm-viewport::-webkit-scrollbar-track {{\n    background: {};\n}}\n\
             .xterm-viewport::-webkit-scrollbar-thumb {{\n    background: {};\n    opacity: 0.5;\n}}\n\
             .xterm-viewport::-webkit-scrollbar-thumb:hover {{\n    background: {};\n}}\n",
            self.width_px, self.track, self.thumb, self.thumb_hover
        )
    }
}

/// Page background for a theme name.
///
/// Only the theme literally named "Light" gets a white page; every other
/// theme gets black regardless of its own background colour.
pub fn page_background(theme_name: &str) -> Color {
    if theme_name == "Light" {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

/// Applies catalog themes to the widget and the page
pub struct ThemeManager {
    catalog: ThemeCatalog,
}

impl ThemeManager {
    pub fn new(catalog: ThemeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    /// Apply the named theme. Unknown names are ignored and return false.
    ///
    /// The caller is responsible for re-fitting the viewport afterwards,
    /// since the scrollbar width may have changed.
    pub fn apply_theme<W, D>(&self, name: &str, widget: &mut W, document: &mut D) -> bool
    where
        W: TerminalWidget + ?Sized,
        D: Document + ?Sized,
    {
        let Some(theme) = self.catalog.get(name) else {
            debug!(name, "ignoring unknown theme");
            return false;
        };

        widget.set_theme(theme);

        let css = ScrollbarStyle::for_theme(theme).to_css();
        if document.style_element(SCROLLBAR_STYLE_ID).is_none() {
            document.create_style_element(SCROLLBAR_STYLE_ID);
        }
        document.set_style_contents(SCROLLBAR_STYLE_ID, &css);

        document.set_body_background(page_background(name));

        info!(name, "theme applied");
        true
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(ThemeCatalog::builtin())
    }
}

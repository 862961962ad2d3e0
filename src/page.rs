//! Hosting page model
//!
//! `Document` is the slice of the page the theme manager touches (style
//! elements and the body background). `Container` is the element the
//! terminal is mounted in; its size is always queried, never taken from
//! the resize notification.

use crate::geometry::PixelSize;
use crate::theme::{Color, SCROLLBAR_STYLE_ID, SCROLLBAR_WIDTH_PX};

pub trait Document {
    /// Contents of the style element with this id, if it exists
    fn style_element(&self, id: &str) -> Option<&str>;

    /// Append an empty style element with this id to the document head
    fn create_style_element(&mut self, id: &str);

    /// Overwrite the contents of an existing style element
    fn set_style_contents(&mut self, id: &str, css: &str);

    fn set_body_background(&mut self, color: Color);
}

pub trait Container {
    /// Inner size available to the terminal (padding excluded)
    fn inner_size(&self) -> PixelSize;

    /// Width currently taken by the viewport's vertical scrollbar
    fn scrollbar_width(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleElement {
    id: String,
    contents: String,
}

/// In-memory page used when no real browser document exists
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    size: PixelSize,
    native_scrollbar_width: u32,
    styles: Vec<StyleElement>,
    body_background: Option<Color>,
}

impl HeadlessPage {
    /// Typical native scrollbar width before any theme styles it
    pub const NATIVE_SCROLLBAR_WIDTH: u32 = 15;

    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            native_scrollbar_width: Self::NATIVE_SCROLLBAR_WIDTH,
            styles: Vec::new(),
            body_background: None,
        }
    }

    pub fn with_native_scrollbar_width(mut self, width: u32) -> Self {
        self.native_scrollbar_width = width;
        self
    }

    /// Simulate the container being laid out at a new size
    pub fn set_size(&mut self, size: PixelSize) {
        self.size = size;
    }

    pub fn body_background(&self) -> Option<Color> {
        self.body_background
    }

    pub fn style_element_count(&self, id: &str) -> usize {
        self.styles.iter().filter(|s| s.id == id).count()
    }
}

impl Document for HeadlessPage {
    fn style_element(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.contents.as_str())
    }

    fn create_style_element(&mut self, id: &str) {
        self.styles.push(StyleElement {
            id: id.to_string(),
            contents: String::new(),
        });
    }

    fn set_style_contents(&mut self, id: &str, css: &str) {
        if let Some(style) = self.styles.iter_mut().find(|s| s.id == id) {
            style.contents = css.to_string();
        }
    }

    fn set_body_background(&mut self, color: Color) {
        self.body_background = Some(color);
    }
}

impl Container for HeadlessPage {
    fn inner_size(&self) -> PixelSize {
        self.size
    }

    fn scrollbar_width(&self) -> u32 {
        if self.style_element(SCROLLBAR_STYLE_ID).is_some() {
            SCROLLBAR_WIDTH_PX
        } else {
            self.native_scrollbar_width
        }
    }
}

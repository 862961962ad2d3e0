//! Viewport geometry and the resize wire formats
//!
//! The backend learns about the viewport through a single text message.
//! The legacy shape `cols:<C>::rows:<R>` is what existing backends parse;
//! the JSON shape matches the websocket front-end.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character-grid size of the terminal viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub cols: u16,
    pub rows: u16,
}

impl Geometry {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Pixel dimensions of the hosting container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measured size of one character cell, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Cell metrics are usable only once the font has been measured
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("malformed resize message: {0:?}")]
    Malformed(String),
    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Encoding used for geometry-update messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// `cols:<C>::rows:<R>`
    #[default]
    Legacy,
    /// `{"type":"resize","cols":C,"rows":R}`
    Json,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonMessage {
    Resize { cols: u16, rows: u16 },
}

/// Geometry-update message codec
pub struct ResizeMessage;

impl ResizeMessage {
    pub fn encode(format: WireFormat, geometry: Geometry) -> String {
        match format {
            WireFormat::Legacy => format!("cols:{}::rows:{}", geometry.cols, geometry.rows),
            WireFormat::Json => {
                let msg = JsonMessage::Resize {
                    cols: geometry.cols,
                    rows: geometry.rows,
                };
                // A two-integer struct always serializes
                serde_json::to_string(&msg).unwrap_or_default()
            }
        }
    }

    /// Decode either wire format
    pub fn decode(text: &str) -> Result<Geometry, GeometryError> {
        let text = text.trim();
        if text.starts_with('{') {
            return match serde_json::from_str::<JsonMessage>(text) {
                Ok(JsonMessage::Resize { cols, rows }) => Ok(Geometry::new(cols, rows)),
                Err(_) => Err(GeometryError::Malformed(text.to_string())),
            };
        }

        let (cols, rows) = text
            .split_once("::")
            .ok_or_else(|| GeometryError::Malformed(text.to_string()))?;
        let cols = cols
            .strip_prefix("cols:")
            .ok_or_else(|| GeometryError::Malformed(text.to_string()))?;
        let rows = rows
            .strip_prefix("rows:")
            .ok_or_else(|| GeometryError::Malformed(text.to_string()))?;

        Ok(Geometry::new(parse_dim("cols", cols)?, parse_dim("rows", rows)?))
    }
}

fn parse_dim(field: &'static str, value: &str) -> Result<u16, GeometryError> {
    value.parse().map_err(|_| GeometryError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl FromStr for Geometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeMessage::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_encoding_is_exact() {
        let msg = ResizeMessage::encode(WireFormat::Legacy, Geometry::new(120, 40));
        assert_eq!(msg, "cols:120::rows:40");
    }

    #[test]
    fn json_encoding_matches_websocket_shape() {
        let msg = ResizeMessage::encode(WireFormat::Json, Geometry::new(100, 30));
        let value: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["type"], "resize");
        assert_eq!(value["cols"], 100);
        assert_eq!(value["rows"], 30);
    }

    #[test]
    fn decode_accepts_both_formats() {
        assert_eq!(
            ResizeMessage::decode("cols:132::rows:43").unwrap(),
            Geometry::new(132, 43)
        );
        assert_eq!(
            ResizeMessage::decode(r#"{"type":"resize","cols":7,"rows":3}"#).unwrap(),
            Geometry::new(7, 3)
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            ResizeMessage::decode("120x40"),
            Err(GeometryError::Malformed(_))
        ));
        assert!(matches!(
            ResizeMessage::decode("rows:40::cols:120"),
            Err(GeometryError::Malformed(_))
        ));
        assert_eq!(
            ResizeMessage::decode("cols:-1::rows:40"),
            Err(GeometryError::InvalidNumber {
                field: "cols",
                value: "-1".to_string()
            })
        );
        assert!(ResizeMessage::decode(r#"{"type":"input","data":"x"}"#).is_err());
    }

    #[test]
    fn from_str_uses_decoder() {
        let geometry: Geometry = "cols:80::rows:24".parse().unwrap();
        assert_eq!(geometry, Geometry::default());
    }

    #[test]
    fn unmeasured_cells() {
        assert!(!CellSize::new(0.0, 17.0).is_measured());
        assert!(!CellSize::new(f64::NAN, 17.0).is_measured());
        assert!(CellSize::new(8.4, 17.0).is_measured());
    }
}

//! Bridge configuration

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geometry::WireFormat;
use crate::widget::TerminalOptions;

/// Top-level configuration, usually read from `termbridge.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Widget construction options
    pub terminal: TerminalOptions,
    /// Deferred re-fit timing
    pub fit: FitConfig,
    /// Backend channel settings
    pub channel: ChannelConfig,
}

/// Delays of the two fire-once re-fits around page load
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Delay after the page script starts (0 = next turn of the loop)
    pub initial_delay_ms: u64,
    /// Delay after the page reports it finished loading
    pub settle_delay_ms: u64,
}

impl FitConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 0,
            settle_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Encoding of geometry updates (`legacy` or `json`)
    pub wire_format: WireFormat,
}

impl BridgeConfig {
    /// Load config from a TOML file, falling back to defaults if it is missing
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Color;

    #[test]
    fn defaults_match_page_script() {
        let config = BridgeConfig::default();
        assert_eq!(config.terminal.scrollback, 1000);
        assert_eq!(config.terminal.font_size, 14);
        assert_eq!(config.terminal.font_family, "monospace");
        assert!(config.terminal.cursor_blink);
        assert_eq!(config.terminal.theme.background, Color::hex(0x141414));
        assert_eq!(config.fit.initial_delay(), Duration::ZERO);
        assert_eq!(config.fit.settle_delay(), Duration::from_millis(100));
        assert_eq!(config.channel.wire_format, WireFormat::Legacy);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(BridgeConfig::from_toml("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = BridgeConfig::from_toml(
            r##"
            [terminal]
            font_size = 16

            [terminal.theme]
            foreground = "#00ff00"
            background = "#000000"
            cursor = "#00ff00"

            [fit]
            settle_delay_ms = 250

            [channel]
            wire_format = "json"
            "##,
        )
        .unwrap();

        assert_eq!(config.terminal.font_size, 16);
        assert_eq!(config.terminal.scrollback, 1000);
        assert_eq!(config.terminal.theme.foreground, Color::hex(0x00ff00));
        assert_eq!(config.fit.initial_delay_ms, 0);
        assert_eq!(config.fit.settle_delay_ms, 250);
        assert_eq!(config.channel.wire_format, WireFormat::Json);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(BridgeConfig::from_toml("[channel]\nwire_format = \"xml\"").is_err());
        assert!(BridgeConfig::from_toml("[terminal.theme]\nforeground = \"green\"").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = BridgeConfig::load("/nonexistent/termbridge.toml").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }
}

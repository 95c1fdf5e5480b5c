//! Viewer configuration loaded from an optional TOML document.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Window and presentation options for the viewer.
///
/// Every field may be omitted from the document; missing values fall back to
/// the defaults. Unknown keys are rejected.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Window width in pixels.
    pub window_width: i32,
    /// Window height in pixels.
    pub window_height: i32,
    /// Synchronise presentation with the display refresh rate.
    pub vsync: bool,
    /// Print frame-timing metrics once per second.
    pub show_fps: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            vsync: true,
            show_fps: false,
        }
    }
}

impl ViewerConfig {
    /// Loads the configuration from the TOML document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read viewer config at {}", path.display()))?;
        toml::from_str(&contents).context("failed to parse viewer config toml contents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_the_defaults() {
        let config: ViewerConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_documents_override_selected_fields() {
        let config: ViewerConfig = toml::from_str(
            r#"
            window_width = 1920
            show_fps = true
        "#,
        )
        .expect("partial config parses");

        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 720);
        assert!(config.show_fps);
        assert!(config.vsync);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<ViewerConfig, _> = toml::from_str("window_widht = 640");
        assert!(result.is_err(), "typoed keys must be rejected");
    }
}

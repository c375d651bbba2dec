use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Glyphs and appearance settings for the viewport. Loadable from a YAML
/// file so a terminal with a narrow font repertoire can swap the defaults
/// out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_name")]
    pub name: String,

    /// Solid pixel.
    #[serde(default = "default_block")]
    pub block: char,

    /// Outermost canvas ring where the pixel is still unset.
    #[serde(default = "default_border_empty")]
    pub border_empty: char,

    /// Vertical guideline on the horizontal-mirror axis.
    #[serde(default = "default_guide_vertical")]
    pub guide_vertical: char,

    /// Horizontal guideline on the vertical-mirror axis.
    #[serde(default = "default_guide_horizontal")]
    pub guide_horizontal: char,

    /// Armed-shape preview cells.
    #[serde(default = "default_preview")]
    pub preview: char,

    #[serde(default = "default_wrap_up")]
    pub wrap_up: char,

    #[serde(default = "default_wrap_down")]
    pub wrap_down: char,

    #[serde(default = "default_wrap_left")]
    pub wrap_left: char,

    #[serde(default = "default_wrap_right")]
    pub wrap_right: char,

    /// Cursor glyph while idle or armed.
    #[serde(default = "default_cursor_idle")]
    pub cursor_idle: char,

    /// Cursor glyph while a stroke is being laid down.
    #[serde(default = "default_cursor_stroke")]
    pub cursor_stroke: char,

    /// Palette-strip marker for the selected entry.
    #[serde(default = "default_swatch_current")]
    pub swatch_current: char,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_block() -> char {
    '█'
}

fn default_border_empty() -> char {
    '.'
}

fn default_guide_vertical() -> char {
    '|'
}

fn default_guide_horizontal() -> char {
    '-'
}

fn default_preview() -> char {
    'x'
}

fn default_wrap_up() -> char {
    '▲'
}

fn default_wrap_down() -> char {
    '▼'
}

fn default_wrap_left() -> char {
    '◀'
}

fn default_wrap_right() -> char {
    '▶'
}

fn default_cursor_idle() -> char {
    '◘'
}

fn default_cursor_stroke() -> char {
    '•'
}

fn default_swatch_current() -> char {
    'X'
}

impl Theme {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file: {}", path.display()))?;

        let theme: Theme = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse theme YAML: {}", path.display()))?;

        Ok(theme)
    }
}

impl Default for Theme {
    fn default() -> Self {
        serde_yaml::from_str("{}").expect("empty mapping yields the default theme")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_theme_uses_block_glyphs() {
        let theme = Theme::default();
        assert_eq!(theme.block, '█');
        assert_eq!(theme.border_empty, '.');
        assert_eq!(theme.cursor_idle, '◘');
    }

    #[test]
    fn partial_yaml_falls_back_per_field() {
        let theme: Theme = serde_yaml::from_str("name: ascii\nblock: '#'\npreview: '?'").unwrap();
        assert_eq!(theme.name, "ascii");
        assert_eq!(theme.block, '#');
        assert_eq!(theme.preview, '?');
        assert_eq!(theme.wrap_up, '▲');
    }
}

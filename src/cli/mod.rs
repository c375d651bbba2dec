use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixtty")]
#[command(version)]
#[command(about = "Terminal pixel art editor", long_about = None)]
pub struct Args {
    /// Image file to load; the canvas adopts its size and merges its colors
    /// into the palette
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output image written on save/quit
    #[arg(short, long, default_value = "pix.out.png")]
    pub output: PathBuf,

    /// Canvas width in pixels
    #[arg(short = 'W', long, default_value = "64")]
    pub width: usize,

    /// Canvas height in pixels
    #[arg(short = 'H', long, default_value = "64")]
    pub height: usize,

    /// Viewport size in cells (the window is centered on the cursor)
    #[arg(short, long, default_value = "33")]
    pub view: usize,

    /// Hex palette file, one RRGGBB per line
    #[arg(short, long)]
    pub palette: Option<PathBuf>,

    /// Keymap file (action_name::key1,key2 lines)
    #[arg(short, long)]
    pub keymap: Option<PathBuf>,

    /// Theme YAML with viewport glyph overrides
    #[arg(short, long)]
    pub theme: Option<PathBuf>,
}

impl Args {
    /// Zero-sized canvases and viewports cannot host a cursor; reject them
    /// before the terminal is touched.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "canvas must be at least 1x1, got {}x{}",
                self.width,
                self.height
            );
        }
        if self.view == 0 {
            bail!("viewport size must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arguments_validate() {
        let args = Args::try_parse_from(["pixtty"]).unwrap();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn zero_canvas_dimensions_are_rejected() {
        let args = Args::try_parse_from(["pixtty", "-W", "0"]).unwrap();
        assert!(args.validate().is_err());
        let args = Args::try_parse_from(["pixtty", "-H", "0"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let args = Args::try_parse_from(["pixtty", "-v", "0"]).unwrap();
        assert!(args.validate().is_err());
    }
}

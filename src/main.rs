use anyhow::{Context, Result};
use clap::Parser;

mod canvas;
mod cli;
mod history;
mod image_io;
mod keymap;
mod palette;
mod session;
mod term;
mod theme;
mod tools;
mod viewport;

use keymap::Keymap;
use palette::Palette;
use session::Session;
use theme::Theme;
use viewport::Renderer;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // configuration problems are fatal before the interactive loop starts
    args.validate()?;
    let keymap = Keymap::load_or_default(args.keymap.as_deref())
        .context("invalid keymap configuration")?;

    let theme = match &args.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::default(),
    };

    let mut palette = Palette::default_colors();
    if let Some(path) = &args.palette {
        palette
            .load_hex_file(path)
            .context("invalid palette file")?;
    }

    let mut session = Session::new(args.width, args.height, palette);
    if let Some(path) = &args.file {
        let (width, height, pixels) = image_io::load_image(path)?;
        session.load_pixels(width, height, pixels);
    }

    let renderer = Renderer::new(args.view);
    term::run(&mut session, &renderer, &theme, &keymap, &args.output)?;

    // clean exit: the checkpoint has served its purpose
    let checkpoint = image_io::checkpoint_path(&args.output);
    if checkpoint.exists() {
        std::fs::remove_file(&checkpoint).ok();
    }

    Ok(())
}

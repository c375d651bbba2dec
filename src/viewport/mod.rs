mod cell;
mod grid;

pub use cell::{Cell, CellFlags};
pub use grid::Grid;

use std::collections::HashSet;

use crate::canvas::Rgb;
use crate::palette::{Palette, MATCH_THRESHOLD};
use crate::session::Session;
use crate::theme::Theme;
use crate::tools::{raster, Tool};

/// Palette entries shown in the overlay strip.
const STRIP_WIDTH: usize = 9;

/// One rendered frame: the cell grid plus the grid position of the cursor
/// cell, so the backend can park the terminal cursor there.
pub struct Frame {
    pub grid: Grid,
    pub cursor: (usize, usize),
}

/// Projects a cursor-centered window of the canvas into renderable cells.
///
/// The window spans `view_size` canvas cells per axis plus one margin
/// row/column on each side for wrap indicators, and two overlay rows below
/// for the palette strip and status line. Canvas cells are drawn first and
/// the overlay never writes into them.
pub struct Renderer {
    view_size: usize,
}

impl Renderer {
    pub fn new(view_size: usize) -> Self {
        Self { view_size }
    }

    pub fn view_size(&self) -> usize {
        self.view_size
    }

    pub fn render(&self, session: &Session, theme: &Theme) -> Frame {
        let view = self.view_size as i64;
        let mut grid = Grid::new(self.view_size + 2, self.view_size + 4);

        let canvas = &session.canvas;
        let width = canvas.width() as i64;
        let height = canvas.height() as i64;
        let (cursor_x, cursor_y) = session.cursor();
        let mirror = session.mirror();
        let color_index = (session.color_index() % 256) as u8;

        let start_x = cursor_x as i64 - view / 2;
        let start_y = cursor_y as i64 - view / 2;

        let preview = self.preview_cells(session);

        for y in -1..=view {
            for x in -1..=view {
                let img_x = start_x + x;
                let img_y = start_y + y;
                let in_x = img_x >= 0 && img_x < width;
                let in_y = img_y >= 0 && img_y < height;

                let cell = if in_x && in_y {
                    let pixel = canvas.get_pixel(img_x as usize, img_y as usize);
                    let color = quantize(&session.palette, pixel);

                    if preview.contains(&(img_x, img_y)) {
                        Cell::new(theme.preview, Some(color_index))
                    } else if img_x == 0 || img_x == width - 1 || img_y == 0 || img_y == height - 1 {
                        if color.is_none() {
                            Cell::new(theme.border_empty, None)
                        } else {
                            Cell::new(theme.block, color)
                        }
                    } else if mirror.horizontal && img_x == mirror_axis_x(mirror.offset_x, width) {
                        Cell::new(theme.guide_vertical, color)
                    } else if mirror.vertical && img_y == mirror_axis_y(mirror.offset_y, height) {
                        Cell::new(theme.guide_horizontal, color)
                    } else {
                        Cell::new(theme.block, color)
                    }
                } else if in_x {
                    // one row above/below the canvas: toroidal preview of
                    // the opposite edge
                    if img_y == -1 {
                        let pixel = canvas.get_pixel(img_x as usize, (height - 1) as usize);
                        Cell::new(theme.wrap_up, quantize(&session.palette, pixel))
                    } else if img_y == height {
                        let pixel = canvas.get_pixel(img_x as usize, 0);
                        Cell::new(theme.wrap_down, quantize(&session.palette, pixel))
                    } else {
                        Cell::blank()
                    }
                } else if in_y {
                    if img_x == -1 {
                        let pixel = canvas.get_pixel((width - 1) as usize, img_y as usize);
                        Cell::new(theme.wrap_left, quantize(&session.palette, pixel))
                    } else if img_x == width {
                        let pixel = canvas.get_pixel(0, img_y as usize);
                        Cell::new(theme.wrap_right, quantize(&session.palette, pixel))
                    } else {
                        Cell::blank()
                    }
                } else {
                    Cell::blank()
                };

                grid.write_cell((x + 1) as usize, (y + 1) as usize, cell);
            }
        }

        // cursor cell always wins
        let cursor_glyph = if session.engine.stroke_active() {
            theme.cursor_stroke
        } else {
            theme.cursor_idle
        };
        let center = (view / 2 + 1) as usize;
        grid.write_cell(center, center, Cell::reversed(cursor_glyph, Some(color_index)));

        self.draw_overlay(&mut grid, session, theme);

        Frame {
            grid,
            cursor: (center, center),
        }
    }

    /// Canvas cells the armed tool would touch: the anchor-to-cursor
    /// bounding box for Rect/Ellipse, the projected Bresenham path for
    /// Line.
    fn preview_cells(&self, session: &Session) -> HashSet<(i64, i64)> {
        let Some((ax, ay)) = session.engine.anchor() else {
            return HashSet::new();
        };
        let (cx, cy) = session.cursor();
        let (ax, ay, cx, cy) = (ax as i64, ay as i64, cx as i64, cy as i64);

        match session.engine.tool() {
            Tool::Line => raster::line_points(ax, ay, cx, cy).into_iter().collect(),
            Tool::Rect | Tool::Ellipse => {
                raster::rect_points(ax, ay, cx, cy).into_iter().collect()
            }
            _ => HashSet::new(),
        }
    }

    /// Palette strip plus status line, in the rows below the viewport.
    fn draw_overlay(&self, grid: &mut Grid, session: &Session, theme: &Theme) {
        let strip_row = self.view_size + 2;
        let status_row = self.view_size + 3;
        let len = session.palette.len();
        let current = session.color_index();

        // small viewports get a narrower strip instead of silent clipping
        let strip = STRIP_WIDTH.min(grid.width());
        for slot in 0..strip {
            let offset = slot as i64 - (strip / 2) as i64;
            let index = (current as i64 + offset).rem_euclid(len as i64) as usize;
            let cell = if index == current {
                Cell::reversed(theme.swatch_current, Some((index % 256) as u8))
            } else {
                Cell::new(theme.block, Some((index % 256) as u8))
            };
            grid.write_cell(slot, strip_row, cell);
        }

        let (r, g, b) = session.current_color();
        let mirror = session.mirror();
        let status = format!(
            "{} {} #{:02x}{:02x}{:02x}{}{}",
            session.engine.tool().name(),
            current,
            r,
            g,
            b,
            if mirror.horizontal { " h" } else { "" },
            if mirror.vertical { " v" } else { "" },
        );
        for (i, glyph) in status.chars().enumerate() {
            grid.write_cell(i, status_row, Cell::new(glyph, None));
        }
    }
}

fn quantize(palette: &Palette, pixel: Rgb) -> Option<u8> {
    let (r, g, b) = pixel;
    // unset pixels keep the terminal's default background
    if r as u16 + g as u16 + b as u16 == 0 {
        return None;
    }
    Some((palette.nearest_index(pixel, MATCH_THRESHOLD) % 256) as u8)
}

fn mirror_axis_x(offset_x: i32, width: i64) -> i64 {
    // fixed point of x -> width + offset - 1 - x
    (width + offset_x as i64 - 1) / 2
}

fn mirror_axis_y(offset_y: i32, height: i64) -> i64 {
    (height + offset_y as i64 - 1) / 2
}

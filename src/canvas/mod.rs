pub mod fill;

/// A true-color pixel. The canvas stores full RGB; the palette only enters
/// the picture at render time.
pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);

/// Reflection rules applied to every canvas write. Each axis is independent
/// and carries an integer offset that shifts the mirror line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Mirror {
    /// Reflected x for a canvas of the given width. May land out of bounds;
    /// callers drop such replicas.
    pub fn reflect_x(&self, x: usize, width: usize) -> i64 {
        width as i64 + self.offset_x as i64 - 1 - x as i64
    }

    pub fn reflect_y(&self, y: usize, height: usize) -> i64 {
        height as i64 + self.offset_y as i64 - 1 - y as i64
    }

    /// Mirror seed positions for a write at (x, y): (h, v, both), in-bounds
    /// replicas only. The primary position is not included.
    pub fn replicas(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let rx = self.reflect_x(x, width);
        let ry = self.reflect_y(y, height);
        let in_w = |v: i64| v >= 0 && v < width as i64;
        let in_h = |v: i64| v >= 0 && v < height as i64;

        if self.horizontal && in_w(rx) {
            out.push((rx as usize, y));
        }
        if self.vertical && in_h(ry) {
            out.push((x, ry as usize));
        }
        if self.horizontal && self.vertical && in_w(rx) && in_h(ry) {
            out.push((rx as usize, ry as usize));
        }
        out
    }
}

/// The editable pixel grid. Row-major, origin top-left.
#[derive(Clone)]
pub struct Canvas {
    data: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let data = vec![BLACK; width * height];
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.data
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Out-of-bounds access is a programming error, not a runtime case.
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = color;
        }
    }

    /// Primary write plus one replica per active mirror axis (and the
    /// double reflection when both are on). Replicas that land outside the
    /// canvas are dropped, never wrapped; the primary write always happens.
    pub fn set_pixel_mirrored(&mut self, x: usize, y: usize, color: Rgb, mirror: &Mirror) {
        self.set_pixel(x, y, color);
        for (mx, my) in mirror.replicas(x, y, self.width, self.height) {
            self.set_pixel(mx, my, color);
        }
    }

    /// Wholesale buffer replacement, used when adopting a loaded image.
    pub fn resize_from_image(&mut self, width: usize, height: usize, pixels: Vec<Rgb>) {
        debug_assert_eq!(pixels.len(), width * height);
        self.width = width;
        self.height = height;
        self.data = pixels;
    }

    pub fn clear(&mut self) {
        self.data.fill(BLACK);
    }
}

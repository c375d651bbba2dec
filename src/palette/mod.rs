use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::canvas::Rgb;

/// Bounded by the terminal backend's color-pair capacity.
pub const MAX_COLORS: usize = 256;

/// Hex palette files overwrite slots from here up; indices below stay
/// reserved (0 = background sentinel, 1 = white).
pub const FILE_SLOT_OFFSET: usize = 2;

/// A palette file needs at least this many valid lines to be usable.
pub const MIN_FILE_COLORS: usize = 8;

/// Default "good enough" distance for the early-exit nearest-color scan.
pub const MATCH_THRESHOLD: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PaletteFileError {
    #[error("failed to read palette file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line}: '{text}' is not a RRGGBB hex color")]
    BadHexLine { line: usize, text: String },
    #[error("palette file has {found} colors, need at least {required}")]
    TooFewColors { found: usize, required: usize },
}

/// Ordered, index-addressable set of renderable colors. Entries are only
/// appended or replaced, never removed mid-session, so indices handed out
/// to the renderer stay stable.
#[derive(Clone)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Index 0 is the background/empty sentinel (black), index 1 white,
    /// then a 6x6x6 color cube and a 24-step grayscale ramp.
    pub fn default_colors() -> Self {
        let mut colors = Vec::with_capacity(242);
        colors.push((0, 0, 0));
        colors.push((255, 255, 255));

        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    let channel = |v: u16| if v == 0 { 0 } else { (55 + v * 40) as u8 };
                    colors.push((channel(r), channel(g), channel(b)));
                }
            }
        }

        for i in 0..24u16 {
            let val = (8 + i * 10) as u8;
            colors.push((val, val, val));
        }

        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Indexing wraps cyclically, so a cycled-past-the-end index is never
    /// an error.
    pub fn get(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Overwrites one entry; every other index is untouched.
    pub fn replace(&mut self, index: usize, rgb: Rgb) {
        let len = self.colors.len();
        self.colors[index % len] = rgb;
    }

    /// Nearest palette index for an RGB triple, Euclidean distance.
    ///
    /// Scan order: an exact match wins outright; otherwise the first entry
    /// within `threshold` is taken even when a strictly closer entry sits
    /// later in the table (a deliberate speed/accuracy tradeoff -- changing
    /// it changes rendered colors). Only when nothing is within threshold
    /// does the true global minimum win.
    pub fn nearest_index(&self, rgb: Rgb, threshold: f64) -> usize {
        for (i, &color) in self.colors.iter().enumerate() {
            if color == rgb {
                return i;
            }
        }

        let mut best = 0usize;
        let mut best_distance = f64::INFINITY;
        for (i, &color) in self.colors.iter().enumerate() {
            let d = distance(color, rgb);
            if d <= threshold {
                return i;
            }
            if d < best_distance {
                best_distance = d;
                best = i;
            }
        }
        best
    }

    /// Merges colors not already present, most-frequent first, until the
    /// palette reaches `cap` or the input runs out. Duplicates are skipped
    /// without counting against the cap.
    pub fn extend_from_histogram(&mut self, pixels: &[Rgb], cap: usize) {
        let mut histogram: HashMap<Rgb, usize> = HashMap::new();
        for &pixel in pixels {
            *histogram.entry(pixel).or_insert(0) += 1;
        }

        let mut ranked: Vec<(Rgb, usize)> = histogram.into_iter().collect();
        // count desc, then color for a deterministic order on ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (color, _) in ranked {
            if self.colors.len() >= cap {
                break;
            }
            if !self.colors.contains(&color) {
                self.colors.push(color);
            }
        }
    }

    /// Reads a hex palette file: one `RRGGBB` per line, optional leading
    /// `#`, blank lines skipped. Entries land in slots starting at
    /// [`FILE_SLOT_OFFSET`]; anything past [`MAX_COLORS`] is dropped.
    pub fn load_hex_file(&mut self, path: &Path) -> Result<usize, PaletteFileError> {
        let content = fs::read_to_string(path).map_err(|source| PaletteFileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut parsed = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let rgb = parse_hex_color(text).ok_or_else(|| PaletteFileError::BadHexLine {
                line: line_no + 1,
                text: text.to_string(),
            })?;
            parsed.push(rgb);
        }

        if parsed.len() < MIN_FILE_COLORS {
            return Err(PaletteFileError::TooFewColors {
                found: parsed.len(),
                required: MIN_FILE_COLORS,
            });
        }

        for (i, rgb) in parsed.into_iter().enumerate() {
            let slot = FILE_SLOT_OFFSET + i;
            if slot >= MAX_COLORS {
                break;
            }
            if slot < self.colors.len() {
                self.colors[slot] = rgb;
            } else {
                self.colors.push(rgb);
            }
        }
        Ok(self.colors.len())
    }

    /// Writes the whole table back out as `RRGGBB` lines.
    pub fn export_hex_file(&self, path: &Path) -> std::io::Result<()> {
        let mut out = String::with_capacity(self.colors.len() * 7);
        for &(r, g, b) in &self.colors {
            out.push_str(&format!("{:02x}{:02x}{:02x}\n", r, g, b));
        }
        fs::write(path, out)
    }
}

fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dg = a.1 as f64 - b.1 as f64;
    let db = a.2 as f64 - b.2 as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

pub fn parse_hex_color(text: &str) -> Option<Rgb> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_palette_reserves_low_indices() {
        let palette = Palette::default_colors();
        assert_eq!(palette.get(0), (0, 0, 0));
        assert_eq!(palette.get(1), (255, 255, 255));
        assert!(palette.len() <= MAX_COLORS);
    }

    #[test]
    fn exact_entry_maps_to_an_exact_match() {
        // the default table repeats black/white inside the cube, so an
        // exact match resolves to the first index carrying that color
        let palette = Palette::default_colors();
        for i in 0..palette.len() {
            let found = palette.nearest_index(palette.get(i), 0.0);
            assert_eq!(palette.get(found), palette.get(i));
            assert!(found <= i);
        }
    }

    #[test]
    fn unique_entry_maps_to_its_own_index() {
        let palette = Palette::default_colors();
        // grayscale ramp colors appear exactly once
        let last = palette.len() - 1;
        assert_eq!(palette.nearest_index(palette.get(last), 0.0), last);
    }

    #[test]
    fn threshold_takes_first_good_enough_entry() {
        let palette = Palette {
            colors: vec![(0, 0, 0), (100, 0, 0), (90, 0, 0)],
        };
        // (92,0,0) is closest to index 2, but index 1 is within threshold
        // and scans first
        assert_eq!(palette.nearest_index((92, 0, 0), 20.0), 1);
        // with no threshold slack the global minimum wins
        assert_eq!(palette.nearest_index((92, 0, 0), 0.5), 2);
    }

    #[test]
    fn replace_leaves_other_entries_alone() {
        let mut palette = Palette::default_colors();
        let before: Vec<Rgb> = palette.colors().to_vec();
        palette.replace(10, (1, 2, 3));
        assert_eq!(palette.get(10), (1, 2, 3));
        for (i, &c) in before.iter().enumerate() {
            if i != 10 {
                assert_eq!(palette.get(i), c);
            }
        }
    }

    #[test]
    fn histogram_merge_is_most_frequent_first_and_skips_duplicates() {
        let mut palette = Palette {
            colors: vec![(0, 0, 0), (255, 255, 255)],
        };
        let pixels = vec![
            (9, 9, 9),
            (9, 9, 9),
            (9, 9, 9),
            (5, 5, 5),
            (5, 5, 5),
            (255, 255, 255), // already present, must not consume a slot
            (1, 1, 1),
        ];
        palette.extend_from_histogram(&pixels, 4);
        assert_eq!(palette.colors(), &[(0, 0, 0), (255, 255, 255), (9, 9, 9), (5, 5, 5)]);
    }

    #[test]
    fn get_wraps_cyclically() {
        let palette = Palette {
            colors: vec![(0, 0, 0), (1, 1, 1), (2, 2, 2)],
        };
        assert_eq!(palette.get(4), (1, 1, 1));
    }

    #[test]
    fn hex_lines_parse_with_and_without_hash() {
        assert_eq!(parse_hex_color("ff5733"), Some((255, 87, 51)));
        assert_eq!(parse_hex_color("#ff5733"), Some((255, 87, 51)));
        assert_eq!(parse_hex_color("ff573"), None);
        assert_eq!(parse_hex_color("gg5733"), None);
    }

    #[test]
    fn palette_file_below_minimum_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("pixtty_test_small_palette.hex");
        fs::write(&path, "ff0000\n00ff00\n").unwrap();
        let mut palette = Palette::default_colors();
        let err = palette.load_hex_file(&path).unwrap_err();
        assert!(matches!(err, PaletteFileError::TooFewColors { found: 2, .. }));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn palette_file_overwrites_from_slot_offset() {
        let dir = std::env::temp_dir();
        let path = dir.join("pixtty_test_palette.hex");
        let lines: String = (0..8).map(|i| format!("{:02x}0000\n", i + 1)).collect();
        fs::write(&path, lines).unwrap();
        let mut palette = Palette::default_colors();
        palette.load_hex_file(&path).unwrap();
        assert_eq!(palette.get(0), (0, 0, 0), "background stays reserved");
        assert_eq!(palette.get(1), (255, 255, 255), "white stays reserved");
        assert_eq!(palette.get(FILE_SLOT_OFFSET), (1, 0, 0));
        assert_eq!(palette.get(FILE_SLOT_OFFSET + 7), (8, 0, 0));
        fs::remove_file(&path).ok();
    }
}

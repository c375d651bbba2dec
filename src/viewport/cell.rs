use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b00000001;
    }
}

/// One renderable character cell: a glyph plus an optional palette index.
/// `None` is the sentinel for "no color pair" (terminal default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Option<u8>,
    pub flags: CellFlags,
}

impl Cell {
    pub fn new(glyph: char, color: Option<u8>) -> Self {
        Self {
            glyph,
            color,
            flags: CellFlags::empty(),
        }
    }

    pub fn reversed(glyph: char, color: Option<u8>) -> Self {
        Self {
            glyph,
            color,
            flags: CellFlags::REVERSE,
        }
    }

    pub fn blank() -> Self {
        Self::new(' ', None)
    }
}

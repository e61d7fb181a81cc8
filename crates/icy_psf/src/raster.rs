//! Glyph sheet rasterizer.
//!
//! The sheet is 16 cells wide. Each cell is `(width + 1) x (height + 1)` pixels:
//! the glyph followed by a one pixel separator on the right and bottom. The whole
//! sheet has an extra one pixel margin on the top and left.

use crate::{PsfError, PsfHeader, Result};

pub const GLYPHS_PER_ROW: u32 = 16;

/// Largest accepted pixel count (1 GiB of RGBA data).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

/// Background of unmapped glyph cells and of the area between cells.
pub const EMPTY_TINT: Rgba = Rgba(0xF0, 0xC0, 0xC0, 0xFF);
pub const KNOWN_TINT: Rgba = Rgba(0xF0, 0xF0, 0xF0, 0xFF);
pub const FOREGROUND: Rgba = Rgba(0x10, 0x10, 0x10, 0xFF);

/// Background used for a single glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTint {
    Known,
    Empty,
}

impl CellTint {
    /// Only fonts with a unicode table can mark a glyph as unmapped.
    pub fn for_glyph(has_mapping: bool, entry_is_empty: bool) -> Self {
        if has_mapping && entry_is_empty {
            CellTint::Empty
        } else {
            CellTint::Known
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            CellTint::Known => KNOWN_TINT,
            CellTint::Empty => EMPTY_TINT,
        }
    }
}

/// Sheet dimensions in pixels for the given font geometry.
pub fn canvas_size(header: &PsfHeader) -> Result<(u32, u32)> {
    let per_row = GLYPHS_PER_ROW as u64;
    let rows = (header.glyph_count as u64).div_ceil(per_row);
    let width = 1 + per_row * (header.width as u64 + 1);
    let height = 1 + rows * (header.height as u64 + 1);

    // both sides are >= 1, so each side is bounded by the pixel limit as well
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        return Err(PsfError::CanvasTooLarge { width, height });
    }
    Ok((width as u32, height as u32))
}

/// Top left pixel of the cell for glyph `index`.
pub fn cell_origin(index: u32, header: &PsfHeader) -> (u32, u32) {
    let x = (index % GLYPHS_PER_ROW) * (header.width + 1) + 1;
    let y = (index / GLYPHS_PER_ROW) * (header.height + 1) + 1;
    (x, y)
}

/// RGBA8 pixel buffer, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let mut canvas = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        };
        canvas.fill(background);
        canvas
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.0, color.1, color.2, color.3]);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// # Panics
    ///
    /// Panics if the position is outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.offset(x, y);
        Rgba(self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.offset(x, y);
        self.data[idx..idx + 4].copy_from_slice(&[color.0, color.1, color.2, color.3]);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside {}x{}", self.width, self.height);
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Expand a packed glyph bitmap into its cell.
    ///
    /// Bits are read MSB first; a new source byte starts every 8 columns and at the
    /// start of each row. Source bytes missing from `bitmap` count as zero.
    pub fn draw_glyph(&mut self, index: u32, bitmap: &[u8], header: &PsfHeader, tint: CellTint) {
        let (x_offset, y_offset) = cell_origin(index, header);
        let background = tint.color();

        let mut src = 0;
        let mut data = 0u8;
        let mut missing = false;
        for y in 0..header.height {
            for x in 0..header.width {
                if x % 8 == 0 {
                    data = match bitmap.get(src) {
                        Some(b) => *b,
                        None => {
                            missing = true;
                            0
                        }
                    };
                    src += 1;
                }
                let color = if data & 0x80 == 0x80 { FOREGROUND } else { background };
                self.set_pixel(x_offset + x, y_offset + y, color);
                data <<= 1;
            }
        }
        if missing {
            log::warn!(
                "glyph {index}: {} bytes don't cover {}x{} pixels, padding with blank rows",
                bitmap.len(),
                header.width,
                header.height
            );
        }
    }
}

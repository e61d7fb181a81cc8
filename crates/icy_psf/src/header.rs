//! PSF2 header: a fixed 32 byte little-endian record.
//!
//! Layout (byte offsets):
//! - 0: magic
//! - 4: version
//! - 8: header size (offset of the first glyph bitmap)
//! - 12: flags (bit 0 = unicode table follows the bitmaps)
//! - 16: number of glyphs
//! - 20: bytes per glyph
//! - 24: height
//! - 28: width

use std::fmt::Display;
use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};

use crate::{PsfError, PsfReader, Result};

/// PSF2 magic number (little-endian: 0x864AB572)
pub const PSF2_MAGIC: u32 = 0x864A_B572;

/// Size of the fixed header record in bytes
pub const HEADER_SIZE: usize = 32;

const PSF2_HAS_UNICODE_TABLE: u32 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsfHeader {
    pub magic: u32,
    pub version: u32,
    pub header_size: u32,
    pub flags: u32,
    pub glyph_count: u32,
    pub bytes_per_glyph: u32,
    pub height: u32,
    pub width: u32,
}

impl PsfHeader {
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: LittleEndian::read_u32(&bytes[0..4]),
            version: LittleEndian::read_u32(&bytes[4..8]),
            header_size: LittleEndian::read_u32(&bytes[8..12]),
            flags: LittleEndian::read_u32(&bytes[12..16]),
            glyph_count: LittleEndian::read_u32(&bytes[16..20]),
            bytes_per_glyph: LittleEndian::read_u32(&bytes[20..24]),
            height: LittleEndian::read_u32(&bytes[24..28]),
            width: LittleEndian::read_u32(&bytes[28..32]),
        }
    }

    pub fn has_unicode_table(&self) -> bool {
        self.flags & PSF2_HAS_UNICODE_TABLE != 0
    }

    /// Byte offset of the unicode table (directly after the last bitmap).
    pub fn table_offset(&self) -> u64 {
        self.header_size as u64 + self.bytes_per_glyph as u64 * self.glyph_count as u64
    }

    /// Reject headers whose glyph records can't hold a `width`x`height` bitmap.
    ///
    /// The required byte count is floor divided, so a glyph with a pixel count
    /// that isn't a multiple of 8 passes with one byte less than a ceiling check
    /// would demand.
    pub fn validate_geometry(&self) -> Result<()> {
        let required = (self.width as u64 * self.height as u64) / 8;
        if (self.bytes_per_glyph as u64) < required {
            return Err(PsfError::GlyphDataTooSmall {
                bytes_per_glyph: self.bytes_per_glyph,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn validate_magic(&self) -> Result<()> {
        if self.magic != PSF2_MAGIC {
            return Err(PsfError::MagicMismatch {
                magic: self.magic,
                expected: PSF2_MAGIC,
            });
        }
        Ok(())
    }
}

impl Display for PsfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Magic: 0x{:08x}, Version: {}, Header: {}, Flags: 0x{:08x}, Glyphs: {}, Bytes per glyph: {}, Size: {}x{} >",
            self.magic, self.version, self.header_size, self.flags, self.glyph_count, self.bytes_per_glyph, self.width, self.height
        )
    }
}

/// Read the fixed header from the current cursor position.
pub fn read_header<R: Read + Seek>(reader: &mut PsfReader<R>) -> Result<PsfHeader> {
    let data = reader.read_up_to(HEADER_SIZE)?;
    if data.len() < HEADER_SIZE {
        return Err(PsfError::TruncatedHeader {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let mut bytes = [0u8; HEADER_SIZE];
    bytes.copy_from_slice(&data);
    Ok(PsfHeader::from_bytes(&bytes))
}

//! PSF2 unicode table.
//!
//! The table follows the glyph bitmaps. Every glyph has one entry: UTF-8 encoded
//! code points terminated by `0xFF`. When sequence decoding is enabled, a `0xFE`
//! byte inside an entry starts a sequence of code points that together map to the
//! glyph (e.g. a base letter plus a combining accent). Otherwise `0xFE` is just an
//! ill-formed UTF-8 byte.

use std::io::{Read, Seek};

use crate::{PsfError, PsfHeader, PsfReader, Result};

pub const PSF2_SEPARATOR: u8 = 0xFF;
pub const PSF2_STARTSEQ: u8 = 0xFE;

/// Code points assigned to a single glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphMapping {
    pub code_points: Vec<char>,
    pub sequences: Vec<Vec<char>>,
}

impl GlyphMapping {
    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty() && self.sequences.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphMap {
    entries: Vec<GlyphMapping>,
}

impl GlyphMap {
    pub fn new(entries: Vec<GlyphMapping>) -> Self {
        Self { entries }
    }

    /// Every glyph maps to the code point equal to its index.
    ///
    /// Only meaningful for display, fonts without a table don't carry this information.
    pub fn identity(glyph_count: u32) -> Self {
        let entries = (0..glyph_count)
            .map(|i| GlyphMapping {
                code_points: char::from_u32(i).into_iter().collect(),
                sequences: Vec::new(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, glyph: u32) -> Option<&GlyphMapping> {
        self.entries.get(glyph as usize)
    }

    /// Returns true if `glyph` has no code points assigned (or is out of range).
    pub fn is_unmapped(&self, glyph: u32) -> bool {
        self.get(glyph).map_or(true, GlyphMapping::is_empty)
    }

    /// Non-empty entries with their glyph index.
    pub fn listing(&self) -> impl Iterator<Item = (u32, &GlyphMapping)> {
        self.entries.iter().enumerate().filter(|(_, m)| !m.is_empty()).map(|(i, m)| (i as u32, m))
    }
}

/// Decode the table of a font whose header has the unicode flag set.
///
/// Leaves the cursor somewhere behind the table; callers have to seek before reading bitmaps.
pub fn read_table<R: Read + Seek>(reader: &mut PsfReader<R>, header: &PsfHeader, sequences: bool) -> Result<GlyphMap> {
    reader.seek(header.table_offset())?;
    let mut entries = Vec::with_capacity(header.glyph_count.min(0x1_0000) as usize);
    for glyph in 0..header.glyph_count {
        let Some(bytes) = reader.read_until(PSF2_SEPARATOR)? else {
            return Err(PsfError::UnexpectedEndOfTable { glyph });
        };
        entries.push(decode_entry(glyph, &bytes, sequences)?);
    }
    log::debug!("decoded unicode table for {} glyphs", entries.len());
    Ok(GlyphMap::new(entries))
}

/// Decode one table entry (without its `0xFF` terminator).
///
/// With `sequences` off the whole entry has to be valid UTF-8.
pub fn decode_entry(glyph: u32, bytes: &[u8], sequences: bool) -> Result<GlyphMapping> {
    if !sequences {
        return Ok(GlyphMapping {
            code_points: decode_utf8(glyph, bytes)?,
            sequences: Vec::new(),
        });
    }
    let mut parts = bytes.split(|b| *b == PSF2_STARTSEQ);
    let mut mapping = GlyphMapping::default();
    if let Some(first) = parts.next() {
        mapping.code_points = decode_utf8(glyph, first)?;
    }
    for part in parts {
        let seq = decode_utf8(glyph, part)?;
        if !seq.is_empty() {
            mapping.sequences.push(seq);
        }
    }
    Ok(mapping)
}

fn decode_utf8(glyph: u32, bytes: &[u8]) -> Result<Vec<char>> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.chars().collect()),
        Err(err) => {
            let start = err.valid_up_to();
            let end = err.error_len().map_or(bytes.len(), |len| start + len);
            Err(PsfError::InvalidCodepointEncoding {
                glyph,
                bytes: bytes[start..end].to_vec(),
            })
        }
    }
}

//! Decode pipeline: header, optional unicode table, then the glyph bitmaps.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek},
    path::Path,
};

use crate::{
    canvas_size, read_header, read_table, write_png, Canvas, CellTint, GlyphMap, PsfError, PsfHeader, PsfReader, Result, EMPTY_TINT,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Reject files whose magic isn't the PSF2 magic.
    pub strict_magic: bool,
    /// Decode `0xFE` introduced sequences in the unicode table instead of rejecting them.
    pub sequences: bool,
}

/// Header and unicode table of a font, bitmaps are streamed at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsfFont {
    pub header: PsfHeader,
    /// `None` if the font has no unicode table.
    pub glyph_map: Option<GlyphMap>,
}

impl PsfFont {
    pub fn decode<R: Read + Seek>(reader: &mut PsfReader<R>, options: &ConvertOptions) -> Result<Self> {
        reader.seek(0)?;
        let header = read_header(reader)?;
        log::info!("Header: {header}");

        if options.strict_magic {
            header.validate_magic()?;
        }
        header.validate_geometry()?;

        let glyph_map = if header.has_unicode_table() {
            Some(read_table(reader, &header, options.sequences)?)
        } else {
            None
        };

        Ok(Self { header, glyph_map })
    }

    pub fn has_mapping(&self) -> bool {
        self.glyph_map.is_some()
    }

    /// Mapping used for display: the unicode table, or the identity mapping if there is none.
    pub fn display_map(&self) -> GlyphMap {
        match &self.glyph_map {
            Some(map) => map.clone(),
            None => GlyphMap::identity(self.header.glyph_count),
        }
    }

    /// Whether the unicode table assigns nothing to `glyph`; always false without a table.
    pub fn is_unmapped(&self, glyph: u32) -> bool {
        self.glyph_map.as_ref().is_some_and(|map| map.is_unmapped(glyph))
    }

    /// Stream all bitmaps from `header_size` onwards and draw the glyph sheet.
    pub fn render<R: Read + Seek>(&self, reader: &mut PsfReader<R>) -> Result<Canvas> {
        let header = &self.header;
        let (width, height) = canvas_size(header)?;
        let mut canvas = Canvas::new(width, height, EMPTY_TINT);

        reader.seek(header.header_size as u64)?;
        log::debug!("rendering {} glyphs into {width}x{height} sheet", header.glyph_count);

        let has_mapping = self.has_mapping();
        for glyph in 0..header.glyph_count {
            let bitmap = read_glyph(reader, glyph, header.bytes_per_glyph as usize)?;
            let tint = CellTint::for_glyph(has_mapping, self.is_unmapped(glyph));
            canvas.draw_glyph(glyph, &bitmap, header, tint);
        }
        Ok(canvas)
    }
}

/// Read the next `bytes_per_glyph` bytes as the bitmap of `glyph`.
pub fn read_glyph<R: Read + Seek>(reader: &mut PsfReader<R>, glyph: u32, bytes_per_glyph: usize) -> Result<Vec<u8>> {
    let bits = reader.read_up_to(bytes_per_glyph)?;
    if bits.len() != bytes_per_glyph {
        return Err(PsfError::ShortGlyphRead {
            glyph,
            expected: bytes_per_glyph,
            actual: bits.len(),
        });
    }
    Ok(bits)
}

/// Summary of a finished conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub header: PsfHeader,
    pub has_mapping: bool,
    /// Unicode table, or identity mapping for fonts without one.
    pub display_map: GlyphMap,
    pub width: u32,
    pub height: u32,
}

/// Render the PSF font at `input` into a png at `output`.
///
/// The output file is only created once the whole sheet has been rendered.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConversionReport> {
    let file = File::open(input).map_err(|e| PsfError::open_failure(input, e))?;
    let mut reader = PsfReader::new(BufReader::new(file));

    let font = PsfFont::decode(&mut reader, options)?;
    let canvas = font.render(&mut reader)?;
    drop(reader);

    let image_file = File::create(output).map_err(|e| PsfError::open_failure(output, e))?;
    write_png(&canvas, BufWriter::new(image_file))?;
    log::debug!("wrote {}", output.display());

    Ok(ConversionReport {
        header: font.header,
        has_mapping: font.has_mapping(),
        display_map: font.display_map(),
        width: canvas.width(),
        height: canvas.height(),
    })
}

use std::{
    fs::File,
    io::{BufReader, Cursor},
    path::PathBuf,
};

use icy_psf::{
    convert_file, ConvertOptions, PsfError, PsfFont, PsfReader, EMPTY_TINT, FOREGROUND, KNOWN_TINT, PSF2_MAGIC,
};
use pretty_assertions::assert_eq;

/// Builds PSF2 files in memory.
struct PsfBuilder {
    width: u32,
    height: u32,
    bytes_per_glyph: u32,
    glyphs: Vec<Vec<u8>>,
    table: Option<Vec<u8>>,
}

impl PsfBuilder {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes_per_glyph: width.div_ceil(8) * height,
            glyphs: Vec::new(),
            table: None,
        }
    }

    fn glyph(mut self, data: &[u8]) -> Self {
        self.glyphs.push(data.to_vec());
        self
    }

    fn table(mut self, table: &[u8]) -> Self {
        self.table = Some(table.to_vec());
        self
    }

    fn build(&self) -> Vec<u8> {
        let flags = u32::from(self.table.is_some());
        let mut bytes = Vec::new();
        for v in [PSF2_MAGIC, 0, 32, flags, self.glyphs.len() as u32, self.bytes_per_glyph, self.height, self.width] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        for g in &self.glyphs {
            bytes.extend_from_slice(g);
        }
        if let Some(table) = &self.table {
            bytes.extend_from_slice(table);
        }
        bytes
    }
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("icy_psf_tests_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn decode_png(path: &PathBuf) -> (u32, u32, Vec<u8>) {
    let file = File::open(path).unwrap();
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size().unwrap()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

fn rgba_at(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * width + x) * 4) as usize;
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

fn to_array(c: icy_psf::Rgba) -> [u8; 4] {
    [c.0, c.1, c.2, c.3]
}

#[test]
fn test_end_to_end_single_glyph() {
    let glyph = [0x18, 0x24, 0x42, 0x81, 0xFF, 0x81, 0x81, 0x00];
    let input = temp_path("single.psf");
    let output = temp_path("single.png");
    std::fs::write(&input, PsfBuilder::new(8, 8).glyph(&glyph).build()).unwrap();

    let report = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
    assert_eq!((report.width, report.height), (145, 10));
    assert!(!report.has_mapping);

    let (width, height, data) = decode_png(&output);
    assert_eq!((width, height), (145, 10));
    for (y, row) in glyph.iter().enumerate() {
        for x in 0..8u32 {
            let expected = if row & (0x80 >> x) != 0 { FOREGROUND } else { KNOWN_TINT };
            assert_eq!(rgba_at(&data, width, 1 + x, 1 + y as u32), to_array(expected), "pixel {x},{y}");
        }
    }
    // unused cells keep the sheet background
    assert_eq!(rgba_at(&data, width, 10, 1), to_array(EMPTY_TINT));
    assert_eq!(rgba_at(&data, width, 0, 0), to_array(EMPTY_TINT));
}

#[test]
fn test_end_to_end_mapping_tint() {
    let input = temp_path("mapped.psf");
    let output = temp_path("mapped.png");
    let bytes = PsfBuilder::new(8, 8).glyph(&[0; 8]).glyph(&[0; 8]).table(&[0x41, 0xFF, 0xFF]).build();
    std::fs::write(&input, bytes).unwrap();

    let report = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
    assert!(report.has_mapping);
    let listed: Vec<_> = report.display_map.listing().map(|(i, m)| (i, m.code_points.clone())).collect();
    assert_eq!(listed, vec![(0, vec!['A'])]);

    let (width, _, data) = decode_png(&output);
    assert_eq!(rgba_at(&data, width, 1, 1), to_array(KNOWN_TINT));
    assert_eq!(rgba_at(&data, width, 10, 1), to_array(EMPTY_TINT));
}

#[test]
fn test_listing_does_not_change_pixels() {
    let bytes = PsfBuilder::new(8, 8)
        .glyph(&[0xAA; 8])
        .glyph(&[0x55; 8])
        .table(&[0xFF, 0x42, 0xFF])
        .build();

    let mut reader = PsfReader::new(Cursor::new(bytes.clone()));
    let font = PsfFont::decode(&mut reader, &ConvertOptions::default()).unwrap();
    let rendered_first = font.render(&mut reader).unwrap();

    let mut reader = PsfReader::new(Cursor::new(bytes));
    let font = PsfFont::decode(&mut reader, &ConvertOptions::default()).unwrap();
    let listed = font.display_map().listing().count();
    let rendered_after_listing = font.render(&mut reader).unwrap();

    assert_eq!(listed, 1);
    assert_eq!(rendered_first, rendered_after_listing);
}

#[test]
fn test_invalid_codepoint_in_table() {
    let bytes = PsfBuilder::new(8, 8).glyph(&[0; 8]).table(&[0xC0, 0xFF]).build();
    let mut reader = PsfReader::new(Cursor::new(bytes));
    match PsfFont::decode(&mut reader, &ConvertOptions::default()) {
        Err(PsfError::InvalidCodepointEncoding { glyph, bytes }) => {
            assert_eq!(glyph, 0);
            assert_eq!(bytes, vec![0xC0]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_table_without_sentinel() {
    let bytes = PsfBuilder::new(8, 8).glyph(&[0; 8]).glyph(&[0; 8]).table(&[0x41, 0xFF, 0x42]).build();
    let mut reader = PsfReader::new(Cursor::new(bytes));
    assert!(matches!(
        PsfFont::decode(&mut reader, &ConvertOptions::default()),
        Err(PsfError::UnexpectedEndOfTable { glyph: 1 })
    ));
}

#[test]
fn test_geometry_rejected_before_output() {
    let mut builder = PsfBuilder::new(8, 8).glyph(&[0; 7]);
    builder.bytes_per_glyph = 7;
    let input = temp_path("small.psf");
    let output = temp_path("small.png");
    std::fs::write(&input, builder.build()).unwrap();
    let _ = std::fs::remove_file(&output);

    let result = convert_file(&input, &output, &ConvertOptions::default());
    assert!(matches!(result, Err(PsfError::GlyphDataTooSmall { bytes_per_glyph: 7, width: 8, height: 8 })));
    assert!(!output.exists());
}

#[test]
fn test_short_last_glyph_before_output() {
    let mut bytes = PsfBuilder::new(8, 8).glyph(&[0xFF; 8]).glyph(&[0xFF; 8]).build();
    bytes.pop();
    let input = temp_path("short.psf");
    let output = temp_path("short.png");
    std::fs::write(&input, bytes).unwrap();
    let _ = std::fs::remove_file(&output);

    let result = convert_file(&input, &output, &ConvertOptions::default());
    assert!(matches!(result, Err(PsfError::ShortGlyphRead { glyph: 1, expected: 8, actual: 7 })));
    assert!(!output.exists());
}

#[test]
fn test_truncated_file() {
    let input = temp_path("truncated.psf");
    std::fs::write(&input, [0x72, 0xB5, 0x4A, 0x86]).unwrap();
    let result = convert_file(&input, &temp_path("truncated.png"), &ConvertOptions::default());
    assert!(matches!(result, Err(PsfError::TruncatedHeader { expected: 32, actual: 4 })));
}

#[test]
fn test_missing_input() {
    let input = temp_path("does_not_exist.psf");
    match convert_file(&input, &temp_path("missing.png"), &ConvertOptions::default()) {
        Err(PsfError::OpenFailure { path, .. }) => assert_eq!(path, input),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_unwritable_output() {
    let input = temp_path("unwritable.psf");
    std::fs::write(&input, PsfBuilder::new(8, 8).glyph(&[0; 8]).build()).unwrap();
    let output = temp_path("no_such_dir").join("out.png");
    assert!(matches!(
        convert_file(&input, &output, &ConvertOptions::default()),
        Err(PsfError::OpenFailure { .. })
    ));
}

#[test]
fn test_seventeen_glyphs_wrap() {
    let mut builder = PsfBuilder::new(4, 6);
    for i in 0..17u8 {
        builder = builder.glyph(&[if i == 16 { 0x80 } else { 0 }; 6]);
    }
    let mut reader = PsfReader::new(Cursor::new(builder.build()));
    let font = PsfFont::decode(&mut reader, &ConvertOptions::default()).unwrap();
    let canvas = font.render(&mut reader).unwrap();

    assert_eq!((canvas.width(), canvas.height()), (1 + 16 * 5, 1 + 2 * 7));
    assert_eq!(canvas.pixel(1, 8), FOREGROUND);
    assert_eq!(canvas.pixel(2, 8), KNOWN_TINT);
    assert_eq!(canvas.pixel(6, 8), EMPTY_TINT);
}

#[test]
fn test_full_bmp_font_renders() {
    let mut builder = PsfBuilder::new(8, 16);
    for _ in 0..0x1_0000 {
        builder = builder.glyph(&[0; 16]);
    }
    builder.glyphs[0xFFFF] = vec![0x80; 16];
    let mut reader = PsfReader::new(Cursor::new(builder.build()));
    let font = PsfFont::decode(&mut reader, &ConvertOptions::default()).unwrap();
    let canvas = font.render(&mut reader).unwrap();

    assert_eq!((canvas.width(), canvas.height()), (145, 69_633));
    // last glyph sits in the bottom right cell
    assert_eq!(canvas.pixel(1 + 15 * 9, 1 + 4095 * 17), FOREGROUND);
    assert_eq!(canvas.pixel(2 + 15 * 9, 1 + 4095 * 17), KNOWN_TINT);
}

#[test]
fn test_sequences_option() {
    let bytes = PsfBuilder::new(8, 8).glyph(&[0; 8]).table(&[0x41, 0xFE, 0x42, 0xFF]).build();

    let mut reader = PsfReader::new(Cursor::new(bytes.clone()));
    match PsfFont::decode(&mut reader, &ConvertOptions::default()) {
        Err(PsfError::InvalidCodepointEncoding { glyph, bytes }) => {
            assert_eq!(glyph, 0);
            assert_eq!(bytes, vec![0xFE]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let options = ConvertOptions {
        sequences: true,
        ..Default::default()
    };
    let mut reader = PsfReader::new(Cursor::new(bytes));
    let font = PsfFont::decode(&mut reader, &options).unwrap();
    let mapping = font.glyph_map.as_ref().unwrap().get(0).unwrap();
    assert_eq!(mapping.sequences, vec![vec!['B']]);
}

use std::io::Write;

use crate::{Canvas, Result};

/// Encode the canvas as an 8 bit RGBA png.
pub fn write_png<W: Write>(canvas: &Canvas, mut w: W) -> Result<()> {
    let mut encoder = png::Encoder::new(&mut w, canvas.width(), canvas.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(canvas.as_bytes())?;
    writer.finish()?;
    w.flush().map_err(png::EncodingError::from)?;
    Ok(())
}

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]
//! PC Screen Font (PSF2) decoder and glyph sheet renderer.

mod error;
pub use error::*;

mod reader;
pub use reader::*;

mod header;
pub use header::*;

mod unicode_table;
pub use unicode_table::*;

mod raster;
pub use raster::*;

mod png_writer;
pub use png_writer::*;

mod font;
pub use font::*;

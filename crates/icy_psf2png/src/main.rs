#![warn(clippy::all, clippy::pedantic)]

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use flexi_logger::Logger;
use icy_psf::{convert_file, ConvertOptions, ConversionReport, GlyphMapping};

#[derive(Parser, Debug)]
#[command(version, about = "Renders a PSF console font into a png glyph sheet.", long_about = None)]
struct Args {
    #[arg(value_name = "PSF", help = "Path to the PSF file")]
    input: PathBuf,

    #[arg(value_name = "PNG", help = "Path for the generated png file")]
    output: PathBuf,

    #[arg(help = "Reject files without the PSF2 magic number.", long, default_value_t = false)]
    strict: bool,

    #[arg(help = "Decode 0xFE started sequences in the unicode table.", long, default_value_t = false)]
    sequences: bool,

    #[arg(help = "Don't print the glyph to unicode listing.", long, default_value_t = false)]
    no_listing: bool,
}

fn format_char(ch: char) -> String {
    if ch.is_control() {
        format!("U+{:04X}", ch as u32)
    } else {
        ch.to_string()
    }
}

fn format_mapping(glyph: u32, mapping: &GlyphMapping) -> String {
    let mut parts: Vec<String> = vec![format!("0x{glyph:03x}:")];
    parts.extend(mapping.code_points.iter().map(|ch| format_char(*ch)));
    for seq in &mapping.sequences {
        let seq: Vec<String> = seq.iter().map(|ch| format_char(*ch)).collect();
        parts.push(format!("[{}]", seq.join(" ")));
    }
    parts.join(" ")
}

fn print_listing(report: &ConversionReport) {
    for (glyph, mapping) in report.display_map.listing() {
        println!("{}", format_mapping(glyph, mapping));
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _logger = match Logger::try_with_env_or_str("info") {
        Ok(logger) => logger.log_to_stderr().start().map_err(|err| eprintln!("Failed to start logger: {err}")).ok(),
        Err(err) => {
            eprintln!("Invalid log specification: {err}");
            None
        }
    };

    let options = ConvertOptions {
        strict_magic: args.strict,
        sequences: args.sequences,
    };
    match run(&args, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, options: &ConvertOptions) -> anyhow::Result<()> {
    let report = convert_file(&args.input, &args.output, options)?;
    if !args.no_listing {
        print_listing(&report);
    }
    log::info!(
        "Wrote {}x{} glyph sheet for {} glyphs to {}",
        report.width,
        report.height,
        report.header.glyph_count,
        args.output.display()
    );
    Ok(())
}

//! Writing the finished image to disk.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Save packed 8-bit RGB. The format follows the file extension: `.ppm`
/// is written as plain-text P3, anything else goes through `image`.
pub fn write_image(path: &Path, width: u32, height: u32, rgb: &[u8]) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_ppm(&mut out, width, height, rgb)
            .and_then(|()| out.flush())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        image::save_buffer(path, rgb, width, height, image::ColorType::Rgb8)
            .with_context(|| format!("Failed to encode {}", path.display()))?;
    }

    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

/// Plain PPM: a header, then one `r g b` line per pixel, top row first.
pub fn write_ppm(out: &mut impl Write, width: u32, height: u32, rgb: &[u8]) -> io::Result<()> {
    writeln!(out, "P3\n{} {}\n255", width, height)?;
    for pixel in rgb.chunks_exact(3) {
        writeln!(out, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }
    Ok(())
}

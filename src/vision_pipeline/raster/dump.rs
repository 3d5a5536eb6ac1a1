use std::io::{Cursor, Read, Seek, Write};

use tracing::debug;

use crate::vision_pipeline::common::error::{Result, VisionError};
use crate::vision_pipeline::raster::types::Raster;

/// Writes every sample as decimal text: one image row per line, values separated by a
/// single space.
pub fn write_pixel_dump(raster: &Raster, output: &mut dyn Write) -> Result<()> {
    for y in 0..raster.height() {
        let line = raster
            .row(y)
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

/// Encodes the raster as an uncompressed 8-bit grayscale TIFF.
pub fn write_tiff(raster: &Raster, output: &mut dyn Write) -> Result<()> {
    debug!("Encoding TIFF frame: {}x{}", raster.width(), raster.height());

    let mut buffer = Vec::new();
    let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(&mut buffer))
        .map_err(|e| VisionError::FrameEncode(e.to_string()))?;

    encoder
        .write_image::<tiff::encoder::colortype::Gray8>(
            raster.width() as u32,
            raster.height() as u32,
            raster.as_slice(),
        )
        .map_err(|e| VisionError::FrameEncode(e.to_string()))?;

    output.write_all(&buffer)?;
    Ok(())
}

/// Decodes an 8-bit grayscale TIFF into a raster.
pub fn read_tiff<R: Read + Seek>(input: R) -> Result<Raster> {
    let mut decoder =
        tiff::decoder::Decoder::new(input).map_err(|e| VisionError::FrameDecode(e.to_string()))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| VisionError::FrameDecode(e.to_string()))?;
    let color = decoder
        .colortype()
        .map_err(|e| VisionError::FrameDecode(e.to_string()))?;
    if color != tiff::ColorType::Gray(8) {
        return Err(VisionError::FrameDecode(format!(
            "expected 8-bit grayscale, found {:?}",
            color
        )));
    }

    let image = decoder
        .read_image()
        .map_err(|e| VisionError::FrameDecode(e.to_string()))?;
    match image {
        tiff::decoder::DecodingResult::U8(data) => {
            debug!("Decoded TIFF frame: {}x{}", width, height);
            Raster::new(width as usize, height as usize, data)
        }
        _ => Err(VisionError::FrameDecode("unexpected sample format".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_dump_layout() {
        let raster = Raster::from_fn(3, 2, |x, y| (x + y * 100) as u8).unwrap();
        let mut out = Vec::new();
        write_pixel_dump(&raster, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 1 2\n100 101 102\n");
    }

    #[test]
    fn test_tiff_file_restores_samples() {
        let raster = Raster::from_fn(16, 8, |x, y| (x * 16 + y) as u8).unwrap();
        let mut file = tempfile::tempfile().unwrap();
        write_tiff(&raster, &mut file).unwrap();

        file.rewind().unwrap();
        let restored = read_tiff(std::io::BufReader::new(file)).unwrap();
        assert_eq!(restored, raster);
    }

    #[test]
    fn test_read_tiff_rejects_garbage() {
        let result = read_tiff(Cursor::new(b"not a tiff".to_vec()));
        assert!(matches!(result.unwrap_err(), VisionError::FrameDecode(_)));
    }
}

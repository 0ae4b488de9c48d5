use std::io::Write;
use tracing::debug;
use tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::planar::PlanarImage;
use crate::image_pipeline::tiff::types::{ConversionConfig, OutputBitDepth, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

/// Interleaves planar RGB and encodes it with the `tiff` crate.
pub struct StandardTiffWriter;

impl StandardTiffWriter {
    fn encoder<'a>(buffer: &'a mut Vec<u8>, config: &ConversionConfig) -> Result<TiffEncoder<std::io::Cursor<&'a mut Vec<u8>>>> {
        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }
        Ok(encoder)
    }
}

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &PlanarImage<u16>, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{} ({:?})", image.width(), image.height(), config.bit_depth);
        
        let mut buffer = Vec::new();
        let interleaved = image.to_interleaved();
        let width = image.width() as u32;
        let height = image.height() as u32;

        {
            let mut encoder = Self::encoder(&mut buffer, config)?;
            let written = match config.bit_depth {
                OutputBitDepth::Sixteen => encoder.write_image::<colortype::RGB16>(width, height, &interleaved),
                OutputBitDepth::Eight => {
                    let high_bytes: Vec<u8> = interleaved.iter().map(|&v| (v >> 8) as u8).collect();
                    encoder.write_image::<colortype::RGB8>(width, height, &high_bytes)
                }
            };
            written.map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        }
        
        output.write_all(&buffer)?;
        
        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

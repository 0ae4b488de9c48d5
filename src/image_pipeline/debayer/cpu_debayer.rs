use anyhow::{Result, bail};
use tracing::{debug, info};
use std::io::Cursor;
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use crate::image_pipeline::{planar::PlanarImage, raw::RawImageData};

/// Bilinear demosaic on the CPU.
///
/// Only interpolates the mosaic; black level and color handling are left to
/// the developing stages.
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn process(&self, raw_image: &RawImageData) -> Result<PlanarImage<u16>> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        if !raw_image.is_mosaic() {
            bail!("Image has {} components per pixel, expected a CFA mosaic", raw_image.components);
        }
        let cfa = cfa_pattern(&raw_image.cfa)?;
        
        // bayer crate only supports 8 and 16 bit
        let (bayer_depth, raster_depth, bytes_per_pixel) = if raw_image.bits_per_sample <= 8 {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };
        
        let bayer_bytes: Vec<u8> = if raw_image.bits_per_sample <= 8 {
            raw_image.data.iter().map(|&val| val as u8).collect()
        } else {
            raw_image.data.iter()
                .flat_map(|&val| val.to_le_bytes())
                .collect()
        };
        
        let output_buf_size = width * height * 3 * bytes_per_pixel;
        let mut output_buf = vec![0u8; output_buf_size];
        
        let mut cursor = Cursor::new(&bayer_bytes[..]);
        
        debug!("Running demosaic with depth={:?}, CFA={}, algo=Linear", bayer_depth, raw_image.cfa);
        debug!("Input bytes: {}, Output buffer: {} ({}x{}x3x{})", 
              bayer_bytes.len(), output_buf_size, width, height, bytes_per_pixel);
        
        let mut output_raster = RasterMut::new(
            width,
            height,
            raster_depth,
            &mut output_buf
        );
        
        bayer::run_demosaic(
            &mut cursor,
            bayer_depth,
            cfa,
            Demosaic::Linear,
            &mut output_raster
        ).map_err(|e| anyhow::anyhow!("Demosaic failed: {:?}", e))?;

        let samples: Vec<u16> = if bytes_per_pixel == 1 {
            output_buf.iter().map(|&v| v as u16).collect()
        } else {
            output_buf
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect()
        };

        Ok(PlanarImage::from_interleaved(width, height, 3, &samples)?)
    }
}

fn cfa_pattern(name: &str) -> Result<CFA> {
    Ok(match name {
        "RGGB" => CFA::RGGB,
        "BGGR" => CFA::BGGR,
        "GRBG" => CFA::GRBG,
        "GBRG" => CFA::GBRG,
        other => bail!("Unsupported CFA pattern: {:?}", other),
    })
}

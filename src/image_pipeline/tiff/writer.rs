use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::planar::PlanarImage;
use crate::image_pipeline::tiff::types::ConversionConfig;

/// Sink for developed RGB images.
pub trait TiffWriter {
    fn write_tiff(&self, image: &PlanarImage<u16>, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}

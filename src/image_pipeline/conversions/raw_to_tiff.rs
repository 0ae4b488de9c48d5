use tracing::{debug, info, instrument};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    debayer::CpuDebayer,
    develop::RawDeveloper,
    planar::{self, PlanarImage},
    raw::{RawImageData, RawImageReader, RawLoaderReader},
    tiff::{TiffWriter, StandardTiffWriter, ConversionConfig, OutputBitDepth},
};

/// Decodes a RAW file, develops it and writes an RGB TIFF.
pub struct RawToTiffPipeline<R: RawImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    debayer: CpuDebayer,
    developer: RawDeveloper,
    config: ConversionConfig,
}

impl RawToTiffPipeline<RawLoaderReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_custom(RawLoaderReader, StandardTiffWriter, config)
    }
}

impl<R: RawImageReader, W: TiffWriter> RawToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            debayer: CpuDebayer,
            developer: RawDeveloper::new(config.develop.clone()),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    fn to_planar(&self, raw_image: &RawImageData) -> Result<PlanarImage<u16>> {
        if !raw_image.is_mosaic() {
            return PlanarImage::from_interleaved(
                raw_image.width,
                raw_image.height,
                raw_image.components,
                &raw_image.data,
            );
        }

        if !self.config.debayer {
            return Err(ConversionError::UnsupportedFormat(
                "CFA mosaic input with debayering disabled".to_string(),
            ));
        }
        self.debayer
            .process(raw_image)
            .map_err(|e| ConversionError::DecodeError(e.to_string()))
    }

    /// Writes the undeveloped buffer as 8-bit RGB. Raw adjust is applied
    /// when enabled, nothing else is.
    fn write_raw_dump(&self, planar: &PlanarImage<u16>, output: &mut dyn Write) -> Result<()> {
        let _span = tracing::info_span!("save_raw").entered();
        let mut dump = planar.clone();
        if self.config.develop.raw_adjust {
            planar::raw_adjust(&mut dump);
        }
        let mut config = self.config.clone();
        config.bit_depth = OutputBitDepth::Eight;
        self.writer.write_tiff(&dump, output, &config)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&mut self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.run(input_data, output, None)
    }

    fn run(
        &mut self,
        input_data: &[u8],
        output: &mut dyn Write,
        raw_output: Option<&mut dyn Write>,
    ) -> Result<()> {
        info!("Starting RAW to TIFF conversion");

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions", 
                width = raw_image.width, 
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height)?;
        }

        let planar = {
            let _span = tracing::info_span!("to_planar", components = raw_image.components).entered();
            self.to_planar(&raw_image)?
        };

        if let Some(raw_output) = raw_output {
            self.write_raw_dump(&planar, raw_output)?;
        }

        let developed = self.developer.develop(planar, &raw_image.metadata)?;

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&developed, output, &self.config)?;
        }

        info!(
            width = raw_image.width,
            height = raw_image.height,
            "Conversion complete"
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        let mut raw_file = if self.config.save_raw {
            let raw_path = Self::raw_dump_path(input_path);
            debug!(path = %raw_path.display(), "Saving undeveloped image");
            Some(std::fs::File::create(&raw_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", raw_path.display(), e))
            })?)
        } else {
            None
        };

        self.run(
            &input_data,
            &mut output_file,
            raw_file.as_mut().map(|f| f as &mut dyn Write),
        )?;

        Ok(())
    }

    /// `<INPUT>.raw.tiff`, next to the input file.
    pub fn raw_dump_path(input_path: &Path) -> PathBuf {
        let mut name = input_path.as_os_str().to_owned();
        name.push(".raw.tiff");
        PathBuf::from(name)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn developer(&self) -> &RawDeveloper {
        &self.developer
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.developer.set_config(config.develop.clone());
        self.config = config;
    }
}

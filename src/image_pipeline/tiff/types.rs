//! TIFF conversion configuration types

use crate::image_pipeline::develop::DevelopConfig;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced (default)
    DeflateBalanced,
}

/// Sample depth of the written file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputBitDepth {
    /// 8 bits per channel, the high byte of each developed sample
    Eight,
    /// 16 bits per channel
    #[default]
    Sixteen,
}

/// Configuration for RAW to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Whether to demosaic CFA images; when disabled they are rejected
    pub debayer: bool,
    /// Bits per channel of the output file
    pub bit_depth: OutputBitDepth,
    /// Developing stages applied between decoding and encoding
    pub develop: DevelopConfig,
    /// Also write the undeveloped buffer as an 8-bit `<INPUT>.raw.tiff`
    pub save_raw: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            debayer: true,
            bit_depth: OutputBitDepth::Sixteen,
            develop: DevelopConfig::default(),
            save_raw: false,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    debayer: Option<bool>,
    bit_depth: Option<OutputBitDepth>,
    develop: Option<DevelopConfig>,
    save_raw: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }
    
    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }
    
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }
    
    pub fn debayer(mut self, enable: bool) -> Self {
        self.debayer = Some(enable);
        self
    }

    pub fn bit_depth(mut self, bit_depth: OutputBitDepth) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }

    pub fn develop(mut self, develop: DevelopConfig) -> Self {
        self.develop = Some(develop);
        self
    }
    
    pub fn save_raw(mut self, enable: bool) -> Self {
        self.save_raw = Some(enable);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            debayer: self.debayer.unwrap_or(default.debayer),
            bit_depth: self.bit_depth.unwrap_or(default.bit_depth),
            develop: self.develop.unwrap_or(default.develop),
            save_raw: self.save_raw.unwrap_or(default.save_raw),
        }
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use raw_develop_rs::image_pipeline::{
    ColorConversion, ConversionConfig, DevelopConfig, GammaNormalization, OutputBitDepth,
    RawToTiffPipeline, TiffCompression,
};
use raw_develop_rs::logger;

use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "raw-develop")]
#[command(version, about = "Develop a RAW/DNG capture into an sRGB TIFF", long_about = None)]
struct Cli {
    /// RAW file to develop
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output TIFF path (defaults to <INPUT>.tiff)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Histogram stretch rate in [0, 1]; 0 disables it, 1 gives a black image
    #[arg(short = 'a', long = "stretch", value_name = "RATE", default_value_t = 0.0)]
    stretch_rate: f32,

    /// Camera to sRGB conversion path
    #[arg(short, long, value_enum, default_value_t = ColorArg::Direct)]
    color: ColorArg,

    /// Skip gamma correction
    #[arg(long)]
    no_gamma: bool,

    /// Maximum the gamma curve is normalized against
    #[arg(long, value_enum, default_value_t = GammaMaxArg::Full)]
    gamma_max: GammaMaxArg,

    /// Multiply raw samples by 8 before developing
    #[arg(short, long)]
    raw_adjust: bool,

    /// Write 8 bits per channel instead of 16
    #[arg(long)]
    eight_bit: bool,

    /// TIFF compression
    #[arg(long, value_enum, default_value_t = CompressionArg::Uncompressed)]
    compression: CompressionArg,

    /// Also save the undeveloped image as 8-bit <INPUT>.raw.tiff
    #[arg(long)]
    save_raw: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Also write the log to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log per-stage execution time
    #[arg(short, long)]
    measure: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Direct,
    Xyz,
    #[value(name = "none")]
    Disabled,
}

#[derive(Clone, Copy, ValueEnum)]
enum GammaMaxArg {
    Full,
    Observed,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    #[value(name = "none")]
    Uncompressed,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl Cli {
    fn conversion_config(&self) -> ConversionConfig {
        let develop = DevelopConfig::builder()
            .raw_adjust(self.raw_adjust)
            .color(match self.color {
                ColorArg::Direct => ColorConversion::Direct,
                ColorArg::Xyz => ColorConversion::ViaXyz,
                ColorArg::Disabled => ColorConversion::Disabled,
            })
            .stretch_rate(self.stretch_rate)
            .gamma(!self.no_gamma)
            .gamma_normalization(match self.gamma_max {
                GammaMaxArg::Full => GammaNormalization::FullScale,
                GammaMaxArg::Observed => GammaNormalization::ObservedMax,
            })
            .debug(self.debug)
            .measure(self.measure)
            .build();

        ConversionConfig::builder()
            .compression(match self.compression {
                CompressionArg::Uncompressed => TiffCompression::None,
                CompressionArg::Lzw => TiffCompression::Lzw,
                CompressionArg::DeflateFast => TiffCompression::DeflateFast,
                CompressionArg::DeflateBalanced => TiffCompression::DeflateBalanced,
                CompressionArg::DeflateBest => TiffCompression::DeflateBest,
            })
            .bit_depth(if self.eight_bit { OutputBitDepth::Eight } else { OutputBitDepth::Sixteen })
            .develop(develop)
            .save_raw(self.save_raw)
            .build()
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut name = self.input.clone().into_os_string();
            name.push(".tiff");
            PathBuf::from(name)
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.debug, cli.log_dir.as_deref())?;

    if !(0.0..=1.0).contains(&cli.stretch_rate) {
        anyhow::bail!("Stretch rate must be in [0, 1], got {}", cli.stretch_rate);
    }

    let config = cli.conversion_config();
    let output = cli.output_path();
    debug!("Configuration: {:?}", config);

    let mut pipeline = RawToTiffPipeline::new(config);
    info!("Color conversion: {:?}", pipeline.config().develop.color);
    info!(
        "Stretch: {}",
        if pipeline.config().develop.stretch_rate > 0.0 {
            format!("{}", pipeline.config().develop.stretch_rate)
        } else {
            "disabled".to_string()
        }
    );

    pipeline
        .convert_file(&cli.input, &output)
        .inspect_err(|e| error!("Conversion failed: {}", e))
        .with_context(|| format!("developing {}", cli.input.display()))?;

    info!("Wrote {}", output.display());
    Ok(())
}

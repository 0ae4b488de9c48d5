use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raw_develop_rs::image_pipeline::{
    CaptureMetadata, ColorConversion, ConversionConfig, DevelopConfig, PlanarImage, RawDeveloper,
    StandardTiffWriter, TiffCompression, TiffWriter,
};
use std::io::Cursor;

const SAMPLE_MATRIX: [[f32; 3]; 3] = [
    [0.6722, -0.0635, -0.0963],
    [-0.4287, 1.2460, 0.2028],
    [-0.0908, 0.2162, 0.5668],
];

fn generate_mock_image(width: usize, height: usize) -> PlanarImage<u16> {
    let mut image = PlanarImage::new(width, height);
    for (i, v) in image.as_mut_slice().iter_mut().enumerate() {
        *v = 600 + ((i * 37) % 15000) as u16;
    }
    image
}

fn mock_metadata() -> CaptureMetadata {
    CaptureMetadata {
        black_level: 512,
        white_level: 16383,
        color_matrix: SAMPLE_MATRIX,
        ..CaptureMetadata::default()
    }
}

fn benchmark_develop_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("develop_by_size");
    let metadata = mock_metadata();

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let image = generate_mock_image(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let mut developer = RawDeveloper::new(DevelopConfig::default());

            b.iter(|| {
                let _ = developer.develop(black_box(image.clone()), &metadata);
            });
        });
    }

    group.finish();
}

fn benchmark_color_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_paths");
    let image = generate_mock_image(500, 500);
    let metadata = mock_metadata();

    let paths = vec![
        (ColorConversion::Disabled, "disabled"),
        (ColorConversion::Direct, "direct"),
        (ColorConversion::ViaXyz, "via_xyz"),
    ];

    for (color, label) in paths {
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let config = DevelopConfig::builder().color(color).build();
            let mut developer = RawDeveloper::new(config);

            b.iter(|| {
                let _ = developer.develop(black_box(image.clone()), &metadata);
            });
        });
    }

    group.finish();
}

fn benchmark_stretch(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram_stretch");
    let image = generate_mock_image(500, 500);
    let metadata = mock_metadata();

    for rate in [0.0f32, 0.01, 0.1] {
        group.bench_with_input(BenchmarkId::from_parameter(rate), &image, |b, image| {
            let config = DevelopConfig::builder().stretch_rate(rate).build();
            let mut developer = RawDeveloper::new(config);

            b.iter(|| {
                let _ = developer.develop(black_box(image.clone()), &metadata);
            });
        });
    }

    group.finish();
}

fn benchmark_compression_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_methods");
    let image = generate_mock_image(500, 500);
    let writer = StandardTiffWriter;

    let compressions = vec![
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateFast, "deflate_fast"),
    ];

    for (compression, label) in compressions {
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let config = ConversionConfig::builder().compression(compression).build();

            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = writer.write_tiff(black_box(image), &mut output, &config);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_develop_sizes,
    benchmark_color_paths,
    benchmark_stretch,
    benchmark_compression_methods
);
criterion_main!(benches);

#[cfg(test)]
mod tests {
    use crate::image_pipeline::color::{matrix, ColorConversion};
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::common::log_capture::capture_debug;
    use crate::image_pipeline::develop::{DevelopConfig, RawDeveloper};
    use crate::image_pipeline::planar::PlanarImage;
    use crate::image_pipeline::raw::CaptureMetadata;
    use crate::image_pipeline::tone::GammaNormalization;

    /// sRGB curve at 8192 / 65535, truncated
    const MID_GRAY_ENCODED: u16 = 25465;

    fn uniform(width: usize, height: usize, value: u16) -> PlanarImage<u16> {
        PlanarImage::from_planes(width, height, vec![value; width * height * 3]).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = DevelopConfig::builder()
            .raw_adjust(true)
            .color(ColorConversion::ViaXyz)
            .stretch_rate(0.01)
            .gamma(false)
            .gamma_normalization(GammaNormalization::ObservedMax)
            .build();

        assert!(config.raw_adjust);
        assert_eq!(config.color, ColorConversion::ViaXyz);
        assert_eq!(config.stretch_rate, 0.01);
        assert!(!config.gamma);
        assert_eq!(config.gamma_normalization, GammaNormalization::ObservedMax);
        assert!(!config.debug);
        assert!(!config.measure);
    }

    #[test]
    fn test_default_config() {
        let config = DevelopConfig::default();
        assert!(!config.raw_adjust);
        assert_eq!(config.color, ColorConversion::Direct);
        assert_eq!(config.stretch_rate, 0.0);
        assert!(config.gamma);
    }

    #[test]
    fn test_identity_matrix_mid_gray() {
        let mut developer = RawDeveloper::new(DevelopConfig::default());
        let metadata = CaptureMetadata::default();

        let out = developer.develop(uniform(1, 1, 8192), &metadata).unwrap();

        assert_eq!(out.as_slice(), &[MID_GRAY_ENCODED; 3]);
        assert_eq!(developer.gamma_cache().cached(8192), Some(MID_GRAY_ENCODED));
    }

    #[test]
    fn test_raw_adjust_and_black_level() {
        let config = DevelopConfig::builder().raw_adjust(true).build();
        let mut developer = RawDeveloper::new(config);
        let metadata = CaptureMetadata {
            black_level: 608,
            ..Default::default()
        };

        // (1100 << 3) - 608 = 8192
        let out = developer.develop(uniform(2, 2, 1100), &metadata).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == MID_GRAY_ENCODED));
    }

    #[test]
    fn test_per_channel_black_levels_without_color_or_gamma() {
        let config = DevelopConfig::builder()
            .color(ColorConversion::Disabled)
            .gamma(false)
            .build();
        let mut developer = RawDeveloper::new(config);
        let metadata = CaptureMetadata {
            channel_black_levels: [100, 200, 2000],
            ..Default::default()
        };

        let out = developer.develop(uniform(1, 1, 1000), &metadata).unwrap();
        assert_eq!(out.as_slice(), &[900, 800, 0]);
        assert_eq!(developer.gamma_cache().populated(), 0);
    }

    #[test]
    fn test_xyz_path_on_neutral_input() {
        let config = DevelopConfig::builder().color(ColorConversion::ViaXyz).build();
        let mut developer = RawDeveloper::new(config);

        let out = developer.develop(uniform(1, 1, 8192), &CaptureMetadata::default()).unwrap();
        for &v in out.as_slice() {
            assert!(v.abs_diff(MID_GRAY_ENCODED) <= 3, "{}", v);
        }
    }

    #[test]
    fn test_singular_color_matrix_fails() {
        let config = DevelopConfig::builder().color(ColorConversion::ViaXyz).build();
        let mut developer = RawDeveloper::new(config);
        let metadata = CaptureMetadata {
            color_matrix: [[0.0; 3]; 3],
            ..Default::default()
        };

        let result = developer.develop(uniform(1, 1, 8192), &metadata);
        assert!(matches!(result, Err(ConversionError::SingularColorMatrix)));
    }

    #[test]
    fn test_full_stretch_is_black() {
        let config = DevelopConfig::builder().stretch_rate(1.0).build();
        let mut developer = RawDeveloper::new(config);
        let image = PlanarImage::from_planes(2, 1, vec![10, 20000, 300, 40000, 5000, 60000]).unwrap();

        let out = developer.develop(image, &CaptureMetadata::default()).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_direct_matrix_is_applied() {
        let config = DevelopConfig::builder().gamma(false).build();
        let mut developer = RawDeveloper::new(config);
        let metadata = CaptureMetadata {
            camera_to_srgb: matrix::diagonal([2.0, 1.0, 0.5]),
            ..Default::default()
        };

        let out = developer.develop(uniform(1, 1, 40000), &metadata).unwrap();
        assert_eq!(out.as_slice(), &[65535, 40000, 20000]);
    }

    #[test]
    fn test_gamma_table_persists_across_calls() {
        let mut developer = RawDeveloper::new(DevelopConfig::default());
        let metadata = CaptureMetadata::default();

        developer.develop(uniform(1, 1, 8192), &metadata).unwrap();
        developer.develop(uniform(1, 1, 1000), &metadata).unwrap();

        assert_eq!(developer.gamma_cache().populated(), 2);
        assert_eq!(developer.gamma_cache().cached(8192), Some(MID_GRAY_ENCODED));
    }

    #[test]
    fn test_measure_records_stage_timings() {
        let config = DevelopConfig::builder().measure(true).stretch_rate(0.1).build();
        let mut developer = RawDeveloper::new(config);

        developer.develop(uniform(4, 4, 1234), &CaptureMetadata::default()).unwrap();

        let names: Vec<&str> = developer.timings().steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["subtract_black", "convert_color", "adjust_brightness", "gamma_correction"]
        );
        assert!(developer.timings().get_step("gamma_correction").is_some());
    }

    #[test]
    fn test_no_timings_without_measure() {
        let mut developer = RawDeveloper::new(DevelopConfig::default());
        developer.develop(uniform(2, 2, 1234), &CaptureMetadata::default()).unwrap();
        assert!(developer.timings().steps().is_empty());
    }

    #[test]
    fn test_stage_samples_are_logged_at_debug_level() {
        let mut developer = RawDeveloper::new(DevelopConfig::default());
        let (developed, logs) =
            capture_debug(|| developer.develop(uniform(2, 2, 8192), &CaptureMetadata::default()));

        assert!(developed.unwrap().as_slice().iter().all(|&v| v == MID_GRAY_ENCODED));
        assert!(logs.contains("Input image[:, 2]: [8192, 8192, 8192]"), "{}", logs);
        assert!(logs.contains("After color conversion image[:, 2]"), "{}", logs);
        assert!(logs.contains("Developed image[:, 2]: [25465, 25465, 25465]"), "{}", logs);
    }
}

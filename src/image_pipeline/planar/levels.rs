//! Per-sample level operations applied before color conversion.

use tracing::debug;

use super::types::{PlanarImage, Sample, CHANNELS};

/// Bits added by [`raw_adjust`], lifting 13-bit sensor data to the 16-bit range.
pub const RAW_ADJUST_SHIFT: u32 = 3;

/// Scales raw samples by `1 << RAW_ADJUST_SHIFT`, clamped to `u16::MAX`.
pub fn raw_adjust(image: &mut PlanarImage<u16>) {
    debug!("Raw adjust: << {}", RAW_ADJUST_SHIFT);
    for v in image.as_mut_slice() {
        *v = ((*v as u32) << RAW_ADJUST_SHIFT).min(u16::MAX as u32) as u16;
    }
}

/// Subtracts the sensor black level in place.
///
/// A nonzero `black_level` is applied to every channel and `channel_black_levels`
/// is ignored. Otherwise each channel gets its own offset, zero entries
/// leaving that channel untouched.
///
/// The sample type decides what happens below zero: `u16` saturates,
/// `f32` keeps the negative value.
pub fn subtract_black<T: Sample>(
    image: &mut PlanarImage<T>,
    black_level: u16,
    channel_black_levels: &[u16; CHANNELS],
) {
    if black_level != 0 {
        debug!("Subtracting black level {}", black_level);
        for v in image.as_mut_slice() {
            *v = v.sub_black(black_level);
        }
        return;
    }

    for (ch, &black) in channel_black_levels.iter().enumerate() {
        if black == 0 {
            continue;
        }
        debug!("Subtracting black level {} from channel {}", black, ch);
        for v in image.channel_mut(ch) {
            *v = v.sub_black(black);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> PlanarImage<u16> {
        PlanarImage::from_planes(2, 1, vec![100, 200, 300, 400, 500, 600]).unwrap()
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let mut image = sample_image();
        subtract_black(&mut image, 0, &[0, 0, 0]);
        assert_eq!(image, sample_image());
    }

    #[test]
    fn test_scalar_offset_applies_to_all_channels() {
        let mut image = sample_image();
        subtract_black(&mut image, 64, &[1, 2, 3]);
        assert_eq!(image.as_slice(), &[36, 136, 236, 336, 436, 536]);
    }

    #[test]
    fn test_per_channel_offsets_are_independent() {
        let mut image = sample_image();
        subtract_black(&mut image, 0, &[10, 0, 50]);
        assert_eq!(image.as_slice(), &[90, 190, 300, 400, 450, 550]);
    }

    #[test]
    fn test_unsigned_samples_saturate_at_zero() {
        let mut image = sample_image();
        subtract_black(&mut image, 250, &[0, 0, 0]);
        assert_eq!(image.as_slice(), &[0, 0, 50, 150, 250, 350]);
    }

    #[test]
    fn test_float_samples_keep_negative_values() {
        let mut image = sample_image().to_f32();
        subtract_black(&mut image, 250, &[0, 0, 0]);
        assert_eq!(image.as_slice(), &[-150.0, -50.0, 50.0, 150.0, 250.0, 350.0]);
    }

    #[test]
    fn test_raw_adjust_shifts_and_clamps() {
        let mut image = PlanarImage::from_planes(2, 1, vec![0, 1, 1024, 8191, 8192, 65535]).unwrap();
        raw_adjust(&mut image);
        assert_eq!(image.as_slice(), &[0, 8, 8192, 65528, 65535, 65535]);
    }
}

//! Planar image data types

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Number of color planes kept in a [`PlanarImage`].
pub const CHANNELS: usize = 3;

/// Sample types a planar buffer can hold.
///
/// Conversions into `u16` clamp to `[0, 65535]` and truncate toward zero,
/// which is how every stage quantizes floating point results.
pub trait Sample: Copy + Default + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;
    /// Removes a black offset. Unsigned samples saturate at zero.
    fn sub_black(self, black: u16) -> Self;
}

impl Sample for u16 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value.clamp(0.0, u16::MAX as f32) as u16
    }

    #[inline]
    fn sub_black(self, black: u16) -> Self {
        self.saturating_sub(black)
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn sub_black(self, black: u16) -> Self {
        self - black as f32
    }
}

/// Dense 3×N pixel buffer, channel-major.
///
/// `data` holds the R plane, then the G plane, then the B plane, each
/// `width * height` samples long.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarImage<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Sample> PlanarImage<T> {
    /// Zero-filled buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height * CHANNELS],
        }
    }

    /// Wraps already planar samples (R plane, G plane, B plane).
    pub fn from_planes(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(ConversionError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Builds a buffer from three separate channel rows.
    pub fn from_channels(width: usize, height: usize, r: &[T], g: &[T], b: &[T]) -> Result<Self> {
        let n = width * height;
        for plane in [r, g, b] {
            if plane.len() != n {
                return Err(ConversionError::BufferSizeMismatch {
                    expected: n,
                    actual: plane.len(),
                });
            }
        }
        let mut data = Vec::with_capacity(n * CHANNELS);
        data.extend_from_slice(r);
        data.extend_from_slice(g);
        data.extend_from_slice(b);
        Ok(Self { width, height, data })
    }

    /// Builds a buffer from pixel-interleaved samples with `components`
    /// samples per pixel. Only the first three components are kept, so RGBG
    /// input drops its second green.
    pub fn from_interleaved(width: usize, height: usize, components: usize, samples: &[T]) -> Result<Self> {
        if components < CHANNELS {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} component(s) per pixel, at least {} required",
                components, CHANNELS
            )));
        }
        let n = width * height;
        let expected = n * components;
        if samples.len() != expected {
            return Err(ConversionError::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let mut image = Self::new(width, height);
        for (i, pixel) in samples.chunks_exact(components).enumerate() {
            for ch in 0..CHANNELS {
                image.data[ch * n + i] = pixel[ch];
            }
        }
        Ok(image)
    }

    /// Channel-major 4×N (RGBG) buffer reduced to its first three rows.
    pub fn from_rgbg_planes(width: usize, height: usize, mut data: Vec<T>) -> Result<Self> {
        let n = width * height;
        let expected = n * 4;
        if data.len() != expected {
            return Err(ConversionError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        data.truncate(n * CHANNELS);
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// N, the number of pixels per channel.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn channel(&self, ch: usize) -> &[T] {
        let n = self.pixel_count();
        &self.data[ch * n..(ch + 1) * n]
    }

    pub fn channel_mut(&mut self, ch: usize) -> &mut [T] {
        let n = self.pixel_count();
        &mut self.data[ch * n..(ch + 1) * n]
    }

    /// All three channels of pixel `index`.
    pub fn pixel(&self, index: usize) -> [T; CHANNELS] {
        let n = self.pixel_count();
        [self.data[index], self.data[n + index], self.data[2 * n + index]]
    }

    /// Applies `f` to every sample, producing a new buffer of the same shape.
    pub fn map<U: Sample, F: Fn(T) -> U>(&self, f: F) -> PlanarImage<U> {
        PlanarImage {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn to_f32(&self) -> PlanarImage<f32> {
        self.map(Sample::to_f32)
    }

    /// Quantizes to 16 bits (clamp, then truncate).
    pub fn to_u16(&self) -> PlanarImage<u16> {
        self.map(|v| u16::from_f32(v.to_f32()))
    }

    /// Pixel-interleaved copy `[R, G, B, R, G, B, ...]`.
    pub fn to_interleaved(&self) -> Vec<T> {
        let n = self.pixel_count();
        let (r, rest) = self.data.split_at(n);
        let (g, b) = rest.split_at(n);
        r.iter()
            .zip(g)
            .zip(b)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect()
    }

    /// Smallest and largest sample over all channels.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_round_trip_keeps_channel_order() {
        let samples: Vec<u16> = vec![1, 2, 3, 10, 20, 30];
        let image = PlanarImage::from_interleaved(2, 1, 3, &samples).unwrap();

        assert_eq!(image.channel(0), &[1, 10]);
        assert_eq!(image.channel(1), &[2, 20]);
        assert_eq!(image.channel(2), &[3, 30]);
        assert_eq!(image.to_interleaved(), samples);
    }

    #[test]
    fn test_four_component_input_drops_second_green() {
        let samples: Vec<u16> = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let image = PlanarImage::from_interleaved(2, 1, 4, &samples).unwrap();
        assert_eq!(image.as_slice(), &[1, 5, 2, 6, 3, 7]);

        let planes: Vec<u16> = vec![1, 5, 2, 6, 3, 7, 4, 8];
        let image = PlanarImage::from_rgbg_planes(2, 1, planes).unwrap();
        assert_eq!(image.as_slice(), &[1, 5, 2, 6, 3, 7]);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let result = PlanarImage::<u16>::from_planes(2, 2, vec![0; 11]);
        assert!(matches!(
            result,
            Err(ConversionError::BufferSizeMismatch { expected: 12, actual: 11 })
        ));

        let result = PlanarImage::<u16>::from_interleaved(1, 1, 1, &[0]);
        assert!(matches!(result, Err(ConversionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_float_quantization_clamps_and_truncates() {
        let image = PlanarImage::from_planes(1, 1, vec![-3.5f32, 1234.9, 70000.0]).unwrap();
        assert_eq!(image.to_u16().as_slice(), &[0, 1234, 65535]);
    }

    #[test]
    fn test_min_max_spans_all_channels() {
        let image = PlanarImage::from_planes(2, 1, vec![5.0f32, 7.0, -1.0, 3.0, 9.5, 0.0]).unwrap();
        assert_eq!(image.min_max(), Some((-1.0, 9.5)));
        assert_eq!(PlanarImage::<f32>::new(0, 0).min_max(), None);
    }
}

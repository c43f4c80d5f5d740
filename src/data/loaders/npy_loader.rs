//! Loader for NumPy `.npy` files.
//!
//! Microscopy pipelines often hand frames around as raw arrays. Arrays
//! are read in NumPy's row-major image layout:
//! - 2D `(H, W)`: grayscale, replicated to three channels
//! - 3D `(H, W, C)`: channels-last with `C` of 1, 3 or 4 (alpha dropped)
//!
//! Supported data types: `u8`, `u16`, `f32`, `f64`.

use std::io::Cursor;

use image::RgbImage;
use ndarray::ArrayD;
use ndarray_npy::ReadNpyExt;

use crate::data::loader::{FrameLoader, LoaderError};

/// Loader for NumPy `.npy` files.
pub struct NpyLoader;

impl NpyLoader {
    /// NumPy magic bytes: \x93NUMPY
    const MAGIC: &'static [u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

    fn array_to_image<T>(array: ArrayD<T>) -> Result<RgbImage, LoaderError>
    where
        T: ToIntensity + Copy,
    {
        let shape = array.shape().to_vec();
        log::debug!("NpyLoader: array shape = {:?}", shape);

        let (height, width, channels) = match shape.as_slice() {
            [h, w] => (*h, *w, 1),
            [h, w, c] if matches!(*c, 1 | 3 | 4) => (*h, *w, *c),
            _ => {
                return Err(LoaderError::new(format!(
                    "Unsupported array shape {:?} (expected (H, W) or (H, W, C) with C in 1, 3, 4)",
                    shape
                ))
                .with_loader("npy"));
            }
        };

        if width == 0 || height == 0 {
            return Err(LoaderError::new("Array has an empty dimension").with_loader("npy"));
        }

        let width_u32 = u32::try_from(width)
            .map_err(|_| LoaderError::new("Array too wide").with_loader("npy"))?;
        let height_u32 = u32::try_from(height)
            .map_err(|_| LoaderError::new("Array too tall").with_loader("npy"))?;

        let scale = T::scale_for(array.iter().copied());
        let sample = |y: usize, x: usize, c: usize| -> u8 {
            let value = if channels == 1 {
                array[[y, x].as_slice()]
            } else {
                array[[y, x, c.min(channels - 1)].as_slice()]
            };
            value.to_intensity(scale)
        };

        let img = RgbImage::from_fn(width_u32, height_u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            image::Rgb([sample(y, x, 0), sample(y, x, 1), sample(y, x, 2)])
        });

        log::info!(
            "NpyLoader: loaded {}x{} array with {} channel(s)",
            width,
            height,
            channels
        );

        Ok(img)
    }
}

impl FrameLoader for NpyLoader {
    fn id(&self) -> &'static str {
        "npy"
    }

    fn display_name(&self) -> &'static str {
        "NumPy Array (.npy)"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["npy"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        data.starts_with(Self::MAGIC)
    }

    fn load(&self, data: &[u8]) -> Result<RgbImage, LoaderError> {
        let mut cursor = Cursor::new(data);

        if let Ok(array) = ArrayD::<u8>::read_npy(&mut cursor) {
            return Self::array_to_image(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<u16>::read_npy(&mut cursor) {
            return Self::array_to_image(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<f32>::read_npy(&mut cursor) {
            return Self::array_to_image(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<f64>::read_npy(&mut cursor) {
            return Self::array_to_image(array);
        }

        Err(LoaderError::new(
            "Failed to read NumPy array: unsupported dtype or invalid format",
        )
        .with_loader(self.id()))
    }

    fn priority(&self) -> i32 {
        10
    }
}

/// Conversion of array element types to 8-bit intensities.
trait ToIntensity: Sized {
    /// Multiplier applied before rounding, derived from the whole array.
    fn scale_for(_values: impl Iterator<Item = Self>) -> f64 {
        1.0
    }

    fn to_intensity(self, scale: f64) -> u8;
}

impl ToIntensity for u8 {
    fn to_intensity(self, _scale: f64) -> u8 {
        self
    }
}

impl ToIntensity for u16 {
    fn to_intensity(self, _scale: f64) -> u8 {
        (self / 257) as u8
    }
}

impl ToIntensity for f32 {
    fn scale_for(values: impl Iterator<Item = Self>) -> f64 {
        f64::scale_for(values.map(f64::from))
    }

    fn to_intensity(self, scale: f64) -> u8 {
        f64::from(self).to_intensity(scale)
    }
}

impl ToIntensity for f64 {
    /// Arrays whose maximum is at most 1.0 are treated as normalized.
    fn scale_for(values: impl Iterator<Item = Self>) -> f64 {
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        if max <= 1.0 { 255.0 } else { 1.0 }
    }

    fn to_intensity(self, scale: f64) -> u8 {
        if self.is_nan() {
            return 0;
        }
        (self * scale).round().clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};
    use ndarray_npy::WriteNpyExt;

    fn to_npy_bytes<A: WriteNpyExt>(array: &A) -> Vec<u8> {
        let mut bytes = Vec::new();
        array.write_npy(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_loader_metadata() {
        let loader = NpyLoader;
        assert_eq!(loader.id(), "npy");
        assert!(loader.extensions().contains(&"npy"));
        assert_eq!(loader.priority(), 10);
    }

    #[test]
    fn test_magic_detection() {
        let loader = NpyLoader;
        assert!(loader.can_load(&[0x93, b'N', b'U', b'M', b'P', b'Y', 0x01, 0x00]));
        assert!(!loader.can_load(b"NUMPY"));
    }

    #[test]
    fn test_grayscale_u8_is_replicated() {
        let mut array = Array2::<u8>::zeros((3, 5));
        array[[2, 4]] = 99;
        let bytes = to_npy_bytes(&array);

        let img = NpyLoader.load(&bytes).unwrap();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(4, 2).0, [99, 99, 99]);
    }

    #[test]
    fn test_channels_last_rgb() {
        let mut array = Array3::<u8>::zeros((2, 2, 3));
        array[[1, 0, 1]] = 180;
        let bytes = to_npy_bytes(&array);

        let img = NpyLoader.load(&bytes).unwrap();
        assert_eq!(img.get_pixel(0, 1).0, [0, 180, 0]);
    }

    #[test]
    fn test_normalized_float_is_scaled() {
        let array = Array2::<f32>::from_elem((2, 2), 1.0);
        let bytes = to_npy_bytes(&array);

        let img = NpyLoader.load(&bytes).unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255]);
    }

    #[test]
    fn test_unsupported_shape() {
        let array = Array3::<u8>::zeros((4, 4, 7));
        let bytes = to_npy_bytes(&array);

        let err = NpyLoader.load(&bytes).unwrap_err();
        assert!(err.message.contains("Unsupported array shape"));
    }
}

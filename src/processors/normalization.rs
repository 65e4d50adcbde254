//! Input normalization applied to batched tensors before inference.
//!
//! The network expects pixel values centered on zero: every element `x` is
//! mapped to `(x - offset) * scale`, with `offset = 127.5` and
//! `scale = 1/128` by default.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{NORMALIZE_OFFSET, NORMALIZE_SCALE, PARALLEL_ELEMENT_THRESHOLD};
use crate::core::Tensor4D;
use serde::{Deserialize, Serialize};

/// An element-wise affine rescale of a batched tensor.
///
/// # Examples
///
/// ```
/// use netinput::core::Tensor4D;
/// use netinput::processors::AffineNormalize;
///
/// let input = Tensor4D::from_elem((1, 2, 2, 3), 255.0);
/// let output = AffineNormalize::default().apply(&input);
/// assert!(output.iter().all(|&v| v == 0.99609375));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineNormalize {
    /// Value subtracted from every element.
    #[serde(default = "AffineNormalize::default_offset")]
    pub offset: f32,
    /// Factor applied after subtracting the offset.
    #[serde(default = "AffineNormalize::default_scale")]
    pub scale: f32,
}

impl AffineNormalize {
    /// Creates a normalization with the given offset and scale.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or the scale is zero.
    pub fn new(offset: f32, scale: f32) -> Result<Self, ConfigError> {
        let normalize = Self { offset, scale };
        normalize.validate()?;
        Ok(normalize)
    }

    /// Applies the rescale, returning a new tensor.
    ///
    /// The input is left untouched. Large tensors are processed on the rayon
    /// thread pool.
    pub fn apply(&self, x: &Tensor4D) -> Tensor4D {
        let Self { offset, scale } = *self;
        if x.len() >= PARALLEL_ELEMENT_THRESHOLD {
            let mut out = x.to_owned();
            out.par_mapv_inplace(|v| (v - offset) * scale);
            out
        } else {
            x.mapv(|v| (v - offset) * scale)
        }
    }

    fn default_offset() -> f32 {
        NORMALIZE_OFFSET
    }

    fn default_scale() -> f32 {
        NORMALIZE_SCALE
    }
}

impl Default for AffineNormalize {
    fn default() -> Self {
        Self {
            offset: Self::default_offset(),
            scale: Self::default_scale(),
        }
    }
}

impl ConfigValidator for AffineNormalize {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_finite(self.offset, "offset")?;
        self.validate_finite(self.scale, "scale")?;
        if self.scale == 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: "scale must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Normalizes a batched tensor with the default parameters:
/// `(x - 127.5) / 128` element-wise.
pub fn normalize(x: &Tensor4D) -> Tensor4D {
    AffineNormalize::default().apply(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_maps_to_zero() {
        let input = Tensor4D::from_elem((2, 3, 3, 3), 127.5);
        let output = normalize(&input);
        assert_eq!(output.shape(), input.shape());
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_white_maps_below_one() {
        let output = normalize(&Tensor4D::from_elem((1, 2, 2, 3), 255.0));
        assert!(output.iter().all(|&v| v == 0.99609375));
    }

    #[test]
    fn test_black_maps_to_minus_one() {
        let output = normalize(&Tensor4D::zeros((1, 1, 1, 3)));
        assert!(output.iter().all(|&v| v == -0.99609375));
    }

    #[test]
    fn test_normalize_twice() {
        let once = normalize(&Tensor4D::from_elem((1, 1, 2, 3), 255.0));
        let twice = normalize(&once);
        // (0.99609375 - 127.5) / 128 = -32385 / 32768
        assert!(twice.iter().all(|&v| v == -0.988311767578125));
    }

    #[test]
    fn test_input_not_mutated() {
        let mut input = Tensor4D::zeros((1, 1, 2, 1));
        input[[0, 0, 1, 0]] = 64.0;
        let snapshot = input.clone();

        let output = normalize(&input);

        assert_eq!(input, snapshot);
        assert!((output[[0, 0, 1, 0]] - (64.0 - 127.5) / 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let side = 600;
        let input = Tensor4D::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
            ((y * 7 + x * 3 + c) % 256) as f32
        });
        assert!(input.len() >= PARALLEL_ELEMENT_THRESHOLD);

        let output = normalize(&input);
        let expected = input.mapv(|v| (v - 127.5) * 0.0078125);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_custom_parameters() {
        let normalize = AffineNormalize::new(0.0, 1.0 / 255.0).unwrap();
        let output = normalize.apply(&Tensor4D::from_elem((1, 1, 1, 1), 255.0));
        assert!((output[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(AffineNormalize::new(f32::INFINITY, 1.0).is_err());
        assert!(AffineNormalize::new(0.0, 0.0).is_err());
        assert!(AffineNormalize::new(0.0, f32::NAN).is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let normalize: AffineNormalize = serde_json::from_str("{}").unwrap();
        assert_eq!(normalize, AffineNormalize::default());

        let normalize: AffineNormalize = serde_json::from_str(r#"{ "scale": 0.5 }"#).unwrap();
        assert_eq!(normalize.offset, 127.5);
        assert_eq!(normalize.scale, 0.5);
    }
}

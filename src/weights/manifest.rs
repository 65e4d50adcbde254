//! Weights manifest format.
//!
//! A manifest is a JSON array of groups. Each group lists the shard files
//! that, concatenated in order, hold the raw bytes of the group's weights,
//! stored back to back in the listed order.

use serde::{Deserialize, Serialize};

/// A parsed weights manifest.
pub type WeightsManifest = Vec<WeightsGroup>;

/// One group of weights sharing a set of shard files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGroup {
    /// Shard paths, relative to the model base uri.
    pub paths: Vec<String>,
    /// The weights stored in the shards, in byte order.
    pub weights: Vec<WeightEntry>,
}

/// The element type of a stored weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightDtype {
    /// 32-bit float.
    Float32,
    /// 32-bit signed integer.
    Int32,
    /// Boolean, one byte per element.
    Bool,
}

/// The storage type of a quantized weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizationDtype {
    /// One byte per element.
    Uint8,
    /// Two little-endian bytes per element.
    Uint16,
}

impl QuantizationDtype {
    /// Size in bytes per element.
    pub fn size(&self) -> usize {
        match self {
            QuantizationDtype::Uint8 => 1,
            QuantizationDtype::Uint16 => 2,
        }
    }
}

/// Linear quantization: a stored value `q` decodes to `q * scale + min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantization {
    /// The storage type.
    pub dtype: QuantizationDtype,
    /// Step between consecutive stored values.
    pub scale: f32,
    /// The value a stored zero decodes to.
    pub min: f32,
}

/// Describes one weight in a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Parameter name, e.g. `conv0/filters`.
    pub name: String,
    /// Tensor shape; empty for scalars.
    pub shape: Vec<usize>,
    /// The decoded element type.
    pub dtype: WeightDtype,
    /// Present when the stored bytes are quantized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<Quantization>,
}

impl WeightEntry {
    /// The number of elements in the tensor, or `None` if the shape
    /// overflows `usize`.
    pub fn element_count(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// The number of bytes the weight occupies in its group's shards, or
    /// `None` if that overflows `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        let element_size = match (&self.quantization, self.dtype) {
            (Some(q), _) => q.dtype.size(),
            (None, WeightDtype::Float32 | WeightDtype::Int32) => 4,
            (None, WeightDtype::Bool) => 1,
        };
        self.element_count()?.checked_mul(element_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest: WeightsManifest = serde_json::from_str(
            r#"[
                {
                    "paths": ["model-shard1", "model-shard2"],
                    "weights": [
                        { "name": "conv0/filters", "shape": [3, 3, 3, 10], "dtype": "float32" },
                        {
                            "name": "conv0/bias",
                            "shape": [10],
                            "dtype": "float32",
                            "quantization": { "dtype": "uint8", "scale": 0.5, "min": -1.0 }
                        }
                    ]
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 1);
        let group = &manifest[0];
        assert_eq!(group.paths, vec!["model-shard1", "model-shard2"]);
        assert_eq!(group.weights[0].byte_len(), Some(3 * 3 * 3 * 10 * 4));
        assert_eq!(group.weights[1].byte_len(), Some(10));
        assert_eq!(
            group.weights[1].quantization.map(|q| q.dtype),
            Some(QuantizationDtype::Uint8)
        );
    }

    #[test]
    fn test_scalar_entry() {
        let entry = WeightEntry {
            name: "alpha".to_string(),
            shape: vec![],
            dtype: WeightDtype::Int32,
            quantization: None,
        };
        assert_eq!(entry.element_count(), Some(1));
        assert_eq!(entry.byte_len(), Some(4));
    }

    #[test]
    fn test_oversized_shape() {
        let entry = WeightEntry {
            name: "huge".to_string(),
            shape: vec![1 << 32, 1 << 32, 1 << 32],
            dtype: WeightDtype::Float32,
            quantization: None,
        };
        assert_eq!(entry.element_count(), None);
        assert_eq!(entry.byte_len(), None);

        let entry = WeightEntry {
            shape: vec![usize::MAX / 2],
            ..entry
        };
        assert_eq!(entry.element_count(), Some(usize::MAX / 2));
        assert_eq!(entry.byte_len(), None);
    }

    #[test]
    fn test_unknown_dtype_rejected() {
        let result: Result<WeightEntry, _> =
            serde_json::from_str(r#"{ "name": "x", "shape": [1], "dtype": "complex64" }"#);
        assert!(result.is_err());
    }
}

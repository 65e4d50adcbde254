//! Tensor types shared by the input pipeline.
//!
//! All image tensors use channels-last layout: rank-3 tensors are
//! `height x width x channels` and rank-4 tensors add a leading batch axis.

/// A 3-dimensional tensor represented as a 3D array of f32 values.
pub type Tensor3D = ndarray::Array3<f32>;

/// A 4-dimensional tensor represented as a 4D array of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// A tensor of arbitrary rank, as stored in a weight map.
pub type TensorD = ndarray::ArrayD<f32>;

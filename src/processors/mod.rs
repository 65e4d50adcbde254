//! Numeric transforms applied to tensors before they enter the network.

pub mod normalization;

pub use normalization::{AffineNormalize, normalize};

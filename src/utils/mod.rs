//! Utility functions for images and tensors.

pub mod image;
pub mod tensor;

pub use self::image::{dynamic_to_rgb, load_image, rgb_to_tensor3};
pub use tensor::{stack_tensor3d, tensor4d_slice};

//! Tensor utility functions for slicing and stacking batches.

use crate::core::constants::MAX_TENSOR_SIZE;
use crate::core::{NetInputError, Tensor3D, Tensor4D};
use ndarray::Axis;

/// Extracts a 3D tensor from a 4D tensor at the specified batch index.
///
/// # Arguments
///
/// * `tensor` - A reference to a 4D tensor.
/// * `index` - The batch index to extract.
///
/// # Returns
///
/// * `Ok(Tensor3D)` - An owned copy of the tensor at that batch index.
/// * `Err(NetInputError)` - An error if the index is out of bounds.
pub fn tensor4d_slice(tensor: &Tensor4D, index: usize) -> Result<Tensor3D, NetInputError> {
    let batch = tensor.shape()[0];
    if index >= batch {
        return Err(NetInputError::invalid_input(format!(
            "Index {index} out of bounds for tensor with batch size {batch}"
        )));
    }
    Ok(tensor.index_axis(Axis(0), index).to_owned())
}

/// Stacks a slice of 3D tensors into a single 4D tensor.
///
/// # Arguments
///
/// * `tensors` - A slice of 3D tensors to stack.
///
/// # Returns
///
/// * `Ok(Tensor4D)` - A 4D tensor created by stacking the input tensors.
/// * `Err(NetInputError)` - An error if the slice is empty or shapes differ.
///
/// # Examples
///
/// ```
/// use netinput::core::Tensor3D;
/// use netinput::utils::stack_tensor3d;
///
/// let a = Tensor3D::zeros((2, 2, 3));
/// let b = Tensor3D::ones((2, 2, 3));
/// let stacked = stack_tensor3d(&[a, b]).unwrap();
/// assert_eq!(stacked.shape(), &[2, 2, 2, 3]);
/// ```
pub fn stack_tensor3d(tensors: &[Tensor3D]) -> Result<Tensor4D, NetInputError> {
    let Some(first) = tensors.first() else {
        return Err(NetInputError::invalid_input("No tensors to stack"));
    };
    let first_shape = first.shape();

    for (i, tensor) in tensors.iter().enumerate().skip(1) {
        if tensor.shape() != first_shape {
            return Err(NetInputError::invalid_input(format!(
                "All tensors must have the same shape for stacking. Tensor 0 has shape {:?}, tensor {} has shape {:?}",
                first_shape,
                i,
                tensor.shape()
            )));
        }
    }

    let result_size = tensors
        .len()
        .checked_mul(first_shape.iter().product::<usize>())
        .ok_or_else(|| {
            NetInputError::invalid_input(format!(
                "Stacking {} tensors of shape {:?} would cause integer overflow",
                tensors.len(),
                first_shape
            ))
        })?;

    if result_size > MAX_TENSOR_SIZE {
        return Err(NetInputError::invalid_input(format!(
            "Stacked tensor size {result_size} exceeds maximum allowed size {MAX_TENSOR_SIZE}"
        )));
    }

    let views: Vec<_> = tensors.iter().map(|t| t.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_preserves_order() {
        let a = Tensor3D::from_elem((1, 2, 3), 1.0);
        let b = Tensor3D::from_elem((1, 2, 3), 2.0);
        let stacked = stack_tensor3d(&[a, b]).unwrap();

        assert_eq!(stacked.shape(), &[2, 1, 2, 3]);
        assert_eq!(stacked[[0, 0, 1, 2]], 1.0);
        assert_eq!(stacked[[1, 0, 0, 0]], 2.0);
    }

    #[test]
    fn test_stack_rejects_mismatched_shapes() {
        let a = Tensor3D::zeros((2, 2, 3));
        let b = Tensor3D::zeros((2, 3, 3));
        let err = stack_tensor3d(&[a, b]).unwrap_err();
        assert!(err.to_string().contains("tensor 1 has shape"));
    }

    #[test]
    fn test_stack_empty() {
        assert!(stack_tensor3d(&[]).is_err());
    }

    #[test]
    fn test_tensor4d_slice() {
        let mut tensor = Tensor4D::zeros((2, 1, 1, 3));
        tensor[[1, 0, 0, 1]] = 7.0;

        let slice = tensor4d_slice(&tensor, 1).unwrap();
        assert_eq!(slice.shape(), &[1, 1, 3]);
        assert_eq!(slice[[0, 0, 1]], 7.0);

        assert!(tensor4d_slice(&tensor, 2).is_err());
    }
}

//! The canonical batch produced by input canonicalization.

use super::media::{MediaElement, MediaHandle, MediaKind};
use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::{NetInputError, Tensor3D, Tensor4D};
use crate::utils::{rgb_to_tensor3, stack_tensor3d, tensor4d_slice};
use rayon::prelude::*;

/// A validated input: media that has finished loading, or a tensor.
#[derive(Debug, Clone)]
pub enum CanonicalItem {
    /// A loaded media element.
    Media(MediaHandle),
    /// A `height x width x channels` tensor.
    Tensor3(Tensor3D),
    /// A `1 x height x width x channels` tensor.
    Tensor4(Tensor4D),
}

impl CanonicalItem {
    /// Returns the media kind, or `None` for tensors.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            CanonicalItem::Media(media) => Some(media.kind()),
            _ => None,
        }
    }

    /// Returns `(height, width)` of the item.
    ///
    /// `None` for media whose pixels are unavailable.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            CanonicalItem::Media(media) => media.pixels().map(|img| {
                let (w, h) = img.dimensions();
                (h as usize, w as usize)
            }),
            CanonicalItem::Tensor3(t) => Some((t.shape()[0], t.shape()[1])),
            CanonicalItem::Tensor4(t) => Some((t.shape()[1], t.shape()[2])),
        }
    }
}

/// Results shaped the way the inputs were passed.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutput<T> {
    /// The caller passed a single input.
    Single(T),
    /// The caller passed an array.
    Many(Vec<T>),
}

impl<T> BatchOutput<T> {
    /// Flattens into a vector regardless of call shape.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            BatchOutput::Single(item) => vec![item],
            BatchOutput::Many(items) => items,
        }
    }
}

/// An ordered, validated collection of inputs ready for numeric processing.
///
/// Always holds at least one item. Position `i` corresponds to position `i`
/// of the call that produced it.
#[derive(Debug, Clone)]
pub struct CanonicalBatch {
    items: Vec<CanonicalItem>,
    is_batch_input: bool,
}

impl CanonicalBatch {
    pub(crate) fn new(items: Vec<CanonicalItem>, is_batch_input: bool) -> Self {
        debug_assert!(!items.is_empty());
        Self {
            items,
            is_batch_input,
        }
    }

    /// The items in input order.
    pub fn items(&self) -> &[CanonicalItem] {
        &self.items
    }

    /// Consumes the batch, returning the items in input order.
    pub fn into_items(self) -> Vec<CanonicalItem> {
        self.items
    }

    /// Returns the item at `index`.
    pub fn get(&self, index: usize) -> Option<&CanonicalItem> {
        self.items.get(index)
    }

    /// The number of inputs.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; a canonical batch is never empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the originating call passed an array.
    pub fn is_batch_input(&self) -> bool {
        self.is_batch_input
    }

    /// Converts the item at `index` to a rank-3 tensor.
    ///
    /// Media pixels are read as `f32` in `[0, 255]`; rank-4 items drop their
    /// unit batch axis.
    pub fn to_tensor3(&self, index: usize) -> Result<Tensor3D, NetInputError> {
        let item = self.items.get(index).ok_or_else(|| {
            NetInputError::invalid_input(format!(
                "Index {index} out of bounds for batch of {} inputs",
                self.items.len()
            ))
        })?;

        match item {
            CanonicalItem::Media(media) => media
                .pixels()
                .map(|img| rgb_to_tensor3(&img))
                .ok_or_else(|| {
                    NetInputError::invalid_input(format!(
                        "{} at index {index} has no decoded pixels",
                        media.kind()
                    ))
                }),
            CanonicalItem::Tensor3(tensor) => Ok(tensor.clone()),
            CanonicalItem::Tensor4(tensor) => tensor4d_slice(tensor, 0),
        }
    }

    /// Stacks every item into a `batch x height x width x channels` tensor.
    ///
    /// All items must share the same shape.
    pub fn to_batch_tensor(&self) -> Result<Tensor4D, NetInputError> {
        self.to_batch_tensor_with_threshold(None)
    }

    /// Like [`to_batch_tensor`](Self::to_batch_tensor), converting items in
    /// parallel once the batch is larger than `parallel_threshold`.
    ///
    /// If `None`, [`DEFAULT_PARALLEL_THRESHOLD`] is used.
    pub fn to_batch_tensor_with_threshold(
        &self,
        parallel_threshold: Option<usize>,
    ) -> Result<Tensor4D, NetInputError> {
        let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

        let tensors: Vec<Tensor3D> = if self.items.len() > threshold {
            (0..self.items.len())
                .into_par_iter()
                .map(|i| self.to_tensor3(i))
                .collect::<Result<_, _>>()?
        } else {
            (0..self.items.len())
                .map(|i| self.to_tensor3(i))
                .collect::<Result<_, _>>()?
        };

        stack_tensor3d(&tensors)
    }

    /// Shapes per-item results to match the call: array in, array out;
    /// single in, single out.
    ///
    /// # Errors
    ///
    /// Returns `NetInputError::InvalidInput` if the number of results differs
    /// from the number of inputs.
    pub fn shape_output<T>(&self, mut results: Vec<T>) -> Result<BatchOutput<T>, NetInputError> {
        if results.len() != self.items.len() {
            return Err(NetInputError::invalid_input(format!(
                "Expected {} results, got {}",
                self.items.len(),
                results.len()
            )));
        }

        if self.is_batch_input {
            Ok(BatchOutput::Many(results))
        } else {
            results
                .pop()
                .map(BatchOutput::Single)
                .ok_or_else(|| NetInputError::invalid_input("Expected 1 result, got 0"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoadableMedia, MediaKind};
    use image::{Rgb, RgbImage};

    fn tensor_batch(is_batch_input: bool) -> CanonicalBatch {
        CanonicalBatch::new(
            vec![
                CanonicalItem::Tensor3(Tensor3D::from_elem((2, 2, 3), 1.0)),
                CanonicalItem::Tensor4(Tensor4D::from_elem((1, 2, 2, 3), 2.0)),
            ],
            is_batch_input,
        )
    }

    #[test]
    fn test_to_batch_tensor_preserves_order() {
        let batch = tensor_batch(true);
        let stacked = batch.to_batch_tensor().unwrap();

        assert_eq!(stacked.shape(), &[2, 2, 2, 3]);
        assert_eq!(stacked[[0, 1, 1, 2]], 1.0);
        assert_eq!(stacked[[1, 0, 0, 0]], 2.0);
    }

    #[test]
    fn test_to_batch_tensor_parallel_path() {
        let items = (0..6)
            .map(|i| CanonicalItem::Tensor3(Tensor3D::from_elem((1, 1, 3), i as f32)))
            .collect();
        let batch = CanonicalBatch::new(items, true);

        let stacked = batch.to_batch_tensor_with_threshold(Some(2)).unwrap();
        for i in 0..6 {
            assert_eq!(stacked[[i, 0, 0, 0]], i as f32);
        }
    }

    #[test]
    fn test_media_to_tensor3() {
        let media = LoadableMedia::from_image(RgbImage::from_pixel(2, 1, Rgb([5, 6, 7])));
        let batch = CanonicalBatch::new(vec![CanonicalItem::Media(media.into_handle())], false);

        let tensor = batch.to_tensor3(0).unwrap();
        assert_eq!(tensor.shape(), &[1, 2, 3]);
        assert_eq!(tensor[[0, 1, 1]], 6.0);
        assert_eq!(batch.get(0).and_then(|i| i.media_kind()), Some(MediaKind::Image));
        assert_eq!(batch.get(0).and_then(|i| i.dimensions()), Some((1, 2)));
    }

    #[test]
    fn test_unloaded_media_has_no_tensor() {
        let (media, _loader) = LoadableMedia::loading(MediaKind::Canvas);
        let batch = CanonicalBatch::new(vec![CanonicalItem::Media(media.into_handle())], true);

        let err = batch.to_tensor3(0).unwrap_err();
        assert!(err.to_string().contains("canvas at index 0 has no decoded pixels"));
        assert!(batch.to_tensor3(1).is_err());
    }

    #[test]
    fn test_shape_output() {
        let single = CanonicalBatch::new(
            vec![CanonicalItem::Tensor3(Tensor3D::zeros((1, 1, 3)))],
            false,
        );
        assert_eq!(single.shape_output(vec!["a"]).unwrap(), BatchOutput::Single("a"));

        let many = tensor_batch(true);
        assert_eq!(
            many.shape_output(vec![1, 2]).unwrap(),
            BatchOutput::Many(vec![1, 2])
        );
        assert!(many.shape_output(vec![1]).is_err());
        assert_eq!(BatchOutput::Single(3).into_vec(), vec![3]);
    }
}

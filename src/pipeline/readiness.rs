//! Waiting for media to become readable.

use crate::core::MediaLoadError;
use crate::domain::{CanonicalItem, MediaElement, MediaHandle};
use futures::future::{self, BoxFuture, FutureExt};

/// Completes once `media` is loaded and its pixels can be read.
///
/// Returns without suspending when the element already reports itself loaded.
pub async fn await_media_loaded(media: &MediaHandle) -> Result<(), MediaLoadError> {
    if media.is_loaded() {
        return Ok(());
    }
    tracing::trace!("waiting for {} element to load", media.kind());
    media.wait_loaded().await
}

/// Returns the readiness future of one canonical item.
///
/// Tensors are always ready. Each item's future depends only on that item,
/// so the futures of a batch can be awaited together.
pub fn readiness(item: &CanonicalItem) -> BoxFuture<'_, Result<(), MediaLoadError>> {
    match item {
        CanonicalItem::Media(media) => await_media_loaded(media).boxed(),
        CanonicalItem::Tensor3(_) | CanonicalItem::Tensor4(_) => future::ready(Ok(())).boxed(),
    }
}

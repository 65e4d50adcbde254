//! Maps raw inputs to resolved values.
//!
//! Resolution is lookup-and-return: element ids are looked up in the ambient
//! document, everything else passes through. Nothing is validated here; a
//! failed lookup is recorded and reported later, when the slot is inspected.

use crate::core::{BoxError, Tensor3D, Tensor4D};
use crate::domain::{Element, ElementLookup, MediaElement, MediaHandle, NetInput, PendingInput};
use std::sync::Arc;

/// What an input slot holds once resolved.
#[derive(Debug)]
pub enum Resolved {
    /// A media element.
    Media(MediaHandle),
    /// A rank-3 tensor.
    Tensor3(Tensor3D),
    /// A rank-4 tensor.
    Tensor4(Tensor4D),
    /// An id lookup found nothing.
    Missing,
    /// An id lookup found an element that is not media.
    NonMedia {
        /// The tag of the element that was found.
        tag: String,
    },
    /// A deferred value produced something that is still not concrete.
    Unsettled {
        /// What the deferred value produced.
        kind: &'static str,
    },
}

impl Resolved {
    /// Describes the value for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Resolved::Media(media) => format!("{} element", media.kind()),
            Resolved::Tensor3(_) => "rank-3 tensor".to_string(),
            Resolved::Tensor4(_) => "rank-4 tensor".to_string(),
            Resolved::Missing => "nothing".to_string(),
            Resolved::NonMedia { tag } => format!("<{tag}> element"),
            Resolved::Unsettled { kind } => (*kind).to_string(),
        }
    }

    /// Takes a value produced by a deferred input.
    ///
    /// Deferred values are not resolved a second time: an id or another
    /// deferred value stays unsettled.
    pub fn from_settled(input: NetInput) -> Self {
        match input {
            NetInput::Media(media) => Resolved::Media(media),
            NetInput::Tensor3(tensor) => Resolved::Tensor3(tensor),
            NetInput::Tensor4(tensor) => Resolved::Tensor4(tensor),
            other @ (NetInput::ElementId(_) | NetInput::Pending(_)) => Resolved::Unsettled {
                kind: other.kind_name(),
            },
        }
    }
}

/// The outcome of resolving one slot: a value now, or one to await.
#[derive(Debug)]
pub enum Resolution {
    /// The slot resolved synchronously.
    Ready(Resolved),
    /// The slot holds a deferred value.
    Pending(PendingInput),
}

impl Resolution {
    /// Awaits a deferred value; ready values complete immediately.
    pub async fn settle(self) -> Result<Resolved, BoxError> {
        match self {
            Resolution::Ready(resolved) => Ok(resolved),
            Resolution::Pending(pending) => pending.settle().await.map(Resolved::from_settled),
        }
    }

    /// Returns true if the slot must be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending(_))
    }
}

/// Resolves raw inputs against an element lookup.
#[derive(Clone)]
pub struct MediaResolver {
    lookup: Arc<dyn ElementLookup>,
}

impl std::fmt::Debug for MediaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResolver").finish_non_exhaustive()
    }
}

impl MediaResolver {
    /// Creates a resolver that looks ids up in `lookup`.
    pub fn new(lookup: Arc<dyn ElementLookup>) -> Self {
        Self { lookup }
    }

    /// Resolves one input.
    pub fn resolve(&self, input: NetInput) -> Resolution {
        match input {
            NetInput::Media(media) => Resolution::Ready(Resolved::Media(media)),
            NetInput::Tensor3(tensor) => Resolution::Ready(Resolved::Tensor3(tensor)),
            NetInput::Tensor4(tensor) => Resolution::Ready(Resolved::Tensor4(tensor)),
            NetInput::ElementId(id) => Resolution::Ready(match self.lookup.element_by_id(&id) {
                Some(Element::Media(media)) => Resolved::Media(media),
                Some(Element::Other { tag }) => Resolved::NonMedia { tag },
                None => Resolved::Missing,
            }),
            NetInput::Pending(pending) => Resolution::Pending(pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, LoadableMedia};
    use image::RgbImage;

    fn resolver() -> MediaResolver {
        let document = Document::new()
            .with_element(
                "img",
                LoadableMedia::from_image(RgbImage::new(1, 1)).into_handle(),
            )
            .with_element("box", Element::other("div"));
        MediaResolver::new(Arc::new(document))
    }

    #[test]
    fn test_tensors_pass_through() {
        let resolution = resolver().resolve(NetInput::from(Tensor3D::from_elem((1, 1, 3), 4.0)));
        match resolution {
            Resolution::Ready(Resolved::Tensor3(t)) => assert_eq!(t[[0, 0, 2]], 4.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_id_lookup() {
        let resolver = resolver();
        assert!(matches!(
            resolver.resolve("img".into()),
            Resolution::Ready(Resolved::Media(_))
        ));
        assert!(matches!(
            resolver.resolve("box".into()),
            Resolution::Ready(Resolved::NonMedia { ref tag }) if tag == "div"
        ));
        assert!(matches!(
            resolver.resolve("nope".into()),
            Resolution::Ready(Resolved::Missing)
        ));
    }

    #[tokio::test]
    async fn test_pending_is_not_resolved_twice() {
        let resolution = resolver().resolve(NetInput::pending(async { Ok(NetInput::from("img")) }));
        assert!(resolution.is_pending());

        let settled = resolution.settle().await.unwrap();
        assert!(matches!(settled, Resolved::Unsettled { kind: "element id" }));
        assert_eq!(settled.describe(), "element id");
    }
}

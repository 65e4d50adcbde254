//! The ambient document that string element ids are looked up in.

use super::media::MediaHandle;
use std::collections::HashMap;

/// An element found in a document.
#[derive(Debug, Clone)]
pub enum Element {
    /// An image, video or canvas element.
    Media(MediaHandle),
    /// Any other element, identified by its tag name.
    Other {
        /// The tag name, e.g. `div`.
        tag: String,
    },
}

impl Element {
    /// Creates a non-media element with the given tag name.
    pub fn other(tag: impl Into<String>) -> Self {
        Self::Other { tag: tag.into() }
    }
}

impl From<MediaHandle> for Element {
    fn from(media: MediaHandle) -> Self {
        Self::Media(media)
    }
}

/// Looks up elements by id.
pub trait ElementLookup: Send + Sync {
    /// Returns the element registered under `id`, if any.
    fn element_by_id(&self, id: &str) -> Option<Element>;
}

/// An in-memory element registry keyed by id.
///
/// # Examples
///
/// ```
/// use image::RgbImage;
/// use netinput::domain::{Document, Element, ElementLookup, LoadableMedia};
///
/// let document = Document::new()
///     .with_element("photo", LoadableMedia::from_image(RgbImage::new(1, 1)).into_handle())
///     .with_element("caption", Element::other("p"));
///
/// assert!(matches!(document.element_by_id("photo"), Some(Element::Media(_))));
/// assert!(document.element_by_id("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element and returns the document, for chained construction.
    pub fn with_element(mut self, id: impl Into<String>, element: impl Into<Element>) -> Self {
        self.insert(id, element);
        self
    }

    /// Registers an element under `id`, returning the element it replaced.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        element: impl Into<Element>,
    ) -> Option<Element> {
        self.elements.insert(id.into(), element.into())
    }

    /// Removes the element registered under `id`.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    /// Returns the number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no elements are registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ElementLookup for Document {
    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.elements.get(id).cloned()
    }
}

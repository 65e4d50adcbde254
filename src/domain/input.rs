//! Raw inputs accepted by the pipeline.
//!
//! A caller may hand over a media element, a tensor, the id of an element in
//! the ambient document, or a deferred value that produces one of those
//! later. [`InputArg`] records whether a single input or an array was passed.

use super::batch::CanonicalBatch;
use super::media::MediaHandle;
use crate::core::{BoxError, Tensor3D, Tensor4D};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// A single input as supplied by the caller.
#[derive(Debug)]
pub enum NetInput {
    /// An image, video or canvas element.
    Media(MediaHandle),
    /// A `height x width x channels` tensor.
    Tensor3(Tensor3D),
    /// A `batch x height x width x channels` tensor.
    Tensor4(Tensor4D),
    /// The id of an element in the ambient document.
    ElementId(String),
    /// A value that is not available yet.
    Pending(PendingInput),
}

impl NetInput {
    /// Creates a deferred input from a future.
    ///
    /// # Examples
    ///
    /// ```
    /// use netinput::core::Tensor3D;
    /// use netinput::domain::NetInput;
    ///
    /// let input = NetInput::pending(async { Ok(NetInput::from(Tensor3D::zeros((1, 1, 3)))) });
    /// assert_eq!(input.kind_name(), "pending value");
    /// ```
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<NetInput, BoxError>> + Send + 'static,
    {
        Self::Pending(PendingInput::new(future))
    }

    /// Creates an element id input.
    pub fn element_id(id: impl Into<String>) -> Self {
        Self::ElementId(id.into())
    }

    /// A short human readable name for the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NetInput::Media(_) => "media element",
            NetInput::Tensor3(_) => "rank-3 tensor",
            NetInput::Tensor4(_) => "rank-4 tensor",
            NetInput::ElementId(_) => "element id",
            NetInput::Pending(_) => "pending value",
        }
    }
}

impl From<MediaHandle> for NetInput {
    fn from(media: MediaHandle) -> Self {
        Self::Media(media)
    }
}

impl From<Tensor3D> for NetInput {
    fn from(tensor: Tensor3D) -> Self {
        Self::Tensor3(tensor)
    }
}

impl From<Tensor4D> for NetInput {
    fn from(tensor: Tensor4D) -> Self {
        Self::Tensor4(tensor)
    }
}

impl From<&str> for NetInput {
    fn from(id: &str) -> Self {
        Self::ElementId(id.to_string())
    }
}

impl From<String> for NetInput {
    fn from(id: String) -> Self {
        Self::ElementId(id)
    }
}

/// A deferred input.
///
/// The future is driven only when a canonicalization call awaits it.
pub struct PendingInput(BoxFuture<'static, Result<NetInput, BoxError>>);

impl PendingInput {
    /// Boxes a future producing an input.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<NetInput, BoxError>> + Send + 'static,
    {
        Self(Box::pin(future))
    }

    /// Waits for the deferred value.
    pub async fn settle(self) -> Result<NetInput, BoxError> {
        self.0.await
    }
}

impl fmt::Debug for PendingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PendingInput(..)")
    }
}

/// The argument of a canonicalization call.
#[derive(Debug)]
pub enum InputArg {
    /// One input; results are returned unwrapped.
    Single(NetInput),
    /// An array of inputs; results are returned as an array.
    Many(Vec<NetInput>),
    /// A batch that was canonicalized before; passed through unchanged.
    Canonical(CanonicalBatch),
}

impl InputArg {
    /// Returns true when the caller passed an array.
    pub fn is_batch_input(&self) -> bool {
        match self {
            InputArg::Single(_) => false,
            InputArg::Many(_) => true,
            InputArg::Canonical(batch) => batch.is_batch_input(),
        }
    }
}

impl From<NetInput> for InputArg {
    fn from(input: NetInput) -> Self {
        Self::Single(input)
    }
}

impl From<Vec<NetInput>> for InputArg {
    fn from(inputs: Vec<NetInput>) -> Self {
        Self::Many(inputs)
    }
}

impl From<CanonicalBatch> for InputArg {
    fn from(batch: CanonicalBatch) -> Self {
        Self::Canonical(batch)
    }
}

impl From<MediaHandle> for InputArg {
    fn from(media: MediaHandle) -> Self {
        Self::Single(media.into())
    }
}

impl From<Tensor3D> for InputArg {
    fn from(tensor: Tensor3D) -> Self {
        Self::Single(tensor.into())
    }
}

impl From<Tensor4D> for InputArg {
    fn from(tensor: Tensor4D) -> Self {
        Self::Single(tensor.into())
    }
}

impl From<&str> for InputArg {
    fn from(id: &str) -> Self {
        Self::Single(id.into())
    }
}

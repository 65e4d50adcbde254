//! Error types for the input pipeline.
//!
//! This module defines the errors that can occur while canonicalizing inputs,
//! converting them to tensors, and loading model weights. Errors that concern
//! one input position carry an [`InputPosition`] so that messages name the
//! offending index only when the caller passed an array.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::ConfigError;

/// A boxed error raised by a collaborator, such as a deferred input.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The position of an input within a canonicalization call.
///
/// Renders as `"at input index N: "` for array calls and as nothing for
/// single-item calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputPosition(Option<usize>);

impl InputPosition {
    /// Creates the position of `index`, keeping it only for array calls.
    pub fn new(index: usize, is_batch_input: bool) -> Self {
        Self(is_batch_input.then_some(index))
    }

    /// Returns the index, or `None` for a single-item call.
    pub fn index(&self) -> Option<usize> {
        self.0
    }
}

impl fmt::Display for InputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "at input index {index}: "),
            None => Ok(()),
        }
    }
}

/// Errors reported by a media element while it loads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaLoadError {
    /// The media source reported a failure.
    #[error("media failed to load: {message}")]
    Failed {
        /// The reason reported by the source.
        message: String,
    },

    /// The loader went away before the media finished loading.
    #[error("media loader was dropped before loading finished")]
    Abandoned,
}

/// Enum representing the errors that can occur in the input pipeline.
#[derive(Error, Debug)]
pub enum NetInputError {
    /// The call supplied an empty array.
    #[error("empty array passed as input")]
    EmptyInput,

    /// A string id did not resolve to a media element.
    #[error("{position}string passed, but could not resolve a media element for element id '{id}'")]
    UnresolvedIdentifier {
        /// Where the id appeared.
        position: InputPosition,
        /// The id that failed to resolve.
        id: String,
    },

    /// A settled value is neither media nor a rank-3 / rank-4 tensor.
    #[error(
        "{position}expected media to be an image, video or canvas element, a rank-3 tensor, or an element id; got {found}"
    )]
    UnsupportedInputType {
        /// Where the value appeared.
        position: InputPosition,
        /// A short description of what was found instead.
        found: String,
    },

    /// A rank-4 tensor with a batch dimension other than 1.
    #[error("{position}rank-4 tensor with batch size {batch_size} passed, but not supported in input array")]
    UnsupportedBatchSize {
        /// Where the tensor appeared.
        position: InputPosition,
        /// The leading dimension of the tensor.
        batch_size: usize,
    },

    /// A deferred input failed to produce a value.
    #[error("{position}deferred input failed")]
    PendingInput {
        /// Where the deferred input appeared.
        position: InputPosition,
        /// The failure reported by the deferred input.
        #[source]
        source: BoxError,
    },

    /// A media element failed while readiness was awaited.
    #[error("{position}media element did not become ready")]
    MediaLoad {
        /// Where the media appeared.
        position: InputPosition,
        /// The load failure.
        #[source]
        source: MediaLoadError,
    },

    /// A media element did not become ready within the configured timeout.
    #[error("{position}media element not ready after {timeout:?}")]
    MediaTimeout {
        /// Where the media appeared.
        position: InputPosition,
        /// The configured readiness timeout.
        timeout: Duration,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration")]
    Config(#[from] ConfigError),

    /// Error occurred while decoding an image.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// A weight manifest or shard could not be fetched.
    #[error("failed to fetch '{uri}'")]
    Fetch {
        /// The uri that was requested.
        uri: String,
        /// The underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A weight manifest could not be parsed.
    #[error("invalid weights manifest '{uri}'")]
    Manifest {
        /// The uri of the manifest.
        uri: String,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Weight data does not match its manifest entry.
    #[error("weight '{name}': {message}")]
    WeightData {
        /// The weight name from the manifest.
        name: String,
        /// What was wrong with the data.
        message: String,
    },
}

impl NetInputError {
    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for a weight whose data does not match the manifest.
    pub fn weight_data(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WeightData {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the input index this error refers to.
    ///
    /// `None` for errors that are not tied to a position, and for positional
    /// errors raised by a single-item call.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnresolvedIdentifier { position, .. }
            | Self::UnsupportedInputType { position, .. }
            | Self::UnsupportedBatchSize { position, .. }
            | Self::PendingInput { position, .. }
            | Self::MediaLoad { position, .. }
            | Self::MediaTimeout { position, .. } => position.index(),
            _ => None,
        }
    }
}

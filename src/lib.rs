//! # netinput
//!
//! Input canonicalization for neural network inference over images.
//!
//! Callers hand a network whatever they have at hand: decoded images, image
//! tensors, element ids to look up, or values that are still being produced.
//! This crate turns any of these into a canonical, ordered batch whose media
//! has finished loading, and reports precisely which position was at fault
//! when it cannot.
//!
//! ## Features
//!
//! - Single inputs or arrays of mixed inputs, with the call shape preserved
//! - Element ids resolved against a pluggable registry
//! - Pending inputs and media loads awaited concurrently, order preserved
//! - Position-aware error messages
//! - Batch tensor assembly and `(x - 127.5) / 128` normalization
//! - Loading named weight tensors from a sharded weights manifest
//!
//! ## Modules
//!
//! * [`core`] - Tensor aliases, configuration, constants and error handling
//! * [`domain`] - Inputs, media elements, documents and canonical batches
//! * [`pipeline`] - Resolution, readiness and canonicalization
//! * [`processors`] - Normalization
//! * [`utils`] - Image decoding and tensor helpers
//! * [`weights`] - Weights manifests and loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netinput::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), NetInputError> {
//! let document = Document::new()
//!     .with_element("portrait", LoadableMedia::open("portrait.jpg").into_handle());
//!
//! let batch = to_net_input(
//!     vec![NetInput::element_id("portrait"), NetInput::from(Tensor3D::zeros((160, 160, 3)))],
//!     Arc::new(document),
//! )
//! .await?;
//!
//! let input = normalize(&batch.to_batch_tensor()?);
//! assert_eq!(input.shape()[0], 2);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;
pub mod weights;

/// Prelude module for convenient imports.
///
/// ```rust
/// use netinput::prelude::*;
/// ```
///
/// Includes the canonicalization entry points, the input and batch types,
/// the error type and the normalization step. Weights loading and the
/// lower level pipeline pieces are imported from their modules.
pub mod prelude {
    pub use crate::core::{NetInputError, Tensor3D, Tensor4D};
    pub use crate::domain::{
        BatchOutput, CanonicalBatch, CanonicalItem, Document, InputArg, LoadableMedia,
        MediaHandle, MediaKind, NetInput,
    };
    pub use crate::pipeline::{InputCanonicalizer, to_net_input};
    pub use crate::processors::normalize;
}

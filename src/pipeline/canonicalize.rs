//! Input canonicalization.
//!
//! [`InputCanonicalizer::canonicalize`] turns whatever the caller passed into a
//! [`CanonicalBatch`]:
//!
//! 1. A single input is wrapped into a one-element array, remembering the
//!    call shape. An empty array is rejected.
//! 2. Every position is resolved; deferred positions are awaited
//!    concurrently and written back by index.
//! 3. Positions are validated in order: media or a rank-3 / rank-4 tensor,
//!    and rank-4 tensors must have a batch size of 1.
//! 4. All media positions are awaited concurrently until loaded.
//!
//! Any failure aborts the whole call; no partial batch is returned.

use super::readiness::readiness;
use super::resolve::{MediaResolver, Resolved};
use crate::core::config::{CanonicalizeConfig, ConfigValidator};
use crate::core::{BoxError, InputPosition, NetInputError};
use crate::domain::{CanonicalBatch, CanonicalItem, Document, ElementLookup, InputArg, NetInput};
use futures::future::{join_all, try_join_all};
use futures::FutureExt;
use std::sync::Arc;

/// What the caller originally put into a position, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    ElementId(String),
    Value,
}

impl Origin {
    fn of(input: &NetInput) -> Self {
        match input {
            NetInput::ElementId(id) => Origin::ElementId(id.clone()),
            _ => Origin::Value,
        }
    }
}

/// Produces canonical batches from raw inputs.
///
/// # Examples
///
/// ```
/// use netinput::core::{Tensor3D, Tensor4D};
/// use netinput::domain::NetInput;
/// use netinput::pipeline::InputCanonicalizer;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let canonicalizer = InputCanonicalizer::default();
/// let batch = canonicalizer
///     .canonicalize(vec![
///         NetInput::from(Tensor3D::zeros((4, 4, 3))),
///         NetInput::from(Tensor4D::zeros((1, 4, 4, 3))),
///     ])
///     .await
///     .unwrap();
///
/// assert_eq!(batch.len(), 2);
/// assert!(batch.is_batch_input());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InputCanonicalizer {
    resolver: MediaResolver,
    config: CanonicalizeConfig,
}

impl Default for InputCanonicalizer {
    fn default() -> Self {
        Self::new(Arc::new(Document::new()))
    }
}

impl InputCanonicalizer {
    /// Creates a canonicalizer that resolves element ids through `lookup`.
    pub fn new(lookup: Arc<dyn ElementLookup>) -> Self {
        Self {
            resolver: MediaResolver::new(lookup),
            config: CanonicalizeConfig::default(),
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: CanonicalizeConfig) -> Result<Self, NetInputError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CanonicalizeConfig {
        &self.config
    }

    /// Canonicalizes a single input or an array of inputs.
    ///
    /// A batch that is already canonical is returned unchanged.
    ///
    /// # Errors
    ///
    /// * `EmptyInput` - an empty array was passed.
    /// * `PendingInput` - a deferred input failed.
    /// * `UnresolvedIdentifier` - an element id did not name a media element.
    /// * `UnsupportedInputType` - a value is neither media nor tensor.
    /// * `UnsupportedBatchSize` - a rank-4 tensor has a batch size other than 1.
    /// * `MediaLoad` / `MediaTimeout` - a media element did not become ready.
    ///
    /// Positional errors name the input index only when an array was passed.
    /// Validation errors report the lowest failing index; readiness errors
    /// report the first media element to fail.
    pub async fn canonicalize(
        &self,
        inputs: impl Into<InputArg>,
    ) -> Result<CanonicalBatch, NetInputError> {
        let (inputs, is_batch_input) = match inputs.into() {
            InputArg::Canonical(batch) => return Ok(batch),
            InputArg::Single(input) => (vec![input], false),
            InputArg::Many(inputs) => (inputs, true),
        };

        let result = self.canonicalize_inputs(inputs, is_batch_input).await;
        if let Err(err) = &result {
            tracing::warn!("canonicalization failed: {}", err);
        }
        result
    }

    async fn canonicalize_inputs(
        &self,
        inputs: Vec<NetInput>,
        is_batch_input: bool,
    ) -> Result<CanonicalBatch, NetInputError> {
        if inputs.is_empty() {
            return Err(NetInputError::EmptyInput);
        }
        tracing::debug!(
            "canonicalizing {} input(s), batch input: {}",
            inputs.len(),
            is_batch_input
        );

        let origins: Vec<Origin> = inputs.iter().map(Origin::of).collect();
        let resolutions: Vec<_> = inputs
            .into_iter()
            .map(|input| self.resolver.resolve(input))
            .collect();

        let pending = resolutions.iter().filter(|r| r.is_pending()).count();
        if pending > 0 {
            tracing::debug!("awaiting {} deferred input(s)", pending);
        }

        // join_all yields results in input order, whatever order they settle in
        let settled: Vec<Result<Resolved, BoxError>> =
            join_all(resolutions.into_iter().map(|r| r.settle())).await;

        let items = settled
            .into_iter()
            .zip(&origins)
            .enumerate()
            .map(|(index, (slot, origin))| {
                let position = InputPosition::new(index, is_batch_input);
                let resolved =
                    slot.map_err(|source| NetInputError::PendingInput { position, source })?;
                validate(resolved, origin, position)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.await_readiness(&items, is_batch_input).await?;

        Ok(CanonicalBatch::new(items, is_batch_input))
    }

    /// Waits for every media position at once.
    ///
    /// Fails as soon as any position fails, so when several media elements
    /// fail the reported position is the first to fail, not the lowest.
    async fn await_readiness(
        &self,
        items: &[CanonicalItem],
        is_batch_input: bool,
    ) -> Result<(), NetInputError> {
        let media = items
            .iter()
            .filter(|item| matches!(item, CanonicalItem::Media(_)))
            .count();
        if media == 0 {
            return Ok(());
        }
        tracing::debug!("awaiting {} media element(s)", media);

        let timeout = self.config.readiness_timeout();
        let waits = items.iter().enumerate().map(|(index, item)| {
            let position = InputPosition::new(index, is_batch_input);
            let ready = readiness(item);
            async move {
                let outcome = match timeout {
                    Some(timeout) => tokio::time::timeout(timeout, ready)
                        .await
                        .map_err(|_| NetInputError::MediaTimeout { position, timeout })?,
                    None => ready.await,
                };
                outcome.map_err(|source| NetInputError::MediaLoad { position, source })
            }
            .boxed()
        });

        try_join_all(waits).await.map(|_| ())
    }
}

/// Checks one settled slot and converts it to a canonical item.
fn validate(
    resolved: Resolved,
    origin: &Origin,
    position: InputPosition,
) -> Result<CanonicalItem, NetInputError> {
    match resolved {
        Resolved::Media(media) => Ok(CanonicalItem::Media(media)),
        Resolved::Tensor3(tensor) => Ok(CanonicalItem::Tensor3(tensor)),
        Resolved::Tensor4(tensor) => {
            let batch_size = tensor.shape()[0];
            if batch_size != 1 {
                return Err(NetInputError::UnsupportedBatchSize {
                    position,
                    batch_size,
                });
            }
            Ok(CanonicalItem::Tensor4(tensor))
        }
        other => match origin {
            Origin::ElementId(id) => Err(NetInputError::UnresolvedIdentifier {
                position,
                id: id.clone(),
            }),
            Origin::Value => Err(NetInputError::UnsupportedInputType {
                position,
                found: other.describe(),
            }),
        },
    }
}

/// Canonicalizes `inputs`, resolving element ids through `lookup`.
///
/// Shorthand for [`InputCanonicalizer::canonicalize`] with the default
/// configuration.
pub async fn to_net_input(
    inputs: impl Into<InputArg>,
    lookup: Arc<dyn ElementLookup>,
) -> Result<CanonicalBatch, NetInputError> {
    InputCanonicalizer::new(lookup).canonicalize(inputs).await
}

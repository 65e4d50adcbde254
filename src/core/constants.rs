//! Constants used throughout the input pipeline.
//!
//! This module defines the fixed parameters of the input normalization,
//! the parallelism thresholds used when converting batches, and naming
//! conventions for weight manifests.

/// The value subtracted from every element by the default normalization.
///
/// Maps the center of the `[0, 255]` pixel range onto zero.
pub const NORMALIZE_OFFSET: f32 = 127.5;

/// The factor applied after the offset by the default normalization (1/128).
pub const NORMALIZE_SCALE: f32 = 0.0078125;

/// The default threshold for parallel processing.
///
/// Batches with more items than this are converted to tensors on the
/// rayon thread pool; smaller ones are converted sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// Element count above which normalization runs on the rayon thread pool.
pub const PARALLEL_ELEMENT_THRESHOLD: usize = 1 << 20;

/// Suffix appended to a model name to form its default manifest file name.
pub const WEIGHTS_MANIFEST_SUFFIX: &str = "-weights_manifest.json";

/// The maximum number of elements a stacked tensor may hold.
pub const MAX_TENSOR_SIZE: usize = 1_000_000_000;

//! Model weights loading.
//!
//! * [`uris`] - manifest and shard locations for a model
//! * [`manifest`] - the JSON manifest format
//! * [`loader`] - fetching shards and decoding named tensors

pub mod loader;
pub mod manifest;
pub mod uris;

pub use loader::{
    FileFetcher, NamedTensorMap, WeightFetcher, WeightTensor, fetch_manifest, load_weight_map,
    load_weights,
};
pub use manifest::{
    Quantization, QuantizationDtype, WeightDtype, WeightEntry, WeightsGroup, WeightsManifest,
};
pub use uris::ModelUris;

//! The input canonicalization pipeline.
//!
//! * [`resolve`] - maps each raw input to a value or a deferred value
//! * [`readiness`] - waits for media elements to finish loading
//! * [`canonicalize`] - orchestrates both into a [`CanonicalBatch`](crate::domain::CanonicalBatch)

pub mod canonicalize;
pub mod readiness;
pub mod resolve;

pub use canonicalize::{InputCanonicalizer, to_net_input};
pub use readiness::{await_media_loaded, readiness};
pub use resolve::{MediaResolver, Resolution, Resolved};

//! Domain types for the input pipeline.
//!
//! * [`input`] - raw inputs as supplied by callers
//! * [`media`] - media elements and their load state
//! * [`document`] - the element registry that ids resolve against
//! * [`batch`] - the canonical batch handed to the network

pub mod batch;
pub mod document;
pub mod input;
pub mod media;

pub use batch::{BatchOutput, CanonicalBatch, CanonicalItem};
pub use document::{Document, Element, ElementLookup};
pub use input::{InputArg, NetInput, PendingInput};
pub use media::{LoadableMedia, MediaElement, MediaHandle, MediaKind, MediaLoader};

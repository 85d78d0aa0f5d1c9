//! Client code for reel.
//!
//! This crate provides the two search backends (the rated-title index with
//! multi-host failover and the metadata API), their merge, and the
//! orchestrator that turns keystrokes into supersede-safe result sets.

pub mod debounce;
pub mod error;
pub mod hosts;
pub mod index;
pub mod merge;
pub mod metadata;
pub mod normalize;
pub mod orchestrator;
pub mod source;

pub use debounce::Debouncer;
pub use error::BackendError;
pub use hosts::{HostRotator, HostSlot};
pub use index::{IndexClient, IndexConfig};
pub use merge::merge_hits;
pub use metadata::{MetadataClient, MetadataConfig};
pub use orchestrator::{HitSource, Published, SearchError, SearchOrchestrator, SearchOutcome};
pub use source::{RatedTitleSource, UnratedTitleSource};

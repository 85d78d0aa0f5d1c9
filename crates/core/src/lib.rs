//! Core types and shared functionality for reel.
//!
//! This crate provides:
//! - Search data model (queries, rated and unrated hits)
//! - Bounded result cache
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheStats, ResultCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{MediaType, Query, RatedTitle, SearchHit, UnratedTitle};

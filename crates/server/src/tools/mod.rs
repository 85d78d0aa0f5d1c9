//! MCP tool implementations.
//!
//! This module contains all tools exposed by the reel server.

pub mod cache;
pub mod search;

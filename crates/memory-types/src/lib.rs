//! Core types for the local memory HTTP API.
//!
//! DTOs serialize to the exact JSON the service expects; `MemoryApi` is the
//! seam between callers and the HTTP transport.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;

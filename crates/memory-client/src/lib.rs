//! HTTP client for the local memory service.

mod http;
#[cfg(feature = "test-util")]
pub mod mock;

pub use http::{MemoryClient, DEFAULT_BASE_URL};
pub use memory_types::{EntityInput, MemoryApi, MemoryApiError, ObservationInput};

#[cfg(feature = "test-util")]
pub use mock::{MockMemoryApi, RecordedCall};

//! Shared building blocks for backend services: a MongoDB access facade,
//! paging/sorting request handling, a uniform error-response envelope,
//! requester-identity extraction and build metadata.

pub mod auth;
pub mod config;
pub mod errors;
pub mod pagination;
pub mod response;
pub mod store;
pub mod swagger;
pub mod version;

pub use config::Config;
pub use errors::StoreError;
pub use pagination::{PageInfo, PageRequest};
pub use store::DocumentStore;

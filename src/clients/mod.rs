/// HTTP client for the catalog API
pub mod catalog;
/// Song and playlist entities plus request/response payloads
pub mod entities;
/// Error types and result aliases
pub mod errors;

pub use catalog::{CatalogClient, CatalogResponse};

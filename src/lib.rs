//! Catalog checker - contract checks for a songs and playlists REST API
//!
//! This library drives a running catalog service through a fixed sequence of
//! create/read/update/delete calls and stops at the first response that breaks
//! the expected status code or payload shape.

/// Sequential contract checks and their configuration
pub mod checker;
/// Client modules for talking to the catalog service
pub mod clients;

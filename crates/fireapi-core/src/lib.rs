//! # fireapi-core
//!
//! Core types and request plumbing for the 24Fire KVM REST API.
//!
//! This crate holds everything the async and blocking clients share: how an
//! operation becomes an HTTP request, how a response becomes a value or an
//! error, and how the transport is configured.
//!
//! ## Modules
//!
//! - [`error`] - Error type and HTTP status mapping
//! - [`config`] - API key, endpoint and timeout configuration
//! - [`client`] - `reqwest` client construction and default headers
//! - [`operation`] - The fixed operation table and request construction
//! - [`response`] - Response decoding and remote message extraction
//! - [`query`] - Query-string helper
//! - [`ids`] - Typed backup and request identifiers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod operation;
pub mod query;
pub mod response;

// Re-export commonly used types
pub use config::FireConfig;
pub use error::{Error, Result};
pub use operation::{ApiRequest, Operation};

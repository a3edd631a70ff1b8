//! Todo Service Library
//!
//! Serves login, user listing and todo CRUD over gRPC. Every call passes
//! through the access gate; only login is callable without a token.
//!
//! ## Modules
//!
//! - `config`: Service configuration
//! - `db`: Repository traits and their Postgres implementations
//! - `error`: Error types
//! - `grpc`: gRPC service implementations
//! - `models`: Data models
//! - `security`: Password hashing
//! - `services`: Login flow and the credential verifier contract
//! - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod models;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use error::{Result, ServiceError};
pub use grpc::{AuthServiceHandler, TodoServiceHandler, UserServiceHandler, LOGIN_METHOD};
pub use services::LoginFlow;

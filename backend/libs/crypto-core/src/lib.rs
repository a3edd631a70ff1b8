//! Token primitives for the todo backend
//!
//! - **jwt**: HS256 token codec keyed by a shared secret

pub mod jwt;

pub use jwt::{Claims, TokenCodec, TokenError, VerifiedToken};

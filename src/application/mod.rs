//! Application layer containing the authorization orchestration.
//!
//! This module defines the `Authorizer`, the entry point for authorizing
//! transactions, and the merchant category resolver it consults first.

pub mod authorizer;
pub mod resolver;

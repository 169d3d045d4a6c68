// Postbox Engine
// The store itself plus the GraphQL layer that reads it through a client

//! # Postbox Engine Module
//!
//! ## Engine Components
//!
//! ### Store (`store` module)
//! - Owns the user and message collections
//! - Enforces username uniqueness and sender/recipient existence
//! - Serializes every mutation behind one write lock
//!
//! ### Store Client (`client` module)
//! - The `StoreClient` trait the GraphQL resolvers depend on
//! - `RestStoreClient`, which reaches the store over HTTP
//! - An in-process implementation for `SharedStore`
//!
//! ### GraphQL Engine (`graphql` module)
//! - Schema, query and mutation roots
//! - Field resolvers that fan out one store call per related field

pub mod client;
pub mod graphql;
pub mod store;


pub use client::{GatewayError, GatewayResult, RestStoreClient, StoreClient};
pub use graphql::{create_schema, create_schema_with_client, PostboxSchema};
pub use store::{SharedStore, Store};

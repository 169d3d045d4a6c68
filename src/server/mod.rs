// Postbox Server Implementations
// Network-facing wrapper around the GraphQL gateway

//! # Postbox Server Module
//!
//! The server layer puts the GraphQL schema on the network:
//! ```text
//! Client (GraphiQL, any GraphQL client)
//!        ↓ HTTP/GraphQL
//! Server Layer (this module) ← routes, CORS, GraphiQL page
//!        ↓ schema execution
//! Engine Layer ← resolvers, StoreClient
//!        ↓ HTTP/JSON
//! REST store
//! ```
//!
//! The REST store has its own server in the `api` module.

/// GraphQL HTTP server implementation
pub mod graphql;

pub use graphql::{GraphQLServer, GraphQLServerBuilder, GraphQLServerConfig};

// Postbox - users and messages over REST, re-exposed through GraphQL

//! # Postbox Library
//!
//! Postbox is two small HTTP services that share one data model:
//!
//! - a **REST store** (`api` module) that owns an in-memory dataset of
//!   [`User`]s and [`Message`]s and enforces username uniqueness and
//!   sender/recipient existence;
//! - a **GraphQL gateway** (`server` module) that answers queries by calling
//!   back into the REST store over HTTP, one request per resolved field.
//!
//! ## Layout
//!
//! ```text
//! GraphQL client
//!        ↓ HTTP/GraphQL
//! server::graphql  ← GraphiQL, /graphql endpoint
//!        ↓ resolvers
//! engine::graphql  ← Query / Mutation / field resolvers
//!        ↓ StoreClient trait
//! engine::client   ← RestStoreClient (reqwest) or SharedStore (in-process)
//!        ↓ HTTP/JSON
//! api              ← REST routes and handlers
//!        ↓ function calls
//! engine::store    ← the Store itself
//! ```
//!
//! The gateway never touches the store's memory; every read and write it
//! performs goes through the [`StoreClient`] seam.

pub mod models;

pub mod engine;

pub mod api;

pub mod server;

pub use models::{Message, MessageInput, User, UserInput};

pub use engine::{
    client::{RestStoreClient, StoreClient},
    graphql::{create_schema, create_schema_with_client, MessageGQL, PostboxSchema, UserGQL},
    store::{SharedStore, Store},
};

pub use api::{RestServer, RestServerBuilder, RestServerConfig};

pub use server::graphql::{GraphQLServer, GraphQLServerBuilder, GraphQLServerConfig};

use thiserror::Error;

/// Errors raised by the store's operations
///
/// Each variant corresponds to one failure of the store's contract. The
/// `Display` text is what the REST layer sends back as a plain-text body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostboxError {
    /// A required request field was absent or empty
    #[error("Missed arguments")]
    Validation,

    /// The username is already taken by another user
    #[error("Username already in use")]
    Conflict { username: String },

    /// No user or message carries the requested id
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Option<i64> },

    /// The message's `from` does not resolve to a user
    #[error("Sender not found")]
    SenderNotFound { id: i64 },

    /// The message's `to` does not resolve to a user
    #[error("Recipient not found")]
    RecipientNotFound { id: i64 },

    /// The operation exists but does nothing
    #[error("Not Implemented")]
    NotImplemented,
}

impl PostboxError {
    pub fn user_not_found(id: Option<i64>) -> Self {
        PostboxError::NotFound { entity: "User", id }
    }

    pub fn message_not_found(id: Option<i64>) -> Self {
        PostboxError::NotFound { entity: "Message", id }
    }
}

/// Type alias for Results that use the store's error type
pub type Result<T> = std::result::Result<T, PostboxError>;

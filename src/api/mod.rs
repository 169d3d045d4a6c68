// REST API module
// This module serves the store over plain HTTP + JSON

pub mod handlers;
pub mod types;

#[cfg(test)]
mod handlers_tests;

use std::net::SocketAddr;

use anyhow::Context as _;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::engine::store::{SharedStore, Store};
use handlers::{
    create_message, create_user, delete_user, get_message, get_user, index, list_messages,
    list_users, not_found, patch_user, replace_user, user_messages,
};

/// REST server configuration
#[derive(Clone, Debug)]
pub struct RestServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_enabled: bool,
    /// Start with the demo users and messages loaded
    pub seed: bool,
}

impl Default for RestServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_enabled: true,
            seed: true,
        }
    }
}

/// REST server around one store
pub struct RestServer {
    config: RestServerConfig,
    store: SharedStore,
}

impl RestServer {
    /// Create a new REST server; the store is seeded if the config asks for it
    pub fn new(config: RestServerConfig) -> Self {
        let store = if config.seed {
            Store::seeded()
        } else {
            Store::new()
        };
        Self {
            config,
            store: store.shared(),
        }
    }

    /// Create server with default configuration
    pub fn with_defaults() -> Self {
        Self::new(RestServerConfig::default())
    }

    /// Serve an existing store instead of the one built from the config
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Create the Axum router with every store route
    pub fn create_router(&self) -> Router {
        let api_router = create_router(self.store.clone());

        if self.config.cors_enabled {
            api_router.layer(CorsLayer::permissive())
        } else {
            api_router
        }
    }

    /// Run the server
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.create_router();
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| {
                format!("invalid listen address {}:{}", self.config.host, self.config.port)
            })?;

        info!("📬 Postbox REST store listening at http://{}", addr);
        info!("🔗 API endpoints:");
        info!("   GET|POST               http://{}/users", addr);
        info!("   GET|PUT|PATCH|DELETE   http://{}/users/:id", addr);
        info!("   GET                    http://{}/users/:id/messages", addr);
        info!("   GET|POST               http://{}/messages", addr);
        info!("   GET                    http://{}/messages/:id", addr);
        info!("📋 Configuration:");
        info!("   CORS enabled: {}", self.config.cors_enabled);
        info!("   Seed data: {}", self.config.seed);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .context("REST server failed")?;

        Ok(())
    }
}

/// The route table: (method, path) to handler
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .route("/users/:id/messages", get(user_messages))
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/:id", get(get_message))
        .fallback(not_found)
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

/// Builder pattern for the REST server
pub struct RestServerBuilder {
    config: RestServerConfig,
    store: Option<SharedStore>,
}

impl RestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: RestServerConfig::default(),
            store: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    pub fn with_seed_data(mut self, seed: bool) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> RestServer {
        let server = RestServer::new(self.config);
        match self.store {
            Some(store) => server.with_store(store),
            None => server,
        }
    }
}

impl Default for RestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

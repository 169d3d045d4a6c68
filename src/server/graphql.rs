// GraphQL gateway server for Postbox
// Serves the schema over HTTP and resolves it against a remote REST store

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use url::Url;

use crate::engine::{
    client::{RestStoreClient, StoreClient},
    graphql::{create_schema_with_client, PostboxSchema},
};

pub const DEFAULT_STORE_URL: &str = "http://localhost:3000";

/// GraphQL server configuration
#[derive(Clone, Debug)]
pub struct GraphQLServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_enabled: bool,
    /// Base URL of the REST store every resolver calls into
    pub store_url: Url,
}

impl Default for GraphQLServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            host: "0.0.0.0".to_string(),
            cors_enabled: true,
            store_url: Url::parse(DEFAULT_STORE_URL).expect("default store URL is valid"),
        }
    }
}

/// GraphQL server
pub struct GraphQLServer {
    config: GraphQLServerConfig,
    client: Arc<dyn StoreClient>,
    /// Set when the client talks HTTP, so startup can check the store is up
    rest_client: Option<RestStoreClient>,
}

impl GraphQLServer {
    pub fn new(config: GraphQLServerConfig) -> Self {
        let rest_client = RestStoreClient::new(config.store_url.clone());
        Self {
            config,
            client: Arc::new(rest_client.clone()),
            rest_client: Some(rest_client),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(GraphQLServerConfig::default())
    }

    /// Resolve against a different store client, e.g. an in-process store
    pub fn with_client(mut self, client: Arc<dyn StoreClient>) -> Self {
        self.client = client;
        self.rest_client = None;
        self
    }

    pub fn schema(&self) -> PostboxSchema {
        create_schema_with_client(self.client.clone())
    }

    pub fn create_router(&self) -> Router {
        let app = create_router(self.schema());
        if self.config.cors_enabled {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(rest_client) = &self.rest_client {
            if let Err(e) = rest_client.ping().await {
                warn!(
                    "REST store at {} is not answering yet ({}); queries will fail until it is",
                    rest_client.base_url(),
                    e
                );
            }
        }

        let app = self.create_router();
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| {
                format!("invalid listen address {}:{}", self.config.host, self.config.port)
            })?;

        info!("🚀 GraphQL gateway running on http://{}", addr);
        info!("📊 GraphiQL interface: http://{}", addr);
        info!("🔗 GraphQL endpoint: http://{}/graphql", addr);
        info!("📦 Store: {}", self.config.store_url);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .context("GraphQL server failed")?;
        Ok(())
    }
}

impl Default for GraphQLServer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Routes for a schema: GraphiQL on GET, execution on POST
pub fn create_router(schema: PostboxSchema) -> Router {
    Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .with_state(schema)
        .layer(TraceLayer::new_for_http())
}

/// Builder for the gateway server
pub struct GraphQLServerBuilder {
    config: GraphQLServerConfig,
    client: Option<Arc<dyn StoreClient>>,
}

impl GraphQLServerBuilder {
    pub fn new() -> Self {
        Self {
            config: GraphQLServerConfig::default(),
            client: None,
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

    pub fn with_store_url(mut self, store_url: Url) -> Self {
        self.config.store_url = store_url;
        self
    }

    pub fn with_client(mut self, client: Arc<dyn StoreClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> GraphQLServer {
        let server = GraphQLServer::new(self.config);
        match self.client {
            Some(client) => server.with_client(client),
            None => server,
        }
    }

    pub async fn build_and_run(self) -> anyhow::Result<()> {
        self.build().run().await
    }
}

impl Default for GraphQLServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// GraphQL handler
async fn graphql_handler(State(schema): State<PostboxSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Postbox GraphQL gateway is running!")
}

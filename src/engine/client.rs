// Client side of the store, as seen by the GraphQL gateway

//! # Store Client
//!
//! The gateway treats the store as a remote service. Every resolver talks to
//! it through the [`StoreClient`] trait, never through shared memory.
//!
//! Two implementations are provided:
//! - [`RestStoreClient`]: issues HTTP requests against the REST API. This is
//!   what the gateway binary uses.
//! - `SharedStore` (`Arc<Store>`): calls the store in-process. Useful for
//!   embedding the schema next to the store, and for tests.
//!
//! There is no caching or batching here: each call is one
//! request.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::engine::store::{SharedStore, Store};
use crate::models::{Message, MessageInput, User, UserInput};
use crate::PostboxError;

/// Why a call into the store failed
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The store answered with a non-success status
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    /// The request never completed, or the body could not be decoded
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store URL could not be combined with a route
    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The in-process store rejected the operation
    #[error("{0}")]
    Store(#[from] PostboxError),
}

impl GatewayError {
    /// HTTP status carried by the error, if the store produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// The store operations the gateway relies on
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn list_users(&self) -> GatewayResult<Vec<User>>;

    async fn get_user(&self, id: i64) -> GatewayResult<User>;

    async fn create_user(&self, input: UserInput) -> GatewayResult<User>;

    async fn list_messages(&self) -> GatewayResult<Vec<Message>>;

    async fn get_message(&self, id: i64) -> GatewayResult<Message>;

    async fn create_message(&self, input: MessageInput) -> GatewayResult<Message>;
}

/// HTTP client for the REST store
#[derive(Debug, Clone)]
pub struct RestStoreClient {
    base_url: Url,
    http: HttpClient,
}

impl RestStoreClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_http_client(base_url, HttpClient::new())
    }

    pub fn with_http_client(base_url: Url, http: HttpClient) -> Self {
        Self { base_url, http }
    }

    /// Parse `base_url` and build a client for it
    pub fn from_url(base_url: &str) -> GatewayResult<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> GatewayResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), %body, "store rejected request");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Check that the store answers at all
    pub async fn ping(&self) -> GatewayResult<()> {
        let response = self.http.get(self.endpoint("/")?).send().await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            other => Err(GatewayError::Status {
                status: other.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl StoreClient for RestStoreClient {
    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        self.get("/users").await
    }

    async fn get_user(&self, id: i64) -> GatewayResult<User> {
        self.get(&format!("/users/{}", id)).await
    }

    async fn create_user(&self, input: UserInput) -> GatewayResult<User> {
        self.post("/users", &input).await
    }

    async fn list_messages(&self) -> GatewayResult<Vec<Message>> {
        self.get("/messages").await
    }

    async fn get_message(&self, id: i64) -> GatewayResult<Message> {
        self.get(&format!("/messages/{}", id)).await
    }

    async fn create_message(&self, input: MessageInput) -> GatewayResult<Message> {
        self.post("/messages", &input).await
    }
}

#[async_trait]
impl StoreClient for SharedStore {
    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        Ok(Store::list_users(self).await)
    }

    async fn get_user(&self, id: i64) -> GatewayResult<User> {
        Ok(Store::get_user(self, id).await?)
    }

    async fn create_user(&self, input: UserInput) -> GatewayResult<User> {
        Ok(Store::create_user(self, input).await?)
    }

    async fn list_messages(&self) -> GatewayResult<Vec<Message>> {
        Ok(Store::list_messages(self).await)
    }

    async fn get_message(&self, id: i64) -> GatewayResult<Message> {
        Ok(Store::get_message(self, id).await?)
    }

    async fn create_message(&self, input: MessageInput) -> GatewayResult<Message> {
        Ok(Store::create_message(self, input).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_routes() {
        let client = RestStoreClient::from_url("http://localhost:3000").unwrap();
        assert_eq!(
            client.endpoint("/users/1").unwrap().as_str(),
            "http://localhost:3000/users/1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RestStoreClient::from_url("not a url"),
            Err(GatewayError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_status_error_message() {
        let err = GatewayError::Status {
            status: 404,
            body: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed with status code 404");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_shared_store_client() {
        let store = Store::seeded().shared();
        let client: &dyn StoreClient = &store;

        assert_eq!(client.list_users().await.unwrap().len(), 2);
        assert_eq!(client.get_message(2).await.unwrap().message, "hey johnny");

        let err = client.get_user(3).await.unwrap_err();
        assert!(matches!(err, GatewayError::Store(PostboxError::NotFound { .. })));
    }
}

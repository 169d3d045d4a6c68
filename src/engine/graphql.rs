// GraphQL API for Postbox
// Resolvers answer every field by calling into the store through StoreClient

use std::sync::Arc;

use async_graphql::{ComplexObject, Context, EmptySubscription, Object, Schema, SimpleObject, ID};
use tracing::debug;

use crate::engine::client::{GatewayError, StoreClient};
use crate::engine::store::SharedStore;
use crate::models::{parse_id, timestamp, Message, MessageInput, User, UserInput};

// GraphQL types - these are the API representations of our domain models

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "User", complex)]
pub struct UserGQL {
    pub id: ID,
    pub username: String,
    pub fullname: String,
    pub created: String,
    #[graphql(skip)]
    pub user_id: i64,
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Message", complex)]
pub struct MessageGQL {
    pub id: ID,
    #[graphql(name = "from")]
    pub sender: ID,
    #[graphql(name = "to")]
    pub recipient: ID,
    pub message: String,
    pub created: String,
    #[graphql(skip)]
    pub from_id: i64,
    #[graphql(skip)]
    pub to_id: i64,
}

impl From<&User> for UserGQL {
    fn from(user: &User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            created: timestamp::format(&user.created),
            user_id: user.id,
        }
    }
}

impl From<&Message> for MessageGQL {
    fn from(message: &Message) -> Self {
        Self {
            id: ID(message.id.to_string()),
            sender: ID(message.from.to_string()),
            recipient: ID(message.to.to_string()),
            message: message.message.clone(),
            created: timestamp::format(&message.created),
            from_id: message.from,
            to_id: message.to,
        }
    }
}

fn store<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Arc<dyn StoreClient>> {
    ctx.data::<Arc<dyn StoreClient>>()
}

fn gateway_error(action: &str, err: GatewayError) -> async_graphql::Error {
    debug!("{} failed: {}", action, err);
    async_graphql::Error::new(err.to_string())
}

fn id_arg(id: &ID) -> async_graphql::Result<i64> {
    parse_id(id.as_str())
        .ok_or_else(|| async_graphql::Error::new(format!("Invalid id: {}", id.as_str())))
}

/// Settle a nullable field
///
/// An error is recorded against this field alone and the field resolves to
/// null, so sibling fields (root fields included) still resolve.
fn nullable<T>(ctx: &Context<'_>, result: async_graphql::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            ctx.add_error(err.into_server_error(ctx.item.pos));
            None
        }
    }
}

/// Messages kept by the `sent`/`received` resolvers
///
/// Both resolvers keep the messages whose sender (or recipient) is NOT the
/// user, independently of the store's own recipient filter. DESIGN.md has
/// the background.
fn messages_not_matching(
    messages: Vec<Message>,
    matches_user: impl Fn(&Message) -> bool,
) -> Vec<Option<MessageGQL>> {
    messages
        .iter()
        .filter(|message| !matches_user(message))
        .map(|message| Some(MessageGQL::from(message)))
        .collect()
}

#[ComplexObject]
impl UserGQL {
    /// Messages whose sender is not this user
    async fn sent(&self, ctx: &Context<'_>) -> Option<Vec<Option<MessageGQL>>> {
        let user_id = self.user_id;
        let result = async {
            let messages = store(ctx)?
                .list_messages()
                .await
                .map_err(|e| gateway_error("User.sent", e))?;
            let kept = messages_not_matching(messages, |message| message.from == user_id);
            Ok::<_, async_graphql::Error>(kept)
        }
        .await;
        nullable(ctx, result)
    }

    /// Messages whose recipient is not this user
    async fn received(&self, ctx: &Context<'_>) -> Option<Vec<Option<MessageGQL>>> {
        let user_id = self.user_id;
        let result = async {
            let messages = store(ctx)?
                .list_messages()
                .await
                .map_err(|e| gateway_error("User.received", e))?;
            let kept = messages_not_matching(messages, |message| message.to == user_id);
            Ok::<_, async_graphql::Error>(kept)
        }
        .await;
        nullable(ctx, result)
    }
}

#[ComplexObject]
impl MessageGQL {
    /// The sending user, fetched on its own
    async fn from_user(&self, ctx: &Context<'_>) -> async_graphql::Result<UserGQL> {
        let user = store(ctx)?
            .get_user(self.from_id)
            .await
            .map_err(|e| gateway_error("Message.fromUser", e))?;
        Ok(UserGQL::from(&user))
    }

    /// The receiving user, fetched on its own
    async fn to_user(&self, ctx: &Context<'_>) -> async_graphql::Result<UserGQL> {
        let user = store(ctx)?
            .get_user(self.to_id)
            .await
            .map_err(|e| gateway_error("Message.toUser", e))?;
        Ok(UserGQL::from(&user))
    }
}

// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
    async fn hello(&self) -> Option<String> {
        Some("Hello world!".to_string())
    }

    /// Get a message by ID
    #[graphql(name = "Message")]
    async fn message(&self, ctx: &Context<'_>, id: ID) -> Option<MessageGQL> {
        let result = async {
            let id = id_arg(&id)?;
            let message = store(ctx)?
                .get_message(id)
                .await
                .map_err(|e| gateway_error("Message", e))?;
            Ok::<_, async_graphql::Error>(MessageGQL::from(&message))
        }
        .await;
        nullable(ctx, result)
    }

    /// List all messages
    #[graphql(name = "Messages")]
    async fn messages(&self, ctx: &Context<'_>) -> Option<Vec<Option<MessageGQL>>> {
        let result = async {
            let messages = store(ctx)?
                .list_messages()
                .await
                .map_err(|e| gateway_error("Messages", e))?;
            Ok::<_, async_graphql::Error>(
                messages
                    .iter()
                    .map(|message| Some(MessageGQL::from(message)))
                    .collect::<Vec<_>>(),
            )
        }
        .await;
        nullable(ctx, result)
    }

    /// Get a user by ID
    #[graphql(name = "User")]
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Option<UserGQL> {
        let result = async {
            let id = id_arg(&id)?;
            let user = store(ctx)?
                .get_user(id)
                .await
                .map_err(|e| gateway_error("User", e))?;
            Ok::<_, async_graphql::Error>(UserGQL::from(&user))
        }
        .await;
        nullable(ctx, result)
    }

    /// List all users
    #[graphql(name = "Users")]
    async fn users(&self, ctx: &Context<'_>) -> Option<Vec<Option<UserGQL>>> {
        let result = async {
            let users = store(ctx)?
                .list_users()
                .await
                .map_err(|e| gateway_error("Users", e))?;
            Ok::<_, async_graphql::Error>(
                users
                    .iter()
                    .map(|user| Some(UserGQL::from(user)))
                    .collect::<Vec<_>>(),
            )
        }
        .await;
        nullable(ctx, result)
    }
}

// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
    /// Register a new user
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        fullname: String,
    ) -> Option<UserGQL> {
        let result = async {
            let user = store(ctx)?
                .create_user(UserInput::new(username, fullname))
                .await
                .map_err(|e| gateway_error("createUser", e))?;
            Ok::<_, async_graphql::Error>(UserGQL::from(&user))
        }
        .await;
        nullable(ctx, result)
    }

    /// Send a message from `sender` to `recipient`
    async fn create_message(
        &self,
        ctx: &Context<'_>,
        sender: ID,
        recipient: ID,
        message: String,
    ) -> Option<MessageGQL> {
        let result = async {
            let input = MessageInput::new(id_arg(&sender)?, id_arg(&recipient)?, message);
            let message = store(ctx)?
                .create_message(input)
                .await
                .map_err(|e| gateway_error("createMessage", e))?;
            Ok::<_, async_graphql::Error>(MessageGQL::from(&message))
        }
        .await;
        nullable(ctx, result)
    }
}

// Schema type alias
pub type PostboxSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a schema that resolves against the store in-process
pub fn create_schema(store: SharedStore) -> PostboxSchema {
    create_schema_with_client(Arc::new(store))
}

/// Create a schema that resolves through any store client
pub fn create_schema_with_client(client: Arc<dyn StoreClient>) -> PostboxSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(client)
        .finish()
}

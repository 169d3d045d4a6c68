// In-memory store for users and messages
// This is the single owner of both collections

//! # Store
//!
//! The store keeps two ordered collections, users and messages, and is the
//! only component allowed to change them. Everything else reaches the data
//! through the operations defined here (the REST handlers call them
//! directly, the GraphQL gateway calls them over HTTP).
//!
//! ## Locking
//!
//! Both collections sit behind one `tokio::sync::RwLock`:
//! - reads take the shared guard and clone what they return;
//! - every mutation takes the exclusive guard for its whole
//!   check-then-write sequence, so the uniqueness and referential checks
//!   cannot be invalidated by a concurrent writer.
//!
//! ## Ordering
//!
//! Collections are plain `Vec`s. New records are appended, so every read
//! returns records in insertion order.
//!
//! ## Id Assignment
//!
//! New ids come from the current Unix time in milliseconds. Two creations in
//! the same millisecond would collide, so the store bumps the candidate past
//! the last id it handed out.

use std::convert::Infallible;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{timestamp, Message, MessageInput, User, UserInput};
use crate::{PostboxError, Result};

/// Store handle shared between request handlers
pub type SharedStore = Arc<Store>;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    messages: Vec<Message>,
    /// Highest id handed out so far, across both collections
    last_id: i64,
}

impl Tables {
    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn user_index(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|user| user.id == id)
    }

    /// Is `username` held by some user other than `except`?
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|user| user.username == username && Some(user.id) != except)
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        self.last_id = if candidate > self.last_id {
            candidate
        } else {
            self.last_id + 1
        };
        self.last_id
    }
}

/// The users-and-messages dataset with its CRUD operations
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the two demo users and their four messages
    pub fn seeded() -> Self {
        let signup = seed_time("2020-06-01T23:59:59.999Z");
        let users = vec![
            User::new(1, "john", "Johnny Walker").created_at(signup),
            User::new(2, "betty", "Betty Crockett").created_at(signup),
        ];
        let messages = vec![
            Message::new(1, 1, 2, "hey betty").created_at(seed_time("2020-06-05T23:59:59.999Z")),
            Message::new(2, 2, 1, "hey johnny").created_at(seed_time("2020-06-06T23:59:59.999Z")),
            Message::new(3, 1, 2, "wanna grab a shake?")
                .created_at(seed_time("2020-06-07T01:59:59.999Z")),
            Message::new(4, 2, 1, "getta out here ya jerk")
                .created_at(seed_time("2020-06-08T01:59:59.999Z")),
        ];
        Self::with_records(users, messages)
    }

    /// A store holding the given records, in the given order
    pub fn with_records(users: Vec<User>, messages: Vec<Message>) -> Self {
        let last_id = users
            .iter()
            .map(|user| user.id)
            .chain(messages.iter().map(|message| message.id))
            .max()
            .unwrap_or(0);
        Self {
            tables: RwLock::new(Tables {
                users,
                messages,
                last_id,
            }),
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    // ---- users ----

    pub async fn list_users(&self) -> Vec<User> {
        self.tables.read().await.users.clone()
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        let tables = self.tables.read().await;
        tables
            .user(id)
            .cloned()
            .ok_or_else(|| PostboxError::user_not_found(Some(id)))
    }

    /// Register a new user
    ///
    /// ## Errors
    /// - `Validation` if `username` or `fullname` is absent or empty
    /// - `Conflict` if `username` already belongs to a user
    pub async fn create_user(&self, input: UserInput) -> Result<User> {
        let (username, fullname) = input.require_all()?;

        let mut tables = self.tables.write().await;
        if tables.username_taken(username, None) {
            return Err(PostboxError::Conflict {
                username: username.to_string(),
            });
        }

        let created = timestamp::now();
        let id = tables.next_id(created);
        let user = User::new(id, username, fullname).created_at(created);
        tables.users.push(user.clone());

        debug!(id, username = %user.username, "created user");
        Ok(user)
    }

    /// Replace a user's username and fullname, keeping `id` and `created`
    ///
    /// ## Errors
    /// - `Validation` if either field is absent or empty
    /// - `NotFound` if no user has `id`
    /// - `Conflict` if `username` belongs to a different user
    pub async fn replace_user(&self, id: i64, input: UserInput) -> Result<User> {
        let (username, fullname) = input.require_all()?;

        let mut tables = self.tables.write().await;
        let index = tables
            .user_index(id)
            .ok_or_else(|| PostboxError::user_not_found(Some(id)))?;
        if tables.username_taken(username, Some(id)) {
            return Err(PostboxError::Conflict {
                username: username.to_string(),
            });
        }

        let user = &mut tables.users[index];
        user.username = username.to_string();
        user.fullname = fullname.to_string();

        debug!(id, "replaced user");
        Ok(user.clone())
    }

    /// Update only the supplied fields of a user
    ///
    /// ## Errors
    /// - `Validation` if neither field is supplied
    /// - `NotFound` if no user has `id`
    /// - `Conflict` if a supplied `username` belongs to a different user
    pub async fn patch_user(&self, id: i64, input: UserInput) -> Result<User> {
        let (username, fullname) = input.require_any()?;

        let mut tables = self.tables.write().await;
        let index = tables
            .user_index(id)
            .ok_or_else(|| PostboxError::user_not_found(Some(id)))?;
        if let Some(username) = username {
            if tables.username_taken(username, Some(id)) {
                return Err(PostboxError::Conflict {
                    username: username.to_string(),
                });
            }
        }

        let user = &mut tables.users[index];
        if let Some(username) = username {
            user.username = username.to_string();
        }
        if let Some(fullname) = fullname {
            user.fullname = fullname.to_string();
        }

        debug!(id, "patched user");
        Ok(user.clone())
    }

    /// Deleting users is not supported
    ///
    /// The id is still checked so callers learn about unknown users first.
    /// A known id yields `NotImplemented` and the user stays in place.
    pub async fn delete_user(&self, id: i64) -> Result<Infallible> {
        let tables = self.tables.read().await;
        if tables.user(id).is_none() {
            return Err(PostboxError::user_not_found(Some(id)));
        }
        debug!(id, "delete requested for user; deletion is not implemented");
        Err(PostboxError::NotImplemented)
    }

    // ---- messages ----

    pub async fn list_messages(&self) -> Vec<Message> {
        self.tables.read().await.messages.clone()
    }

    pub async fn get_message(&self, id: i64) -> Result<Message> {
        let tables = self.tables.read().await;
        tables
            .messages
            .iter()
            .find(|message| message.id == id)
            .cloned()
            .ok_or_else(|| PostboxError::message_not_found(Some(id)))
    }

    /// Record a message between two existing users
    ///
    /// ## Errors
    /// - `Validation` if `from`, `to` or a non-empty `message` is missing
    /// - `SenderNotFound` / `RecipientNotFound` if either id is unknown
    ///
    /// Nothing is appended unless every check passes.
    pub async fn create_message(&self, input: MessageInput) -> Result<Message> {
        let (from, to, text) = input.require_all()?;

        let mut tables = self.tables.write().await;
        if tables.user(from).is_none() {
            return Err(PostboxError::SenderNotFound { id: from });
        }
        if tables.user(to).is_none() {
            return Err(PostboxError::RecipientNotFound { id: to });
        }

        let created = timestamp::now();
        let id = tables.next_id(created);
        let message = Message::new(id, from, to, text).created_at(created);
        tables.messages.push(message.clone());

        debug!(id, from, to, "created message");
        Ok(message)
    }

    /// Every message whose recipient is NOT `user_id`
    ///
    /// Backs `GET /users/:userId/messages`. The filter keeps messages
    /// addressed to other users, which is the long-standing behavior of that
    /// route; see DESIGN.md before changing it.
    pub async fn messages_excluding_recipient(&self, user_id: i64) -> Result<Vec<Message>> {
        let tables = self.tables.read().await;
        if tables.user(user_id).is_none() {
            return Err(PostboxError::user_not_found(Some(user_id)));
        }
        Ok(tables
            .messages
            .iter()
            .filter(|message| message.to != user_id)
            .cloned()
            .collect())
    }
}

fn seed_time(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_default()
}

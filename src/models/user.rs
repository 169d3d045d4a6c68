// User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A registered user
///
/// `id` and `created` are assigned by the store when the user is created and
/// never change afterwards. `username` is unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            fullname: fullname.into(),
            created: timestamp::now(),
        }
    }

    /// Builder-style override of the creation time, used for seed data
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

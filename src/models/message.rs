// Message domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A message sent from one user to another
///
/// `from` and `to` are user ids. They are checked against the user
/// collection when the message is created and never again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    pub message: String,
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
}

impl Message {
    pub fn new(id: i64, from: i64, to: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            from,
            to,
            message: message.into(),
            created: timestamp::now(),
        }
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

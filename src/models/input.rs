// Request payloads for the store's write operations

//! Every field is optional on the way in. Presence is checked by the store
//! operation that consumes the payload, because each operation has its own
//! rule about which fields are required.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{PostboxError, Result};

/// Body of `POST /users`, `PUT /users/:id` and `PATCH /users/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

impl UserInput {
    pub fn new(username: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            fullname: Some(fullname.into()),
        }
    }

    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            fullname: None,
        }
    }

    pub fn fullname(fullname: impl Into<String>) -> Self {
        Self {
            username: None,
            fullname: Some(fullname.into()),
        }
    }

    /// Both fields, for create and full replace
    pub fn require_all(&self) -> Result<(&str, &str)> {
        match (supplied(&self.username), supplied(&self.fullname)) {
            (Some(username), Some(fullname)) => Ok((username, fullname)),
            _ => Err(PostboxError::Validation),
        }
    }

    /// Whichever fields were supplied, for a partial update; at least one
    pub fn require_any(&self) -> Result<(Option<&str>, Option<&str>)> {
        match (supplied(&self.username), supplied(&self.fullname)) {
            (None, None) => Err(PostboxError::Validation),
            fields => Ok(fields),
        }
    }
}

/// Body of `POST /messages`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageInput {
    pub fn new(from: i64, to: i64, message: impl Into<String>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            message: Some(message.into()),
        }
    }

    pub fn require_all(&self) -> Result<(i64, i64, &str)> {
        match (self.from, self.to, supplied(&self.message)) {
            (Some(from), Some(to), Some(message)) => Ok((from, to, message)),
            _ => Err(PostboxError::Validation),
        }
    }
}

/// A string field counts as supplied only when it is present and non-empty
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// An id as it arrives in a body: a JSON number, or text from JSON or a form
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Decode an id field that may be a number or a string
///
/// Text goes through [`parse_id`]; empty or non-numeric text counts as
/// missing, so the operation reports it like an absent field.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(raw)) => parse_id(&raw),
        None => None,
    })
}

/// Read an id out of a path segment or GraphQL `ID`
///
/// Parsing is lenient: leading whitespace and an optional sign are allowed,
/// then the leading run of digits is taken and anything after it ignored.
/// `"12abc"` reads as 12. A segment with no leading digits reads as `None`.
pub fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

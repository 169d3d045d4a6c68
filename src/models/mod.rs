// Core domain models for Postbox
// These are the records the store owns and every layer passes around

//! # Domain Models Module
//!
//! Two record types make up the whole dataset:
//!
//! - [`User`]: a named account, unique by `username`
//! - [`Message`]: a note sent from one user to another
//!
//! Both serialize to the exact JSON shape the REST API speaks, so the
//! gateway can decode store responses straight into these types.
//!
//! [`UserInput`] and [`MessageInput`] are the loosely-typed write payloads
//! the store validates before touching its collections.

pub mod input;
pub mod message;
pub mod timestamp;
pub mod user;

pub use input::{parse_id, MessageInput, UserInput};
pub use message::Message;
pub use user::User;

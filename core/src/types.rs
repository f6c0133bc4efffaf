//! Domain DTOs for the posts API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. The same
//! `Post` type is returned by both list and update, so values from either
//! call are interchangeable.

use serde::{Deserialize, Serialize};

/// A single post as stored by the server. `id` is server-assigned.
///
/// Unknown fields in the server payload are ignored; a missing field is a
/// decode failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }
}

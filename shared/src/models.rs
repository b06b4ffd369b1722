//! Data models for the Todo service

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Salted password digest; never leaves the server
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// A to-do item owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub done: bool,
    pub user_id: i64,
}

//! Database repositories
//!
//! Provides the data access layer. Handlers only see the
//! [`UserRepository`] and [`TodoRepository`] traits; PostgreSQL and an
//! in-process store implement them.
//!
//! Every operation is a single statement. Todo reads and mutations reached
//! from a route are always filtered by owner.

use async_trait::async_trait;
use thiserror::Error;
use todo_shared::{Todo, User};

pub mod memory;
pub mod todo;
pub mod user;

pub use memory::MemoryStore;
pub use todo::PgTodoRepository;
pub use user::PgUserRepository;

/// Storage failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email is already taken")]
    EmailTaken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Visibility filter for todo lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Only todos owned by this user id
    Owner(i64),
    /// No owner filter. Internal use only; no route constructs this.
    Any,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Full replacement of a todo's mutable fields
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub title: String,
    pub content: String,
    pub done: bool,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Insert after checking the email is unused.
    ///
    /// Returns [`StoreError::EmailTaken`] when the check fails or when a
    /// concurrent insert wins the race.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// Round-trip to the backing store
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// A page of the user's todos in ascending id order
    async fn list(&self, user_id: i64, limit: i64, offset: i64) -> StoreResult<Vec<Todo>>;

    /// Zero when the user has none
    async fn count(&self, user_id: i64) -> StoreResult<i64>;

    async fn insert(&self, title: &str, content: &str, user_id: i64) -> StoreResult<Todo>;

    async fn find_by_id(&self, id: i64, scope: Ownership) -> StoreResult<Option<Todo>>;

    /// Returns the number of rows changed
    async fn update(&self, owner_id: i64, id: i64, changes: TodoChanges) -> StoreResult<u64>;

    /// Returns the number of rows removed
    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<u64>;
}

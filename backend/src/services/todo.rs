//! Todo business logic
//!
//! Every operation is scoped to the calling user. A todo owned by someone
//! else is indistinguishable from one that does not exist.

use crate::error::ApiError;
use crate::repositories::{Ownership, TodoChanges, TodoRepository};
use crate::telemetry;
use todo_shared::Todo;
use tracing::info;

/// Message for ids that are absent under the caller's scope
pub const TODO_NOT_FOUND: &str = "invalid todo id, todo not found";

/// A page of todos with the user's total count
#[derive(Debug, Clone)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total: i64,
}

/// Todo operations
pub struct TodoService;

impl TodoService {
    pub async fn list(
        todos: &dyn TodoRepository,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<TodoPage, ApiError> {
        let page = todos.list(user_id, limit, offset).await?;
        let total = todos.count(user_id).await?;

        Ok(TodoPage { todos: page, total })
    }

    pub async fn get(todos: &dyn TodoRepository, user_id: i64, id: i64) -> Result<Todo, ApiError> {
        todos
            .find_by_id(id, Ownership::Owner(user_id))
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(
        todos: &dyn TodoRepository,
        user_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Todo, ApiError> {
        let todo = todos.insert(title, content, user_id).await?;

        telemetry::record_todo_created();
        info!(user_id, todo_id = todo.id, "Todo created");

        Ok(todo)
    }

    /// Replace title, content and done flag
    ///
    /// A todo deleted between the ownership check and the update is also
    /// reported as not found.
    pub async fn update(
        todos: &dyn TodoRepository,
        user_id: i64,
        id: i64,
        changes: TodoChanges,
    ) -> Result<(), ApiError> {
        Self::get(todos, user_id, id).await?;

        match todos.update(user_id, id, changes).await? {
            0 => Err(not_found()),
            _ => Ok(()),
        }
    }

    pub async fn delete(todos: &dyn TodoRepository, user_id: i64, id: i64) -> Result<(), ApiError> {
        Self::get(todos, user_id, id).await?;

        match todos.delete(id, user_id).await? {
            0 => Err(not_found()),
            _ => Ok(()),
        }
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound(TODO_NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn changes(done: bool) -> TodoChanges {
        TodoChanges {
            title: "Buy milk and eggs".to_string(),
            content: "Need 2% milk and a dozen eggs".to_string(),
            done,
        }
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let store = MemoryStore::new();
        let page = TodoService::list(&store, 1, 10, 0).await.unwrap();

        assert!(page.todos.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let store = MemoryStore::new();
        let todo = TodoService::create(&store, 1, "Buy milk and eggs", "Need 2% milk and a dozen eggs")
            .await
            .unwrap();
        assert!(!todo.done);

        TodoService::update(&store, 1, todo.id, changes(true)).await.unwrap();

        let fetched = TodoService::get(&store, 1, todo.id).await.unwrap();
        assert!(fetched.done);
        assert_eq!(fetched.title, "Buy milk and eggs");
        assert_eq!(fetched.content, "Need 2% milk and a dozen eggs");
    }

    #[tokio::test]
    async fn test_other_users_todo_is_not_found() {
        let store = MemoryStore::new();
        let todo = TodoService::create(&store, 1, "private todo", "private content")
            .await
            .unwrap();

        let update = TodoService::update(&store, 2, todo.id, changes(true)).await;
        assert!(matches!(update, Err(ApiError::NotFound(_))));

        let delete = TodoService::delete(&store, 2, todo.id).await;
        assert!(matches!(delete, Err(ApiError::NotFound(_))));

        let untouched = TodoService::get(&store, 1, todo.id).await.unwrap();
        assert_eq!(untouched.title, "private todo");
    }

    #[tokio::test]
    async fn test_delete_removes_todo() {
        let store = MemoryStore::new();
        let todo = TodoService::create(&store, 1, "short lived", "gone soon").await.unwrap();

        TodoService::delete(&store, 1, todo.id).await.unwrap();
        assert!(matches!(
            TodoService::get(&store, 1, todo.id).await,
            Err(ApiError::NotFound(_))
        ));
    }
}

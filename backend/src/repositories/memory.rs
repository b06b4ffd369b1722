//! In-process store
//!
//! Implements both repository traits over a single lock-guarded table set.
//! Selected with `database.url = "memory://"` and used by the test suites.
//! Ids are assigned from 1 upward, like `BIGSERIAL`.

use super::{
    NewUser, Ownership, StoreError, StoreResult, TodoChanges, TodoRepository, UserRepository,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use todo_shared::{Todo, User};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

/// Cheaply cloneable handle; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        // Check and insert under one write lock, which also rules out the race.
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }

        tables.next_user_id += 1;
        let record = User {
            id: tables.next_user_id,
            name: user.name,
            email: user.email,
            password: user.password_hash,
        };
        tables.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn list(&self, user_id: i64, limit: i64, offset: i64) -> StoreResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);

        Ok(tables
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, user_id: i64) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables.todos.values().filter(|t| t.user_id == user_id).count();
        Ok(count as i64)
    }

    async fn insert(&self, title: &str, content: &str, user_id: i64) -> StoreResult<Todo> {
        let mut tables = self.tables.write().await;
        tables.next_todo_id += 1;

        let todo = Todo {
            id: tables.next_todo_id,
            title: title.to_string(),
            content: content.to_string(),
            done: false,
            user_id,
        };
        tables.todos.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn find_by_id(&self, id: i64, scope: Ownership) -> StoreResult<Option<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .get(&id)
            .filter(|t| match scope {
                Ownership::Owner(user_id) => t.user_id == user_id,
                Ownership::Any => true,
            })
            .cloned())
    }

    async fn update(&self, owner_id: i64, id: i64, changes: TodoChanges) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.todos.get_mut(&id) {
            Some(todo) if todo.user_id == owner_id => {
                todo.title = changes.title;
                todo.content = changes.content;
                todo.done = changes.done;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.todos.get(&id) {
            Some(todo) if todo.user_id == owner_id => {
                tables.todos.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice Example".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = UserRepository::insert(&store, new_user("a@example.com")).await.unwrap();
        let b = UserRepository::insert(&store, new_user("b@example.com")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@example.com")).await.unwrap();

        let result = UserRepository::insert(&store, new_user("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::EmailTaken)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@example.com")).await.unwrap();

        assert!(store.find_by_email("A@example.com").await.unwrap().is_none());
        assert!(store.find_by_email("a@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_pages_in_id_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            TodoRepository::insert(&store, &format!("title {i}"), "content", 1)
                .await
                .unwrap();
        }
        TodoRepository::insert(&store, "someone else", "content", 2).await.unwrap();

        let page = store.list(1, 2, 1).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.count(1).await.unwrap(), 5);
        assert_eq!(store.count(3).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ownership_filter() {
        let store = MemoryStore::new();
        let todo = TodoRepository::insert(&store, "title", "content", 1).await.unwrap();

        assert!(TodoRepository::find_by_id(&store, todo.id, Ownership::Owner(2))
            .await
            .unwrap()
            .is_none());
        assert!(TodoRepository::find_by_id(&store, todo.id, Ownership::Any)
            .await
            .unwrap()
            .is_some());

        let changes = TodoChanges {
            title: "hijacked".to_string(),
            content: "hijacked".to_string(),
            done: true,
        };
        assert_eq!(store.update(2, todo.id, changes).await.unwrap(), 0);
        assert_eq!(store.delete(todo.id, 2).await.unwrap(), 0);
        assert_eq!(store.delete(todo.id, 1).await.unwrap(), 1);
    }
}

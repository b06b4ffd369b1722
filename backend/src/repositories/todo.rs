//! Todo repository for database operations

use super::{Ownership, StoreResult, TodoChanges, TodoRepository};
use async_trait::async_trait;
use sqlx::PgPool;
use todo_shared::Todo;

/// Todo record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub done: bool,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            done: record.done,
            user_id: record.user_id,
        }
    }
}

/// PostgreSQL-backed todo repository
#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self, user_id: i64, limit: i64, offset: i64) -> StoreResult<Vec<Todo>> {
        let records = sqlx::query_as::<_, TodoRecord>(
            r#"
            SELECT id, title, content, user_id, done
            FROM todos
            WHERE user_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Todo::from).collect())
    }

    async fn count(&self, user_id: i64) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM todos WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert(&self, title: &str, content: &str, user_id: i64) -> StoreResult<Todo> {
        let record = sqlx::query_as::<_, TodoRecord>(
            r#"
            INSERT INTO todos (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, user_id, done
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: i64, scope: Ownership) -> StoreResult<Option<Todo>> {
        let query = match scope {
            Ownership::Owner(user_id) => sqlx::query_as::<_, TodoRecord>(
                r#"
                SELECT id, title, content, user_id, done
                FROM todos
                WHERE id = $1 AND user_id = $2
                "#,
            )
            .bind(id)
            .bind(user_id),
            Ownership::Any => sqlx::query_as::<_, TodoRecord>(
                r#"
                SELECT id, title, content, user_id, done
                FROM todos
                WHERE id = $1
                "#,
            )
            .bind(id),
        };

        let record = query.fetch_optional(&self.pool).await?;
        Ok(record.map(Todo::from))
    }

    async fn update(&self, owner_id: i64, id: i64, changes: TodoChanges) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $1, content = $2, done = $3
            WHERE user_id = $4 AND id = $5
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.done)
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

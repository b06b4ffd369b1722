//! Todo API routes
//!
//! Mounted behind the auth middleware; every handler acts on the todos of
//! the authenticated user only.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::repositories::TodoChanges;
use crate::services::TodoService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use todo_shared::{
    CreateTodoRequest, DeleteTodoRequest, Envelope, ListTodosRequest, MessageData,
    TodoCreatedData, TodoListData, UpdateTodoRequest,
};

/// Create todo routes
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todo", get(list_todos))
        .route("/todo/", get(list_todos))
        .route("/todo/create", post(create_todo))
        .route("/todo/update", put(update_todo))
        .route("/todo/destroy", delete(delete_todo))
}

/// GET /v1/todo/ - Page through the caller's todos
///
/// The paging parameters travel in the JSON body.
async fn list_todos(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ListTodosRequest>,
) -> ApiResult<Json<Envelope<TodoListData>>> {
    let page = TodoService::list(
        state.todos(),
        auth.user_id,
        req.limit.unwrap_or_default(),
        req.offset,
    )
    .await?;

    Ok(Json(Envelope::success(TodoListData {
        todos: page.todos,
        total_todos_count: page.total,
    })))
}

/// POST /v1/todo/create
async fn create_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<TodoCreatedData>>)> {
    let title = req.title.unwrap_or_default();
    let content = req.content.unwrap_or_default();

    let todo = TodoService::create(state.todos(), auth.user_id, &title, &content).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(TodoCreatedData {
            msg: "todo creation success".to_string(),
            todo,
        })),
    ))
}

/// PUT /v1/todo/update - Replace title, content and done
async fn update_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateTodoRequest>,
) -> ApiResult<Json<Envelope<MessageData>>> {
    let changes = TodoChanges {
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        done: req.done,
    };

    TodoService::update(state.todos(), auth.user_id, req.id.unwrap_or_default(), changes).await?;

    Ok(Json(Envelope::success(MessageData::new("todo is updated"))))
}

/// DELETE /v1/todo/destroy
async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<DeleteTodoRequest>,
) -> ApiResult<Json<Envelope<MessageData>>> {
    TodoService::delete(state.todos(), auth.user_id, req.id.unwrap_or_default()).await?;

    Ok(Json(Envelope::success(MessageData::new("todo has deleted"))))
}

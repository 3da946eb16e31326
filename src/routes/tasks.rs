use crate::{
    error::AppError,
    models::TaskInput,
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Lists every stored task.
///
/// Tasks are not scoped to the caller: any valid bearer token sees all of
/// them. The order of the returned array is unspecified.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(tasks: web::Data<TaskStore>) -> impl Responder {
    HttpResponse::Ok().json(tasks.list())
}

/// Creates a new task.
///
/// ## Request Body:
/// - `title`: required, non-empty.
/// - `description`: required, non-empty.
/// - `completed` (optional): accepted but ignored; new tasks start open.
///
/// ## Responses:
/// - `201 Created`: the stored `Task` with its generated `id`.
/// - `400 Bad Request`: body is not valid JSON of the expected shape.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: empty title or description.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskStore>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create(task_data.into_inner());
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a task by id.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(&task_id)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task's title and description and marks it completed.
///
/// The `completed` field of the body is ignored; the stored task is always
/// completed after an update.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: empty title or description.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<String>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.update(&task_id, task_data.into_inner())?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by id.
///
/// ## Responses:
/// - `200 OK`: confirmation message.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    tasks.delete(&task_id)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

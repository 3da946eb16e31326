use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::error::AppError;
use crate::store::{TaskStore, UserStore};

/// Health check endpoint
///
/// Unauthenticated. Reports the server time and how many entries each store
/// holds, since neither store is ever pruned.
#[get("/health")]
pub async fn health(
    tasks: web::Data<TaskStore>,
    users: web::Data<UserStore>,
) -> Result<impl Responder, AppError> {
    // Counting takes each store's read lock; keep that off the worker thread.
    let (task_count, user_count) = web::block(move || (tasks.len(), users.len()))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "tasks": task_count,
        "users": user_count,
    })))
}

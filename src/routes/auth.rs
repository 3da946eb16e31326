use crate::{
    error::AppError,
    models::{AuthResponse, LoginInput, UserInput},
    store::UserStore,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Hashes the password, stores the user and returns a token.
/// Hashing runs on the blocking thread pool.
#[post("/users")]
pub async fn register(
    users: web::Data<UserStore>,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let UserInput { username, password } = register_data.into_inner();
    let token = web::block(move || users.create(&username, &password))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    Ok(HttpResponse::Created().json(AuthResponse { token }))
}

/// Login user
///
/// Authenticates a user and returns a fresh token.
#[post("/login")]
pub async fn login(
    users: web::Data<UserStore>,
    login_data: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let LoginInput { username, password } = login_data.into_inner();
    let token = web::block(move || users.login(&username, &password))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, http::StatusCode, rt, test, App, HttpServer};
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::Arc;
use tasktrack::auth::{BcryptHasher, TokenService};
use tasktrack::models::{AuthResponse, Task};
use tasktrack::routes;
use tasktrack::routes::health;
use tasktrack::AppState;

const SECRET: &[u8] = b"integration-secret";

fn test_state() -> AppState {
    AppState::new(TokenService::new(SECRET), Arc::new(BcryptHasher), 4)
}

async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> Result<String, String> {
    let req_register = test::TestRequest::post()
        .uri("/users")
        .set_json(&json!({ "username": username, "password": password }))
        .to_request();
    let resp_register = test::call_service(app, req_register).await;
    let resp_status = resp_register.status();
    let auth_response_bytes = test::read_body(resp_register).await;

    if !resp_status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            resp_status,
            String::from_utf8_lossy(&auth_response_bytes)
        ));
    }
    let auth_response: AuthResponse = serde_json::from_slice(&auth_response_bytes)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    Ok(auth_response.token)
}

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let state = test_state();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        let state = server_state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| state.register(cfg))
            .service(health::health)
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on bound port")
    .run();
    let server_handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let request_url = format!("http://127.0.0.1:{}/tasks", port);
    let payload = json!({ "title": "Unauthorized Task", "description": "nope" });

    let resp = client
        .post(&request_url)
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("error body should be JSON");
    assert_eq!(body["error"], "Unauthorized");

    let resp = client
        .post(&request_url)
        .header("Authorization", "Bearer not-a-token")
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    // Health stays open
    let resp = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert!(resp.status().is_success());

    assert!(state.tasks.is_empty(), "rejected requests must not reach the store");
    server_handle.stop(true).await;
}

#[actix_rt::test]
async fn test_rejected_tokens() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::config),
    )
    .await;

    let forged = TokenService::new(b"some-other-secret").generate_token().unwrap();
    let expired = TokenService::with_lifetime(SECRET, Duration::hours(-1))
        .generate_token()
        .unwrap();

    for token in [forged, expired, "garbage".to_string()] {
        let req = test::TestRequest::get()
            .uri("/tasks")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        let status = match resp {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.register(cfg))
            .service(health::health)
            .configure(routes::config),
    )
    .await;

    // Register, then log in for a second token
    let registration_token = register_user(&app, "alice", "password123")
        .await
        .expect("Failed to register test user for CRUD flow");

    let req_login = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "alice", "password": "password123" }))
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    assert_eq!(resp_login.status(), StatusCode::OK);
    let login: AuthResponse = test::read_body_json(resp_login).await;
    assert_ne!(login.token, registration_token);
    let token = login.token;

    // 1. Create Task
    let req_create = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "title": "buy milk", "description": "2%" }))
        .to_request();
    let resp_create = test::call_service(&app, req_create).await;
    assert_eq!(resp_create.status(), StatusCode::CREATED);
    let created_task: Task = test::read_body_json(resp_create).await;
    assert_eq!(created_task.title, "buy milk");
    assert_eq!(created_task.description, "2%");
    assert!(!created_task.completed);
    assert!(!created_task.id.is_empty());
    let task_id_1 = created_task.id.clone();

    // 2. Get Task by ID
    let req_get = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_get = test::call_service(&app, req_get).await;
    assert_eq!(resp_get.status(), StatusCode::OK);
    let fetched_task: Task = test::read_body_json(resp_get).await;
    assert_eq!(fetched_task, created_task);

    // 3. Update Task: completed in the body is ignored, result is always completed
    let req_update = test::TestRequest::put()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "title": "buy oat milk", "description": "unsweetened", "completed": false }))
        .to_request();
    let resp_update = test::call_service(&app, req_update).await;
    assert_eq!(resp_update.status(), StatusCode::OK);
    let updated_task: Task = test::read_body_json(resp_update).await;
    assert_eq!(
        updated_task,
        Task {
            id: task_id_1.clone(),
            title: "buy oat milk".into(),
            description: "unsweetened".into(),
            completed: true,
        }
    );

    // 4. Create a second task for Get All check
    let req_create2 = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "title": "CRUD Task 2", "description": "second" }))
        .to_request();
    let resp_create2 = test::call_service(&app, req_create2).await;
    assert_eq!(resp_create2.status(), StatusCode::CREATED);
    let created_task2: Task = test::read_body_json(resp_create2).await;
    let task_id_2 = created_task2.id;

    // 5. Get All Tasks
    let req_get_all = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_get_all = test::call_service(&app, req_get_all).await;
    assert_eq!(resp_get_all.status(), StatusCode::OK);
    let tasks: Vec<Task> = test::read_body_json(resp_get_all).await;
    let ids: HashSet<String> = tasks.into_iter().map(|t| t.id).collect();
    assert_eq!(ids, HashSet::from([task_id_1.clone(), task_id_2.clone()]));

    // 6. Delete Task 1
    let req_delete1 = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_delete1 = test::call_service(&app, req_delete1).await;
    assert_eq!(resp_delete1.status(), StatusCode::OK);
    let confirmation: serde_json::Value = test::read_body_json(resp_delete1).await;
    assert_eq!(confirmation["message"], "Task deleted successfully");

    // Verify Task 1 is deleted
    let req_get_deleted1 = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_get_deleted1 = test::call_service(&app, req_get_deleted1).await;
    assert_eq!(resp_get_deleted1.status(), StatusCode::NOT_FOUND);

    // Deleting and updating it again are both NotFound
    let req_delete_again = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_delete_again = test::call_service(&app, req_delete_again).await;
    assert_eq!(resp_delete_again.status(), StatusCode::NOT_FOUND);

    let req_update_missing = test::TestRequest::put()
        .uri(&format!("/tasks/{}", task_id_1))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "title": "ghost", "description": "gone" }))
        .to_request();
    let resp_update_missing = test::call_service(&app, req_update_missing).await;
    assert_eq!(resp_update_missing.status(), StatusCode::NOT_FOUND);

    // 7. Delete Task 2
    let req_delete2 = test::TestRequest::delete()
        .uri(&format!("/tasks/{}", task_id_2))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp_delete2 = test::call_service(&app, req_delete2).await;
    assert_eq!(resp_delete2.status(), StatusCode::OK);
    assert!(state.tasks.is_empty());
}

#[actix_rt::test]
async fn test_tasks_are_shared_between_users() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::config),
    )
    .await;

    let token_a = register_user(&app, "user_a", "PasswordOwnerA123!")
        .await
        .expect("Failed to register User A");
    let token_b = register_user(&app, "user_b", "PasswordOtherB123!")
        .await
        .expect("Failed to register User B");

    // User A creates a task
    let req_create = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token_a)))
        .set_json(json!({ "title": "User A's Task", "description": "mine" }))
        .to_request();
    let resp_create = test::call_service(&app, req_create).await;
    assert_eq!(resp_create.status(), StatusCode::CREATED);
    let task_a: Task = test::read_body_json(resp_create).await;

    // Tokens carry no identity, so User B sees and can fetch User A's task
    let req_get_by_b = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task_a.id))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token_b)))
        .to_request();
    let resp_get_by_b = test::call_service(&app, req_get_by_b).await;
    assert_eq!(resp_get_by_b.status(), StatusCode::OK);
    let fetched: Task = test::read_body_json(resp_get_by_b).await;
    assert_eq!(fetched, task_a);
}

#[actix_rt::test]
async fn test_invalid_task_bodies() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.register(cfg))
            .configure(routes::config),
    )
    .await;
    let token = state.tokens.generate_token().unwrap();

    let test_cases = vec![
        (json!({ "description": "no title" }), StatusCode::BAD_REQUEST, "missing title"),
        (json!({ "title": "no description" }), StatusCode::BAD_REQUEST, "missing description"),
        (
            json!({ "title": "", "description": "x" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty title",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected_status, "Test case failed: {}", description);
    }
    assert!(state.tasks.is_empty());
}

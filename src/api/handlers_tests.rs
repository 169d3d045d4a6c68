// Route-level tests for the REST store
use crate::{api::create_router, engine::store::Store, Message, User};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(Store::seeded().shared())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn message_ids(body: &str) -> Vec<i64> {
    let messages: Vec<Message> = serde_json::from_str(body).unwrap();
    messages.iter().map(|message| message.id).collect()
}

#[tokio::test]
async fn test_index() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello World!");
}

#[tokio::test]
async fn test_list_users_returns_seed_in_order() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let users: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        users[0],
        json!({
            "id": 1,
            "username": "john",
            "fullname": "Johnny Walker",
            "created": "2020-06-01T23:59:59.999Z"
        })
    );
    assert_eq!(users[1]["username"], "betty");
}

#[tokio::test]
async fn test_get_user() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/users/2", None).await;
    assert_eq!(status, StatusCode::OK);
    let user: User = serde_json::from_str(&body).unwrap();
    assert_eq!(user.username, "betty");

    let (status, body) = call(&app, Method::GET, "/users/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");

    let (status, _) = call(&app, Method::GET, "/users/not-a-number", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "alice", "fullname": "Alice Liddell"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created: User = serde_json::from_str(&body).unwrap();
    assert_eq!(created.username, "alice");

    let (status, body) = call(&app, Method::GET, &format!("/users/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<User>(&body).unwrap(), created);
}

#[tokio::test]
async fn test_create_user_missing_fullname() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/users", Some(json!({"username": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missed arguments");
}

#[tokio::test]
async fn test_create_user_without_body() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/users", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missed arguments");
}

#[tokio::test]
async fn test_create_user_duplicate_username() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "john", "fullname": "Another John"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Username already in use");
}

#[tokio::test]
async fn test_create_user_from_form_body() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=carol&fullname=Carol+Danvers"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let user: User = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(user.fullname, "Carol Danvers");
}

#[tokio::test]
async fn test_replace_user() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"username": "johnny", "fullname": "John Walker"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user: User = serde_json::from_str(&body).unwrap();
    assert_eq!((user.id, user.username.as_str()), (1, "johnny"));

    let (status, body) = call(&app, Method::PUT, "/users/1", Some(json!({"username": "j"}))).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Missed arguments"));

    let (status, body) = call(
        &app,
        Method::PUT,
        "/users/9",
        Some(json!({"username": "j", "fullname": "J"})),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "User not found"));

    let (status, body) = call(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"username": "betty", "fullname": "J"})),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Username already in use"));
}

#[tokio::test]
async fn test_patch_user() {
    let app = app();

    let (status, body) = call(&app, Method::PATCH, "/users/2", Some(json!({"fullname": "Betty C."}))).await;
    assert_eq!(status, StatusCode::OK);
    let user: User = serde_json::from_str(&body).unwrap();
    assert_eq!(user.username, "betty");
    assert_eq!(user.fullname, "Betty C.");

    let (status, body) = call(&app, Method::PATCH, "/users/2", Some(json!({}))).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Missed arguments"));

    let (status, body) = call(&app, Method::PATCH, "/users/9", Some(json!({"fullname": "X"}))).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "User not found"));
}

#[tokio::test]
async fn test_delete_user() {
    let app = app();

    let (status, body) = call(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::NOT_IMPLEMENTED, "Not Implemented"));

    let (status, body) = call(&app, Method::DELETE, "/users/9", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "User not found"));

    // the user is still there
    let (status, _) = call(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_messages() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message_ids(&body), vec![1, 2, 3, 4]);

    let (status, body) = call(&app, Method::GET, "/messages/4", None).await;
    assert_eq!(status, StatusCode::OK);
    let message: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        message,
        json!({
            "id": 4,
            "from": 2,
            "to": 1,
            "message": "getta out here ya jerk",
            "created": "2020-06-08T01:59:59.999Z"
        })
    );

    let (status, _) = call(&app, Method::GET, "/messages/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_message() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/messages",
        Some(json!({"from": 1, "to": 2, "message": "milkshake at 5?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message: Message = serde_json::from_str(&body).unwrap();
    assert_eq!(message.message, "milkshake at 5?");

    let (status, body) = call(&app, Method::POST, "/messages", Some(json!({"from": 1, "to": 2}))).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Missed arguments"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/messages",
        Some(json!({"from": 7, "to": 2, "message": "hi"})),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Sender not found"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/messages",
        Some(json!({"from": 1, "to": 7, "message": "hi"})),
    )
    .await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Recipient not found"));

    let (_, body) = call(&app, Method::GET, "/messages", None).await;
    assert_eq!(message_ids(&body).len(), 5);
}

async fn post_form(app: &Router, uri: &str, form: &'static str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_create_message_from_form_body() {
    let app = app();

    let (status, body) = post_form(&app, "/messages", "from=1&to=2&message=see+you").await;
    assert_eq!(status, StatusCode::OK);
    let message: Message = serde_json::from_str(&body).unwrap();
    assert_eq!((message.from, message.to), (1, 2));
    assert_eq!(message.message, "see you");

    let (status, body) = post_form(&app, "/messages", "from=&to=2&message=hi").await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Missed arguments"));

    let (status, body) = post_form(&app, "/messages", "from=abc&to=2&message=hi").await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "Missed arguments"));
}

#[tokio::test]
async fn test_create_message_with_string_ids() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/messages",
        Some(json!({"from": "2", "to": "1", "message": "ok"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message: Message = serde_json::from_str(&body).unwrap();
    assert_eq!((message.from, message.to), (2, 1));
}

#[tokio::test]
async fn test_undecodable_body_is_a_bad_request() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": 5, "fullname": "Five"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_messages_excludes_the_recipient() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/users/1/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message_ids(&body), vec![1, 3]);

    let (status, body) = call(&app, Method::GET, "/users/3/messages", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::BAD_REQUEST, "User not found"));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

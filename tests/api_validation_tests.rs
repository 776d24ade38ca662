//! 请求体校验测试（在访问数据库之前拒绝）

use axum::{
    http::{Method, StatusCode},
    response::Response,
    Router,
};
use serde_json::json;

mod common;
use common::{assert_error, bearer, create_test_app, get_with_auth, send_json, test_jwt_service};

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, None, body).await
}

#[tokio::test]
async fn test_register_short_password() {
    let response = post_json(
        create_test_app(),
        "/api/v1/auth/register",
        json!({"name": "Ann", "email": "ann@example.com", "password": "short"}),
    )
    .await;
    assert_error(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_ERROR",
        "password must be at least 8 characters",
    )
    .await;
}

#[tokio::test]
async fn test_register_rejects_client_chosen_role() {
    let response = post_json(
        create_test_app(),
        "/api/v1/auth/register",
        json!({
            "name": "eve",
            "email": "eve@example.com",
            "password": "long-enough-1",
            "role_id": 1
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_assign_role_requires_admin() {
    let token = test_jwt_service().issue(5, "clerk@example.com", Some(2)).unwrap();

    let response = send_json(
        create_test_app(),
        Method::PUT,
        "/api/v1/users/5/role",
        Some(&bearer(&token)),
        json!({ "role_id": 1 }),
    )
    .await;
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "insufficient permissions")
        .await;
}

#[tokio::test]
async fn test_register_invalid_email() {
    let response = post_json(
        create_test_app(),
        "/api/v1/auth/register",
        json!({"name": "Ann", "email": "not-an-email", "password": "long-enough-1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_empty_name() {
    let response = post_json(
        create_test_app(),
        "/api/v1/auth/register",
        json!({"name": "", "email": "ann@example.com", "password": "long-enough-1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_empty_password() {
    let response = post_json(
        create_test_app(),
        "/api/v1/auth/login",
        json!({"email": "ann@example.com", "password": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_users_limit_out_of_range() {
    let token = test_jwt_service().issue(1, "admin@example.com", Some(1)).unwrap();

    let response = get_with_auth(
        create_test_app(),
        "/api/v1/users?limit=0",
        Some(&bearer(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

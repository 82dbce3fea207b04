//! HTTP-level integration tests for the `/accounts` endpoints.
//!
//! Every response is checked for the absence of password material.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use lawmox_db::repositories::AccountRepo;
use sqlx::PgPool;

fn assert_no_password(json: &serde_json::Value) {
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("encrypted_password"));
}

async fn create_account(pool: &PgPool, entity_id: &str, username: &str) -> serde_json::Value {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": entity_id,
            "account_name": "Franchise Tax Board",
            "username": username,
            "password": "correct horse",
            "login_url": "https://ftb.example.gov",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_account_hides_password(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let json = create_account(&pool, &entity_id, "acme-ftb").await;

    assert_eq!(json["username"], "acme-ftb");
    assert_no_password(&json);

    let id: uuid::Uuid = json["id"].as_str().unwrap().parse().unwrap();
    let stored = AccountRepo::find_encrypted_password(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored, "correct horse");
    assert_eq!(common::test_cipher().decrypt(&stored).unwrap(), "correct horse");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_and_list_hide_password(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let created = create_account(&pool, &entity_id, "acme-ftb").await;
    let id = created["id"].as_str().unwrap();

    let response = get(common::build_test_app(pool.clone()), &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_no_password(&body_json(response).await);

    let response = get(common::build_test_app(pool), "/api/v1/accounts").await;
    let json = body_json(response).await;
    for account in json.as_array().unwrap() {
        assert_no_password(account);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_password_is_rejected(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": entity_id,
            "account_name": "Bank",
            "username": "acme-bank",
            "password": "",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_login_url_is_rejected(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": entity_id,
            "account_name": "Bank",
            "username": "acme-bank",
            "password": "x",
            "login_url": "not a url",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_entity_returns_400(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": uuid::Uuid::new_v4(),
            "account_name": "Bank",
            "username": "orphan",
            "password": "x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_returns_409(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    create_account(&pool, &entity_id, "shared-login").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": entity_id,
            "account_name": "Other",
            "username": "shared-login",
            "password": "x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_empty_password_keeps_it(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let created = create_account(&pool, &entity_id, "acme-ftb").await;
    let id: uuid::Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/accounts/{id}"),
        serde_json::json!({"account_name": "FTB", "password": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["account_name"], "FTB");
    assert_no_password(&json);

    let stored = AccountRepo::find_encrypted_password(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(common::test_cipher().decrypt(&stored).unwrap(), "correct horse");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_new_password_reencrypts(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let created = create_account(&pool, &entity_id, "acme-ftb").await;
    let id: uuid::Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/accounts/{id}"),
        serde_json::json!({"password": "battery staple"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_no_password(&body_json(response).await);

    let stored = AccountRepo::find_encrypted_password(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(common::test_cipher().decrypt(&stored).unwrap(), "battery staple");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_entity_id(pool: PgPool) {
    let acme = common::create_entity(&pool, "Acme").await;
    let globex = common::create_entity(&pool, "Globex").await;
    create_account(&pool, &acme, "acme-1").await;
    create_account(&pool, &globex, "globex-1").await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/accounts?entity_id={acme}"),
    )
    .await;
    let json = body_json(response).await;
    let accounts = json.as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["username"], "acme-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_entity_filter_lists_all_accounts(pool: PgPool) {
    let acme = common::create_entity(&pool, "Acme").await;
    let globex = common::create_entity(&pool, "Globex").await;
    create_account(&pool, &acme, "acme-1").await;
    create_account(&pool, &globex, "globex-1").await;

    let response = get(common::build_test_app(pool), "/api/v1/accounts?entity_id=").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn username_with_surrounding_whitespace_returns_409(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let created = create_account(&pool, &entity_id, "acme").await;
    assert_eq!(created["username"], "acme");

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/accounts",
        serde_json::json!({
            "entity_id": entity_id,
            "account_name": "Other",
            "username": " acme",
            "password": "x",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_account_returns_204(pool: PgPool) {
    let entity_id = common::create_entity(&pool, "Acme").await;
    let created = create_account(&pool, &entity_id, "acme-ftb").await;
    let id = created["id"].as_str().unwrap();

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(common::build_test_app(pool), &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#![allow(missing_docs)]

use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use rusqlite::Connection;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, AuthConfig, Claims, build_router, csv_import::ImportConfig, endpoints,
};

pub const TEST_SECRET: &str = "a very secret test secret";

fn sign(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Could not sign token")
}

fn expiry(offset: Duration) -> usize {
    (OffsetDateTime::now_utc() + offset).unix_timestamp() as usize
}

/// A token for `sub` that expires in an hour.
pub fn token_for(sub: &str) -> String {
    sign(&Claims {
        sub: sub.to_owned(),
        exp: expiry(Duration::hours(1)),
        iss: None,
    })
}

/// A token for `sub` that expired an hour ago.
pub fn expired_token_for(sub: &str) -> String {
    sign(&Claims {
        sub: sub.to_owned(),
        exp: expiry(Duration::hours(-1)),
        iss: None,
    })
}

pub fn token_with_issuer(sub: &str, issuer: &str) -> String {
    sign(&Claims {
        sub: sub.to_owned(),
        exp: expiry(Duration::hours(1)),
        iss: Some(issuer.to_owned()),
    })
}

pub fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(
        connection,
        &AuthConfig::new(TEST_SECRET, None),
        ImportConfig::default(),
    )
    .expect("Could not create app state")
}

pub fn get_test_server_from_state(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

pub fn get_test_server() -> TestServer {
    get_test_server_from_state(get_test_state())
}

#[track_caller]
fn must_get_id(response: &axum_test::TestResponse) -> String {
    match &response.json::<Value>()["data"]["id"] {
        Value::String(id) => id.clone(),
        other => panic!("Expected an ID in the response, got {other}"),
    }
}

pub async fn must_create_account(server: &TestServer, user: &str, name: &str) -> String {
    let response = server
        .post(endpoints::ACCOUNTS)
        .authorization_bearer(token_for(user))
        .json(&json!({ "name": name }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    must_get_id(&response)
}

pub async fn must_create_category(server: &TestServer, user: &str, name: &str) -> String {
    let response = server
        .post(endpoints::CATEGORIES)
        .authorization_bearer(token_for(user))
        .json(&json!({ "name": name }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    must_get_id(&response)
}

pub async fn must_create_transaction(
    server: &TestServer,
    user: &str,
    account_id: &str,
    date: &str,
    payee: &str,
) -> String {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token_for(user))
        .json(&json!({
            "date": date,
            "amount": -1000,
            "payee": payee,
            "accountId": account_id,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    must_get_id(&response)
}

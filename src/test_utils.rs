//! Helpers for driving the router in tests without a database.

use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Header};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::{
        claims::{Claims, TokenKind},
        jwt::JwtKeys,
    },
    state::AppState,
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

/// Sends one request through `app` and returns the status with the parsed
/// JSON body, or `Value::Null` when the body is not JSON.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Creates a user directly in the store and signs an access token for it.
/// Skips argon2 so route tests stay fast.
pub async fn seed_user(state: &AppState, email: &str) -> (User, String) {
    let user = state
        .store
        .create_user(NewUser {
            email: email.to_string(),
            name: "Test User".into(),
            password_hash: "not-a-real-hash".into(),
        })
        .await
        .unwrap();
    let token = JwtKeys::from_ref(state).sign_access(user.id).unwrap();
    (user, token)
}

/// An access token for `user_id`, correctly signed for `state` but expired an
/// hour ago.
pub fn expired_token(state: &AppState, user_id: Uuid) -> String {
    let keys = JwtKeys::from_ref(state);
    let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        iat: now - 7200,
        exp: now - 3600,
        iss: keys.issuer.clone(),
        aud: keys.audience.clone(),
        kind: TokenKind::Access,
    };
    encode(&Header::default(), &claims, &keys.encoding).unwrap()
}

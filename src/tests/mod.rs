mod user;

use std::sync::Arc;

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::StatusCode,
    response::Response,
    Router,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

use crate::{
    models::{
        auth::{LoginPayload, RegisterPayload, UserInfo},
        listing::{CreateListingRequest, Listing},
    },
    state::AppState,
};

type TestError = Box<dyn std::error::Error + Send + Sync>;

async fn parse_resp<T: DeserializeOwned>(resp: Response<Body>) -> Result<T, TestError> {
    let body = resp.into_body();
    let limit = body.size_hint().upper().unwrap_or(u64::MAX) as usize;
    let data = axum::body::to_bytes(body, limit).await?;
    let res: T = serde_json::from_slice(&data)?;

    Ok(res)
}

fn build_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<T>,
) -> Result<Request<Body>, TestError> {
    let mut builder = Request::builder().method(method).uri(uri);
    if !token.is_empty() {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(v) => {
            let content = serde_json::to_string(&v)?;
            builder
                .header("Content-Type", "application/json")
                .body(Body::new(content))
        }
        None => builder.body(Body::empty()),
    }?;
    Ok(req)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn register_and_login(
    service: &Router,
    nick: &str,
    password: &str,
) -> Result<UserInfo, TestError> {
    let req = build_request(
        "POST",
        "/v1/auth/register",
        "",
        Some(RegisterPayload {
            nick: nick.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = build_request(
        "POST",
        "/v1/auth/login",
        "",
        Some(LoginPayload {
            nick: nick.to_string(),
            password: password.to_string(),
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    parse_resp(resp).await
}

/// Admin accounts are created by out-of-scope administrative action, so
/// tests grant the flag straight through the store.
fn promote_admin(state: &AppState, user_id: u64) {
    let mut user = state.store.get_user(user_id).unwrap().unwrap();
    user.admin = true;
    state.store.put_user(user).unwrap();
}

async fn add_listing(
    service: &Router,
    token: &str,
    asking_price: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Listing, TestError> {
    let req = build_request(
        "POST",
        "/v1/listings",
        token,
        Some(CreateListingRequest {
            name: "Amber necklace".to_string(),
            description: Some("Baltic amber, silver clasp".to_string()),
            asking_price,
            start_date,
            end_date,
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    parse_resp(resp).await
}

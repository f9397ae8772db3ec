use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Days;
use tower::ServiceExt;

use crate::{
    create_service,
    models::{
        auth::LoginPayload,
        user::{UpdateUserRequest, UserProfile},
    },
    state::AppState,
    tests::{
        add_listing, build_request, parse_resp, promote_admin, register_and_login, today,
        TestError,
    },
};

#[tokio::test]
async fn test_get_and_list_users() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state);

    let alice = register_and_login(&service, "alice", "hunter2").await?;
    register_and_login(&service, "bob", "hunter2").await?;

    let req = build_request::<()>("GET", &format!("/v1/users/{}", alice.id), "", None)?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: UserProfile = parse_resp(resp).await?;
    assert_eq!(profile.nick, "alice");

    let req = build_request::<()>("GET", "/v1/users", "", None)?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<UserProfile> = parse_resp(resp).await?;
    assert_eq!(users.len(), 2);

    let req = build_request::<()>("GET", "/v1/users/999", "", None)?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_edit_nick_conflict() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state);

    register_and_login(&service, "alice", "hunter2").await?;
    let bob = register_and_login(&service, "bob", "hunter2").await?;

    let req = build_request(
        "PATCH",
        &format!("/v1/users/{}", bob.id),
        &bob.token,
        Some(UpdateUserRequest {
            nick: Some("alice".to_string()),
            ..Default::default()
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_edit_other_user_denied_unless_admin() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state.clone());

    let alice = register_and_login(&service, "alice", "hunter2").await?;
    let bob = register_and_login(&service, "bob", "hunter2").await?;

    let patch = UpdateUserRequest {
        first_name: Some("Robert".to_string()),
        ..Default::default()
    };

    let req = build_request(
        "PATCH",
        &format!("/v1/users/{}", bob.id),
        &alice.token,
        Some(patch.clone()),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The same edit goes through once alice is an admin. Tokens carry the
    // flag only informationally; permissions read the live user row.
    promote_admin(&state, alice.id);
    let req = build_request(
        "PATCH",
        &format!("/v1/users/{}", bob.id),
        &alice.token,
        Some(patch),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: UserProfile = parse_resp(resp).await?;
    assert_eq!(profile.first_name.as_deref(), Some("Robert"));
    Ok(())
}

#[tokio::test]
async fn test_password_change_verifies_old_password() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state);

    let alice = register_and_login(&service, "alice", "hunter2").await?;

    let req = build_request(
        "PATCH",
        &format!("/v1/users/{}", alice.id),
        &alice.token,
        Some(UpdateUserRequest {
            old_password: Some("wrong".to_string()),
            new_password: Some("correct horse".to_string()),
            ..Default::default()
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = build_request(
        "PATCH",
        &format!("/v1/users/{}", alice.id),
        &alice.token,
        Some(UpdateUserRequest {
            old_password: Some("hunter2".to_string()),
            new_password: Some("correct horse".to_string()),
            ..Default::default()
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = build_request(
        "POST",
        "/v1/auth/login",
        "",
        Some(LoginPayload {
            nick: "alice".to_string(),
            password: "correct horse".to_string(),
        }),
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_delete_user_cascades_to_listings() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state);

    let owner = register_and_login(&service, "owner", "hunter2").await?;
    let first = add_listing(&service, &owner.token, 10, today(), today() + Days::new(3)).await?;
    let second = add_listing(&service, &owner.token, 20, today(), today() + Days::new(3)).await?;

    let req = build_request::<()>(
        "DELETE",
        &format!("/v1/users/{}", owner.id),
        &owner.token,
        None,
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    for id in [first.id, second.id] {
        let req = build_request::<()>("GET", &format!("/v1/listings/{}", id), "", None)?;
        let resp = service.clone().oneshot(req).await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = build_request::<()>("GET", &format!("/v1/users/{}", owner.id), "", None)?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_delete_other_user_denied() -> Result<(), TestError> {
    let state = Arc::new(AppState::test());
    let service = create_service(state);

    let alice = register_and_login(&service, "alice", "hunter2").await?;
    let bob = register_and_login(&service, "bob", "hunter2").await?;

    let req = build_request::<()>(
        "DELETE",
        &format!("/v1/users/{}", alice.id),
        &bob.token,
        None,
    )?;
    let resp = service.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

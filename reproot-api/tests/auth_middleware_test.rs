mod common;

use axum::http::StatusCode;
use common::spawn_app;
use reproot_api::models::{ApprovalStatus, Role};
use reproot_api::store::PortalStore;
use serde_json::json;

#[tokio::test]
async fn protected_route_requires_a_token() {
    let app = spawn_app();

    let (status, _) = app.get("/api/users/get-users").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = spawn_app();

    let (status, _) = app.get_auth("/api/auth/user-auth", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_passes_user_auth_probe() {
    let app = spawn_app();
    let (_, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, body) = app.get_auth("/api/auth/user-auth", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn student_token_cannot_reach_super_admin_routes() {
    let app = spawn_app();
    let (_, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, _) = app.get_auth("/api/users/get-users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get_auth("/api/auth/admin-auth", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_token_cannot_reach_institution_admin_routes() {
    let app = spawn_app();
    let (_, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, _) = app.get_auth("/api/users/student/my-students", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_passes_admin_auth_probe() {
    let app = spawn_app();
    let (_, token) = app
        .seed_principal(
            "Root",
            "root@example.com",
            Role::SuperAdmin,
            true,
            ApprovalStatus::Approved,
        )
        .await;

    let (status, body) = app.get_auth("/api/auth/admin-auth", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn token_for_a_deleted_principal_is_forbidden() {
    // Guards re-read the principal from the store on every request, so a
    // token outliving its account grants nothing.
    let app = spawn_app();
    let (id, token) = app
        .seed_principal(
            "Root",
            "root@example.com",
            Role::SuperAdmin,
            true,
            ApprovalStatus::Approved,
        )
        .await;

    let (status, _) = app.get_auth("/api/users/get-users", &token).await;
    assert_eq!(status, StatusCode::OK);

    app.store.delete_principal(&id).await.unwrap();

    let (status, _) = app.get_auth("/api/users/get-users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn revoking_employer_approval_cuts_off_employer_routes() {
    let app = spawn_app();
    let (id, token) = app
        .seed_principal(
            "Eve",
            "eve@example.com",
            Role::Employer,
            true,
            ApprovalStatus::Approved,
        )
        .await;

    let (status, _) = app
        .put_json_auth(
            &format!("/api/users/employer-details/{}", id),
            json!({
                "company_name": "Eve Corp",
                "description": "We build things",
                "others": null
            }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    app.store
        .set_approval_status(&id, reproot_api::models::ApprovalStatus::Rejected)
        .await
        .unwrap();

    let (status, _) = app
        .get_auth(&format!("/api/users/employer-details/{}", id), &token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_user_only_allows_the_owner() {
    let app = spawn_app();
    let (ada_id, _) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;
    let (_, grace_token) = app
        .seed_principal(
            "Grace",
            "grace@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, _) = app
        .put_json_auth(
            &format!("/api/users/update-user/{}", ada_id),
            json!({
                "name": "Imposter",
                "bio": "A bio long enough to pass",
                "location": "Nowhere",
                "education": [],
                "skills": ["rust"]
            }),
            &grace_token,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

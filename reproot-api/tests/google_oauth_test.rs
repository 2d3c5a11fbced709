mod common;

use common::spawn_app;
use reproot_api::models::{ApprovalStatus, Role};
use reproot_api::store::PortalStore;

// The code exchange with Google needs the network, so these exercise the
// login service directly against the in-memory store.

#[tokio::test]
async fn oauth_creates_a_verified_pending_student() {
    let app = spawn_app();

    let (token, user) = app
        .state
        .auth
        .oauth_login("ada@gmail.com", "Ada Lovelace", "google-sub-1")
        .await
        .unwrap();

    assert!(!token.is_empty());
    assert_eq!(user.role, Role::Student);
    assert!(user.is_verified);
    assert_eq!(user.approval_status, ApprovalStatus::Pending);

    let stored = app
        .store
        .find_principal_by_email("ada@gmail.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.google_id.as_deref(), Some("google-sub-1"));
    assert!(stored.password_hash.is_none());
}

#[tokio::test]
async fn oauth_links_to_an_existing_password_account_instead_of_duplicating() {
    let app = spawn_app();
    let (id, _) = app
        .seed_principal(
            "Ada",
            "ada@gmail.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (_, user) = app
        .state
        .auth
        .oauth_login("Ada@Gmail.com", "Ada From Google", "google-sub-1")
        .await
        .unwrap();

    // Same account, now linked. Name and records stay as they were.
    assert_eq!(user.id, id);
    let stored = app.store.find_principal_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.google_id.as_deref(), Some("google-sub-1"));
    assert_eq!(stored.display_name, "Ada");
    assert_eq!(
        app.store
            .list_principals_by_role(Role::Student)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn repeat_oauth_login_does_not_relink() {
    let app = spawn_app();

    let (_, first) = app
        .state
        .auth
        .oauth_login("ada@gmail.com", "Ada", "google-sub-1")
        .await
        .unwrap();
    let (token, second) = app
        .state
        .auth
        .oauth_login("ada@gmail.com", "Ada", "google-sub-1")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(!token.is_empty());
}

#[tokio::test]
async fn oauth_account_linked_to_password_login_keeps_password_login_working() {
    let app = spawn_app();
    app.seed_principal(
        "Ada",
        "ada@gmail.com",
        Role::Student,
        true,
        ApprovalStatus::Pending,
    )
    .await;

    app.state
        .auth
        .oauth_login("ada@gmail.com", "Ada", "google-sub-1")
        .await
        .unwrap();

    let (status, _) = app
        .post_json(
            "/api/auth/login",
            serde_json::json!({"email": "ada@gmail.com", "password": "password123"}),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
}

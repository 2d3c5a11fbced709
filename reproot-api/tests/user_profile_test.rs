mod common;

use axum::http::StatusCode;
use common::spawn_app;
use reproot_api::models::{ApprovalStatus, Role};
use reproot_api::store::PortalStore;
use serde_json::json;

#[tokio::test]
async fn update_user_saves_profile_and_display_name() {
    let app = spawn_app();
    let (id, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, body) = app
        .put_json_auth(
            &format!("/api/users/update-user/{}", id),
            json!({
                "name": "Ada Lovelace",
                "bio": "Math and machines",
                "location": "London",
                "education": [{
                    "level": "Undergraduate",
                    "institution_name": "University of London",
                    "institution_location": "London",
                    "start_year": 2020,
                    "end_year": 2024,
                    "degree": "BSc Mathematics"
                }],
                "skills": ["rust", "mongodb"]
            }),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["bio"], "Math and machines");

    let (status, body) = app.get(&format!("/api/users/get-user/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["profile"]["location"], "London");
    assert_eq!(body["profile"]["education"][0]["degree"], "BSc Mathematics");
}

#[tokio::test]
async fn update_user_rejects_out_of_range_education_years() {
    let app = spawn_app();
    let (id, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, _) = app
        .put_json_auth(
            &format!("/api/users/update-user/{}", id),
            json!({
                "name": "Ada",
                "bio": "Math and machines",
                "location": "London",
                "education": [{
                    "level": "Undergraduate",
                    "institution_name": "University of London",
                    "institution_location": "London",
                    "start_year": 1492,
                    "end_year": 2024,
                    "degree": "BSc"
                }],
                "skills": ["rust"]
            }),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_without_profile_returns_null_profile() {
    let app = spawn_app();
    let (id, _) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let (status, body) = app.get(&format!("/api/users/get-user/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["profile"].is_null());
}

#[tokio::test]
async fn my_students_lists_only_own_institution() {
    let app = spawn_app();
    let (_, alan_token) = app
        .seed_principal(
            "Alan",
            "alan@example.com",
            Role::InstitutionAdmin,
            true,
            ApprovalStatus::Approved,
        )
        .await;
    let (_, grace_token) = app
        .seed_principal(
            "Grace",
            "grace@example.com",
            Role::InstitutionAdmin,
            true,
            ApprovalStatus::Approved,
        )
        .await;
    app.seed_principal(
        "Ada",
        "ada@example.com",
        Role::Student,
        true,
        ApprovalStatus::Pending,
    )
    .await;

    app.post_json_auth(
        "/api/users/student/approve-student",
        json!({"email": "ada@example.com"}),
        &alan_token,
    )
    .await;

    let (_, body) = app.get_auth("/api/users/student/my-students", &alan_token).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["users"][0]["email"], "ada@example.com");

    let (_, body) = app
        .get_auth("/api/users/student/my-students", &grace_token)
        .await;
    assert!(body["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn super_admin_lists_and_deletes_users() {
    let app = spawn_app();
    let (_, super_token) = app
        .seed_principal(
            "Root",
            "root@example.com",
            Role::SuperAdmin,
            true,
            ApprovalStatus::Approved,
        )
        .await;
    let (student_id, _) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;
    app.seed_principal(
        "Eve",
        "eve@example.com",
        Role::Employer,
        true,
        ApprovalStatus::Pending,
    )
    .await;

    let (status, body) = app.get_auth("/api/users/get-users", &super_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    let (status, body) = app.get_auth("/api/users/get-employers", &super_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["email"], "eve@example.com");

    let (status, _) = app
        .delete_auth(&format!("/api/users/delete-user/{}", student_id), &super_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app
        .store
        .find_principal_by_id(&student_id)
        .await
        .unwrap()
        .is_none());

    let (status, _) = app
        .delete_auth(&format!("/api/users/delete-user/{}", student_id), &super_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeat_profile_update_keeps_the_same_document() {
    let app = spawn_app();
    let (id, token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;

    let first_update = json!({
        "name": "Ada",
        "bio": "Math and machines",
        "location": "London",
        "education": [],
        "skills": ["rust"]
    });
    let (status, _) = app
        .put_json_auth(&format!("/api/users/update-user/{}", id), first_update, &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let first = app.store.find_student_profile(&id).await.unwrap().unwrap();

    let second_update = json!({
        "name": "Ada Lovelace",
        "bio": "Machines and mathematics",
        "location": "Cambridge",
        "education": [],
        "skills": ["rust", "mongodb"]
    });
    let (status, _) = app
        .put_json_auth(&format!("/api/users/update-user/{}", id), second_update, &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let second = app.store.find_student_profile(&id).await.unwrap().unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.location, "Cambridge");
    assert_eq!(second.skills, vec!["rust", "mongodb"]);
}

#[tokio::test]
async fn repeat_company_details_update_keeps_the_same_document() {
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
            json!({"company_name": "Eve Corp", "description": "We build things", "others": null}),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let first = app.store.find_company_profile(&id).await.unwrap().unwrap();

    let (status, body) = app
        .put_json_auth(
            &format!("/api/users/employer-details/{}", id),
            json!({"company_name": "Eve Corp", "description": "We ship things", "others": "Remote first"}),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let second = app.store.find_company_profile(&id).await.unwrap().unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.description, "We ship things");
    assert_eq!(body["company"]["_id"], first.id);
}

mod common;

use axum::http::StatusCode;
use common::{spawn_app, TestApp};
use reproot_api::models::{ApprovalStatus, Role};
use serde_json::{json, Value};

fn job_body() -> Value {
    json!({
        "title": "Junior Rust Engineer",
        "description": "Build backend services",
        "location": "Remote",
        "employment_type": "Full-time",
        "experience_level": "Entry Level",
        "industry": "Software",
        "salary": "50000",
        "required_skills": ["rust", "mongodb"],
        "application_deadline": "2026-12-31T00:00:00Z",
        "education_level": "Undergraduate"
    })
}

async fn seed_employer_with_profile(app: &TestApp) -> (String, String) {
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
    (id, token)
}

#[tokio::test]
async fn posting_a_job_requires_company_details() {
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

    let (status, body) = app
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", id),
            job_body(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Company details are required before posting jobs"
    );
}

#[tokio::test]
async fn posted_job_carries_the_company_name() {
    let app = spawn_app();
    let (id, token) = seed_employer_with_profile(&app).await;

    let (status, body) = app
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", id),
            job_body(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job_post"]["company_name"], "Eve Corp");
    assert_eq!(body["job_post"]["employer"], id);
}

#[tokio::test]
async fn employer_cannot_post_under_another_employer_id() {
    let app = spawn_app();
    let (_, token) = seed_employer_with_profile(&app).await;
    let (other_id, _) = app
        .seed_principal(
            "Mallory",
            "mallory@example.com",
            Role::Employer,
            true,
            ApprovalStatus::Approved,
        )
        .await;

    let (status, _) = app
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", other_id),
            job_body(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn students_cannot_create_job_posts() {
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
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", id),
            job_body(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn apply_records_the_candidate_once() {
    let app = spawn_app();
    let (employer_id, employer_token) = seed_employer_with_profile(&app).await;
    let (_, body) = app
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", employer_id),
            job_body(),
            &employer_token,
        )
        .await;
    let job_id = body["job_post"]["_id"].as_str().unwrap().to_string();

    let (student_id, student_token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Approved,
        )
        .await;

    let (status, body) = app
        .post_json_auth("/api/jobs/apply", json!({"job_id": job_id}), &student_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["job_post"]["applied_candidates"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == student_id.as_str()));

    let (status, _) = app
        .post_json_auth("/api/jobs/apply", json!({"job_id": job_id}), &student_token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn applied_candidates_joins_profiles() {
    let app = spawn_app();
    let (employer_id, employer_token) = seed_employer_with_profile(&app).await;
    let (_, body) = app
        .post_json_auth(
            &format!("/api/jobs/create-job-post/{}", employer_id),
            job_body(),
            &employer_token,
        )
        .await;
    let job_id = body["job_post"]["_id"].as_str().unwrap().to_string();

    let (student_id, student_token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Approved,
        )
        .await;
    app.put_json_auth(
        &format!("/api/users/update-user/{}", student_id),
        json!({
            "name": "Ada Lovelace",
            "bio": "Math and machines",
            "location": "London",
            "education": [],
            "skills": ["rust"]
        }),
        &student_token,
    )
    .await;
    app.post_json_auth("/api/jobs/apply", json!({"job_id": &job_id}), &student_token)
        .await;

    let (status, body) = app
        .get_auth(
            &format!("/api/jobs/applied-candidates/{}", job_id),
            &employer_token,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_candidates"], 1);
    let candidate = &body["candidates"][0];
    assert_eq!(candidate["email"], "ada@example.com");
    assert_eq!(candidate["details"]["bio"], "Math and machines");
}

#[tokio::test]
async fn get_jobs_requires_authentication_but_any_role() {
    let app = spawn_app();
    let (employer_id, employer_token) = seed_employer_with_profile(&app).await;
    app.post_json_auth(
        &format!("/api/jobs/create-job-post/{}", employer_id),
        job_body(),
        &employer_token,
    )
    .await;

    let (status, _) = app.get("/api/jobs/get-jobs").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, student_token) = app
        .seed_principal(
            "Ada",
            "ada@example.com",
            Role::Student,
            true,
            ApprovalStatus::Pending,
        )
        .await;
    let (status, body) = app.get_auth("/api/jobs/get-jobs", &student_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_posts"].as_array().unwrap().len(), 1);
}

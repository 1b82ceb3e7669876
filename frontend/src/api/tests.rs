use super::*;
use crate::error::ClientErrorKind;
use crate::web::http::MockTransport;
use serde_json::json;
use sqlab_shared::MIME_PDF;
use sqlab_shared::protocol::{HttpMethod, Payload};

const BASE: &str = "https://api.test";

fn api(token: Option<&str>) -> SqlabApi<MockTransport> {
    SqlabApi::new(
        MockTransport::new(),
        AppConfig::new(BASE),
        token.map(str::to_string),
    )
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

#[tokio::test]
async fn authenticated_calls_carry_bearer_token() {
    let api = api(Some("tok-1"));
    api.transport().mock_response(
        HttpMethod::Get,
        &url("/api/user/"),
        200,
        json!({"username": "lea", "email": "lea@ecole.fr", "is_teacher": false}),
    );

    let user = api.user_info().await.unwrap();
    assert_eq!(user.username, "lea");

    let req = api.transport().last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer tok-1"));
    assert_eq!(req.method, HttpMethod::Get);
}

#[tokio::test]
async fn missing_token_short_circuits_before_sending() {
    let api = api(None);
    let err = api.exercises().await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::MissingSession);
    assert_eq!(api.transport().request_count(), 0);
}

#[tokio::test]
async fn token_endpoint_is_sent_without_authorization() {
    let api = api(None);
    api.transport().mock_response(
        HttpMethod::Post,
        &url("/api/token/"),
        200,
        json!({"access": "a", "refresh": "r"}),
    );

    let pair = api
        .obtain_token(&Credentials {
            username: "lea".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(pair.access, "a");

    let req = api.transport().last_request().unwrap();
    assert_eq!(req.header("Authorization"), None);
    assert_eq!(
        req.payload,
        Payload::Json(json!({"username": "lea", "password": "secret"}))
    );
}

#[tokio::test]
async fn error_body_becomes_message() {
    let api = api(Some("tok"));
    api.transport().mock_response(
        HttpMethod::Post,
        &url("/api/submit/"),
        400,
        json!({"error": "Le fichier doit être un PDF."}),
    );

    let err = api
        .submit(3, Upload::new("a.txt", "text/plain", vec![1, 2]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::BadRequest);
    assert_eq!(err.message(), "Le fichier doit être un PDF.");
    assert_eq!(err.ops(), ["api.call(/api/submit/)".to_string()]);
}

#[tokio::test]
async fn empty_delete_response_is_accepted() {
    let api = api(Some("tok"));
    api.transport()
        .mock_raw(HttpMethod::Delete, &url("/api/exercises/5/delete/"), 204, "");
    api.delete_exercise(5).await.unwrap();
}

#[tokio::test]
async fn unknown_route_maps_to_not_found() {
    let api = api(Some("tok"));
    let err = api.delete_exercise(5).await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::NotFound);
}

#[tokio::test]
async fn network_failures_are_reported() {
    let api = api(Some("tok"));
    api.transport().mock_network_failure(&url("/api/teacher-statistics/"));
    let err = api.teacher_statistics().await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Network);
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let api = api(Some("tok"));
    api.transport()
        .mock_raw(HttpMethod::Get, &url("/api/exercises/"), 200, "<html>");
    let err = api.exercises().await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Decode);
}

#[tokio::test]
async fn submission_counts_degrade_to_zero() {
    let api = api(Some("tok"));
    api.transport().mock_response(
        HttpMethod::Get,
        &url("/api/exercises/1/submissions/"),
        200,
        json!([
            {"id": 1, "student": {"id": 2, "username": "lea", "email": ""},
             "exercise": "Jointures", "file": "/media/s1.pdf",
             "submitted_at": "2025-03-12T14:30:00Z", "score": 12, "feedback": null, "is_locked": true},
            {"id": 2, "student": {"id": 3, "username": "tom", "email": ""},
             "exercise": "Jointures", "file": "/media/s2.pdf",
             "submitted_at": "2025-03-13T09:00:00Z", "score": null, "feedback": null, "is_locked": false}
        ]),
    );
    api.transport().mock_response(
        HttpMethod::Get,
        &url("/api/exercises/2/submissions/"),
        500,
        json!({"error": "boom"}),
    );

    let counts = api.submission_counts(&[1, 2]).await;
    assert_eq!(counts, vec![(1, 2), (2, 0)]);
}

#[tokio::test]
async fn create_exercise_is_sent_as_multipart() {
    let api = api(Some("tok"));
    api.transport().mock_response(
        HttpMethod::Post,
        &url("/api/exercises/add/"),
        201,
        json!({"message": "Exercice ajouté", "id": 9}),
    );

    let created = api
        .create_exercise("Vues", Upload::new("vues.pdf", MIME_PDF, vec![0x25]), None)
        .await
        .unwrap();
    assert_eq!(created.id, 9);

    let req = api.transport().last_request().unwrap();
    assert!(matches!(req.payload, Payload::Multipart(ref fields) if fields.len() == 2));
}

#[test]
fn file_url_resolves_against_base() {
    let api = api(None);
    assert_eq!(
        api.file_url("/media/exercises/tp.pdf"),
        "https://api.test/media/exercises/tp.pdf"
    );
}

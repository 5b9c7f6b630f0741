use bioid_cli::api::{ActionRequest, ApiClient, AuthBackend};
use bioid_cli::session::SessionStore;
use bioid_cli::ui;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn reports_sensor_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ready",
            "message": "System is initialized."
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).unwrap();
    let status = api.system_status().await.unwrap();

    assert!(status.is_ready());
    assert_eq!(status.message.as_deref(), Some("System is initialized."));
}

#[tokio::test]
async fn verify_session_unlocks_activity_feed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/verify-auto"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                .set_body_json(json!({"status": "success", "user_id": "agent007"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/activity"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "logs": [
                {"action": "LOGIN", "details": "Biometric verification success", "date": "2026-10-18 09:00:00"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).unwrap();
    let verdict = api
        .submit("/api/verify-auto", &ActionRequest::verify())
        .await
        .unwrap();
    assert!(verdict.is_success());
    assert_eq!(api.session_cookie().as_deref(), Some("session=abc123"));

    let feed = api.activity().await.unwrap();
    assert!(feed.is_success());
    assert_eq!(feed.logs.len(), 1);
    assert_eq!(feed.logs[0].action, "LOGIN");
}

#[tokio::test]
async fn restored_session_is_sent_on_a_fresh_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "logs": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).unwrap();
    api.restore_session("session=abc123");
    let feed = api.activity().await.unwrap();

    assert!(feed.is_success());
    assert!(feed.logs.is_empty());
}

#[tokio::test]
async fn activity_without_session_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"status": "error", "message": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).unwrap();
    let feed = api.activity().await.unwrap();

    assert!(!feed.is_success());
    assert_eq!(feed.message.as_deref(), Some("Unauthorized"));
}

#[tokio::test]
async fn logout_ends_backend_session_with_saved_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logout"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bye</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::at(dir.path().join("session"));
    session.save("session=abc123").unwrap();

    let api = ApiClient::new(&server.uri()).unwrap();
    api.restore_session(&session.load().unwrap().unwrap());
    let ended = ui::logout(&api, &session).await.unwrap();

    assert!(ended);
    assert_eq!(session.load().unwrap(), None);
}

#[tokio::test]
async fn logout_error_status_still_forgets_local_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::at(dir.path().join("session"));
    session.save("session=abc123").unwrap();

    let api = ApiClient::new(&server.uri()).unwrap();
    api.restore_session("session=abc123");
    assert!(api.logout().await.is_err());

    let ended = ui::logout(&api, &session).await.unwrap();
    assert!(!ended);
    assert_eq!(session.load().unwrap(), None);
}

#[tokio::test]
async fn logout_without_session_stays_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::at(dir.path().join("session"));
    let api = ApiClient::new(&server.uri()).unwrap();

    assert!(ui::logout(&api, &session).await.unwrap());
}

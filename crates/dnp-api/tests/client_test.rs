#![allow(clippy::unwrap_used)]
// Integration tests for `DnpClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnp_api::models::{
    AddDnpRequest, CreateOffenseRequest, EnforcementRunRequest, NewEvidence, OffenseQuery,
};
use dnp_api::{DnpClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DnpClient) {
    let server = MockServer::start().await;
    let client = DnpClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    client.set_token("test-token".to_string().into());
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    let client = DnpClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "me@example.com", "password": "hunter2" })))
        .respond_with(ok(json!({
            "token": "abc123",
            "user": { "id": "u1", "email": "me@example.com" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dnp/list"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let session = client.login("me@example.com", &secret).await.unwrap();
    assert_eq!(session.user.unwrap().id, "u1");
    assert!(client.has_token());

    let entries = client.list_dnp().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let client = DnpClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("me@example.com", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let server = MockServer::start().await;
    let client = DnpClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();

    let result = client.current_user().await;
    assert!(matches!(result, Err(Error::NotAuthenticated)));
}

// ── Artist tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_artists() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/artists/search"))
        .and(query_param("q", "drake"))
        .and(query_param("limit", "20"))
        .respond_with(ok(json!([{
            "id": "a1",
            "canonical_name": "Drake",
            "genres": ["hip hop"],
            "has_offenses": true,
            "offense_count": 2,
            "max_severity": "moderate"
        }])))
        .mount(&server)
        .await;

    let results = client.search_artists("drake", 20).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].canonical_name, "Drake");
    assert!(results[0].has_offenses);
    assert_eq!(results[0].offense_count, 2);
    assert_eq!(results[0].image_url, None);
}

// ── DNP list tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_add_and_remove_dnp() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/dnp/list"))
        .and(body_json(json!({ "artist_id": "a1", "tags": ["explicit"] })))
        .respond_with(ok(json!({
            "artist_id": "a1",
            "artist_name": "Artist One",
            "tags": ["explicit"],
            "created_at": "2026-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/dnp/list/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let entry = client
        .add_dnp(&AddDnpRequest {
            artist_id: "a1".into(),
            tags: vec!["explicit".into()],
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(entry.artist_name, "Artist One");
    assert_eq!(entry.tags, vec!["explicit".to_owned()]);

    client.remove_dnp("a1").await.unwrap();
}

// ── Offense tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_offenses_with_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/offenses"))
        .and(query_param("artist_id", "a1"))
        .and(query_param("severity", "severe"))
        .respond_with(ok(json!([{
            "id": "o1",
            "artist_id": "a1",
            "category": "violence",
            "severity": "severe",
            "procedural_state": "convicted",
            "title": "Assault conviction",
            "evidence": [{
                "url": "https://court.example.org/case/1",
                "source_tier": "A",
                "credibility_score": 0.95
            }]
        }])))
        .mount(&server)
        .await;

    let offenses = client
        .list_offenses(&OffenseQuery {
            artist_id: Some("a1".into()),
            severity: Some("severe".into()),
            ..OffenseQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(offenses.len(), 1);
    assert_eq!(offenses[0].evidence.len(), 1);
    assert_eq!(offenses[0].evidence[0].source_tier.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_create_offense_then_fetch() {
    let (server, client) = setup().await;

    let echoed = json!({
        "id": "o9",
        "artist_id": "a1",
        "category": "harassment",
        "severity": "moderate",
        "title": "Documented harassment",
        "evidence": [{ "url": "https://news.example.com/story" }]
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/offenses"))
        .respond_with(ok(echoed.clone()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/offenses/o9"))
        .respond_with(ok(echoed))
        .mount(&server)
        .await;

    let created = client
        .create_offense(&CreateOffenseRequest {
            artist_id: "a1".into(),
            category: "harassment".into(),
            severity: "moderate".into(),
            title: "Documented harassment".into(),
            description: None,
            incident_date: None,
            evidence: vec![NewEvidence {
                url: "https://news.example.com/story".into(),
                title: None,
                source_name: None,
                source_tier: None,
            }],
        })
        .await
        .unwrap();

    let fetched = client.get_offense(&created.id).await.unwrap();
    assert_eq!(fetched.category, "harassment");
    assert_eq!(fetched.severity, "moderate");
    assert_eq!(fetched.title, "Documented harassment");
}

// ── Enforcement tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_enforcement_job_roundtrip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/enforcement/jobs/j1"))
        .respond_with(ok(json!({
            "id": "j1",
            "artist_id": "a1",
            "action": "block",
            "status": "running",
            "platforms": [
                { "platform": "spotify", "status": "completed" },
                { "platform": "tidal", "status": "failed", "error_message": "token revoked" }
            ]
        })))
        .mount(&server)
        .await;

    let job = client.get_enforcement_job("j1").await.unwrap();
    assert_eq!(job.artist_id.as_deref(), Some("a1"));
    assert_eq!(job.category_id, None);
    assert_eq!(job.platforms.len(), 2);
    assert_eq!(job.platforms[1].error_message.as_deref(), Some("token revoked"));
}

#[tokio::test]
async fn test_category_enforcement_sends_only_category_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/enforcement/run"))
        .and(body_json(json!({
            "category_id": "c1",
            "action": "unblock",
            "platforms": ["spotify", "tidal"]
        })))
        .respond_with(ok(json!({
            "id": "j7",
            "category_id": "c1",
            "action": "unblock",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let job = client
        .run_enforcement(&EnforcementRunRequest {
            artist_id: None,
            category_id: Some("c1".into()),
            action: "unblock".into(),
            platforms: vec!["spotify".into(), "tidal".into()],
        })
        .await
        .unwrap();
    assert_eq!(job.id, "j7");
    assert_eq!(job.category_id.as_deref(), Some("c1"));
    assert!(job.platforms.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_categories().await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("token expired"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_envelope_failure_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/sync/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "No platforms connected"
        })))
        .mount(&server)
        .await;

    let result = client
        .trigger_sync(&dnp_api::models::TriggerSyncRequest {
            platforms: vec![],
            sync_type: "incremental".into(),
        })
        .await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, None);
            assert_eq!(message, "No platforms connected");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_with_envelope_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/artists/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Artist not found"
        })))
        .mount(&server)
        .await;

    let err = client.get_artist("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.api_message(), Some("Artist not found"));
}

#[tokio::test]
async fn test_missing_data_is_empty_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let result = client.dashboard().await;
    assert!(
        matches!(
            result,
            Err(Error::EmptyResponse { ref endpoint }) if endpoint == "analytics/dashboard"
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_connections().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

//! REST client against an in-process fake matching service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio_test::assert_ok;

use devswipe::api::{ApiError, Decision, DevsClient, USER_HEADER};

/// Requests seen by the fake backend: (method and path, `user` header).
#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<(String, Option<String>)>>>);

impl Calls {
    fn record(&self, what: String, headers: &HeaderMap) {
        let user = headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.0.lock().unwrap().push((what, user));
    }

    fn take(&self) -> Vec<(String, Option<String>)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn list_devs(State(calls): State<Calls>, headers: HeaderMap) -> Json<Value> {
    calls.record("GET /devs".to_string(), &headers);
    Json(json!([
        { "_id": "a", "name": "A", "bio": "x", "avatar": "url", "user": "a-gh", "likes": [] },
        { "_id": "b", "name": "B", "bio": null }
    ]))
}

async fn like(State(calls): State<Calls>, Path(id): Path<String>, headers: HeaderMap) -> Json<Value> {
    calls.record(format!("POST /devs/{}/likes", id), &headers);
    Json(json!({ "_id": "me" }))
}

async fn dislike(
    State(calls): State<Calls>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    calls.record(format!("POST /devs/{}/dislikes", id), &headers);
    Json(json!({ "_id": "me" }))
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    Json(json!({ "_id": format!("id-{}", username), "name": username.to_uppercase(), "user": username }))
}

async fn fake_backend() -> (DevsClient, Calls) {
    let calls = Calls::default();
    let router = Router::new()
        .route("/devs", get(list_devs).post(register))
        .route("/devs/{id}/likes", post(like))
        .route("/devs/{id}/dislikes", post(dislike))
        .with_state(calls.clone());
    let base = serve(router).await;
    (DevsClient::new(&base, Duration::from_secs(5)).unwrap(), calls)
}

#[tokio::test]
async fn test_list_devs_sends_user_header_and_keeps_order() {
    let (client, calls) = fake_backend().await;

    let devs = assert_ok!(client.list_devs("u1").await);

    let ids: Vec<&str> = devs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(devs[0].avatar.as_deref(), Some("url"));
    assert_eq!(devs[0].user.as_deref(), Some("a-gh"));
    assert_eq!(devs[1].bio, None);
    assert_eq!(
        calls.take(),
        vec![("GET /devs".to_string(), Some("u1".to_string()))]
    );
}

#[tokio::test]
async fn test_like_and_dislike_hit_candidate_paths() {
    let (client, calls) = fake_backend().await;

    assert_ok!(client.like("u1", "a").await);
    assert_ok!(client.decide("u1", "b", Decision::Dislike).await);

    assert_eq!(
        calls.take(),
        vec![
            ("POST /devs/a/likes".to_string(), Some("u1".to_string())),
            ("POST /devs/b/dislikes".to_string(), Some("u1".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_candidate_id_is_percent_encoded() {
    let (client, calls) = fake_backend().await;

    assert_ok!(client.dislike("u1", "a b").await);

    assert_eq!(calls.take()[0].0, "POST /devs/a b/dislikes");
}

#[tokio::test]
async fn test_register_returns_identity() {
    let (client, _calls) = fake_backend().await;

    let dev = assert_ok!(client.register("octocat").await);

    assert_eq!(dev.id, "id-octocat");
    assert_eq!(dev.display_name(), "OCTOCAT");
}

#[tokio::test]
async fn test_error_body_message_is_used() {
    let router = Router::new().route(
        "/devs",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Dev not exists" })),
            )
        }),
    );
    let client = DevsClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();

    match client.list_devs("ghost").await {
        Err(ApiError::NotFound(message)) => assert_eq!(message, "Dev not exists"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_devs_retries_server_errors() {
    let hits = Arc::new(Mutex::new(0u32));
    let counter = hits.clone();
    let router = Router::new().route(
        "/devs",
        get(move || {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let client = DevsClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();

    let result = client.list_devs("u1").await;

    assert!(matches!(result, Err(ApiError::ServerError(_))));
    assert_eq!(*hits.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_decisions_are_not_retried() {
    let hits = Arc::new(Mutex::new(0u32));
    let counter = hits.clone();
    let router = Router::new().route(
        "/devs/{id}/likes",
        post(move || {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    );
    let client = DevsClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();

    assert!(client.like("u1", "a").await.is_err());
    assert_eq!(*hits.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_garbage_body_is_invalid_response() {
    let router = Router::new().route("/devs", get(|| async { "not json" }));
    let client = DevsClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();

    assert!(matches!(
        client.list_devs("u1").await,
        Err(ApiError::InvalidResponse(_))
    ));
}

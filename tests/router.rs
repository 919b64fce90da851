mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use snaplink::routes::app_router;
use snaplink::utils::code_generator::generate_code;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn shorten_request(uri: &str, host: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(host) = host {
        builder = builder.header(header::HOST, host);
    }
    builder
        .body(Body::from(r#"{"original_url":"https://example.com/x"}"#))
        .unwrap()
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let (state, _store) = common::create_test_state();

    let response = app_router(state)
        .oneshot(shorten_request("/urls/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_short_url_from_host_header() {
    let mut config = common::test_config();
    config.base_url = None;
    let (state, _store) = common::create_test_state_with_config(config);

    let response = app_router(state)
        .oneshot(shorten_request("/urls", Some("localhost:5000")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(
        body["short_url"],
        format!(
            "http://localhost:5000/r/{}",
            generate_code("https://example.com/x")
        )
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let (state, _store) = common::create_test_state();

    let response = app_router(state)
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_code_with_trailing_slash() {
    let (state, _store) = common::create_test_state();

    let response = app_router(state)
        .oneshot(Request::get("/r/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "Invalid short URL format");
}

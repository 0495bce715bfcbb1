use axum::body::Body;
use axum::http::{Request, StatusCode};
use relay_server::{SignalingService, coordinator_channel, http};
use tower::ServiceExt;

use crate::integration::init_tracing;

fn test_app(static_dir: &std::path::Path) -> axum::Router {
    let (handle, _rx) = coordinator_channel(8);
    http::router(SignalingService::new(handle), static_dir)
}

#[tokio::test]
async fn test_plain_get_on_socket_route_is_bad_request() {
    init_tracing();

    let dir = std::env::temp_dir();
    let (handle, rx) = coordinator_channel(8);
    let app = http::router(SignalingService::new(handle), &dir);

    let res = app
        .oneshot(Request::get("/server").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    drop(rx);
}

#[tokio::test]
async fn test_static_files_are_served() {
    init_tracing();

    let dir = std::env::temp_dir().join(format!("relay-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>relay</h1>").unwrap();

    let res = test_app(&dir)
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let missing = test_app(&dir)
        .oneshot(Request::get("/nope.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(&dir);
}
